use std::{fs::OpenOptions, io::Read, path::Path};

use anyhow::Context;
use bzip2::read::BzDecoder;

/// Reads a text file, decompressing it first when it ends in `.bz2`.
pub fn read_text(filename: impl AsRef<Path>) -> anyhow::Result<String> {
    let filename = filename.as_ref();
    let mut file = OpenOptions::new()
        .read(true)
        .open(filename)
        .with_context(|| format!("failed to open {:?}", filename))?;
    let is_compressed = filename
        .extension()
        .map(|s| s.to_string_lossy().as_ref() == "bz2")
        .unwrap_or_default();

    let mut contents = String::new();
    let read = if is_compressed {
        BzDecoder::new(file).read_to_string(&mut contents)
    } else {
        file.read_to_string(&mut contents)
    };
    read.with_context(|| format!("failed to read {:?} as UTF-8 text", filename))?;
    Ok(contents)
}

/// Reads lines from `input` until one consisting only of `terminator`,
/// which is not included. End of input also ends the text.
pub fn read_until_terminator(
    input: &mut impl std::io::BufRead,
    terminator: &str,
) -> anyhow::Result<String> {
    let mut text = String::new();
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim_end_matches(&['\r', '\n'][..]) == terminator {
            break;
        }
        text.push_str(&line);
    }
    Ok(text)
}
