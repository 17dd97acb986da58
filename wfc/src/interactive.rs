use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use libwfc::{
    render, util, CompareError, Comparator, Comparison, Request, Session, SortColumn,
    CHART_WORDS_RANGE, CLOUD_WORDS_RANGE, DEFAULT_CHART_WORDS, DEFAULT_CLOUD_WORDS,
};

const TERMINATOR: &str = ".";

const HELP: &str = "\
Commands:
  text1 <lang>          enter text 1, finish with a line containing only '.'
  text2 <lang>          enter text 2, finish with a line containing only '.'
  file1 <lang> <path>   load text 1 from a file
  file2 <lang> <path>   load text 2 from a file
  cloud <50-300>        maximum words per word cloud
  chart <5-20>          number of words in the chart
  sort <column|none>    sort the table by word, freq1, freq2 or significance
  run                   compare the texts
  help                  show this message
  quit                  leave the session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    One,
    Two,
}

#[derive(Debug, PartialEq)]
enum Command {
    Text { slot: Slot, lang: String },
    File { slot: Slot, lang: String, path: PathBuf },
    Cloud(usize),
    Chart(usize),
    Sort(Option<SortColumn>),
    Run,
    Help,
    Quit,
}

fn parse_bound(
    arg: Option<&str>,
    range: std::ops::RangeInclusive<usize>,
) -> Result<usize, String> {
    let value = arg
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| "expected a number".to_string())?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(format!("must be within {}..={}", range.start(), range.end()))
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let Some(name) = parts.next() else {
        return Err("empty command, try 'help'".into());
    };
    let slot = match name {
        "text1" | "file1" => Some(Slot::One),
        "text2" | "file2" => Some(Slot::Two),
        _ => None,
    };
    match (name, slot) {
        ("text1" | "text2", Some(slot)) => {
            let lang = parts.next().ok_or("expected a language tag")?.to_string();
            Ok(Command::Text { slot, lang })
        }
        ("file1" | "file2", Some(slot)) => {
            let lang = parts.next().ok_or("expected a language tag")?.to_string();
            let path = parts.collect::<Vec<_>>().join(" ");
            if path.is_empty() {
                return Err("expected a file path".into());
            }
            Ok(Command::File {
                slot,
                lang,
                path: path.into(),
            })
        }
        ("cloud", _) => parse_bound(parts.next(), CLOUD_WORDS_RANGE).map(Command::Cloud),
        ("chart", _) => parse_bound(parts.next(), CHART_WORDS_RANGE).map(Command::Chart),
        ("sort", _) => match parts.next() {
            Some("none") => Ok(Command::Sort(None)),
            Some(column) => column
                .parse::<SortColumn>()
                .map(|c| Command::Sort(Some(c)))
                .map_err(|e| e.to_string()),
            None => Err("expected a column".into()),
        },
        ("run", _) => Ok(Command::Run),
        ("help", _) => Ok(Command::Help),
        ("quit" | "exit", _) => Ok(Command::Quit),
        (other, _) => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

/// Inputs collected so far. Defaults mirror the one-shot command.
#[derive(Debug)]
struct Draft {
    texts: [String; 2],
    langs: [String; 2],
    cloud_words: usize,
    chart_words: usize,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            texts: Default::default(),
            langs: ["es".into(), "en".into()],
            cloud_words: DEFAULT_CLOUD_WORDS,
            chart_words: DEFAULT_CHART_WORDS,
        }
    }
}

impl Draft {
    fn set(&mut self, slot: Slot, text: String, lang: String) {
        let i = match slot {
            Slot::One => 0,
            Slot::Two => 1,
        };
        self.texts[i] = text;
        self.langs[i] = lang;
    }

    fn request(&self) -> Request {
        let mut request = Request::new(
            self.texts[0].as_str(),
            self.langs[0].as_str(),
            self.texts[1].as_str(),
            self.langs[1].as_str(),
        );
        request.cloud_words = self.cloud_words;
        request.chart_words = self.chart_words;
        request
    }
}

/// Reads commands until `quit` or end of input. Runs happen one at a time;
/// each successful run replaces the previous result.
pub fn run(
    comparator: &Comparator,
    input: &mut impl BufRead,
    output: &Path,
) -> anyhow::Result<()> {
    let mut draft = Draft::default();
    let mut session = Session::new();
    let mut last: Option<Comparison> = None;
    let mut line = String::new();

    println!("{}", HELP);
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let command = match parse_command(line.trim()) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Text { slot, lang } => {
                println!("Enter the text, then a line containing only '{}'", TERMINATOR);
                let text = util::read_until_terminator(input, TERMINATOR)?;
                draft.set(slot, text, lang);
            }
            Command::File { slot, lang, path } => match util::read_text(&path) {
                Ok(text) => draft.set(slot, text, lang),
                Err(e) => println!("{:#}", e),
            },
            Command::Cloud(n) => draft.cloud_words = n,
            Command::Chart(n) => draft.chart_words = n,
            Command::Sort(column) => {
                session.sort_by = column;
                if let Some(comparison) = &last {
                    render::write_table(std::io::stdout().lock(), comparison, &session)?;
                }
            }
            Command::Run => match comparator.compare(&draft.request()) {
                Ok(comparison) => {
                    crate::present(&comparison, &session, output)?;
                    last = Some(comparison);
                }
                Err(CompareError::MissingInput) => {
                    log::warn!("Comparison skipped, a text is missing");
                    println!("{}", CompareError::MissingInput);
                }
                Err(e) => return Err(e.into()),
            },
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use libwfc::{resources::BundledFetcher, Language, StopwordStore, TokenizerKind};

    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_command("text1 en"),
            Ok(Command::Text {
                slot: Slot::One,
                lang: "en".into()
            })
        );
        assert_eq!(
            parse_command("file2 es my notes.txt"),
            Ok(Command::File {
                slot: Slot::Two,
                lang: "es".into(),
                path: "my notes.txt".into()
            })
        );
        assert_eq!(parse_command("cloud 120"), Ok(Command::Cloud(120)));
        assert_eq!(parse_command("sort none"), Ok(Command::Sort(None)));
        assert_eq!(
            parse_command("sort freq1"),
            Ok(Command::Sort(Some(SortColumn::Frequency1)))
        );
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(parse_command("").is_err());
        assert!(parse_command("text1").is_err());
        assert!(parse_command("file1 en").is_err());
        assert!(parse_command("cloud 20").is_err());
        assert!(parse_command("chart 21").is_err());
        assert!(parse_command("sort count").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn draft_defaults_match_one_shot_command() {
        let request = Draft::default().request();
        assert_eq!(request.lang1, "es");
        assert_eq!(request.lang2, "en");
        assert_eq!(request.cloud_words, DEFAULT_CLOUD_WORDS);
        assert_eq!(request.chart_words, DEFAULT_CHART_WORDS);
    }

    #[test]
    fn scripted_session_writes_outputs() {
        let base = std::env::temp_dir().join(format!("wfc-interactive-{}", std::process::id()));
        let _ = fs::remove_dir_all(&base);
        let store = StopwordStore::new(base.join("resources"), Box::new(BundledFetcher));
        for language in Language::ALL {
            let path = store.path_for(language);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "qqqq\n").unwrap();
        }
        let comparator =
            Comparator::with_store(Arc::new(store), TokenizerKind::Statistical, false);

        let script = "run\ntext1 en\ncat cat dog\n.\ntext2 en\ndog dog dog bird\n.\nsort freq2\nrun\nquit\n";
        let output = base.join("output");
        run(&comparator, &mut script.as_bytes(), &output).unwrap();

        let csv = fs::read_to_string(output.join("comparison.csv")).unwrap();
        let words: Vec<_> = csv
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(words, vec!["dog", "bird", "cat"]);
    }
}
