use std::path::{Path, PathBuf};

use clap::Parser;
use libwfc::{
    render, util, Comparator, Comparison, Config, FetcherKind, Request, Session, SortColumn,
    TokenizerKind, TopWord, CHART_WORDS_RANGE, CLOUD_WORDS_RANGE, DEFAULT_CHART_WORDS,
    DEFAULT_CLOUD_WORDS,
};

mod interactive;
mod logging;

#[derive(Debug, clap::Parser)]
#[command(name = "wfc", about = "Compare word frequencies between two texts")]
struct Args {
    /// Where stopword lists are cached
    #[arg(long, env = "WFC_RESOURCE_DIR", global = true)]
    resource_dir: Option<PathBuf>,
    /// Source for missing stopword lists: bundled or http
    #[arg(long, default_value = "bundled", global = true)]
    fetcher: String,
    /// URL template for the http fetcher; `{name}` becomes the language name (english), `{code}` its tag (en)
    #[arg(long, global = true)]
    url_template: Option<String>,
    /// Tokenizer backend: statistical or linguistic
    #[arg(long, default_value_t = TokenizerKind::Statistical, global = true)]
    tokenizer: TokenizerKind,
    /// Reduce words to their stem (linguistic tokenizer only)
    #[arg(long, global = true)]
    stem: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Compare two texts once and write the results
    Compare(CompareArgs),
    /// Interactive session; the sort column is kept between runs
    Session {
        /// Directory for rendered artifacts
        #[arg(long, default_value = "output")]
        output: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct CompareArgs {
    #[arg(long, conflicts_with = "file1")]
    text1: Option<String>,
    /// Read text 1 from a file (.bz2 is decompressed)
    #[arg(long)]
    file1: Option<PathBuf>,
    #[arg(long, default_value = "es")]
    lang1: String,
    #[arg(long, conflicts_with = "file2")]
    text2: Option<String>,
    /// Read text 2 from a file (.bz2 is decompressed)
    #[arg(long)]
    file2: Option<PathBuf>,
    #[arg(long, default_value = "en")]
    lang2: String,
    /// Maximum words per word cloud (50-300)
    #[arg(long, default_value_t = DEFAULT_CLOUD_WORDS, value_parser = parse_cloud_words)]
    cloud_words: usize,
    /// Number of words in the chart (5-20)
    #[arg(long, default_value_t = DEFAULT_CHART_WORDS, value_parser = parse_chart_words)]
    chart_words: usize,
    /// Sort the table descending by word, freq1, freq2 or significance
    #[arg(long)]
    sort_by: Option<SortColumn>,
    /// Directory for rendered artifacts
    #[arg(long, default_value = "output")]
    output: PathBuf,
}

fn parse_bounded(s: &str, range: std::ops::RangeInclusive<usize>) -> Result<usize, String> {
    let value: usize = s.parse().map_err(|e| format!("{}", e))?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(format!("must be within {}..={}", range.start(), range.end()))
    }
}

fn parse_cloud_words(s: &str) -> Result<usize, String> {
    parse_bounded(s, CLOUD_WORDS_RANGE)
}

fn parse_chart_words(s: &str) -> Result<usize, String> {
    parse_bounded(s, CHART_WORDS_RANGE)
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let fetcher = match self.fetcher.as_str() {
            "bundled" => FetcherKind::Bundled,
            "http" => FetcherKind::Http {
                url_template: self.url_template.clone(),
            },
            other => anyhow::bail!("unknown fetcher '{}' (expected bundled or http)", other),
        };
        let mut config = Config {
            tokenizer: self.tokenizer,
            stem: self.stem,
            fetcher,
            ..Default::default()
        };
        if let Some(dir) = &self.resource_dir {
            config.resource_dir = dir.clone();
        }
        Ok(config)
    }
}

fn read_input(text: Option<String>, file: Option<&Path>) -> anyhow::Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => util::read_text(path),
        (None, None) => Ok(String::new()),
    }
}

/// Longest terminal bar, reached by the word with the highest combined count.
const BAR_WIDTH: usize = 40;

/// Bar lengths for both texts of each top word, scaled so the largest
/// combined count spans `width` characters. A nonzero count never rounds
/// down to an empty bar.
fn bar_lengths(top: &[TopWord], width: usize) -> Vec<(usize, usize)> {
    let max = top.iter().map(TopWord::combined).max().unwrap_or(0);
    let scale = |count: u64| -> usize {
        if count == 0 || max == 0 {
            return 0;
        }
        let scaled = (count as u128 * width as u128 + max as u128 / 2) / max as u128;
        (scaled as usize).max(1)
    };
    top.iter().map(|t| (scale(t.count1), scale(t.count2))).collect()
}

/// Prints the comparison and writes its artifacts.
pub(crate) fn present(
    comparison: &Comparison,
    session: &Session,
    output: &Path,
) -> anyhow::Result<()> {
    println!("Comparison of Word Frequencies");
    render::write_table(std::io::stdout().lock(), comparison, session)?;

    println!();
    println!("Word Frequency Chart (Top by Total Frequency)");
    let width = comparison
        .top
        .iter()
        .map(|t| t.word.chars().count())
        .max()
        .unwrap_or(0);
    let bars = bar_lengths(&comparison.top, BAR_WIDTH);
    for (top, (len1, len2)) in comparison.top.iter().zip(bars) {
        println!(
            "{:<width$}  {} {}  ({}/{})",
            top.word,
            "#".repeat(len1),
            "=".repeat(len2),
            top.count1,
            top.count2,
            width = width
        );
    }
    println!("(# {}, = {})", comparison.label1(), comparison.label2());

    println!();
    for path in render::write_outputs(output, comparison, session)? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();
    let comparator = Comparator::new(&args.config()?);
    comparator.warm_up()?;

    match args.command {
        Command::Compare(compare) => {
            let mut request = Request::new(
                read_input(compare.text1, compare.file1.as_deref())?,
                compare.lang1,
                read_input(compare.text2, compare.file2.as_deref())?,
                compare.lang2,
            );
            request.cloud_words = compare.cloud_words;
            request.chart_words = compare.chart_words;

            let session = Session {
                sort_by: compare.sort_by,
            };
            let comparison = comparator.compare(&request)?;
            present(&comparison, &session, &compare.output)?;
        }
        Command::Session { output } => {
            let stdin = std::io::stdin();
            interactive::run(&comparator, &mut stdin.lock(), &output)?;
        }
    }

    Ok(())
}
