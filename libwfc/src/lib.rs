use std::{ops::RangeInclusive, path::PathBuf, sync::Arc};

pub mod compare;
pub mod frequency;
pub mod language;
pub mod render;
pub mod resources;
pub mod session;
pub mod tokenizer;
pub mod util;

pub use compare::{classify, top_n, ComparisonRow, Significance, TopWord};
pub use frequency::{count, FrequencyMap};
pub use language::Language;
pub use resources::{FetcherKind, ResourceError, StopwordStore};
pub use session::{Session, SortColumn};
pub use tokenizer::{Token, Tokenizer, TokenizerKind};

pub const CLOUD_WORDS_RANGE: RangeInclusive<usize> = 50..=300;
pub const CHART_WORDS_RANGE: RangeInclusive<usize> = 5..=20;
pub const DEFAULT_CLOUD_WORDS: usize = 100;
pub const DEFAULT_CHART_WORDS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("Please insert both texts.")]
    MissingInput,
    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tokenizer: TokenizerKind,
    pub stem: bool,
    pub resource_dir: PathBuf,
    pub fetcher: FetcherKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerKind::default(),
            stem: false,
            resource_dir: resources::default_resource_dir(),
            fetcher: FetcherKind::default(),
        }
    }
}

/// Two texts to compare, with their language tags and display bounds.
#[derive(Debug, Clone)]
pub struct Request {
    pub text1: String,
    pub lang1: String,
    pub text2: String,
    pub lang2: String,
    pub cloud_words: usize,
    pub chart_words: usize,
}

impl Request {
    pub fn new(
        text1: impl Into<String>,
        lang1: impl Into<String>,
        text2: impl Into<String>,
        lang2: impl Into<String>,
    ) -> Self {
        Self {
            text1: text1.into(),
            lang1: lang1.into(),
            text2: text2.into(),
            lang2: lang2.into(),
            cloud_words: DEFAULT_CLOUD_WORDS,
            chart_words: DEFAULT_CHART_WORDS,
        }
    }

    fn validate(&self) -> Result<(), CompareError> {
        if self.text1.trim().is_empty() || self.text2.trim().is_empty() {
            return Err(CompareError::MissingInput);
        }
        let bounds = [
            ("cloud words", self.cloud_words, CLOUD_WORDS_RANGE),
            ("chart words", self.chart_words, CHART_WORDS_RANGE),
        ];
        for (name, value, range) in bounds {
            if !range.contains(&value) {
                return Err(CompareError::OutOfRange {
                    name,
                    value,
                    min: *range.start(),
                    max: *range.end(),
                });
            }
        }
        Ok(())
    }
}

/// Everything the renderers need from one comparison run.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub lang1: String,
    pub lang2: String,
    pub freq1: FrequencyMap,
    pub freq2: FrequencyMap,
    pub rows: Vec<ComparisonRow>,
    pub top: Vec<TopWord>,
    pub cloud_words: usize,
}

impl Comparison {
    pub fn label1(&self) -> String {
        format!("Text 1 ({})", self.lang1)
    }

    pub fn label2(&self) -> String {
        format!("Text 2 ({})", self.lang2)
    }
}

pub struct Comparator {
    stopwords: Arc<StopwordStore>,
    tokenizer: Box<dyn Tokenizer>,
}

impl Comparator {
    pub fn new(config: &Config) -> Self {
        let store = StopwordStore::new(&config.resource_dir, config.fetcher.build());
        Self::with_store(Arc::new(store), config.tokenizer, config.stem)
    }

    pub fn with_store(stopwords: Arc<StopwordStore>, kind: TokenizerKind, stem: bool) -> Self {
        let tokenizer = kind.build(Arc::clone(&stopwords), stem);
        Self {
            stopwords,
            tokenizer,
        }
    }

    /// Loads all stopword lists now instead of on first comparison.
    pub fn warm_up(&self) -> Result<(), ResourceError> {
        self.stopwords.warm_up()
    }

    /// Word counts for one text. An unsupported tag gives an empty map.
    pub fn frequencies(&self, text: &str, tag: &str) -> Result<FrequencyMap, ResourceError> {
        let tokens = self.tokenizer.tokenize_tagged(text, tag)?;
        log::debug!("{} tokens kept from {} bytes of '{}' text", tokens.len(), text.len(), tag);
        Ok(count(tokens))
    }

    pub fn compare(&self, request: &Request) -> Result<Comparison, CompareError> {
        request.validate()?;

        let freq1 = self.frequencies(&request.text1, &request.lang1)?;
        let freq2 = self.frequencies(&request.text2, &request.lang2)?;
        let rows = classify(&freq1, &freq2);
        let top = top_n(&freq1, &freq2, request.chart_words);

        Ok(Comparison {
            lang1: request.lang1.clone(),
            lang2: request.lang2.clone(),
            freq1,
            freq2,
            rows,
            top,
            cloud_words: request.cloud_words,
        })
    }
}
