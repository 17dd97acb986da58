//! Text to token normalization.
//!
//! Two backends share the [`Tokenizer`] trait so the rest of the pipeline
//! never knows which one produced its tokens.

use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    language::Language,
    resources::{ResourceError, StopwordStore},
};

mod linguistic;
mod statistical;

pub use linguistic::{Analysis, LinguisticTokenizer};
pub use statistical::{word_tokenize, StatisticalTokenizer};

/// A normalized word: lowercase, alphabetic, not a stopword.
pub type Token = String;

pub trait Tokenizer {
    fn tokenize_and_filter(&self, text: &str, language: Language)
        -> Result<Vec<Token>, ResourceError>;

    /// Like [`Tokenizer::tokenize_and_filter`], but takes a raw language tag.
    /// An unsupported tag yields no tokens rather than an error.
    fn tokenize_tagged(&self, text: &str, tag: &str) -> Result<Vec<Token>, ResourceError> {
        match tag.parse::<Language>() {
            Ok(language) => self.tokenize_and_filter(text, language),
            Err(e) => {
                log::warn!("{}, treating text as empty", e);
                Ok(Vec::new())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenizerKind {
    #[default]
    Statistical,
    Linguistic,
}

impl TokenizerKind {
    pub fn build(self, stopwords: Arc<StopwordStore>, stem: bool) -> Box<dyn Tokenizer> {
        match self {
            TokenizerKind::Statistical => Box::new(StatisticalTokenizer::new(stopwords)),
            TokenizerKind::Linguistic => Box::new(LinguisticTokenizer::new(stopwords, stem)),
        }
    }
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenizerKind::Statistical => "statistical",
            TokenizerKind::Linguistic => "linguistic",
        })
    }
}

impl FromStr for TokenizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "statistical" => Ok(TokenizerKind::Statistical),
            "linguistic" => Ok(TokenizerKind::Linguistic),
            other => Err(format!("unknown tokenizer '{}'", other)),
        }
    }
}

pub(crate) fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphabetic)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::{fs, path::Path, sync::Arc};

    use crate::{
        language::Language,
        resources::{ResourceError, ResourceFetcher, StopwordStore},
    };

    /// Fetcher that writes a fixed list, whatever the language.
    pub struct FixedFetcher(pub &'static str);

    impl ResourceFetcher for FixedFetcher {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn fetch(&self, _language: Language, dest: &Path) -> Result<(), ResourceError> {
            fs::write(dest, self.0).map_err(|source| ResourceError::Io {
                path: dest.into(),
                source,
            })
        }
    }

    pub fn store(name: &str, words: &'static str) -> Arc<StopwordStore> {
        let dir = std::env::temp_dir().join(format!(
            "wfc-tokenizer-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        Arc::new(StopwordStore::new(dir, Box::new(FixedFetcher(words))))
    }
}
