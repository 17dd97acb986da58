use std::{fmt, str::FromStr};

use rust_stemmers::Algorithm;

/// Languages a text can be compared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Spanish,
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Spanish, Language::English];

    /// Short tag used on the command line and in output labels.
    pub fn tag(self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
        }
    }

    /// Long name, used for resource file names.
    pub fn name(self) -> &'static str {
        match self {
            Language::Spanish => "spanish",
            Language::English => "english",
        }
    }

    pub(crate) fn stemmer_algorithm(self) -> Algorithm {
        match self {
            Language::Spanish => Algorithm::Spanish,
            Language::English => Algorithm::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language tag '{0}' (expected one of: es, en)")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es" => Ok(Language::Spanish),
            "en" => Ok(Language::English),
            _ => Err(ParseLanguageError(s.to_string())),
        }
    }
}
