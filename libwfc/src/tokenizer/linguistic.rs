use std::sync::Arc;

use rust_stemmers::Stemmer;
use unicode_segmentation::UnicodeSegmentation;

use super::{is_alpha, Token, Tokenizer};
use crate::{
    language::Language,
    resources::{ResourceError, StopwordStore},
};

/// One segment of analyzed text with its lexical flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis<'a> {
    pub text: &'a str,
    pub lower: String,
    pub is_alpha: bool,
    pub is_punct: bool,
    pub is_space: bool,
    pub is_stop: bool,
}

/// Segments text on Unicode word boundaries and annotates every segment,
/// keeping the lowercase form of alphabetic non-stopword segments.
/// Optionally reduces kept words to their Snowball stem.
pub struct LinguisticTokenizer {
    stopwords: Arc<StopwordStore>,
    stem: bool,
}

impl LinguisticTokenizer {
    pub fn new(stopwords: Arc<StopwordStore>, stem: bool) -> Self {
        Self { stopwords, stem }
    }

    pub fn analyze<'a>(
        &self,
        text: &'a str,
        language: Language,
    ) -> Result<Vec<Analysis<'a>>, ResourceError> {
        let stopwords = self.stopwords.stopwords(language)?;
        Ok(text
            .split_word_bounds()
            .map(|segment| {
                let lower = segment.to_lowercase();
                Analysis {
                    text: segment,
                    is_alpha: is_alpha(segment),
                    is_punct: segment.chars().all(is_punctuation),
                    is_space: segment.chars().all(char::is_whitespace),
                    is_stop: stopwords.contains(&lower),
                    lower,
                }
            })
            .collect())
    }
}

impl Tokenizer for LinguisticTokenizer {
    fn tokenize_and_filter(
        &self,
        text: &str,
        language: Language,
    ) -> Result<Vec<Token>, ResourceError> {
        let stemmer = self
            .stem
            .then(|| Stemmer::create(language.stemmer_algorithm()));
        Ok(self
            .analyze(text, language)?
            .into_iter()
            .filter(|a| a.is_alpha && !a.is_punct && !a.is_stop)
            .map(|a| match &stemmer {
                Some(stemmer) => stemmer.stem(&a.lower).into_owned(),
                None => a.lower,
            })
            .collect())
    }
}

fn is_punctuation(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && !c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::test_support::store;

    #[test]
    fn annotates_segments() {
        let tokenizer = LinguisticTokenizer::new(store("ling-annotate", "the\n"), false);
        let analysis = tokenizer.analyze("The cat, 2 cats!", Language::English).unwrap();
        let words: Vec<_> = analysis.iter().filter(|a| !a.is_space).map(|a| a.text).collect();
        assert_eq!(words, vec!["The", "cat", ",", "2", "cats", "!"]);

        assert!(analysis[0].is_stop && analysis[0].is_alpha);
        assert_eq!(analysis[0].lower, "the");
        let comma = analysis.iter().find(|a| a.text == ",").unwrap();
        assert!(comma.is_punct && !comma.is_alpha);
        let number = analysis.iter().find(|a| a.text == "2").unwrap();
        assert!(!number.is_punct && !number.is_alpha);
    }

    #[test]
    fn keeps_lowercase_content_words() {
        let tokenizer = LinguisticTokenizer::new(store("ling-keep", "la\nde\n"), false);
        let tokens = tokenizer
            .tokenize_and_filter("La Canción de Mañana", Language::Spanish)
            .unwrap();
        assert_eq!(tokens, vec!["canción", "mañana"]);
    }

    #[test]
    fn contractions_are_not_alphabetic() {
        let tokenizer = LinguisticTokenizer::new(store("ling-contraction", "the\n"), false);
        let tokens = tokenizer
            .tokenize_and_filter("don't panic", Language::English)
            .unwrap();
        assert_eq!(tokens, vec!["panic"]);
    }

    #[test]
    fn stems_when_enabled() {
        let tokenizer = LinguisticTokenizer::new(store("ling-stem", "the\n"), true);
        let tokens = tokenizer
            .tokenize_and_filter("running runs", Language::English)
            .unwrap();
        assert_eq!(tokens, vec!["run", "run"]);
    }
}
