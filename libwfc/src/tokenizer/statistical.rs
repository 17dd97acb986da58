use std::sync::Arc;

use super::{is_alpha, Token, Tokenizer};
use crate::{
    language::Language,
    resources::{ResourceError, StopwordStore},
};

/// Lowercases the text, splits it with [`word_tokenize`] and drops anything
/// that isn't alphabetic or is in the language's stopword list.
pub struct StatisticalTokenizer {
    stopwords: Arc<StopwordStore>,
}

impl StatisticalTokenizer {
    pub fn new(stopwords: Arc<StopwordStore>) -> Self {
        Self { stopwords }
    }
}

impl Tokenizer for StatisticalTokenizer {
    fn tokenize_and_filter(
        &self,
        text: &str,
        language: Language,
    ) -> Result<Vec<Token>, ResourceError> {
        let stopwords = self.stopwords.stopwords(language)?;
        let lowered = text.to_lowercase();
        Ok(word_tokenize(&lowered)
            .into_iter()
            .filter(|&word| is_alpha(word) && !stopwords.contains(word))
            .map(str::to_string)
            .collect())
    }
}

/// Treebank-style word splitting.
///
/// Whitespace separates chunks; leading and trailing punctuation of each
/// chunk becomes one token per character, and English clitics (`n't`, `'s`,
/// `'m`, `'d`, `'ll`, `'re`, `'ve`) are split from the word they follow.
/// Inner punctuation (`well-known`, `e.g`) stays attached.
pub fn word_tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        let Some(start) = chunk.find(char::is_alphanumeric) else {
            tokens.extend(split_chars(chunk));
            continue;
        };
        let end = chunk
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(chunk.len());

        tokens.extend(split_chars(&chunk[..start]));
        split_clitic(&chunk[start..end], &mut tokens);
        tokens.extend(split_chars(&chunk[end..]));
    }
    tokens
}

fn split_chars(s: &str) -> impl Iterator<Item = &str> {
    s.char_indices().map(move |(i, c)| &s[i..i + c.len_utf8()])
}

fn split_clitic<'a>(core: &'a str, tokens: &mut Vec<&'a str>) {
    let is_apostrophe = |c: char| c == '\'' || c == '’';
    if let Some(idx) = core.rfind(is_apostrophe) {
        let apostrophe_len = core[idx..].chars().next().map_or(1, char::len_utf8);
        let tail = &core[idx + apostrophe_len..];
        let split_at = match tail {
            "t" if idx > 1 && core[..idx].ends_with('n') => Some(idx - 1),
            "s" | "m" | "d" | "ll" | "re" | "ve" if idx > 0 => Some(idx),
            _ => None,
        };
        if let Some(at) = split_at {
            tokens.push(&core[..at]);
            tokens.push(&core[at..]);
            return;
        }
    }
    tokens.push(core);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::test_support::store;

    #[test]
    fn splits_punctuation_and_clitics() {
        assert_eq!(
            word_tokenize("\"don't stop,\" she's said (twice)..."),
            vec![
                "\"", "do", "n't", "stop", ",", "\"", "she", "'s", "said", "(", "twice", ")",
                ".", ".", "."
            ]
        );
    }

    #[test]
    fn keeps_inner_punctuation() {
        assert_eq!(word_tokenize("well-known e.g. 3.14"), vec!["well-known", "e.g", ".", "3.14"]);
    }

    #[test]
    fn handles_unicode_letters() {
        assert_eq!(
            word_tokenize("¿Qué pasó, señor?"),
            vec!["¿", "Qué", "pasó", ",", "señor", "?"]
        );
    }

    #[test]
    fn filters_stopwords_and_non_alphabetic_tokens() {
        let tokenizer = StatisticalTokenizer::new(store("stat-filter", "el\nde\nla\n"));
        let tokens = tokenizer
            .tokenize_and_filter("El Perro de la casa tiene 3 años y 2-3 huesos.", Language::Spanish)
            .unwrap();
        assert_eq!(tokens, vec!["perro", "casa", "tiene", "años", "y", "huesos"]);
    }

    #[test]
    fn empty_text_gives_no_tokens() {
        let tokenizer = StatisticalTokenizer::new(store("stat-empty", "the\n"));
        assert!(tokenizer
            .tokenize_and_filter("   ", Language::English)
            .unwrap()
            .is_empty());
    }
}
