use std::collections::HashMap;

use crate::tokenizer::Token;

/// Word counts for one text, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    entries: Vec<(Token, u64)>,
    index: HashMap<Token, usize>,
}

/// Counts token occurrences. No filtering happens here.
pub fn count<I>(tokens: I) -> FrequencyMap
where
    I: IntoIterator<Item = Token>,
{
    tokens.into_iter().collect()
}

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, word: Token, amount: u64) {
        match self.index.get(&word) {
            Some(&i) => self.entries[i].1 += amount,
            None => {
                self.index.insert(word.clone(), self.entries.len());
                self.entries.push((word, amount));
            }
        }
    }

    /// Count of `word`, zero when absent.
    pub fn get(&self, word: &str) -> u64 {
        self.index
            .get(word)
            .map(|&i| self.entries[i].1)
            .unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(word, count)| (word.as_str(), *count))
    }

    /// The `n` most frequent words. Equal counts keep first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
        let mut entries = self.iter().collect::<Vec<_>>();
        entries.sort_by(|&(_, a), &(_, b)| b.cmp(&a));
        entries.truncate(n);
        entries
    }

    /// Per-word sum of both maps. Words of `self` come first, then words
    /// only found in `other`.
    pub fn merged(&self, other: &FrequencyMap) -> FrequencyMap {
        let mut merged = self.clone();
        for (word, count) in other.iter() {
            merged.add(word.to_string(), count);
        }
        merged
    }
}

impl FromIterator<Token> for FrequencyMap {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        let mut map = FrequencyMap::new();
        for token in iter {
            map.add(token, 1);
        }
        map
    }
}
