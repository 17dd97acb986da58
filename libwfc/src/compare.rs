use std::fmt;

use serde::Serialize;

use crate::{frequency::FrequencyMap, tokenizer::Token};

const SIGNIFICANCE_FACTOR: u64 = 2;
const SIGNIFICANCE_FLOOR: u64 = 5;

/// How a word is distributed across the two texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Significance {
    None,
    ExclusiveToText1,
    ExclusiveToText2,
    MoreInText1,
    MoreInText2,
}

impl Significance {
    /// Applies the rules in order; the first match wins.
    pub fn classify(c1: u64, c2: u64) -> Self {
        if c1 > 0 && c2 == 0 {
            Significance::ExclusiveToText1
        } else if c2 > 0 && c1 == 0 {
            Significance::ExclusiveToText2
        } else if c1 > c2 * SIGNIFICANCE_FACTOR && c1 > SIGNIFICANCE_FLOOR {
            Significance::MoreInText1
        } else if c2 > c1 * SIGNIFICANCE_FACTOR && c2 > SIGNIFICANCE_FLOOR {
            Significance::MoreInText2
        } else {
            Significance::None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Significance::None => "",
            Significance::ExclusiveToText1 => "Exclusive to Text 1",
            Significance::ExclusiveToText2 => "Exclusive to Text 2",
            Significance::MoreInText1 => "Significantly more in Text 1",
            Significance::MoreInText2 => "Significantly more in Text 2",
        }
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub word: Token,
    pub count1: u64,
    pub count2: u64,
    pub significance: Significance,
}

/// One row per word found in either map: words of `freq1` in order, then
/// words only in `freq2`.
pub fn classify(freq1: &FrequencyMap, freq2: &FrequencyMap) -> Vec<ComparisonRow> {
    let only_in_2 = freq2.iter().filter(|(word, _)| !freq1.contains(word));
    freq1
        .iter()
        .chain(only_in_2)
        .map(|(word, _)| {
            let (count1, count2) = (freq1.get(word), freq2.get(word));
            ComparisonRow {
                word: word.to_string(),
                count1,
                count2,
                significance: Significance::classify(count1, count2),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopWord {
    pub word: Token,
    pub count1: u64,
    pub count2: u64,
}

impl TopWord {
    pub fn combined(&self) -> u64 {
        self.count1 + self.count2
    }
}

/// The `n` words with the highest combined count, with their per-text
/// counts. Ties keep first-encountered order.
pub fn top_n(freq1: &FrequencyMap, freq2: &FrequencyMap, n: usize) -> Vec<TopWord> {
    freq1
        .merged(freq2)
        .most_common(n)
        .into_iter()
        .map(|(word, _)| TopWord {
            word: word.to_string(),
            count1: freq1.get(word),
            count2: freq2.get(word),
        })
        .collect()
}

/// A row of the melted chart table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChartRow {
    pub word: Token,
    pub text: String,
    pub frequency: u64,
}

/// Melts top words into long form: all text 1 rows, then all text 2 rows.
pub fn melt(top: &[TopWord], label1: &str, label2: &str) -> Vec<ChartRow> {
    let series1 = top.iter().map(|t| (t, label1, t.count1));
    let series2 = top.iter().map(|t| (t, label2, t.count2));
    series1
        .chain(series2)
        .map(|(t, label, frequency)| ChartRow {
            word: t.word.clone(),
            text: label.to_string(),
            frequency,
        })
        .collect()
}
