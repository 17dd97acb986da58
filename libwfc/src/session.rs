use std::{fmt, str::FromStr};

use crate::compare::ComparisonRow;

/// Table column the comparison can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Word,
    Frequency1,
    Frequency2,
    Significance,
}

impl SortColumn {
    /// Sorts descending by this column. The sort is stable, so rows that
    /// compare equal keep their order.
    pub fn sort(self, rows: &mut [ComparisonRow]) {
        match self {
            SortColumn::Word => rows.sort_by(|a, b| b.word.cmp(&a.word)),
            SortColumn::Frequency1 => rows.sort_by(|a, b| b.count1.cmp(&a.count1)),
            SortColumn::Frequency2 => rows.sort_by(|a, b| b.count2.cmp(&a.count2)),
            SortColumn::Significance => {
                rows.sort_by(|a, b| b.significance.label().cmp(a.significance.label()))
            }
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortColumn::Word => "word",
            SortColumn::Frequency1 => "freq1",
            SortColumn::Frequency2 => "freq2",
            SortColumn::Significance => "significance",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort column '{0}' (expected word, freq1, freq2 or significance)")]
pub struct ParseSortColumnError(pub String);

impl FromStr for SortColumn {
    type Err = ParseSortColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "word" => Ok(SortColumn::Word),
            "freq1" | "frequency1" => Ok(SortColumn::Frequency1),
            "freq2" | "frequency2" => Ok(SortColumn::Frequency2),
            "significance" => Ok(SortColumn::Significance),
            _ => Err(ParseSortColumnError(s.to_string())),
        }
    }
}

/// State that outlives a single comparison. Lives for the process only;
/// every start begins unsorted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub sort_by: Option<SortColumn>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows in display order for this session.
    pub fn arrange(&self, rows: &[ComparisonRow]) -> Vec<ComparisonRow> {
        let mut rows = rows.to_vec();
        if let Some(column) = self.sort_by {
            column.sort(&mut rows);
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Significance;

    fn row(word: &str, count1: u64, count2: u64) -> ComparisonRow {
        ComparisonRow {
            word: word.to_string(),
            count1,
            count2,
            significance: Significance::classify(count1, count2),
        }
    }

    fn words(rows: &[ComparisonRow]) -> Vec<&str> {
        rows.iter().map(|r| r.word.as_str()).collect()
    }

    #[test]
    fn unsorted_session_keeps_order() {
        let rows = vec![row("b", 1, 0), row("a", 2, 2)];
        assert_eq!(words(&Session::new().arrange(&rows)), vec!["b", "a"]);
    }

    #[test]
    fn sorts_descending_and_stable() {
        let rows = vec![row("cat", 2, 0), row("dog", 1, 3), row("bird", 0, 1), row("eel", 2, 1)];
        let mut session = Session::new();

        session.sort_by = Some(SortColumn::Frequency1);
        assert_eq!(words(&session.arrange(&rows)), vec!["cat", "eel", "dog", "bird"]);

        session.sort_by = Some(SortColumn::Frequency2);
        assert_eq!(words(&session.arrange(&rows)), vec!["dog", "bird", "eel", "cat"]);

        session.sort_by = Some(SortColumn::Word);
        assert_eq!(words(&session.arrange(&rows)), vec!["eel", "dog", "cat", "bird"]);
    }

    #[test]
    fn significance_sorts_by_label() {
        let rows = vec![row("plain", 1, 1), row("only1", 3, 0), row("more2", 1, 9), row("only2", 0, 2)];
        let mut rows = rows;
        SortColumn::Significance.sort(&mut rows);
        assert_eq!(words(&rows), vec!["more2", "only2", "only1", "plain"]);
    }

    #[test]
    fn parses_columns() {
        assert_eq!("freq2".parse(), Ok(SortColumn::Frequency2));
        assert_eq!("Significance".parse(), Ok(SortColumn::Significance));
        assert!("count".parse::<SortColumn>().is_err());
        assert_eq!(SortColumn::Frequency1.to_string(), "freq1");
    }
}
