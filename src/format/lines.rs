//! Per-line processing shared by the long (one row per taxon) layouts.

use super::ReportAdapter;
use crate::data::{AbundanceRecord, SampleTable, SampleTableBuilder, TaxRank};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Counters describing what happened to each line of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Non-empty lines seen.
    pub lines: usize,
    /// Lines (or cells, for wide tables) accumulated into the sample.
    pub records: usize,
    /// Lines starting with `#`.
    pub comments: usize,
    /// Leading header lines.
    pub headers: usize,
    /// Lines skipped because they could not be interpreted.
    pub malformed: usize,
    /// Lines with a valid but zero count.
    pub zero_counts: usize,
    /// Lines excluded by the rank filter.
    pub rank_filtered: usize,
}

impl ParseStats {
    /// Fold another set of counters into this one.
    pub fn merge(&mut self, other: &ParseStats) {
        self.lines += other.lines;
        self.records += other.records;
        self.comments += other.comments;
        self.headers += other.headers;
        self.malformed += other.malformed;
        self.zero_counts += other.zero_counts;
        self.rank_filtered += other.rank_filtered;
    }
}

/// A report parsed into one sample table.
#[derive(Debug, Clone)]
pub struct ParsedSample {
    pub table: SampleTable,
    pub stats: ParseStats,
}

/// Reason a line was skipped as malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineIssue {
    TooFewColumns { found: usize, required: usize },
    InvalidCount(String),
    EmptyCategory,
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewColumns { found, required } => {
                write!(f, "expected at least {} columns, found {}", required, found)
            }
            Self::InvalidCount(token) => write!(f, "count '{}' is not a non-negative number", token),
            Self::EmptyCategory => write!(f, "empty category field"),
        }
    }
}

/// Parse a count token.
///
/// Accepts unsigned decimal numbers (`12`, `12.5`, `.5`); rejects signs,
/// exponents, `nan`/`inf` and anything else.
pub fn parse_count(token: &str) -> Option<f64> {
    let token = token.trim();
    let mut digits = 0;
    let mut dots = 0;
    for c in token.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    token.parse::<f64>().ok()
}

#[inline]
pub(crate) fn is_comment(fields: &[&str]) -> bool {
    fields.first().is_some_and(|f| f.trim_start().starts_with('#'))
}

/// Parse a long-layout report with the given adapter.
pub(crate) fn parse_long(
    name: &str,
    text: &str,
    adapter: &dyn ReportAdapter,
    rank: TaxRank,
) -> ParsedSample {
    let mut builder = SampleTableBuilder::new(name);
    let mut stats = ParseStats::default();
    let required = adapter.min_fields();
    let count_col = adapter.count_column();
    let mut seen_content = false;

    for (line_idx, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        stats.lines += 1;
        let fields: Vec<&str> = line.split('\t').collect();

        if is_comment(&fields) {
            stats.comments += 1;
            debug!(sample = name, line = line_idx + 1, "skipping comment line");
            continue;
        }
        let first_content = !seen_content;
        seen_content = true;

        let issue = if fields.len() < required {
            LineIssue::TooFewColumns {
                found: fields.len(),
                required,
            }
        } else {
            match parse_count(fields[count_col]) {
                None => LineIssue::InvalidCount(fields[count_col].trim().to_string()),
                Some(count) if count <= 0.0 => {
                    stats.zero_counts += 1;
                    continue;
                }
                Some(count) => match adapter.select_category(&fields, rank) {
                    None => {
                        stats.rank_filtered += 1;
                        continue;
                    }
                    Some(category) if category.is_empty() => LineIssue::EmptyCategory,
                    Some(category) => {
                        builder.add(AbundanceRecord::new(category, count));
                        stats.records += 1;
                        continue;
                    }
                },
            }
        };

        if first_content {
            stats.headers += 1;
            debug!(sample = name, header = line, "skipping header line");
        } else {
            stats.malformed += 1;
            warn!(
                sample = name,
                line = line_idx + 1,
                raw = line,
                "skipping malformed line: {}",
                issue
            );
        }
    }

    ParsedSample {
        table: builder.build(),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count_accepts_unsigned_numbers() {
        assert_eq!(parse_count("42"), Some(42.0));
        assert_eq!(parse_count(" 7 "), Some(7.0));
        assert_eq!(parse_count("12.5"), Some(12.5));
        assert_eq!(parse_count("0"), Some(0.0));
        assert_eq!(parse_count(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_count_rejects_other_tokens() {
        for token in ["", "abc", "-3", "+3", "1e5", "nan", "inf", "1.2.3", ".", "12a"] {
            assert_eq!(parse_count(token), None, "token {:?}", token);
        }
    }

    #[test]
    fn test_stats_merge() {
        let mut a = ParseStats {
            lines: 3,
            records: 2,
            malformed: 1,
            ..Default::default()
        };
        let b = ParseStats {
            lines: 2,
            records: 1,
            rank_filtered: 1,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.lines, 5);
        assert_eq!(a.records, 3);
        assert_eq!(a.rank_filtered, 1);
    }

    #[test]
    fn test_issue_messages() {
        let issue = LineIssue::TooFewColumns {
            found: 2,
            required: 6,
        };
        assert_eq!(issue.to_string(), "expected at least 6 columns, found 2");
        assert_eq!(
            LineIssue::InvalidCount("x".into()).to_string(),
            "count 'x' is not a non-negative number"
        );
    }
}
