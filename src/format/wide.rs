//! Wide tables holding every sample in one file (`single` format).
//!
//! ```text
//! taxon    sampleA  sampleB
//! E. coli  120      0
//! B. frag  80       15
//! ```
//!
//! The header row names one sample per column from the count column
//! onward; each following row contributes one count to every sample.

use super::lines::{is_comment, parse_count, ParseStats, ParsedSample};
use super::ColumnSpec;
use crate::data::{AbundanceRecord, SampleTableBuilder};
use crate::error::{DiversityError, Result};
use tracing::{debug, warn};

/// Adapter for the `single` wide layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WideAdapter {
    columns: ColumnSpec,
}

impl WideAdapter {
    pub fn new(columns: ColumnSpec) -> Self {
        Self { columns }
    }

    /// Parse a wide table into one sample per declared column.
    ///
    /// A missing header, or a header without sample columns, is fatal;
    /// bad rows and cells are skipped with a warning.
    pub fn parse(&self, source: &str, text: &str) -> Result<Vec<ParsedSample>> {
        let ColumnSpec { category, count } = self.columns;
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, raw)| (idx, raw.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let mut comments = 0;
        let header: Vec<&str> = loop {
            match lines.next() {
                None => {
                    return Err(DiversityError::InvalidParameter(format!(
                        "{}: no header row in single-format table",
                        source
                    )))
                }
                Some((_, line)) => {
                    let fields: Vec<&str> = line.split('\t').collect();
                    if is_comment(&fields) {
                        comments += 1;
                        continue;
                    }
                    break fields;
                }
            }
        };

        if header.len() <= count {
            return Err(DiversityError::InvalidParameter(format!(
                "{}: header has {} columns, no sample columns from column {}",
                source,
                header.len(),
                count + 1
            )));
        }

        let names: Vec<&str> = header[count..].iter().map(|h| h.trim()).collect();
        let mut builders: Vec<SampleTableBuilder> =
            names.iter().map(|name| SampleTableBuilder::new(*name)).collect();
        let mut stats = vec![
            ParseStats {
                lines: 1 + comments,
                headers: 1,
                comments,
                ..Default::default()
            };
            names.len()
        ];

        for (line_idx, line) in lines {
            let fields: Vec<&str> = line.split('\t').collect();
            stats.iter_mut().for_each(|s| s.lines += 1);

            if is_comment(&fields) {
                stats.iter_mut().for_each(|s| s.comments += 1);
                debug!(source = source, line = line_idx + 1, "skipping comment line");
                continue;
            }

            let label = fields.get(category).map(|f| f.trim()).unwrap_or_default();
            if label.is_empty() {
                stats.iter_mut().for_each(|s| s.malformed += 1);
                warn!(
                    source = source,
                    line = line_idx + 1,
                    raw = line,
                    "skipping malformed line: missing category in column {}",
                    category + 1
                );
                continue;
            }

            let cells = fields.iter().skip(count).take(names.len());
            for (sample_idx, token) in cells.enumerate() {
                match parse_count(token) {
                    None => {
                        stats[sample_idx].malformed += 1;
                        warn!(
                            source = source,
                            sample = names[sample_idx],
                            line = line_idx + 1,
                            raw = line,
                            "skipping cell: count '{}' is not a non-negative number",
                            token.trim()
                        );
                    }
                    Some(value) if value <= 0.0 => stats[sample_idx].zero_counts += 1,
                    Some(value) => {
                        builders[sample_idx].add(AbundanceRecord::new(label, value));
                        stats[sample_idx].records += 1;
                    }
                }
            }
        }

        Ok(builders
            .into_iter()
            .zip(stats)
            .map(|(builder, stats)| ParsedSample {
                table: builder.build(),
                stats,
            })
            .collect())
    }
}
