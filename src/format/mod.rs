//! Report parsing: turns classifier output into canonical sample tables.
//!
//! Each supported layout has one adapter. The adapter is chosen once when a
//! [`ReportParser`] is built; lines are then processed by a shared driver
//! that skips comments, headers, short rows, invalid or zero counts and
//! rows outside the requested rank. Skipped malformed lines are logged and
//! counted in [`ParseStats`], never fatal.

mod krona;
mod lines;
mod ranked;
mod simple;
mod wide;

pub use krona::KronaAdapter;
pub use lines::{parse_count, LineIssue, ParseStats, ParsedSample};
pub use ranked::RankedColumns;
pub use simple::SimpleAdapter;
pub use wide::WideAdapter;

use crate::data::{SampleTable, TaxRank};
use crate::error::{DiversityError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Supported report layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Bracken abundance re-estimation output.
    Bracken,
    /// Kraken report.
    Kreport,
    /// Kraken 2 report (same columns as `kreport`).
    Kreport2,
    /// Krona text input with a taxonomy path.
    Krona,
    /// Wide table with all samples in one file.
    Single,
    /// Generic two-column table with declared columns.
    Simple,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bracken => "bracken",
            Self::Kreport => "kreport",
            Self::Kreport2 => "kreport2",
            Self::Krona => "krona",
            Self::Single => "single",
            Self::Simple => "simple",
        }
    }

    /// Whether one file holds several samples.
    pub fn is_wide(&self) -> bool {
        matches!(self, Self::Single)
    }

    /// Whether the layout carries rank information.
    pub fn supports_rank_filter(&self) -> bool {
        matches!(
            self,
            Self::Bracken | Self::Kreport | Self::Kreport2 | Self::Krona
        )
    }

    /// Whether the layout reads user-declared columns.
    pub fn uses_columns(&self) -> bool {
        matches!(self, Self::Single | Self::Simple)
    }
}

impl FromStr for ReportFormat {
    type Err = DiversityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bracken" => Ok(Self::Bracken),
            "kreport" => Ok(Self::Kreport),
            "kreport2" => Ok(Self::Kreport2),
            "krona" => Ok(Self::Krona),
            "single" => Ok(Self::Single),
            "simple" => Ok(Self::Simple),
            _ => Err(DiversityError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-based category and count columns for `simple` and `single`.
///
/// Written and parsed in the 1-based `"cat,count"` form used on the
/// command line; for `single` the count column is the first sample column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnSpec {
    pub category: usize,
    pub count: usize,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            category: 0,
            count: 1,
        }
    }
}

impl FromStr for ColumnSpec {
    type Err = DiversityError;

    fn from_str(s: &str) -> Result<Self> {
        let (cat, count) = s.split_once(',').ok_or_else(|| {
            DiversityError::InvalidColumns(format!(
                "'{}': expected 'a,b' where a = category column, b = first count column",
                s
            ))
        })?;
        let one_based = |part: &str| -> Result<usize> {
            match part.trim().parse::<usize>() {
                Ok(n) if n >= 1 => Ok(n - 1),
                _ => Err(DiversityError::InvalidColumns(format!(
                    "'{}' is not a positive integer",
                    part.trim()
                ))),
            }
        };
        let spec = Self {
            category: one_based(cat)?,
            count: one_based(count)?,
        };
        if spec.category == spec.count {
            return Err(DiversityError::InvalidColumns(format!(
                "category and count both use column {}",
                spec.category + 1
            )));
        }
        Ok(spec)
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.category + 1, self.count + 1)
    }
}

/// Column roles of a long (one row per taxon) report layout.
pub trait ReportAdapter: Send + Sync {
    /// Minimum number of tab-separated fields a data row needs.
    fn min_fields(&self) -> usize;

    /// Zero-based column holding the count.
    fn count_column(&self) -> usize;

    /// Category for a row, or `None` when the row is outside `rank`.
    ///
    /// Called only for rows with at least [`ReportAdapter::min_fields`]
    /// fields and a valid positive count.
    fn select_category(&self, fields: &[&str], rank: TaxRank) -> Option<String>;
}

enum Layout {
    Long(Box<dyn ReportAdapter>),
    Wide(WideAdapter),
}

/// Parser for one report format and rank, reusable across files.
pub struct ReportParser {
    format: ReportFormat,
    rank: TaxRank,
    layout: Layout,
}

impl ReportParser {
    /// Select the adapter for `format`.
    ///
    /// `columns` is only read by `simple` and `single`.
    pub fn new(format: ReportFormat, rank: TaxRank, columns: ColumnSpec) -> Self {
        let layout = match format {
            ReportFormat::Bracken => Layout::Long(Box::new(RankedColumns::BRACKEN)),
            ReportFormat::Kreport | ReportFormat::Kreport2 => {
                Layout::Long(Box::new(RankedColumns::KREPORT))
            }
            ReportFormat::Krona => Layout::Long(Box::new(KronaAdapter)),
            ReportFormat::Simple => Layout::Long(Box::new(SimpleAdapter::new(columns))),
            ReportFormat::Single => Layout::Wide(WideAdapter::new(columns)),
        };
        if rank != TaxRank::All && !format.supports_rank_filter() {
            warn!(
                format = format.as_str(),
                rank = rank.as_str(),
                "format has no rank information, rank filter ignored"
            );
        }
        Self {
            format,
            rank,
            layout,
        }
    }

    pub fn format(&self) -> ReportFormat {
        self.format
    }

    pub fn rank(&self) -> TaxRank {
        self.rank
    }

    /// Parse report text. `source` names the sample for long layouts and
    /// labels log messages for wide ones.
    pub fn parse_str(&self, source: &str, text: &str) -> Result<Vec<ParsedSample>> {
        let parsed = match &self.layout {
            Layout::Long(adapter) => {
                vec![lines::parse_long(source, text, adapter.as_ref(), self.rank)]
            }
            Layout::Wide(adapter) => adapter.parse(source, text)?,
        };
        for sample in &parsed {
            info!(
                sample = sample.table.name(),
                categories = sample.table.n_categories(),
                total = sample.table.total(),
                malformed = sample.stats.malformed,
                filtered = sample.stats.rank_filtered,
                "parsed sample"
            );
            if sample.table.is_empty() {
                warn!(
                    "No data found in {} for taxonomy level {}",
                    sample.table.name(),
                    self.rank
                );
            }
        }
        Ok(parsed)
    }

    /// Read and parse one report file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ParsedSample>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DiversityError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        self.parse_str(&path.display().to_string(), &text)
    }

    /// Parse several report files in parallel, keeping input order.
    ///
    /// `single` accepts exactly one file.
    pub fn load(&self, paths: &[PathBuf]) -> Result<Vec<ParsedSample>> {
        if paths.is_empty() {
            return Err(DiversityError::InvalidParameter(
                "no input files given".to_string(),
            ));
        }
        if self.format.is_wide() && paths.len() > 1 {
            return Err(DiversityError::InvalidParameter(
                "only one file may be given for format 'single'".to_string(),
            ));
        }
        let per_file: Vec<Vec<ParsedSample>> = paths
            .par_iter()
            .map(|path| self.parse_file(path))
            .collect::<Result<_>>()?;
        Ok(per_file.into_iter().flatten().collect())
    }
}

/// Fail with [`DiversityError::NoData`] when every table is empty.
pub fn ensure_any_data(tables: &[SampleTable], rank: TaxRank) -> Result<()> {
    if tables.iter().all(SampleTable::is_empty) {
        return Err(DiversityError::NoData {
            rank: rank.to_string(),
        });
    }
    Ok(())
}

/// Parse files into sample tables, failing when no data survives.
pub fn load_samples(
    paths: &[PathBuf],
    format: ReportFormat,
    rank: TaxRank,
    columns: ColumnSpec,
) -> Result<Vec<SampleTable>> {
    let parser = ReportParser::new(format, rank, columns);
    let tables: Vec<SampleTable> = parser
        .load(paths)?
        .into_iter()
        .map(|parsed| parsed.table)
        .collect();
    ensure_any_data(&tables, rank)?;
    Ok(tables)
}
