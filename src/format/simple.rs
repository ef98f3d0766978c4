//! Generic two-column tab-delimited tables.

use super::{ColumnSpec, ReportAdapter};
use crate::data::TaxRank;

/// Category and count taken from user-declared columns. No rank column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleAdapter {
    columns: ColumnSpec,
}

impl SimpleAdapter {
    pub fn new(columns: ColumnSpec) -> Self {
        Self { columns }
    }
}

impl ReportAdapter for SimpleAdapter {
    fn min_fields(&self) -> usize {
        self.columns.category.max(self.columns.count) + 1
    }

    fn count_column(&self) -> usize {
        self.columns.count
    }

    fn select_category(&self, fields: &[&str], _rank: TaxRank) -> Option<String> {
        Some(fields[self.columns.category].trim().to_string())
    }
}
