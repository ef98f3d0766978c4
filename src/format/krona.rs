//! Krona text input: a count followed by the taxonomy path.

use super::ReportAdapter;
use crate::data::TaxRank;

/// `count \t k__Bacteria \t p__Firmicutes \t ...`
///
/// There is no rank column; the rank is read from the `x__` prefix of the
/// path elements. Without a rank filter the most specific element is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KronaAdapter;

impl ReportAdapter for KronaAdapter {
    fn min_fields(&self) -> usize {
        2
    }

    fn count_column(&self) -> usize {
        0
    }

    fn select_category(&self, fields: &[&str], rank: TaxRank) -> Option<String> {
        let mut path = fields[1..].iter().map(|f| f.trim()).filter(|f| !f.is_empty());
        match rank.lineage_prefix() {
            // an empty path is reported as a missing category, not filtered
            None => Some(path.last().unwrap_or_default().to_string()),
            Some(prefix) => path
                .find(|element| element.starts_with(&prefix))
                .map(str::to_string),
        }
    }
}
