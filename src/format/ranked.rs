//! Reports with a dedicated rank column: Bracken and Kraken (kreport).

use super::ReportAdapter;
use crate::data::TaxRank;

/// Fixed column roles for a report carrying a rank code on every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedColumns {
    pub category: usize,
    pub count: usize,
    pub rank: usize,
}

impl RankedColumns {
    /// Bracken: `name, taxonomy_id, taxonomy_lvl, kraken_assigned_reads,
    /// added_reads, new_est_reads, fraction_total_reads`.
    pub const BRACKEN: RankedColumns = RankedColumns {
        category: 0,
        count: 5,
        rank: 2,
    };

    /// Kraken report: `percent, clade_reads, taxon_reads, rank, taxid, name`.
    ///
    /// Counts come from the reads assigned directly to the taxon; the taxid
    /// identifies the category.
    pub const KREPORT: RankedColumns = RankedColumns {
        category: 4,
        count: 2,
        rank: 3,
    };
}

impl ReportAdapter for RankedColumns {
    fn min_fields(&self) -> usize {
        self.category.max(self.count).max(self.rank) + 1
    }

    fn count_column(&self) -> usize {
        self.count
    }

    fn select_category(&self, fields: &[&str], rank: TaxRank) -> Option<String> {
        if !rank.matches(fields[self.rank]) {
            return None;
        }
        Some(fields[self.category].trim().to_string())
    }
}
