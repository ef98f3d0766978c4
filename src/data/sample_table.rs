//! Canonical per-sample abundance table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One category (taxon) and its count, as extracted from a report line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbundanceRecord {
    /// Category identifier (taxon name, taxid or lineage label).
    pub category: String,
    /// Abundance; always strictly positive once accepted.
    pub count: f64,
}

impl AbundanceRecord {
    pub fn new(category: impl Into<String>, count: f64) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

/// Abundances of one sample keyed by category.
///
/// Built once by a format adapter and read-only afterwards. A table with a
/// zero total is valid and means no rows survived parsing and filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    name: String,
    total: f64,
    records: BTreeMap<String, f64>,
}

impl SampleTable {
    /// Build a table from `(category, count)` pairs.
    ///
    /// Non-positive and non-finite counts are dropped; repeated categories
    /// accumulate.
    pub fn from_counts<I, S>(name: impl Into<String>, counts: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut builder = SampleTableBuilder::new(name);
        for (category, count) in counts {
            builder.add(AbundanceRecord::new(category, count));
        }
        builder.build()
    }

    /// Sample name (input path or header label).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total count `N`.
    #[inline]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of distinct categories `S`.
    #[inline]
    pub fn n_categories(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() || self.total <= 0.0
    }

    /// Count for a category, if present.
    #[inline]
    pub fn get(&self, category: &str) -> Option<f64> {
        self.records.get(category).copied()
    }

    /// Iterate over `(category, count)` in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.records.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Counts only, in category order.
    pub fn counts(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.values().copied()
    }

    /// Relative abundances `p_i = count_i / N`. Empty for an empty table.
    pub fn proportions(&self) -> Vec<f64> {
        if self.is_empty() {
            return Vec::new();
        }
        self.counts().map(|c| c / self.total).collect()
    }

    /// Simpson's `D = Σ n_i(n_i - 1) / (N(N - 1))`, zero when `N <= 1`.
    ///
    /// Fractional counts below one give negative terms; the sum is clamped
    /// at zero.
    pub fn simpson_d(&self) -> f64 {
        let n = self.total;
        if n <= 1.0 {
            return 0.0;
        }
        let sum: f64 = self.counts().map(|c| c * (c - 1.0)).sum();
        (sum / (n * (n - 1.0))).max(0.0)
    }

    /// Materialize the records, in category order.
    pub fn records(&self) -> Vec<AbundanceRecord> {
        self.iter()
            .map(|(category, count)| AbundanceRecord::new(category, count))
            .collect()
    }
}

/// Accumulates records into a [`SampleTable`].
#[derive(Debug, Clone)]
pub struct SampleTableBuilder {
    name: String,
    total: f64,
    records: BTreeMap<String, f64>,
}

impl SampleTableBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total: 0.0,
            records: BTreeMap::new(),
        }
    }

    /// Add a record. Returns `false` when the count was rejected.
    pub fn add(&mut self, record: AbundanceRecord) -> bool {
        if !record.count.is_finite() || record.count <= 0.0 {
            return false;
        }
        *self.records.entry(record.category).or_insert(0.0) += record.count;
        self.total += record.count;
        true
    }

    /// Total accumulated so far.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn build(self) -> SampleTable {
        SampleTable {
            name: self.name,
            total: self.total,
            records: self.records,
        }
    }
}
