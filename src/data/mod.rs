//! Data structures for diversity analysis.

mod matrix;
mod rank;
mod result;
mod sample_table;

pub use matrix::{DissimilarityMatrix, MIRRORED_CELL};
pub use rank::TaxRank;
pub use result::{AlphaMetric, DiversityResult, NaReason};
pub use sample_table::{AbundanceRecord, SampleTable, SampleTableBuilder};
