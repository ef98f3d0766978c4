//! Taxonomic Diversity Library
//!
//! This library computes ecological diversity metrics from the abundance
//! reports written by metagenomic classifiers (Kraken, Bracken, Krona) and
//! from generic count tables.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (SampleTable, TaxRank, DiversityResult, DissimilarityMatrix)
//! - **format**: Report parsing into canonical per-sample tables, with rank filtering
//! - **alpha**: Within-sample diversity (Shannon, Berger-Parker, Simpson, inverse Simpson, Fisher)
//! - **beta**: Between-sample Bray-Curtis dissimilarity
//! - **pipeline**: YAML-configured analysis runs
//!
//! # Example
//!
//! ```no_run
//! use taxa_diversity::prelude::*;
//! use std::path::PathBuf;
//!
//! let samples = load_samples(
//!     &[PathBuf::from("a.bracken"), PathBuf::from("b.bracken")],
//!     ReportFormat::Bracken,
//!     TaxRank::Species,
//!     ColumnSpec::default(),
//! )
//! .unwrap();
//!
//! let shannon_a = shannon(&samples[0]);
//! println!("{}", shannon_a);
//!
//! let matrix = bray_curtis_matrix(&samples).unwrap();
//! print!("{}", matrix);
//! ```

pub mod alpha;
pub mod beta;
pub mod data;
pub mod error;
pub mod format;
pub mod pipeline;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::alpha::{
        alpha_diversity, berger_parker, fisher, inverse_simpson, profile_alpha, shannon, simpson,
        AlphaReport, FisherAlpha, FisherSolver,
    };
    pub use crate::beta::{bray_curtis, bray_curtis_matrix, shared_abundance};
    pub use crate::data::{
        AbundanceRecord, AlphaMetric, DissimilarityMatrix, DiversityResult, NaReason,
        SampleTable, SampleTableBuilder, TaxRank,
    };
    pub use crate::error::{DiversityError, Result};
    pub use crate::format::{
        ensure_any_data, load_samples, ColumnSpec, ParseStats, ParsedSample, ReportFormat,
        ReportParser,
    };
    pub use crate::pipeline::{
        run_alpha, run_beta, Analysis, AnalysisMode, AnalysisOutput, DiversityConfig,
        OutputFormat,
    };
}
