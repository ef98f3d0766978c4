//! Analysis configuration and execution.

mod runner;

pub use runner::{
    run_alpha, run_beta, Analysis, AnalysisMode, AnalysisOutput, DiversityConfig, OutputFormat,
};
