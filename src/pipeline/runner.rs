//! Configured analysis runs: load reports, compute, render.

use crate::alpha::{profile_alpha, AlphaReport, FisherSolver};
use crate::beta::bray_curtis_matrix;
use crate::data::{AlphaMetric, DissimilarityMatrix, TaxRank};
use crate::error::{DiversityError, Result};
use crate::format::{load_samples, ColumnSpec, ReportFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Within-sample or between-sample analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Alpha,
    Beta,
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = DiversityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            other => Err(DiversityError::InvalidParameter(format!(
                "unknown output format '{}' (expected text, json or yaml)",
                other
            ))),
        }
    }
}

fn default_format() -> String {
    "bracken".to_string()
}

fn default_rank() -> String {
    "all".to_string()
}

fn default_metrics() -> Vec<String> {
    vec!["Sh".to_string()]
}

fn default_columns() -> String {
    "1,2".to_string()
}

/// Analysis configuration as written in YAML.
///
/// Selectors stay as strings here so that unknown codes are reported as
/// unsupported selections by [`DiversityConfig::resolve`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversityConfig {
    /// Name of the run.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mode: AnalysisMode,
    /// bracken, kreport, kreport2, krona, single or simple.
    #[serde(default = "default_format")]
    pub format: String,
    /// all, D, P, C, O, F, G or S.
    #[serde(default = "default_rank")]
    pub rank: String,
    /// Alpha metric codes (Sh, BP, Si, ISi, F) or `all`.
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
    /// 1-based `cat,count` columns for simple and single.
    #[serde(default = "default_columns")]
    pub columns: String,
    /// Report files.
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub output: OutputFormat,
    #[serde(default)]
    pub solver: FisherSolver,
}

impl DiversityConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(DiversityError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(DiversityError::from)
    }

    /// Starter configuration comparing species in two Bracken reports.
    pub fn example() -> Self {
        Self {
            name: "species-bray-curtis".to_string(),
            description: Some(
                "Bray-Curtis dissimilarity between Bracken species estimates".to_string(),
            ),
            mode: AnalysisMode::Beta,
            format: default_format(),
            rank: "S".to_string(),
            metrics: vec!["all".to_string()],
            columns: default_columns(),
            inputs: vec![
                PathBuf::from("sample1.bracken"),
                PathBuf::from("sample2.bracken"),
            ],
            output: OutputFormat::Text,
            solver: FisherSolver::default(),
        }
    }

    /// Validate selectors into a runnable [`Analysis`].
    pub fn resolve(&self) -> Result<Analysis> {
        let format: ReportFormat = self.format.parse()?;
        let columns = if format.uses_columns() {
            self.columns.parse()?
        } else {
            ColumnSpec::default()
        };
        let metrics = match self.mode {
            AnalysisMode::Alpha => {
                let metrics = AlphaMetric::parse_list(&self.metrics)?;
                if metrics.is_empty() {
                    return Err(DiversityError::InvalidParameter(
                        "no alpha metric requested".to_string(),
                    ));
                }
                metrics
            }
            AnalysisMode::Beta => Vec::new(),
        };
        if self.solver.max_iterations == 0
            || self.solver.tolerance.is_nan()
            || self.solver.tolerance <= 0.0
        {
            return Err(DiversityError::InvalidParameter(
                "solver needs max_iterations > 0 and tolerance > 0".to_string(),
            ));
        }
        Ok(Analysis {
            mode: self.mode,
            format,
            rank: self.rank.parse()?,
            metrics,
            columns,
            inputs: self.inputs.clone(),
            solver: self.solver,
        })
    }
}

/// A validated analysis ready to run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub mode: AnalysisMode,
    pub format: ReportFormat,
    pub rank: TaxRank,
    pub metrics: Vec<AlphaMetric>,
    pub columns: ColumnSpec,
    pub inputs: Vec<PathBuf>,
    pub solver: FisherSolver,
}

impl Analysis {
    pub fn run(&self) -> Result<AnalysisOutput> {
        match self.mode {
            AnalysisMode::Alpha => run_alpha(
                &self.inputs,
                self.format,
                self.rank,
                self.columns,
                &self.metrics,
                &self.solver,
            )
            .map(AnalysisOutput::Alpha),
            AnalysisMode::Beta => {
                run_beta(&self.inputs, self.format, self.rank, self.columns)
                    .map(AnalysisOutput::Beta)
            }
        }
    }
}

/// Result of an analysis run.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutput {
    Alpha(Vec<AlphaReport>),
    Beta(DissimilarityMatrix),
}

impl AnalysisOutput {
    /// Render for stdout.
    pub fn render(&self, output: OutputFormat) -> Result<String> {
        match output {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            OutputFormat::Text => Ok(match self {
                Self::Alpha(reports) if reports.len() == 1 => reports[0].to_string(),
                Self::Alpha(reports) => reports
                    .iter()
                    .map(|r| format!("#{}\n{}", r.sample, r))
                    .collect(),
                Self::Beta(matrix) => matrix.to_string(),
            }),
        }
    }
}

/// Alpha diversity for one report file.
///
/// Returns one report per sample; only `single` tables hold several.
pub fn run_alpha(
    inputs: &[PathBuf],
    format: ReportFormat,
    rank: TaxRank,
    columns: ColumnSpec,
    metrics: &[AlphaMetric],
    solver: &FisherSolver,
) -> Result<Vec<AlphaReport>> {
    if inputs.len() != 1 {
        return Err(DiversityError::InvalidParameter(format!(
            "alpha diversity takes exactly one input file, got {}",
            inputs.len()
        )));
    }
    let tables = load_samples(inputs, format, rank, columns)?;
    info!(samples = tables.len(), metrics = metrics.len(), "computing alpha diversity");
    Ok(tables
        .iter()
        .map(|table| profile_alpha(table, metrics, solver))
        .collect())
}

/// Bray-Curtis matrix across report files.
pub fn run_beta(
    inputs: &[PathBuf],
    format: ReportFormat,
    rank: TaxRank,
    columns: ColumnSpec,
) -> Result<DissimilarityMatrix> {
    let tables = load_samples(inputs, format, rank, columns)?;
    info!(samples = tables.len(), "computing Bray-Curtis dissimilarity");
    bray_curtis_matrix(&tables)
}
