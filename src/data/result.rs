//! Metric identifiers and tagged diversity results.

use crate::error::{DiversityError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alpha diversity estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlphaMetric {
    #[serde(rename = "Sh")]
    Shannon,
    #[serde(rename = "BP")]
    BergerParker,
    #[serde(rename = "Si")]
    Simpson,
    #[serde(rename = "ISi")]
    InverseSimpson,
    #[serde(rename = "F")]
    Fisher,
}

impl AlphaMetric {
    /// All metrics in reporting order.
    pub const ALL: [AlphaMetric; 5] = [
        Self::Shannon,
        Self::BergerParker,
        Self::Simpson,
        Self::InverseSimpson,
        Self::Fisher,
    ];

    /// Short command-line code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Shannon => "Sh",
            Self::BergerParker => "BP",
            Self::Simpson => "Si",
            Self::InverseSimpson => "ISi",
            Self::Fisher => "F",
        }
    }

    /// Human-readable label used in text output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Shannon => "Shannon's diversity",
            Self::BergerParker => "Berger-parker's diversity",
            Self::Simpson => "Simpson's index of diversity",
            Self::InverseSimpson => "Simpson's Reciprocal Index",
            Self::Fisher => "Fisher's index",
        }
    }

    /// Parse a list of codes, expanding `all`.
    pub fn parse_list<S: AsRef<str>>(codes: &[S]) -> Result<Vec<AlphaMetric>> {
        let mut metrics = Vec::new();
        for code in codes {
            let code = code.as_ref().trim();
            if code.eq_ignore_ascii_case("all") {
                for m in Self::ALL {
                    if !metrics.contains(&m) {
                        metrics.push(m);
                    }
                }
                continue;
            }
            let metric: AlphaMetric = code.parse()?;
            if !metrics.contains(&metric) {
                metrics.push(metric);
            }
        }
        Ok(metrics)
    }
}

impl FromStr for AlphaMetric {
    type Err = DiversityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Sh" => Ok(Self::Shannon),
            "BP" => Ok(Self::BergerParker),
            "Si" => Ok(Self::Simpson),
            "ISi" => Ok(Self::InverseSimpson),
            "F" => Ok(Self::Fisher),
            other => Err(DiversityError::UnsupportedMetric(other.to_string())),
        }
    }
}

impl fmt::Display for AlphaMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Why a metric has no value for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaReason {
    /// No categories or zero total.
    EmptySample,
    /// Simpson's D is zero, so its reciprocal is unbounded.
    ZeroD,
    /// Too few categories or individuals for the estimator.
    InsufficientData,
    /// Root finding exhausted its iteration budget.
    ConvergenceFailure,
}

impl NaReason {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EmptySample => "empty sample",
            Self::ZeroD => "D is zero",
            Self::InsufficientData => "insufficient data",
            Self::ConvergenceFailure => "solver did not converge",
        }
    }
}

impl fmt::Display for NaReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one alpha diversity computation.
///
/// Undefined values are never coerced to zero; they carry a reason instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiversityResult {
    Value { metric: AlphaMetric, value: f64 },
    NotApplicable { metric: AlphaMetric, reason: NaReason },
}

impl DiversityResult {
    pub fn value(metric: AlphaMetric, value: f64) -> Self {
        Self::Value { metric, value }
    }

    pub fn not_applicable(metric: AlphaMetric, reason: NaReason) -> Self {
        Self::NotApplicable { metric, reason }
    }

    pub fn metric(&self) -> AlphaMetric {
        match self {
            Self::Value { metric, .. } | Self::NotApplicable { metric, .. } => *metric,
        }
    }

    /// The numeric value, if defined.
    pub fn as_value(&self) -> Option<f64> {
        match self {
            Self::Value { value, .. } => Some(*value),
            Self::NotApplicable { .. } => None,
        }
    }

    /// The not-applicable reason, if any.
    pub fn reason(&self) -> Option<NaReason> {
        match self {
            Self::Value { .. } => None,
            Self::NotApplicable { reason, .. } => Some(*reason),
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Value { .. })
    }
}

impl fmt::Display for DiversityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value { metric, value } => write!(f, "{}: {}", metric.label(), value),
            Self::NotApplicable { metric, reason } => {
                write!(f, "{}: NA ({})", metric.label(), reason)
            }
        }
    }
}
