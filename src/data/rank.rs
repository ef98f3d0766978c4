//! Taxonomic rank filter.

use crate::error::{DiversityError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Taxonomic rank used to select which report rows are counted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaxRank {
    /// No filtering: every row is counted.
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "D")]
    Domain,
    #[serde(rename = "P")]
    Phylum,
    #[serde(rename = "C")]
    Class,
    #[serde(rename = "O")]
    Order,
    #[serde(rename = "F")]
    Family,
    #[serde(rename = "G")]
    Genus,
    #[serde(rename = "S")]
    Species,
}

impl TaxRank {
    /// Single-letter rank code, `None` for [`TaxRank::All`].
    pub fn code(&self) -> Option<char> {
        match self {
            Self::All => None,
            Self::Domain => Some('D'),
            Self::Phylum => Some('P'),
            Self::Class => Some('C'),
            Self::Order => Some('O'),
            Self::Family => Some('F'),
            Self::Genus => Some('G'),
            Self::Species => Some('S'),
        }
    }

    /// Code as written on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Domain => "D",
            Self::Phylum => "P",
            Self::Class => "C",
            Self::Order => "O",
            Self::Family => "F",
            Self::Genus => "G",
            Self::Species => "S",
        }
    }

    /// Whether a rank field from a report belongs to this rank.
    ///
    /// Matches the exact code or any code starting with it, so `S` also
    /// accepts Kraken sub-ranks such as `S1`.
    pub fn matches(&self, field: &str) -> bool {
        match self.code() {
            None => true,
            Some(code) => field.trim().starts_with(code),
        }
    }

    /// Krona/MetaPhlAn-style lineage prefix (`s__` for species).
    pub fn lineage_prefix(&self) -> Option<String> {
        self.code()
            .map(|c| format!("{}__", c.to_ascii_lowercase()))
    }
}

impl FromStr for TaxRank {
    type Err = DiversityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "all" | "ALL" | "All" => Ok(Self::All),
            "D" | "d" => Ok(Self::Domain),
            "P" | "p" => Ok(Self::Phylum),
            "C" | "c" => Ok(Self::Class),
            "O" | "o" => Ok(Self::Order),
            "F" | "f" => Ok(Self::Family),
            "G" | "g" => Ok(Self::Genus),
            "S" | "s" => Ok(Self::Species),
            other => Err(DiversityError::UnsupportedRank(other.to_string())),
        }
    }
}

impl fmt::Display for TaxRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
