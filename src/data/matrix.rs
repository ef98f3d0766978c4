//! Square sample-by-sample dissimilarity matrix.

use crate::error::{DiversityError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Placeholder printed for the lower triangle, which mirrors the upper one.
pub const MIRRORED_CELL: &str = "x.xxx";

/// Symmetric N×N dissimilarity matrix with per-sample labels.
///
/// Sample `i` keeps its input position; the diagonal is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DissimilarityMatrix {
    sample_names: Vec<String>,
    totals: Vec<f64>,
    /// Row-major values, length `n * n`.
    values: Vec<f64>,
}

impl DissimilarityMatrix {
    /// Create a zero matrix for the given samples.
    pub fn zeros(sample_names: Vec<String>, totals: Vec<f64>) -> Result<Self> {
        if sample_names.len() != totals.len() {
            return Err(DiversityError::InvalidParameter(format!(
                "{} sample names but {} totals",
                sample_names.len(),
                totals.len()
            )));
        }
        let n = sample_names.len();
        Ok(Self {
            sample_names,
            totals,
            values: vec![0.0; n * n],
        })
    }

    /// Set `(i, j)` and its mirror `(j, i)`.
    pub fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        let n = self.n_samples();
        self.values[i * n + j] = value;
        self.values[j * n + i] = value;
    }

    /// Number of samples (rows and columns).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.sample_names.len()
    }

    /// Dissimilarity between samples `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n_samples() + j]
    }

    #[inline]
    pub fn sample_names(&self) -> &[String] {
        &self.sample_names
    }

    /// Total count per sample, in input order.
    #[inline]
    pub fn totals(&self) -> &[f64] {
        &self.totals
    }

    /// One row as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.n_samples();
        &self.values[i * n..(i + 1) * n]
    }

    /// Write the legend, header and upper-triangle rows.
    ///
    /// ```text
    /// #0	a.tsv (10 reads)
    /// #1	b.tsv (20 reads)
    /// x	0	1
    /// 0	0.000	0.333
    /// 1	x.xxx	0.000
    /// ```
    pub fn write_text<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let n = self.n_samples();
        for (i, (name, total)) in self.sample_names.iter().zip(&self.totals).enumerate() {
            writeln!(writer, "#{}\t{} ({} reads)", i, name, total.trunc() as u64)?;
        }

        write!(writer, "x")?;
        for i in 0..n {
            write!(writer, "\t{}", i)?;
        }
        writeln!(writer)?;

        for i in 0..n {
            write!(writer, "{}", i)?;
            for j in 0..n {
                if i <= j {
                    write!(writer, "\t{:.3}", self.get(i, j))?;
                } else {
                    write!(writer, "\t{}", MIRRORED_CELL)?;
                }
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write the text layout to a file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_text(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for DissimilarityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write_text(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}
