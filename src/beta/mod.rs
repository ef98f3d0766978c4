//! Between-sample (beta) diversity: Bray-Curtis dissimilarity.

use crate::data::{DissimilarityMatrix, SampleTable};
use crate::error::{DiversityError, Result};
use rayon::prelude::*;

/// Sum of per-category minima over categories present in both samples.
pub fn shared_abundance(a: &SampleTable, b: &SampleTable) -> f64 {
    let (small, large) = if a.n_categories() <= b.n_categories() {
        (a, b)
    } else {
        (b, a)
    };
    small
        .iter()
        .filter_map(|(category, count)| large.get(category).map(|other| count.min(other)))
        .sum()
}

/// Bray-Curtis dissimilarity `1 - 2·C / (N_a + N_b)`.
///
/// An empty sample carries no information and is maximally dissimilar
/// (1.0) from everything, including another empty sample.
pub fn bray_curtis(a: &SampleTable, b: &SampleTable) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 1.0;
    }
    let shared = shared_abundance(a, b);
    let bc = 1.0 - (2.0 * shared) / (a.total() + b.total());
    bc.clamp(0.0, 1.0)
}

/// Pairwise Bray-Curtis matrix over at least two samples.
///
/// Row `i` corresponds to `samples[i]`.
pub fn bray_curtis_matrix(samples: &[SampleTable]) -> Result<DissimilarityMatrix> {
    if samples.len() < 2 {
        return Err(DiversityError::InsufficientSamples {
            required: 2,
            actual: samples.len(),
        });
    }

    let names = samples.iter().map(|s| s.name().to_string()).collect();
    let totals = samples.iter().map(SampleTable::total).collect();
    let mut matrix = DissimilarityMatrix::zeros(names, totals)?;

    let upper: Vec<Vec<f64>> = (0..samples.len())
        .into_par_iter()
        .map(|i| {
            samples[i + 1..]
                .iter()
                .map(|other| bray_curtis(&samples[i], other))
                .collect()
        })
        .collect();

    for (i, row) in upper.into_iter().enumerate() {
        for (offset, value) in row.into_iter().enumerate() {
            matrix.set_symmetric(i, i + 1 + offset, value);
        }
    }
    Ok(matrix)
}
