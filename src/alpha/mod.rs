//! Within-sample (alpha) diversity estimators.
//!
//! Every estimator short-circuits to a not-applicable result on an empty
//! sample instead of dividing by zero or taking `ln(0)`.

mod fisher;

pub use fisher::{FisherAlpha, FisherSolver, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

use crate::data::{AlphaMetric, DiversityResult, NaReason, SampleTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shannon's `H = -Σ p_i ln p_i`.
pub fn shannon(table: &SampleTable) -> DiversityResult {
    let metric = AlphaMetric::Shannon;
    if table.is_empty() {
        return DiversityResult::not_applicable(metric, NaReason::EmptySample);
    }
    let h: f64 = table
        .proportions()
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum();
    // a single category gives -1·ln(1) = -0.0
    DiversityResult::value(metric, h.max(0.0))
}

/// Berger-Parker dominance, the largest proportion.
pub fn berger_parker(table: &SampleTable) -> DiversityResult {
    let metric = AlphaMetric::BergerParker;
    if table.is_empty() {
        return DiversityResult::not_applicable(metric, NaReason::EmptySample);
    }
    let max = table.counts().fold(0.0_f64, f64::max);
    DiversityResult::value(metric, max / table.total())
}

/// Simpson's index of diversity, `1 - D`.
pub fn simpson(table: &SampleTable) -> DiversityResult {
    let metric = AlphaMetric::Simpson;
    if table.is_empty() {
        return DiversityResult::not_applicable(metric, NaReason::EmptySample);
    }
    DiversityResult::value(metric, 1.0 - table.simpson_d())
}

/// Simpson's reciprocal index, `1 / D`.
pub fn inverse_simpson(table: &SampleTable) -> DiversityResult {
    let metric = AlphaMetric::InverseSimpson;
    if table.is_empty() {
        return DiversityResult::not_applicable(metric, NaReason::EmptySample);
    }
    let d = table.simpson_d();
    if d <= 0.0 {
        return DiversityResult::not_applicable(metric, NaReason::ZeroD);
    }
    DiversityResult::value(metric, 1.0 / d)
}

/// Fisher's alpha, with the solver details when it converged.
pub fn fisher(table: &SampleTable, solver: &FisherSolver) -> (DiversityResult, Option<FisherAlpha>) {
    let metric = AlphaMetric::Fisher;
    let n = table.total();
    let s = table.n_categories() as f64;
    match solver.solve(n, s) {
        Ok(fit) => (DiversityResult::value(metric, fit.alpha), Some(fit)),
        Err(reason) => (DiversityResult::not_applicable(metric, reason), None),
    }
}

/// Compute one metric.
pub fn alpha_diversity(
    table: &SampleTable,
    metric: AlphaMetric,
    solver: &FisherSolver,
) -> DiversityResult {
    match metric {
        AlphaMetric::Shannon => shannon(table),
        AlphaMetric::BergerParker => berger_parker(table),
        AlphaMetric::Simpson => simpson(table),
        AlphaMetric::InverseSimpson => inverse_simpson(table),
        AlphaMetric::Fisher => fisher(table, solver).0,
    }
}

/// Alpha diversity results for one sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlphaReport {
    /// Sample name.
    pub sample: String,
    /// Total count `N`.
    pub n_individuals: f64,
    /// Distinct categories `S`.
    pub n_categories: usize,
    /// One entry per requested metric, in request order.
    pub results: Vec<DiversityResult>,
    /// Solver details when Fisher's alpha was requested and converged.
    pub fisher: Option<FisherAlpha>,
}

impl AlphaReport {
    /// Result for a metric, if it was requested.
    pub fn get(&self, metric: AlphaMetric) -> Option<&DiversityResult> {
        self.results.iter().find(|r| r.metric() == metric)
    }

    /// Number of metrics that produced a value.
    pub fn n_applicable(&self) -> usize {
        self.results.iter().filter(|r| r.is_applicable()).count()
    }
}

impl fmt::Display for AlphaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{}", result)?;
        }
        Ok(())
    }
}

/// Compute the requested metrics for one sample.
pub fn profile_alpha(
    table: &SampleTable,
    metrics: &[AlphaMetric],
    solver: &FisherSolver,
) -> AlphaReport {
    let mut fisher_fit = None;
    let results = metrics
        .iter()
        .map(|&metric| match metric {
            AlphaMetric::Fisher => {
                let (result, fit) = fisher(table, solver);
                fisher_fit = fit;
                result
            }
            other => alpha_diversity(table, other, solver),
        })
        .collect();

    AlphaReport {
        sample: table.name().to_string(),
        n_individuals: table.total(),
        n_categories: table.n_categories(),
        results,
        fisher: fisher_fit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn even_table() -> SampleTable {
        SampleTable::from_counts("even", vec![("a", 10.0), ("b", 10.0), ("c", 10.0), ("d", 10.0)])
    }

    fn empty_table() -> SampleTable {
        SampleTable::from_counts("empty", Vec::<(&str, f64)>::new())
    }

    fn value(result: DiversityResult) -> f64 {
        result.as_value().expect("metric should be defined")
    }

    #[test]
    fn test_worked_example() {
        let t = even_table();
        assert_relative_eq!(value(shannon(&t)), 4.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(value(berger_parker(&t)), 0.25);
        assert_relative_eq!(value(simpson(&t)), 1.0 - 360.0 / 1560.0, epsilon = 1e-12);
        assert_relative_eq!(value(inverse_simpson(&t)), 1560.0 / 360.0, epsilon = 1e-12);
        assert_relative_eq!(value(simpson(&t)), 0.7692, epsilon = 1e-4);
        assert_relative_eq!(value(inverse_simpson(&t)), 4.333, epsilon = 1e-3);
    }

    #[test]
    fn test_shannon_zero_iff_single_category() {
        let single = SampleTable::from_counts("one", vec![("a", 50.0)]);
        assert_eq!(value(shannon(&single)), 0.0);

        let skewed = SampleTable::from_counts("skew", vec![("a", 999.0), ("b", 1.0)]);
        assert!(value(shannon(&skewed)) > 0.0);
    }

    #[test]
    fn test_berger_parker_is_max_share() {
        let t = SampleTable::from_counts("t", vec![("a", 6.0), ("b", 3.0), ("c", 1.0)]);
        let bp = value(berger_parker(&t));
        assert_relative_eq!(bp, 0.6);
        assert!(bp > 0.0 && bp <= 1.0);
    }

    #[test]
    fn test_simpson_single_individual() {
        let t = SampleTable::from_counts("t", vec![("a", 1.0)]);
        assert_eq!(value(simpson(&t)), 1.0);
        assert_eq!(inverse_simpson(&t).reason(), Some(NaReason::ZeroD));
    }

    #[test]
    fn test_inverse_simpson_zero_d_with_singletons() {
        // all singletons: Σ n(n-1) = 0
        let t = SampleTable::from_counts("t", vec![("a", 1.0), ("b", 1.0), ("c", 1.0)]);
        assert_eq!(value(simpson(&t)), 1.0);
        assert_eq!(inverse_simpson(&t).reason(), Some(NaReason::ZeroD));
    }

    #[test]
    fn test_empty_sample_is_not_applicable_everywhere() {
        let t = empty_table();
        let solver = FisherSolver::default();
        for metric in [
            AlphaMetric::Shannon,
            AlphaMetric::BergerParker,
            AlphaMetric::Simpson,
            AlphaMetric::InverseSimpson,
        ] {
            assert_eq!(
                alpha_diversity(&t, metric, &solver).reason(),
                Some(NaReason::EmptySample)
            );
        }
        assert_eq!(
            alpha_diversity(&t, AlphaMetric::Fisher, &solver).reason(),
            Some(NaReason::InsufficientData)
        );
    }

    #[test]
    fn test_fisher_guards() {
        let solver = FisherSolver::default();
        let one_category = SampleTable::from_counts("t", vec![("a", 100.0)]);
        assert_eq!(fisher(&one_category, &solver).0.reason(), Some(NaReason::InsufficientData));

        let all_singletons = SampleTable::from_counts("t", vec![("a", 1.0), ("b", 1.0)]);
        assert_eq!(fisher(&all_singletons, &solver).0.reason(), Some(NaReason::InsufficientData));
    }

    #[test]
    fn test_profile_alpha_keeps_request_order() {
        let t = even_table();
        let report = profile_alpha(
            &t,
            &[AlphaMetric::Fisher, AlphaMetric::Shannon],
            &FisherSolver::default(),
        );
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].metric(), AlphaMetric::Fisher);
        assert_eq!(report.n_categories, 4);
        assert_eq!(report.n_individuals, 40.0);
        assert_eq!(report.n_applicable(), 2);

        let fit = report.fisher.expect("fisher should converge");
        assert_relative_eq!(
            report.get(AlphaMetric::Fisher).unwrap().as_value().unwrap(),
            fit.alpha
        );
    }

    #[test]
    fn test_report_text() {
        let t = empty_table();
        let report = profile_alpha(
            &t,
            &[AlphaMetric::BergerParker, AlphaMetric::Fisher],
            &FisherSolver::default(),
        );
        assert_eq!(
            report.to_string(),
            "Berger-parker's diversity: NA (empty sample)\nFisher's index: NA (insufficient data)\n"
        );
    }
}
