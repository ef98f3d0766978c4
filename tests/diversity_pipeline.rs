//! Integration tests: reports on disk through to diversity output.

use approx::assert_relative_eq;
use std::io::Write;
use std::path::PathBuf;
use taxa_diversity::prelude::*;
use tempfile::NamedTempFile;

const BRACKEN_HEADER: &str = "name\ttaxonomy_id\ttaxonomy_lvl\tkraken_assigned_reads\tadded_reads\tnew_est_reads\tfraction_total_reads";

fn write_report(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn bracken_row(name: &str, taxid: u32, rank: &str, reads: f64) -> String {
    format!("{}\t{}\t{}\t0\t0\t{}\t0.0", name, taxid, rank, reads)
}

/// Four equally abundant species plus genus rows that must be ignored.
fn even_bracken() -> NamedTempFile {
    let rows = vec![
        BRACKEN_HEADER.to_string(),
        bracken_row("Genus one", 1, "G", 500.0),
        bracken_row("Species a", 11, "S", 10.0),
        bracken_row("Species b", 12, "S", 10.0),
        bracken_row("Genus two", 2, "G", 700.0),
        bracken_row("Species c", 21, "S", 10.0),
        bracken_row("Species d", 22, "S", 10.0),
    ];
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    write_report(&refs)
}

#[test]
fn test_alpha_worked_example_from_bracken() {
    let file = even_bracken();
    let reports = run_alpha(
        &[file.path().to_path_buf()],
        ReportFormat::Bracken,
        TaxRank::Species,
        ColumnSpec::default(),
        &AlphaMetric::ALL,
        &FisherSolver::default(),
    )
    .unwrap();
    assert_eq!(reports.len(), 1);
    let report = &reports[0];

    assert_eq!(report.n_individuals, 40.0);
    assert_eq!(report.n_categories, 4);

    let get = |m| report.get(m).unwrap().as_value().unwrap();
    assert_relative_eq!(get(AlphaMetric::Shannon), 4.0_f64.ln(), epsilon = 1e-12);
    assert_relative_eq!(get(AlphaMetric::BergerParker), 0.25);
    assert_relative_eq!(get(AlphaMetric::Simpson), 1200.0 / 1560.0, epsilon = 1e-12);
    assert_relative_eq!(get(AlphaMetric::InverseSimpson), 1560.0 / 360.0, epsilon = 1e-12);

    let alpha = get(AlphaMetric::Fisher);
    assert!(alpha > 1.05 && alpha < 1.15);
}

#[test]
fn test_alpha_text_output_lines() {
    let file = even_bracken();
    let config = DiversityConfig {
        name: "t".to_string(),
        description: None,
        mode: AnalysisMode::Alpha,
        format: "bracken".to_string(),
        rank: "S".to_string(),
        metrics: vec!["BP".to_string(), "Si".to_string()],
        columns: "1,2".to_string(),
        inputs: vec![file.path().to_path_buf()],
        output: OutputFormat::Text,
        solver: FisherSolver::default(),
    };
    let text = config.resolve().unwrap().run().unwrap().render(OutputFormat::Text).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Berger-parker's diversity: 0.25");
    assert!(lines[1].starts_with("Simpson's index of diversity: 0.769"));
}

#[test]
fn test_rank_with_no_rows_is_fatal() {
    let file = even_bracken();
    let err = run_alpha(
        &[file.path().to_path_buf()],
        ReportFormat::Bracken,
        TaxRank::Phylum,
        ColumnSpec::default(),
        &[AlphaMetric::Shannon],
        &FisherSolver::default(),
    )
    .unwrap_err();
    assert_eq!(err.category(), "no_data");
}

#[test]
fn test_malformed_line_does_not_change_aggregate() {
    let clean = write_report(&[
        " 50.00\t100\t60\tS\t562\tEscherichia coli",
        " 50.00\t100\t40\tS\t817\tBacteroides fragilis",
    ]);
    let dirty = write_report(&[
        " 50.00\t100\t60\tS\t562\tEscherichia coli",
        " 10.00\t20\tmany\tS\t999\tBroken row",
        " 50.00\t100\t40\tS\t817\tBacteroides fragilis",
    ]);

    let parser = ReportParser::new(ReportFormat::Kreport2, TaxRank::Species, ColumnSpec::default());
    let clean = parser.parse_file(clean.path()).unwrap().remove(0);
    let dirty = parser.parse_file(dirty.path()).unwrap().remove(0);

    assert_eq!(dirty.stats.malformed, 1);
    assert_eq!(clean.table.records(), dirty.table.records());
    assert_eq!(clean.table.total(), dirty.table.total());
}

#[test]
fn test_beta_across_files() {
    let a = write_report(&["x\t5", "y\t5"]);
    let b = write_report(&["y\t5", "x\t5"]);
    let c = write_report(&["z\t10"]);
    let empty = write_report(&["# nothing classified"]);

    let paths: Vec<PathBuf> = [&a, &b, &c, &empty]
        .iter()
        .map(|f| f.path().to_path_buf())
        .collect();
    let matrix = run_beta(&paths, ReportFormat::Simple, TaxRank::All, ColumnSpec::default()).unwrap();

    assert_eq!(matrix.n_samples(), 4);
    assert_eq!(matrix.get(0, 1), 0.0);
    assert_eq!(matrix.get(0, 2), 1.0);
    assert_eq!(matrix.get(3, 0), 1.0);
    assert_eq!(matrix.get(2, 3), 1.0);
    assert_eq!(matrix.totals()[3], 0.0);

    let text = matrix.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], format!("#0\t{} (10 reads)", a.path().display()));
    assert_eq!(lines[4], "x\t0\t1\t2\t3");
    assert_eq!(lines[5], "0\t0.000\t0.000\t1.000\t1.000");
    assert_eq!(lines[8], "3\tx.xxx\tx.xxx\tx.xxx\t0.000");
}

#[test]
fn test_beta_single_wide_table() {
    let file = write_report(&[
        "taxon\tgut\tsoil\tskin",
        "Escherichia coli\t50\t0\t10",
        "Bacillus subtilis\t0\t80\t0",
        "Staphylococcus aureus\t50\t20\t90",
    ]);
    let config = DiversityConfig {
        name: "wide".to_string(),
        description: None,
        mode: AnalysisMode::Beta,
        format: "single".to_string(),
        rank: "all".to_string(),
        metrics: Vec::new(),
        columns: "1,2".to_string(),
        inputs: vec![file.path().to_path_buf()],
        output: OutputFormat::Json,
        solver: FisherSolver::default(),
    };
    let output = config.resolve().unwrap().run().unwrap();
    let matrix = match &output {
        AnalysisOutput::Beta(matrix) => matrix,
        AnalysisOutput::Alpha(_) => panic!("expected beta output"),
    };
    assert_eq!(matrix.sample_names(), &["gut", "soil", "skin"]);
    // gut vs soil: shared S. aureus min(50, 20) = 20 -> 1 - 40/200
    assert_relative_eq!(matrix.get(0, 1), 0.8, epsilon = 1e-12);
    // gut vs skin: 10 + 50 = 60 -> 1 - 120/200
    assert_relative_eq!(matrix.get(0, 2), 0.4, epsilon = 1e-12);

    let json: serde_json::Value =
        serde_json::from_str(&output.render(OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["sample_names"][1], "soil");
}

#[test]
fn test_beta_needs_two_samples() {
    let a = write_report(&["x\t5"]);
    let err = run_beta(
        &[a.path().to_path_buf()],
        ReportFormat::Simple,
        TaxRank::All,
        ColumnSpec::default(),
    )
    .unwrap_err();
    assert_eq!(err.category(), "insufficient_samples");
}

#[test]
fn test_missing_input_is_fatal() {
    let err = run_beta(
        &[PathBuf::from("/no/such/a.bracken"), PathBuf::from("/no/such/b.bracken")],
        ReportFormat::Bracken,
        TaxRank::All,
        ColumnSpec::default(),
    )
    .unwrap_err();
    assert_eq!(err.category(), "input");
}

#[test]
fn test_krona_species_alpha() {
    let file = write_report(&[
        "60\tk__Bacteria\tp__Proteobacteria\tg__Escherichia\ts__Escherichia_coli",
        "40\tk__Bacteria\tp__Firmicutes\tg__Bacillus\ts__Bacillus_subtilis",
        "25\tk__Bacteria\tp__Firmicutes\tg__Bacillus",
    ]);
    let reports = run_alpha(
        &[file.path().to_path_buf()],
        ReportFormat::Krona,
        TaxRank::Species,
        ColumnSpec::default(),
        &[AlphaMetric::BergerParker],
        &FisherSolver::default(),
    )
    .unwrap();
    assert_relative_eq!(
        reports[0].get(AlphaMetric::BergerParker).unwrap().as_value().unwrap(),
        0.6
    );
}
