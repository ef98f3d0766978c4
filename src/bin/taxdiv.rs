//! taxdiv - Taxonomic diversity CLI
//!
//! Command-line interface for alpha and beta diversity of classifier reports.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use taxa_diversity::error::Result;
use taxa_diversity::pipeline::{AnalysisMode, DiversityConfig, OutputFormat};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Diversity metrics for metagenomic abundance reports
#[derive(Parser)]
#[command(name = "taxdiv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate alpha diversity of one sample
    Alpha {
        /// Input file with abundance estimates (Bracken, Kraken, etc.)
        #[arg(short = 'f', long = "filename")]
        input: PathBuf,

        /// Metric: Sh (Shannon), BP (Berger-Parker), Si (Simpson),
        /// ISi (Inverse Simpson), F (Fisher) or all; repeatable
        #[arg(short = 'a', long = "alpha", default_value = "Sh")]
        metrics: Vec<String>,

        /// Input type: bracken, kreport, kreport2, krona, single, simple
        #[arg(long = "type", default_value = "bracken")]
        format: String,

        /// Taxonomic level: all, D, P, C, O, F, G, S
        #[arg(short, long, default_value = "all")]
        level: String,

        /// Category and count columns for simple/single, 1-based: cat,count
        #[arg(long, visible_alias = "columns", default_value = "1,2")]
        cols: String,

        /// Output format: text, json or yaml
        #[arg(short, long, default_value = "text")]
        output: String,

        /// Maximum iterations for Fisher's alpha
        #[arg(long, default_value = "100")]
        max_iterations: usize,
    },

    /// Calculate Bray-Curtis dissimilarity between samples
    Beta {
        /// Input files, one per sample (a single file for --type single)
        #[arg(short = 'i', long = "input", visible_aliases = ["inputs", "input-files"], num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,

        /// Input type: single, simple, bracken, kreport, kreport2, krona
        #[arg(long = "type", default_value = "single")]
        format: String,

        /// Taxonomic level: all, D, P, C, O, F, G, S
        #[arg(short, long, default_value = "all")]
        level: String,

        /// Category and count columns for simple/single, 1-based: cat,count
        #[arg(long, visible_alias = "columns", default_value = "1,2")]
        cols: String,

        /// Output format: text, json or yaml
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Run an analysis from a YAML configuration file
    Run {
        /// Path to configuration YAML
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Generate an example configuration
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "diversity.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Alpha {
            input,
            metrics,
            format,
            level,
            cols,
            output,
            max_iterations,
        } => cmd_alpha(input, metrics, format, level, cols, &output, max_iterations),

        Commands::Beta {
            inputs,
            format,
            level,
            cols,
            output,
        } => cmd_beta(inputs, format, level, cols, &output),

        Commands::Run { config } => cmd_run(&config),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Alpha diversity of one report
fn cmd_alpha(
    input: PathBuf,
    metrics: Vec<String>,
    format: String,
    level: String,
    cols: String,
    output: &str,
    max_iterations: usize,
) -> Result<()> {
    let mut config = DiversityConfig {
        name: "alpha".to_string(),
        description: None,
        mode: AnalysisMode::Alpha,
        format,
        rank: level,
        metrics,
        columns: cols,
        inputs: vec![input],
        output: output.parse()?,
        solver: Default::default(),
    };
    config.solver.max_iterations = max_iterations;
    execute(&config)
}

/// Bray-Curtis matrix across reports
fn cmd_beta(
    inputs: Vec<PathBuf>,
    format: String,
    level: String,
    cols: String,
    output: &str,
) -> Result<()> {
    let config = DiversityConfig {
        name: "beta".to_string(),
        description: None,
        mode: AnalysisMode::Beta,
        format,
        rank: level,
        metrics: Vec::new(),
        columns: cols,
        inputs,
        output: output.parse()?,
        solver: Default::default(),
    };
    execute(&config)
}

/// Run from configuration
fn cmd_run(config_path: &PathBuf) -> Result<()> {
    info!("Loading configuration from {:?}", config_path);
    let config_str = std::fs::read_to_string(config_path)?;
    let config = DiversityConfig::from_yaml(&config_str)?;
    info!("Running analysis '{}'", config.name);
    execute(&config)
}

/// Write an example configuration
fn cmd_example(output_path: &PathBuf) -> Result<()> {
    let yaml = DiversityConfig::example().to_yaml()?;
    std::fs::write(output_path, &yaml)?;
    eprintln!("Example configuration written to {:?}", output_path);
    Ok(())
}

fn execute(config: &DiversityConfig) -> Result<()> {
    let analysis = config.resolve()?;
    let result = analysis.run()?;
    let rendered = result.render(config.output)?;
    print!("{}", rendered);
    if config.output != OutputFormat::Text && !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}
