#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the branchwatch analysis engine.
//!
//! Reads a JSON array of branch records (produced by the external
//! acquisition tooling), runs the competitive analysis, and writes the
//! report as JSON for downstream rendering and reporting consumers.

use std::path::{Path, PathBuf};

use branchwatch_analytics::{AnalysisConfig, analyze, dominance, summary};
use branchwatch_spatial::IndexStrategy;
use branchwatch_store::BranchStore;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "branchwatch", about = "Competitive proximity analysis for branch networks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full competitive analysis and write the report as JSON
    Analyze {
        /// Input JSON file: an array of branch records
        input: PathBuf,
        /// TOML analysis configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Competitor search radius in kilometers (overrides the config file)
        #[arg(long)]
        radius_km: Option<f64>,
        /// Comma-separated brand labels in precedence order (overrides the config file)
        #[arg(long)]
        brands: Option<String>,
        /// Number of top zone-brand combinations to keep in the ranking
        #[arg(long)]
        top: Option<usize>,
        /// Proximity index implementation: "brute-force" or "r-tree"
        #[arg(long, value_parser = parse_strategy)]
        strategy: Option<IndexStrategy>,
        /// Leave unrated competitors out of profile rating averages
        #[arg(long)]
        exclude_unrated: bool,
        /// Output path. Defaults to `branchwatch_report_<timestamp>.json`
        #[arg(long)]
        output: Option<PathBuf>,
        /// Pretty-print the report JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print per-brand and per-zone branch counts without proximity analysis
    Summary {
        /// Input JSON file: an array of branch records
        input: PathBuf,
        /// TOML analysis configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Comma-separated brand labels (default: brands observed in the data)
        #[arg(long)]
        brands: Option<String>,
    },
}

/// Parses the `--strategy` value into an [`IndexStrategy`] using its
/// `FromStr` implementation, mapping the parse failure to a message
/// clap can display.
fn parse_strategy(s: &str) -> Result<IndexStrategy, String> {
    s.parse()
        .map_err(|_| format!("'{s}' is not a valid strategy (expected \"brute-force\" or \"r-tree\")"))
}

#[allow(clippy::too_many_lines)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            radius_km,
            brands,
            top,
            strategy,
            exclude_unrated,
            output,
            pretty,
        } => {
            let mut analysis_config = load_config(config.as_deref(), brands.as_deref())?;
            if let Some(radius) = radius_km {
                analysis_config.radius_km = radius;
            }
            if let Some(top) = top {
                analysis_config.top_n = top;
            }
            if let Some(strategy) = strategy {
                analysis_config.strategy = strategy;
            }
            if exclude_unrated {
                analysis_config.exclude_unrated_competitors = true;
            }
            // Reject a bad radius, weight triple, or brand list before
            // touching the input at all.
            analysis_config.validate()?;

            let records = branchwatch_ingest::read_records(&input)?;
            let mut store = BranchStore::new();
            let stats =
                branchwatch_ingest::ingest(records, &mut store, &analysis_config.brands);

            let report = analyze(&store, &analysis_config)?;

            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            let output = output.unwrap_or_else(default_output_path);
            std::fs::write(&output, json)?;
            log::info!("Report written to {}", output.display());

            println!(
                "{} branches analyzed within {} km ({} without coordinates, {} records rejected)",
                report.analyzed_branches,
                report.radius_km,
                report.skipped_branches,
                stats.rejected()
            );
            println!(
                "{} branches have nearby competitors across {} zones",
                report.profiles.len(),
                report.zones.len()
            );
            if !report.rankings.is_empty() {
                println!();
                println!("Top zone-brand combinations:");
                for (rank, entry) in report.rankings.iter().enumerate() {
                    println!(
                        "{:>3}. {} — {} (score {:.2}, {} branches, {} reviews)",
                        rank + 1,
                        entry.zone,
                        entry.brand,
                        entry.score,
                        entry.branch_count,
                        entry.total_reviews
                    );
                }
            }
            println!();
            println!("Report: {}", output.display());
        }
        Commands::Summary {
            input,
            config,
            brands,
        } => {
            let records = branchwatch_ingest::read_records(&input)?;

            let configured = load_config(config.as_deref(), brands.as_deref())?;
            let brand_labels = if configured.brands.is_empty() {
                branchwatch_ingest::observed_brands(&records)
            } else {
                configured.brands
            };

            let mut store = BranchStore::new();
            let stats = branchwatch_ingest::ingest(records, &mut store, &brand_labels);

            println!(
                "{} branches across {} brands ({} records rejected)",
                store.len(),
                brand_labels.len(),
                stats.rejected()
            );
            println!();

            for brand in summary::brand_summaries(store.branches(), &brand_labels) {
                let avg = brand
                    .avg_rating
                    .map_or_else(|| "-".to_string(), |rating| format!("{rating:.2}"));
                println!(
                    "{}: {} branches ({}% share), avg rating {avg}, {} reviews, top zone: {}",
                    brand.brand,
                    brand.branch_count,
                    brand.market_share_pct,
                    brand.total_reviews,
                    brand.top_zone.as_deref().unwrap_or("-")
                );
            }
            println!();

            for (zone, zone_stats) in dominance::aggregate_by_zone(store.branches(), &brand_labels, &[])
            {
                println!(
                    "{zone}: {} branches, dominant: {}",
                    zone_stats.total_branches,
                    zone_stats.dominant_brand.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

/// Loads the analysis configuration: TOML file if given, defaults
/// otherwise, with the `--brands` flag overriding the file's brand list.
fn load_config(
    path: Option<&Path>,
    brands_flag: Option<&str>,
) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => toml::de::from_str(&std::fs::read_to_string(path)?)?,
        None => AnalysisConfig::new(Vec::new()),
    };

    if let Some(flag) = brands_flag {
        config.brands = split_labels(flag);
    }

    Ok(config)
}

fn split_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(String::from)
        .collect()
}

fn default_output_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M");
    PathBuf::from(format!("branchwatch_report_{timestamp}.json"))
}
