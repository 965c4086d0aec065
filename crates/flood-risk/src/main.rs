//! Flood Risk CLI
//!
//! Scores every province from captured weather observations.
//!
//! Usage:
//!   flood-risk --observations data/observations.json \
//!              --output data/flood_risk_report.json \
//!              --geojson

use anyhow::Result;
use clap::Parser;
use flood_risk::{assessor, loader, summary, RegionTable, RiskTier};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "flood-risk",
    about = "Score provincial flood risk from live weather observations"
)]
struct Args {
    /// Path to observations JSON file
    #[arg(short = 'i', long, default_value = "data/observations.json")]
    observations: PathBuf,

    /// Replacement region table (defaults to the built-in 81 provinces)
    #[arg(short, long)]
    regions: Option<PathBuf>,

    /// Output JSON file
    #[arg(short, long, default_value = "data/flood_risk_report.json")]
    output: PathBuf,

    /// Also output GeoJSON
    #[arg(long)]
    geojson: bool,

    /// Only report provinces in this tier (VERY_LOW, LOW_MODERATE, HIGH, VERY_HIGH)
    #[arg(short, long)]
    tier: Option<RiskTier>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: &'a summary::RiskSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    tier_filter: Option<RiskTier>,
    assessments: &'a [flood_risk::RegionAssessment],
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("{}", "=".repeat(60));
    info!("Provincial Flood Risk Analysis");
    info!("{}", "=".repeat(60));

    let table = match &args.regions {
        Some(path) => loader::load_regions(path)?,
        None => RegionTable::with_defaults(),
    };
    info!("Region table: {} provinces", table.len());

    let observations = loader::load_observations(&args.observations)?;

    let mut assessments = assessor::assess_all(&table, observations);
    assessor::sort_by_risk(&mut assessments);

    let run_summary = summary::summarize(&assessments);

    info!("\nTop 10 provinces by risk:");
    for s in assessments.iter().filter_map(|a| a.as_scored()).take(10) {
        info!(
            "  {:5.2} | {:20} | {:12} | {}",
            s.risk_score, s.region, s.tier, s.impact
        );
    }

    if run_summary.no_data_regions > 0 {
        warn!(
            "{} provinces could not be scored (NO_DATA)",
            run_summary.no_data_regions
        );
    }

    let reported = match args.tier {
        Some(tier) => assessor::filter_by_tier(&assessments, tier),
        None => assessments.clone(),
    };

    // Write output
    info!("\nWriting report to {:?}", args.output);
    let report = Report {
        summary: &run_summary,
        tier_filter: args.tier,
        assessments: &reported,
    };
    let file = File::create(&args.output)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &report)?;

    // Write GeoJSON if requested
    if args.geojson {
        let geojson_path = args.output.with_extension("geojson");
        info!("Writing GeoJSON to {:?}", geojson_path);
        let collection = summary::to_geojson(&reported);
        let file = File::create(&geojson_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &collection)?;
    }

    // Summary
    info!("\n{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!(
        "Scored {} of {} provinces",
        run_summary.scored_regions, run_summary.total_regions
    );
    if let Some(highest) = &run_summary.highest_risk {
        info!(
            "Highest risk: {} ({:.2}, {})",
            highest.region, highest.risk_score, highest.tier
        );
    }
    if let (Some(mean), Some(max)) = (
        run_summary.mean_precipitation_mm_h,
        run_summary.max_precipitation_mm_h,
    ) {
        info!("Precipitation: mean {:.2} mm/h, max {:.2} mm/h", mean, max);
    }
    for t in &run_summary.tier_distribution {
        info!("  {:12}: {} provinces", t.tier, t.count);
    }

    Ok(())
}
