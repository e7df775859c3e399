//! Remediation Recommendation CLI
//!
//! Compares dig & haul, onsite and surface facility remediation for one site.
//!
//! Usage:
//!   recommend-remediation --site data/sample_site.json \
//!                         --facilities data/permian_facilities.json \
//!                         --output analysis.json

use anyhow::{Context, Result};
use clap::Parser;
use remediation_selector::{analyze, loader, ScoringConfig};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "recommend-remediation",
    about = "Recommend a contaminated soil remediation strategy for a Permian Basin site"
)]
struct Args {
    /// Path to the site request JSON file
    #[arg(short, long)]
    site: PathBuf,

    /// Path to the facility database JSON file
    #[arg(short, long, default_value = "data/permian_facilities.json")]
    facilities: PathBuf,

    /// Output JSON file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", "=".repeat(60));
    info!("Soil Remediation Solution Recommendation");
    info!("{}", "=".repeat(60));

    let registry = loader::load_registry(&args.facilities)
        .with_context(|| format!("loading facility database {:?}", args.facilities))?;
    let site = loader::load_site(&args.site)
        .with_context(|| format!("loading site request {:?}", args.site))?;

    let analysis = analyze(&site, &registry, &ScoringConfig::default())?;

    info!(
        "Site: {:.4}, {:.4} | {} / {} County | {}",
        site.coordinate.latitude,
        site.coordinate.longitude,
        analysis.region.jurisdiction.name(),
        analysis.region.county,
        analysis.region.soil_type
    );
    info!(
        "TPH {:.0} mg/kg: {} ({:.0} mg/kg, {})",
        site.tph_mgkg,
        analysis.region.tph_status.label(),
        analysis.region.thresholds.tph_industrial_mgkg,
        analysis.region.thresholds.regulatory_agency
    );
    info!("Volume: {:.0} CY", analysis.volume_cy);
    match &analysis.nearest_disposal {
        Some(lf) => info!("Nearest qualified landfill: {} ({:.1} mi)", lf.name, lf.distance_miles),
        None => info!("Nearest qualified landfill: none found"),
    }

    info!("\nStrategy comparison:");
    for estimate in &analysis.estimates {
        let score = analysis
            .recommendation
            .as_ref()
            .and_then(|rec| rec.scores.get(&estimate.kind))
            .copied()
            .unwrap_or_default();
        info!(
            "  {:28} | ${:>12.0} | ${:>7.2}/CY | {:>4} days | {:>7.2} t CO2 | score {:.1}",
            estimate.kind.display_name(),
            estimate.total_cost,
            estimate.cost_per_cy,
            estimate.project_days,
            estimate.co2_tons,
            score
        );
    }

    match &analysis.recommendation {
        Some(rec) => info!("\nRECOMMENDED: {}", rec.recommended.display_name()),
        None => warn!("\nNo remediation strategy available for this site"),
    }

    match &args.output {
        Some(path) => {
            info!("Writing analysis to {:?}", path);
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, &analysis)?;
        }
        None => println!("{}", serde_json::to_string_pretty(&analysis)?),
    }

    Ok(())
}
