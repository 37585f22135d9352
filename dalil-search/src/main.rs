//! Discovery command-line (dalil-search) - Main entry point
//!
//! Runs one search over a JSON record list and prints the ranked result as
//! JSON on stdout. Logs go to stderr or the configured log file.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dalil_common::config::{load_config, LoggingConfig};
use dalil_common::model::load_records;
use dalil_common::{AreaFilter, AudioTrack, Coordinate};
use dalil_search::geo::{category_of, format_distance};
use dalil_search::matcher::{areas, neighborhoods};
use dalil_search::{search, Query, RankedRecord};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for dalil-search
#[derive(Parser, Debug)]
#[command(name = "dalil-search")]
#[command(about = "Search the venue directory by text, area and distance")]
#[command(version)]
struct Args {
    /// Config file (overrides DALIL_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON record list (overrides records_path from config)
    #[arg(short, long, env = "DALIL_RECORDS")]
    records: Option<PathBuf>,

    /// Free-text query
    #[arg(short, long, default_value = "")]
    query: String,

    /// Area label, or الكل for all areas
    #[arg(short, long, default_value = "الكل")]
    area: String,

    /// Neighborhood label
    #[arg(short, long)]
    neighborhood: Option<String>,

    /// Origin latitude for proximity ranking
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Origin longitude for proximity ranking
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Keep only the first N results
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print one line per result instead of JSON
    #[arg(long)]
    plain: bool,

    /// List areas and neighborhoods present in the records, then exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_source) =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.logging)?;
    config_source.log();

    let Some(records_path) = args.records.clone().or(config.records_path.clone()) else {
        bail!("No record list given: pass --records or set records_path in the config file");
    };
    let records = load_records(&records_path)
        .with_context(|| format!("Failed to load records from {}", records_path.display()))?;
    info!("Loaded {} records", records.len());

    let area: AreaFilter = args
        .area
        .parse()
        .with_context(|| format!("Invalid area: {}", args.area))?;

    if args.list {
        for found in areas(&records) {
            println!("{}", found);
        }
        for neighborhood in neighborhoods(&records, area) {
            println!("  {}", neighborhood);
        }
        return Ok(());
    }

    let mut query = Query::new(args.query).with_area(area);
    if let Some(neighborhood) = args.neighborhood {
        query = query.with_neighborhood(neighborhood);
    }
    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        query = query.with_origin(Coordinate::new(lat, lng));
    }
    if let Some(limit) = args.limit {
        query = query.with_limit(limit);
    }

    let result = search(&records, &query);

    if args.plain {
        for ranked in &result {
            println!("{}", plain_line(ranked));
        }
    } else {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize results")?;
        println!("{}", json);
    }

    Ok(())
}

/// Tab-separated id, name, distance and category when ranked, and the
/// audio sample URI when the record has one
fn plain_line(ranked: &RankedRecord<'_>) -> String {
    let record = ranked.record;
    let mut columns = vec![record.id.to_string(), record.name.clone()];
    if let Some(km) = ranked.distance_km {
        columns.push(format_distance(km));
        columns.push(category_of(km).to_string());
    }
    if let Some(track) = AudioTrack::from_record(record) {
        columns.push(track.audio_uri);
    }
    columns.join("\t")
}

/// Initialize tracing; RUST_LOG wins over the configured level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "dalil_search={level},dalil_common={level}",
            level = logging.level.trim().to_ascii_lowercase()
        )
        .into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
