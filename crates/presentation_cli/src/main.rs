//! TruckScout CLI
//!
//! Resolve addresses, inspect the position source, try the suggestion
//! session interactively and list nearby trucks and events from a terminal.

#![allow(clippy::print_stdout)]

mod output;
mod suggest;

use std::path::PathBuf;

use anyhow::Context;
use application::LocationService;
use clap::{Args, Parser, Subcommand};
use domain::Coordinates;
use infrastructure::{AppConfig, TelemetryConfig, build_services, init_telemetry};
use serde::Serialize;

/// TruckScout CLI
#[derive(Debug, Parser)]
#[command(name = "truckscout-cli")]
#[command(author, version, about = "TruckScout location and proximity search CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml if present)
    #[arg(short, long, env = "TRUCKSCOUT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve an address to coordinates
    Resolve {
        /// Free-form address
        address: String,
    },

    /// Find the address of a position
    Reverse {
        #[command(flatten)]
        position: PositionArgs,
    },

    /// Resolve the position of this machine
    Locate,

    /// Type addresses on stdin and watch the suggestions
    ///
    /// Each line replaces the search text. Enter `:N` to pick suggestion N.
    Suggest,

    /// List trucks (or events) near a position or address
    Nearby {
        /// Latitude of the reference point
        #[arg(long, allow_negative_numbers = true, requires = "longitude", conflicts_with = "address")]
        latitude: Option<f64>,

        /// Longitude of the reference point
        #[arg(long, allow_negative_numbers = true, requires = "latitude")]
        longitude: Option<f64>,

        /// Address of the reference point
        #[arg(short, long)]
        address: Option<String>,

        /// Search radius in kilometers (defaults to the configured radius)
        #[arg(short, long)]
        radius_km: Option<f64>,

        /// List events instead of trucks
        #[arg(long)]
        events: bool,
    },

    /// Check that the geocoding provider and marketplace are reachable
    Health,
}

#[derive(Debug, Clone, Copy, Args)]
struct PositionArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    latitude: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    longitude: f64,
}

impl PositionArgs {
    fn coordinates(self) -> anyhow::Result<Coordinates> {
        Ok(Coordinates::new(self.latitude, self.longitude)?)
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AppConfig::load().context("Failed to load configuration")?,
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration:\n{e}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    init_telemetry(&TelemetryConfig {
        log_filter: log_filter_from_verbosity(cli.verbose).to_string(),
        ..config.telemetry.clone()
    })?;

    let services = build_services(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize services: {e}"))?;
    let location = services.location;

    match cli.command {
        Commands::Resolve { address } => {
            let resolved = location.resolve_address(&address).await?;
            if cli.json {
                print_json(&resolved)?;
            } else {
                println!("{}", output::location(&resolved));
            }
        },

        Commands::Reverse { position } => {
            let coordinates = position.coordinates()?;
            let address = location.reverse(coordinates).await;
            if cli.json {
                print_json(&domain::ResolvedLocation::new(address, coordinates))?;
            } else {
                println!("{address}");
            }
        },

        Commands::Locate => {
            let resolved = location.use_current_location().await.map_err(|e| {
                anyhow::anyhow!(
                    "{e} (source: {}). {}",
                    location.position_source(),
                    e.user_hint()
                )
            })?;
            if cli.json {
                print_json(&resolved)?;
            } else {
                println!("{}", output::location(&resolved));
            }
        },

        Commands::Suggest => {
            let session = location.suggestion_session();
            println!("Type an address, one line per edit. `:N` picks suggestion N.");
            if let Some(resolved) = suggest::run(&session, tokio::io::stdin()).await? {
                if cli.json {
                    print_json(&resolved)?;
                } else {
                    println!("Selected: {}", output::location(&resolved));
                }
            }
        },

        Commands::Nearby {
            latitude,
            longitude,
            address,
            radius_km,
            events,
        } => {
            run_nearby(
                &location,
                NearbyArgs {
                    latitude,
                    longitude,
                    address,
                    radius_km,
                    events,
                },
                cli.json,
            )
            .await?;
        },

        Commands::Health => {
            let report = services.health.check_all().await;
            if cli.json {
                print_json(&report)?;
            } else {
                println!("{}", output::health(&report));
            }
            if !report.healthy {
                anyhow::bail!("One or more services are unavailable");
            }
        },
    }

    Ok(())
}

struct NearbyArgs {
    latitude: Option<f64>,
    longitude: Option<f64>,
    address: Option<String>,
    radius_km: Option<f64>,
    events: bool,
}

async fn run_nearby(location: &LocationService, args: NearbyArgs, json: bool) -> anyhow::Result<()> {
    let radius_km = location.radius_or_default(args.radius_km)?;

    let reference = match (args.latitude, args.longitude, args.address) {
        (Some(latitude), Some(longitude), _) => Coordinates::new(latitude, longitude)?,
        (_, _, Some(address)) => {
            let resolved = location.resolve_address(&address).await?;
            if !json {
                println!("Near {}", output::location(&resolved));
            }
            resolved.coordinates
        },
        _ => anyhow::bail!("Pass --latitude and --longitude, or --address"),
    };

    if args.events {
        let results = location.nearby_events(reference, Some(radius_km)).await?;
        if json {
            print_json(&results)?;
        } else {
            println!("{}", output::nearby(&results, radius_km, output::event_label));
        }
    } else {
        let results = location.nearby_trucks(reference, Some(radius_km)).await?;
        if json {
            print_json(&results)?;
        } else {
            println!("{}", output::nearby(&results, radius_km, output::truck_label));
        }
    }
    Ok(())
}
