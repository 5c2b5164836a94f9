use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use jiff::civil::Time;
use tracing::info;

use parcel_dispatch::config::FleetConfig;
use parcel_dispatch::dispatch::Dispatch;
use parcel_dispatch::loader;
use parcel_dispatch::parcel::ParcelId;
use parcel_dispatch::status::StatusReport;
use parcel_dispatch::store::ParcelStore;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Address table (id, address, name)
    #[arg(long, default_value = "CSV/Addresses.csv")]
    addresses: PathBuf,

    /// Distance table (from, to, distance)
    #[arg(long, default_value = "CSV/Distances.csv")]
    distances: PathBuf,

    /// Parcel table (id, address, city, state, zip, deadline, weight)
    #[arg(long, default_value = "CSV/Packages.csv")]
    parcels: PathBuf,

    /// Fleet assignment as JSON; the standard day is used when omitted
    #[arg(long)]
    fleet: Option<PathBuf>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Combined mileage of all vehicles
    Mileage,
    /// Delivery order and finish time of each vehicle
    Routes,
    /// Status of one parcel at a time of day (e.g. "10:25" or "10:25 AM")
    Status {
        #[arg(long)]
        id: ParcelId,
        #[arg(long, value_parser = parse_time)]
        at: Time,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Status of every parcel at a time of day
    Report {
        #[arg(long, value_parser = parse_time)]
        at: Time,
        /// Print the reports as a JSON array
        #[arg(long)]
        json: bool,
    },
}

fn parse_time(text: &str) -> Result<Time, String> {
    let text = text.trim();
    text.parse::<Time>()
        .or_else(|_| Time::strptime("%I:%M %p", text))
        .or_else(|_| Time::strptime("%I:%M:%S %p", text))
        .map_err(|_| format!("invalid time '{text}', expected HH:MM[:SS] or HH:MM AM/PM"))
}

fn print_report(report: &StatusReport) {
    let delivered = report
        .delivery_time
        .map(|t| t.strftime("%I:%M %p").to_string())
        .unwrap_or_else(|| "None".to_string());
    println!(
        "{:>3} | {:<10} | {} | deadline {} | {} kg | delivered {}",
        report.parcel_id,
        report.status.to_string(),
        report.display_address,
        report.deadline,
        report.weight,
        delivered
    );
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = match &cli.fleet {
        Some(path) => FleetConfig::read(path)?,
        None => FleetConfig::default(),
    };

    let (addresses, address_report) = loader::read_addresses(&cli.addresses)?;
    let (distances, distance_report) = loader::read_distances(&cli.distances)?;
    let mut store = ParcelStore::with_buckets(config.store_buckets);
    let parcel_report = loader::read_parcels(&cli.parcels, &mut store)?;
    info!(
        addresses = address_report.loaded,
        distances = distance_report.loaded,
        parcels = parcel_report.loaded,
        skipped = address_report.skipped + distance_report.skipped + parcel_report.skipped,
        "tables loaded"
    );

    let mut dispatch = Dispatch::new(&config, distances, addresses, store);
    dispatch
        .schedule_all()
        .context("failed to schedule delivery routes")?;

    match cli.command {
        Commands::Mileage => {
            println!("Combined mileage for all vehicles: {:.2} miles", dispatch.total_mileage());
        }
        Commands::Routes => {
            for summary in dispatch.summaries() {
                println!(
                    "{}: departs {} finishes {} after {:.2} miles, order {:?}",
                    summary.vehicle,
                    summary.departure_time,
                    summary.finish_time,
                    summary.mileage,
                    summary.order
                );
                if !summary.unreachable.is_empty() {
                    println!("  unreachable: {:?}", summary.unreachable);
                }
            }
        }
        Commands::Status { id, at, json } => match dispatch.query_status(id, at) {
            Some(report) if json => println!("{}", serde_json::to_string_pretty(&report)?),
            Some(report) => print_report(&report),
            None => println!("Parcel {id} not found."),
        },
        Commands::Report { at, json } => {
            let reports = dispatch.report(at);
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    print_report(report);
                }
            }
        }
    }

    Ok(())
}
