//! Print the next arrivals at the station nearest a position.
//!
//! ```text
//! eta --lat 22.2975 --lon 114.1722 [--line EAL | --all]
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eta_server::catalog::StationCatalog;
use eta_server::config::ServerConfig;
use eta_server::domain::{DirectionArrival, LineCode, StationCode};
use eta_server::schedule::{MockScheduleClient, ScheduleBackend, ScheduleClient};
use eta_server::session::{FetchFailure, Phase, Session};
use eta_server::transit::Transit;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    /// Line to show at a multi-line station (e.g. EAL)
    #[arg(long)]
    line: Option<String>,
    /// Station catalog JSON (overrides ETA_CATALOG_PATH)
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Serve schedules from this directory instead of the live API
    #[arg(long)]
    mock_dir: Option<PathBuf>,
    /// Show every line serving the station
    #[arg(long, conflicts_with = "line")]
    all: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(path) = args.catalog {
        config = config.with_catalog_path(path);
    }
    if let Some(dir) = args.mock_dir {
        config = config.with_mock_schedules(dir);
    }
    let line = args
        .line
        .as_deref()
        .map(LineCode::parse_normalized)
        .transpose()?;

    let catalog = Arc::new(StationCatalog::load(&config.catalog_path)?);
    let backend = match &config.mock_schedules {
        Some(dir) => ScheduleBackend::Mock(MockScheduleClient::new(dir)?),
        None => ScheduleBackend::Live(ScheduleClient::new(config.schedule_config())?),
    };
    let transit = Transit::new(catalog, backend).with_policy(config.line_policy());

    let Some(station) = transit.resolve_nearest(args.lat, args.lon) else {
        println!("No station near ({}, {})", args.lat, args.lon);
        return Ok(());
    };

    if args.all {
        return print_all_lines(&transit, station).await;
    }

    let lines = transit.lines_for_station(&station).unwrap_or_default();
    let (session, mut ticket) = Session::new().select_station(station, lines, transit.policy());

    let session = match line {
        Some(line) if session.lines().contains(&line) => {
            let (session, switched) = session.switch_line(line);
            ticket = switched;
            session
        }
        Some(line) => {
            println!("Line {line} does not serve {station}; showing the default line");
            session
        }
        None => session,
    };

    let session = match ticket {
        Some(ticket) => {
            let selection = ticket.selection;
            let result = transit
                .fetch_arrivals(&selection.line, &selection.station)
                .await
                .map_err(FetchFailure::from);
            session.resolve(ticket, result)
        }
        None => session,
    };

    let catalog = transit.catalog();
    let station_name = catalog.station_name(&station).unwrap_or_default();
    println!("{station_name} ({station})");

    if session.is_multi_line() {
        let names: Vec<String> = session.lines().iter().map(|l| l.to_string()).collect();
        println!("  lines: {}", names.join(", "));
    }
    if let Some(selection) = session.selection() {
        let line_name = catalog.line_name(&selection.line).unwrap_or_default();
        println!("  {line_name} ({})", selection.line);
    }

    match session.phase() {
        Phase::Ready(record) => {
            if record.has_no_service() {
                println!("  no trains scheduled");
            }
            print_direction("up", record.up.as_ref());
            print_direction("down", record.down.as_ref());
        }
        Phase::Failed(failure) => println!("  arrivals unavailable: {}", describe(failure)),
        Phase::Idle | Phase::Loading => {}
    }

    Ok(())
}

async fn print_all_lines(
    transit: &Transit<ScheduleBackend>,
    station: StationCode,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = transit.catalog();
    println!(
        "{} ({station})",
        catalog.station_name(&station).unwrap_or_default()
    );

    for entry in transit.fetch_arrivals_for_station(&station).await? {
        let line_name = catalog.line_name(&entry.line).unwrap_or_default();
        println!("  {line_name} ({})", entry.line);
        match entry.result {
            Ok(record) => {
                if record.has_no_service() {
                    println!("  no trains scheduled");
                }
                print_direction("up", record.up.as_ref());
                print_direction("down", record.down.as_ref());
            }
            Err(e) => println!("  arrivals unavailable: {e}"),
        }
    }

    Ok(())
}

fn print_direction(label: &str, arrival: Option<&DirectionArrival>) {
    if let Some(arrival) = arrival {
        println!(
            "  {label:>4}: {} in {} min",
            arrival.destination, arrival.eta_minutes
        );
    }
}

fn describe(failure: &FetchFailure) -> String {
    match failure {
        FetchFailure::StationNotFound(station) => format!("station {station} not in catalog"),
        FetchFailure::Unavailable(message) | FetchFailure::Parse(message) => message.clone(),
    }
}
