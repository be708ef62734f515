use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stop_locator::batch::{BatchOutcome, BatchRunner, CancelFlag};
use stop_locator::config::{PipelineConfig, RegionConfig};
use stop_locator::geocode::{GeocodeClient, GeocodeConfig, StopResolver};
use stop_locator::output::{self, SummaryDocument};
use stop_locator::pacing::Pacer;
use stop_locator::report::{RunSummary, summarize};
use stop_locator::roads::{RoadSnapper, RoadsClient, RoadsConfig};
use stop_locator::routes::load_routes;

/// Number of resolved stops listed in the final report.
const SAMPLE_SIZE: usize = 5;

/// Geocode transit stops and snap them to the road network
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Route definition file (JSON)
    #[arg(long)]
    routes: PathBuf,

    /// Resolved stops CSV
    #[arg(long, default_value = "extracted_stop_coordinates.csv")]
    output: PathBuf,

    /// Failed stops CSV, only written when some stops failed
    #[arg(long, default_value = "failed_stops.csv")]
    failed_output: PathBuf,

    /// Also write the run summary as JSON
    #[arg(long)]
    summary_output: Option<PathBuf>,

    /// Google Maps Platform API key
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Region definition (TOML); defaults to Chennai
    #[arg(long)]
    region: Option<PathBuf>,

    /// Skip road snapping
    #[arg(long)]
    no_snap: bool,

    /// Minimum gap between requests to one provider, in milliseconds
    #[arg(long, default_value_t = 100)]
    variant_delay_ms: u64,

    /// Pause after each stop, in milliseconds
    #[arg(long, default_value_t = 200)]
    stop_delay_ms: u64,

    /// Geocoding API base URL
    #[arg(long)]
    geocode_url: Option<String>,

    /// Roads API base URL
    #[arg(long)]
    roads_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stop_locator=info")),
        )
        .init();

    let cli = Cli::parse();

    // Input errors are fatal: nothing runs without routes and a region
    let routes = match load_routes(&cli.routes) {
        Ok(routes) => routes,
        Err(e) => {
            error!(path = %cli.routes.display(), error = %e, "failed to load routes");
            return ExitCode::FAILURE;
        }
    };
    info!(routes = routes.len(), stops = routes.total_stops(), "loaded route file");

    let region = match &cli.region {
        Some(path) => match RegionConfig::load(path) {
            Ok(region) => region,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load region");
                return ExitCode::FAILURE;
            }
        },
        None => RegionConfig::default(),
    };

    let pipeline = PipelineConfig::default()
        .with_variant_delay(Duration::from_millis(cli.variant_delay_ms))
        .with_stop_delay(Duration::from_millis(cli.stop_delay_ms))
        .with_snapping(!cli.no_snap);

    let mut geocode_config = GeocodeConfig::new(&cli.api_key);
    if let Some(url) = &cli.geocode_url {
        geocode_config = geocode_config.with_base_url(url);
    }
    let geocoder = match GeocodeClient::new(geocode_config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create geocoding client");
            return ExitCode::FAILURE;
        }
    };

    let snapper = if pipeline.snap_enabled {
        let mut roads_config = RoadsConfig::new(&cli.api_key);
        if let Some(url) = &cli.roads_url {
            roads_config = roads_config.with_base_url(url);
        }
        match RoadsClient::new(roads_config) {
            Ok(client) => Some(RoadSnapper::new(client, Pacer::new(pipeline.variant_delay))),
            Err(e) => {
                error!(error = %e, "failed to create roads client");
                return ExitCode::FAILURE;
            }
        }
    } else {
        None
    };

    let region_name = region.name.clone();
    let resolver = StopResolver::new(geocoder, region, Pacer::new(pipeline.variant_delay));
    let runner = BatchRunner::new(resolver, snapper, pipeline.stop_delay());

    // Stop between stops on Ctrl-C and keep what was resolved so far
    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, finishing current stop");
            on_interrupt.cancel();
        }
    });

    let outcome = runner.run(&routes, &cancel).await;
    let summary = summarize(&outcome.resolved, &outcome.failed);

    let write_ok = write_outputs(&cli, &region_name, &outcome, &summary);
    print_report(&outcome, &summary);

    if write_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Write every sink, continuing past failures. Returns whether all writes
/// succeeded.
fn write_outputs(cli: &Cli, region: &str, outcome: &BatchOutcome, summary: &RunSummary) -> bool {
    let mut ok = true;

    match output::write_resolved_csv(&cli.output, &outcome.resolved) {
        Ok(rows) => info!(path = %cli.output.display(), rows, "wrote resolved stops"),
        Err(e) => {
            warn!(path = %cli.output.display(), error = %e, "failed to write resolved stops");
            ok = false;
        }
    }

    if outcome.failed.is_empty() {
        info!("no failed stops");
    } else {
        match output::write_failed_csv(&cli.failed_output, &outcome.failed) {
            Ok(rows) => info!(path = %cli.failed_output.display(), rows, "wrote failed stops"),
            Err(e) => {
                warn!(path = %cli.failed_output.display(), error = %e, "failed to write failed stops");
                ok = false;
            }
        }
    }

    if let Some(path) = &cli.summary_output {
        let document = SummaryDocument {
            generated_at: chrono::Utc::now(),
            region,
            success_rate: summary.success_rate(),
            geocode_requests: outcome.geocode_requests,
            cancelled: outcome.cancelled,
            summary,
        };
        match output::write_summary_json(path, &document) {
            Ok(()) => info!(path = %path.display(), "wrote summary"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to write summary");
                ok = false;
            }
        }
    }

    ok
}

fn print_report(outcome: &BatchOutcome, summary: &RunSummary) {
    println!();
    println!("=== Stop extraction summary ===");
    if outcome.cancelled {
        println!("Run was interrupted; results are partial.");
    }
    println!("Routes with resolved stops: {}", summary.total_routes);
    println!("Stops resolved:             {}", summary.total_resolved);
    println!("Stops failed:               {}", summary.total_failed);
    println!("Geocoding requests:         {}", outcome.geocode_requests);
    println!("Success rate:               {:.1}%", summary.success_rate() * 100.0);

    for route in summary.per_route.values() {
        println!(
            "  {}: {} stops, centre {}",
            route.route_name,
            route.total_stops,
            route.centroid()
        );
    }

    if !outcome.resolved.is_empty() {
        println!();
        println!("Sample:");
        for stop in outcome.resolved.iter().take(SAMPLE_SIZE) {
            println!("  {} ({}): {}", stop.stop_name, stop.route_name, stop.snapped);
        }
    }
}
