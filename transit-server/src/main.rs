use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_server::cache::CacheConfig;
use transit_server::config::ServerConfig;
use transit_server::schedule::{RawTables, ScheduleIndex};
use transit_server::simulation::SimulationConfig;
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transit_server=info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    info!(dir = %config.data_dir.display(), "Loading timetable");
    let tables = RawTables::load_dir(&config.data_dir)?;
    let schedule = ScheduleIndex::from_tables(&tables, &config.routes);
    info!(
        rows = schedule.len(),
        stations = schedule.station_count(),
        routes = schedule.routes().count(),
        "Built schedule index"
    );

    let state = AppState::new(
        schedule,
        &CacheConfig::default(),
        SimulationConfig::default(),
    );
    info!(
        edges = state.adjacency.edge_count(),
        "Built station adjacency"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Transit server listening on http://{}", config.bind);
    info!("API Endpoints:");
    info!("  GET  /health                   - Health check");
    info!("  GET  /stations?q=              - Search stations");
    info!("  GET  /stations/:name/neighbors - One-hop neighbours");
    info!("  GET  /path?from=&to=           - Fewest-hop path");
    info!("  GET  /network                  - Route stop points");
    info!("  POST /simulate/arrivals        - Simulate bus arrivals");
    info!("  POST /simulate/waits           - Simulate passenger waits");

    axum::serve(listener, app).await?;
    Ok(())
}
