//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Duration;
use tracing::{debug, warn};

use crate::domain::{ClockTime, TimeError};
use crate::planner::PathError;
use crate::simulation::{
    ArrivalSimulator, SimulationError, Summary, WaitTimeSimulator, histogram, intervals,
    passenger_count, wait_block,
};

use super::dto::*;
use super::state::AppState;

/// Bins in the interval and wait-time histograms.
const HISTOGRAM_BINS: usize = 30;

/// Largest passenger count one request may simulate.
const MAX_PASSENGERS: usize = 100_000;

/// Block length when only `block_start` is given.
const DEFAULT_BLOCK_MINUTES: i64 = 60;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(search_stations))
        .route("/stations/:name/neighbors", get(station_neighbors))
        .route("/path", get(find_path))
        .route("/network", get(network))
        .route("/simulate/arrivals", post(simulate_arrivals))
        .route("/simulate/waits", post(simulate_waits))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search stations by name.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);

    let stations = state
        .schedule
        .search_stations(&req.q, limit)
        .into_iter()
        .map(|name| {
            let coords = state.schedule.station_coordinates(name);
            StationResult {
                name: name.to_string(),
                lat: coords.map(|c| c.lat),
                lon: coords.map(|c| c.lon),
            }
        })
        .collect();

    Json(StationSearchResponse { stations })
}

/// Stations reachable in one hop.
async fn station_neighbors(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Result<Json<NeighborsResponse>, AppError> {
    if !state.schedule.contains_station(&name) {
        return Err(PathError::StationNotFound(vec![name]).into());
    }

    let neighbors = state
        .adjacency
        .neighbors_of(&name)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();

    Ok(Json(NeighborsResponse {
        station: name,
        neighbors,
    }))
}

/// Fewest-hop path between two stations.
async fn find_path(
    State(state): State<AppState>,
    Query(req): Query<PathRequest>,
) -> Result<Json<PathResponse>, AppError> {
    let entry = state.paths.find_path(&req.from, &req.to).await;

    match entry.as_ref() {
        Ok(path) => Ok(Json(PathResponse {
            hops: path.hops(),
            stops: path.clone(),
        })),
        Err(e) => Err(e.clone().into()),
    }
}

/// Stop points of every route, for drawing the network.
async fn network(State(state): State<AppState>) -> Json<NetworkResponse> {
    let routes = state
        .schedule
        .routes()
        .map(|route| {
            let stops = state
                .schedule
                .route_rows(route)
                .iter()
                .filter_map(|row| {
                    let coords = row.coordinates()?;
                    Some(NetworkStop {
                        trip_id: row.trip_id.to_string(),
                        stop_sequence: row.stop_sequence,
                        stop_name: row.stop_name.clone()?,
                        stop_lat: coords.lat,
                        stop_lon: coords.lon,
                    })
                })
                .collect();
            RouteLine {
                route_id: route.to_string(),
                stops,
            }
        })
        .collect();

    Json(NetworkResponse { routes })
}

/// Simulate one day of bus arrivals.
async fn simulate_arrivals(
    State(state): State<AppState>,
    Json(req): Json<SimulateArrivalsRequest>,
) -> Result<Json<SimulateArrivalsResponse>, AppError> {
    let tau = req.tau.unwrap_or(state.simulation.default_tau);
    let seed = req.seed.unwrap_or(state.simulation.default_seed);

    let simulator = ArrivalSimulator::new(state.simulation.as_ref().clone());
    let arrivals = simulator.simulate(tau, seed)?;

    let column = intervals(&arrivals);
    debug!(tau, seed, buses = arrivals.len(), "Arrival simulation request");

    Ok(Json(SimulateArrivalsResponse {
        tau,
        seed,
        intervals: Summary::of(&column),
        histogram: histogram(&column, HISTOGRAM_BINS),
        arrivals,
    }))
}

/// Simulate a bus schedule and the passengers waiting for it.
async fn simulate_waits(
    State(state): State<AppState>,
    Json(req): Json<SimulateWaitsRequest>,
) -> Result<Json<SimulateWaitsResponse>, AppError> {
    let tau = req.tau.unwrap_or(state.simulation.default_tau);
    let seed = req.seed.unwrap_or(state.simulation.default_seed);
    let passengers = match req.passengers {
        Some(n) => passenger_count(n)?,
        None => state.simulation.default_passengers,
    };
    if passengers > MAX_PASSENGERS {
        return Err(AppError::BadRequest {
            message: format!("passengers must be at most {MAX_PASSENGERS}, got {passengers}"),
        });
    }
    let block = parse_block(req.block_start.as_deref(), req.block_minutes)?;

    let simulator = WaitTimeSimulator::new(state.simulation.as_ref().clone());
    let (arrivals, outcome) = simulator.simulate(tau, passengers, seed)?;

    let waits = outcome.wait_times();
    let records = match block {
        Some((start, length)) => wait_block(&outcome.records, start, length),
        None => outcome.records,
    };
    debug!(
        tau,
        seed,
        passengers,
        dropped = outcome.dropped,
        "Wait simulation request"
    );

    Ok(Json(SimulateWaitsResponse {
        tau,
        seed,
        passengers,
        buses: arrivals.len(),
        records,
        dropped: outcome.dropped,
        waits: Summary::of(&waits),
        histogram: histogram(&waits, HISTOGRAM_BINS),
    }))
}

/// Parse the optional time block a wait table is restricted to.
fn parse_block(
    start: Option<&str>,
    minutes: Option<i64>,
) -> Result<Option<(ClockTime, Duration)>, AppError> {
    let Some(start) = start else {
        return Ok(None);
    };
    let start = ClockTime::parse_hhmmss(start)?;

    let minutes = minutes.unwrap_or(DEFAULT_BLOCK_MINUTES);
    let length = Duration::try_minutes(minutes)
        .filter(|d| *d >= Duration::zero())
        .ok_or_else(|| AppError::BadRequest {
            message: format!("block_minutes must be a non-negative minute count, got {minutes}"),
        })?;

    Ok(Some((start, length)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<PathError> for AppError {
    fn from(e: PathError) -> Self {
        AppError::NotFound {
            message: e.to_string(),
        }
    }
}

impl From<SimulationError> for AppError {
    fn from(e: SimulationError) -> Self {
        match e {
            SimulationError::InvalidParameter(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            SimulationError::Time(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<TimeError> for AppError {
    fn from(e: TimeError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::schedule::test_support::schedule_from_trips;
    use crate::simulation::SimulationConfig;

    fn state() -> AppState {
        let schedule = schedule_from_trips(&[
            ("T1", "30", &["Alpha", "Beta", "Gamma"]),
            ("T2", "30", &["Beta", "Delta"]),
            ("T3", "41", &["Epsilon", "Alphabet"]),
        ]);
        AppState::new(
            schedule,
            &CacheConfig::default(),
            SimulationConfig::default(),
        )
    }

    fn status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[tokio::test]
    async fn health_check() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn station_search_caps_limit() {
        let Json(resp) = search_stations(
            State(state()),
            Query(StationSearchRequest {
                q: "alpha".into(),
                limit: Some(500),
            }),
        )
        .await;

        let names: Vec<_> = resp.stations.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Alphabet"]);
        assert!(resp.stations[0].lat.is_some());
    }

    #[tokio::test]
    async fn neighbors_of_known_station() {
        let Json(resp) = station_neighbors(State(state()), UrlPath("Beta".into()))
            .await
            .unwrap();
        assert_eq!(resp.neighbors, vec!["Delta", "Gamma"]);
    }

    #[tokio::test]
    async fn neighbors_of_terminus_is_empty() {
        let Json(resp) = station_neighbors(State(state()), UrlPath("Gamma".into()))
            .await
            .unwrap();
        assert!(resp.neighbors.is_empty());
    }

    #[tokio::test]
    async fn neighbors_of_unknown_station_is_404() {
        let err = station_neighbors(State(state()), UrlPath("Nowhere".into()))
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn path_found() {
        let Json(resp) = find_path(
            State(state()),
            Query(PathRequest {
                from: "Alpha".into(),
                to: "Delta".into(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(resp.hops, 2);
        assert_eq!(resp.stops.station_names(), vec!["Alpha", "Beta", "Delta"]);
    }

    #[tokio::test]
    async fn path_errors_are_404() {
        let state = state();
        for (from, to) in [("Alpha", "Epsilon"), ("Alpha", "Nowhere")] {
            let err = find_path(
                State(state.clone()),
                Query(PathRequest {
                    from: from.into(),
                    to: to.into(),
                }),
            )
            .await
            .unwrap_err();
            assert_eq!(status(err), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn network_in_route_order() {
        let Json(resp) = network(State(state())).await;
        let routes: Vec<_> = resp.routes.iter().map(|r| r.route_id.as_str()).collect();
        assert_eq!(routes, vec!["30", "41"]);
        assert_eq!(resp.routes[0].stops.len(), 5);
    }

    #[tokio::test]
    async fn arrivals_use_defaults() {
        let Json(resp) = simulate_arrivals(State(state()), Json(SimulateArrivalsRequest::default()))
            .await
            .unwrap();

        assert_eq!(resp.tau, 10.0);
        assert_eq!(resp.seed, 12);
        assert_eq!(resp.arrivals.len(), 108);
        assert_eq!(resp.intervals.unwrap().count, 108);
        let binned: usize = resp.histogram.iter().map(|b| b.count).sum();
        assert_eq!(binned, 108);
    }

    #[tokio::test]
    async fn arrivals_reject_bad_tau() {
        let state = state();
        for tau in [0.0, 1e-300, 1e-6, 5000.0] {
            let err = simulate_arrivals(
                State(state.clone()),
                Json(SimulateArrivalsRequest {
                    tau: Some(tau),
                    seed: None,
                }),
            )
            .await
            .unwrap_err();
            assert_eq!(status(err), StatusCode::BAD_REQUEST, "tau {tau}");
        }
    }

    #[tokio::test]
    async fn waits_account_for_every_passenger() {
        let Json(resp) = simulate_waits(
            State(state()),
            Json(SimulateWaitsRequest {
                tau: Some(15.0),
                seed: Some(3),
                passengers: Some(250),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        assert_eq!(resp.buses, 72);
        assert_eq!(resp.records.len() + resp.dropped, 250);
        assert!(resp.records.iter().all(|r| r.wait >= 0.0));
    }

    #[tokio::test]
    async fn waits_block_restricts_table() {
        let Json(resp) = simulate_waits(
            State(state()),
            Json(SimulateWaitsRequest {
                passengers: Some(500),
                block_start: Some("13:00:00".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let start = ClockTime::parse_hhmmss("13:00:00").unwrap();
        let end = ClockTime::parse_hhmmss("14:00:00").unwrap();
        assert!(
            resp.records
                .iter()
                .all(|r| r.passenger_arrival >= start && r.passenger_arrival <= end)
        );
        assert!(resp.records.len() < resp.waits.unwrap().count);
    }

    #[tokio::test]
    async fn waits_reject_bad_input() {
        let state = state();
        let requests = [
            SimulateWaitsRequest {
                passengers: Some(-1),
                ..Default::default()
            },
            SimulateWaitsRequest {
                passengers: Some(1_000_000),
                ..Default::default()
            },
            SimulateWaitsRequest {
                tau: Some(1e-300),
                ..Default::default()
            },
            SimulateWaitsRequest {
                tau: Some(5000.0),
                ..Default::default()
            },
            SimulateWaitsRequest {
                block_start: Some("1pm".into()),
                ..Default::default()
            },
            SimulateWaitsRequest {
                block_start: Some("13:00:00".into()),
                block_minutes: Some(-5),
                ..Default::default()
            },
        ];
        for req in requests {
            let err = simulate_waits(State(state.clone()), Json(req))
                .await
                .unwrap_err();
            assert_eq!(status(err), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn error_mapping() {
        let missing: AppError = PathError::StationNotFound(vec!["X".into()]).into();
        assert!(matches!(missing, AppError::NotFound { .. }));

        let invalid: AppError = SimulationError::InvalidParameter("tau".into()).into();
        assert!(matches!(invalid, AppError::BadRequest { .. }));

        let bad_block: AppError = ClockTime::parse_hhmmss("25:00:00").unwrap_err().into();
        assert!(matches!(bad_block, AppError::BadRequest { .. }));

        let out_of_day = ClockTime::from_minutes(-1.0).unwrap_err();
        let internal: AppError = SimulationError::Time(out_of_day).into();
        assert_eq!(status(internal), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
