//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::InvalidId;
use crate::schedule::RouteFilter;

/// Directory holding the three timetable tables.
pub const DATA_DIR_VAR: &str = "TRANSIT_DATA_DIR";
/// Comma-separated, ordered route list.
pub const ROUTES_VAR: &str = "TRANSIT_ROUTES";
/// Socket address to listen on.
pub const BIND_VAR: &str = "TRANSIT_BIND";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_ROUTES: &str = "30,41,43,44,105,120,150,201,202,235";
const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    InvalidRoutes {
        var: &'static str,
        #[source]
        source: InvalidId,
    },

    #[error("{var}: invalid socket address {value:?}")]
    InvalidBind { var: &'static str, value: String },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory containing stations.csv, routes.csv and schedule.csv
    pub data_dir: PathBuf,
    /// Routes kept in the schedule index, in display order
    pub routes: RouteFilter,
    /// Listen address
    pub bind: SocketAddr,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset or blank variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str, default: &str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let data_dir = PathBuf::from(get(DATA_DIR_VAR, DEFAULT_DATA_DIR));

        let routes = RouteFilter::parse_list(&get(ROUTES_VAR, DEFAULT_ROUTES)).map_err(
            |source| ConfigError::InvalidRoutes {
                var: ROUTES_VAR,
                source,
            },
        )?;

        let bind_value = get(BIND_VAR, DEFAULT_BIND);
        let bind = bind_value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBind {
                var: BIND_VAR,
                value: bind_value.clone(),
            })?;

        Ok(Self {
            data_dir,
            routes,
            bind,
        })
    }
}
