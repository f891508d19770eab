use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use shared::MapsConfig;

use crate::directions::DEFAULT_DIRECTIONS_URL;

/// Route planner backend: serves the map configuration and proxies
/// directions requests so the API key stays on the server.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Mapping service API key, shared with the browser map loader
    #[arg(long, env = "MAPS_API_KEY", hide_env_values = true)]
    pub maps_api_key: Option<String>,

    /// Directions web service endpoint
    #[arg(long, env = "DIRECTIONS_URL", default_value = DEFAULT_DIRECTIONS_URL)]
    pub directions_url: String,

    /// Timeout for a single upstream directions call, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,

    /// Number of directions results kept in memory (0 disables caching)
    #[arg(long, env = "DIRECTIONS_CACHE_SIZE", default_value_t = 128)]
    pub cache_size: usize,
}

impl Config {
    /// The configured key, with a blank value treated as missing.
    pub fn api_key(&self) -> Option<String> {
        self.maps_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn maps_config(&self) -> MapsConfig {
        MapsConfig {
            api_key: self.api_key(),
            libraries: vec!["places".to_string()],
        }
    }
}
