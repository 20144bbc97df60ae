//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Data ===
    /// Directory whose JSON files become endpoints.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Path prefix for every data route (e.g. "/api"). Empty for none.
    #[serde(default)]
    pub route_prefix: String,

    // === Server Configuration ===
    /// Address to bind.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Expose Prometheus metrics on /metrics.
    #[serde(default = "default_true")]
    pub enable_metrics: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_bind_address() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            route_prefix: String::new(),
            bind_address: default_bind_address(),
            port: default_port(),
            enable_metrics: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err("DATA_DIR is required".to_string());
        }

        if !self.route_prefix.is_empty() {
            if !self.route_prefix.starts_with('/') {
                return Err("ROUTE_PREFIX must start with /".to_string());
            }
            if self.route_prefix.ends_with('/') {
                return Err("ROUTE_PREFIX must not end with /".to_string());
            }
        }

        Ok(())
    }

    /// Socket address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}
