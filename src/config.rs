//! Runtime configuration read from the environment once at startup.

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address to bind; defaults to loopback since the tracker is single-user.
    pub host: IpAddr,
    pub port: u16,
    /// Directory holding the three JSON records.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl Config {
    /// Reads `HOST`, `PORT` and `APP_DATA_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Malformed values are logged and replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = match lookup("HOST") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring invalid HOST");
                defaults.host
            }),
            None => defaults.host,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring invalid PORT");
                defaults.port
            }),
            None => defaults.port,
        };

        let data_dir = lookup("APP_DATA_DIR")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Self {
            host,
            port,
            data_dir,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Log filter built from `RUST_LOG` directives, or `info` when they are unset,
/// blank or malformed.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
