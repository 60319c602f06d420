//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `sqlite::memory:` |
//! | `BIND_ADDR` | `0.0.0.0:3000` |
//! | `SEED_SAMPLE_DATA` | `false` |

use std::{env, fmt, net::SocketAddr};

pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Insert the two sample teams and a hundred members at startup.
    pub seed_sample_data: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBindAddr(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBindAddr(value) => write!(f, "BIND_ADDR '{value}' is not a socket address"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// # Errors
    ///
    /// `ConfigError::InvalidBindAddr` when `BIND_ADDR` does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;
        let seed_sample_data = lookup("SEED_SAMPLE_DATA").is_some_and(|value| {
            matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        });

        Ok(Self {
            database_url,
            bind_addr,
            seed_sample_data,
        })
    }
}
