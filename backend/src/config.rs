//! Server settings read from `LIBRARY_*` environment variables.

use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:library.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Insert the sample authors and books when the database is empty
    pub seed_sample_data: bool,
}

impl ServerConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("LIBRARY_DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup("LIBRARY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("LIBRARY_BIND_ADDR is not a socket address: {}", bind_addr))?;

        let seed_sample_data = match lookup("LIBRARY_SEED_SAMPLE_DATA") {
            None => true,
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("LIBRARY_SEED_SAMPLE_DATA must be true or false, got {}", raw))?,
        };

        Ok(Self {
            database_url,
            bind_addr,
            seed_sample_data,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            seed_sample_data: true,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]).unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("LIBRARY_DATABASE_URL", "sqlite::memory:"),
            ("LIBRARY_BIND_ADDR", "0.0.0.0:8080"),
            ("LIBRARY_SEED_SAMPLE_DATA", "off"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("LIBRARY_BIND_ADDR", "nowhere")]).is_err());
        assert!(config_from(&[("LIBRARY_SEED_SAMPLE_DATA", "maybe")]).is_err());
    }
}
