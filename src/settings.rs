//! Process settings read from environment variables (after `.env` is loaded).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/college";

/// Which `CollegeStore` implementation the server runs against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mock" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// `APP_ENV=development` exposes internal error messages in 500 responses.
    pub development: bool,
    pub backend: StoreBackend,
    /// Seed the memory store with the demo data set.
    pub seed_demo_data: bool,
    pub max_connections: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.into(),
            host: "0.0.0.0".into(),
            port: 3000,
            development: false,
            backend: StoreBackend::Postgres,
            seed_demo_data: false,
            max_connections: 5,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Settings::default();
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            s.database_url = url;
        }
        if let Some(host) = lookup("HOST").filter(|v| !v.trim().is_empty()) {
            s.host = host;
        }
        if let Some(port) = lookup("PORT") {
            s.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(env) = lookup("APP_ENV") {
            s.development = env.trim().eq_ignore_ascii_case("development");
        }
        if let Some(backend) = lookup("STORE_BACKEND") {
            s.backend = backend.parse()?;
        }
        if let Some(seed) = lookup("SEED_DEMO_DATA") {
            s.seed_demo_data = parse_flag("SEED_DEMO_DATA", &seed)?;
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            s.max_connections = max
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: "DB_MAX_CONNECTIONS",
                    value: max.clone(),
                })?;
        }
        Ok(s)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidValue { key: "HOST", value: raw })
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.port, 3000);
        assert_eq!(s.backend, StoreBackend::Postgres);
        assert!(!s.development);
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            ("PORT", "8080"),
            ("APP_ENV", "Development"),
            ("STORE_BACKEND", "memory"),
            ("SEED_DEMO_DATA", "true"),
            ("DB_MAX_CONNECTIONS", "12"),
        ])
        .unwrap();
        assert_eq!(s.port, 8080);
        assert!(s.development);
        assert_eq!(s.backend, StoreBackend::Memory);
        assert!(s.seed_demo_data);
        assert_eq!(s.max_connections, 12);
        assert_eq!(s.bind_addr().unwrap().port(), 8080);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(settings(&[("PORT", "eighty")]).is_err());
        assert!(settings(&[("STORE_BACKEND", "sqlite")]).is_err());
        assert!(settings(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(settings(&[("SEED_DEMO_DATA", "maybe")]).is_err());
    }
}
