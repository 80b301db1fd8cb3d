//! Environment-driven server configuration.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file.

use log::info;
use meerab_core::default_log_level;
use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_PAGES_DIR: &str = ".";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value `{value}`: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// `None` leaves the process running without a store.
    pub store_uri: Option<String>,
    pub public_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            port: parse_or("PORT", var("PORT"), DEFAULT_PORT)?,
            store_uri: var("MONGO_URI"),
            public_dir: var("PUBLIC_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR), PathBuf::from),
            pages_dir: var("PAGES_DIR")
                .map_or_else(|| PathBuf::from(DEFAULT_PAGES_DIR), PathBuf::from),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| default_log_level().to_string()),
            log_dir: var("LOG_DIR"),
        })
    }

    /// Logs resolved settings without echoing the connection string.
    pub fn log_summary(&self) {
        info!(
            "event=config_loaded module=config status=ok port={} store_uri_set={} public_dir={} pages_dir={}",
            self.port,
            self.store_uri.is_some(),
            self.public_dir.display(),
            self.pages_dir.display()
        );
    }
}

/// Loads `.env` from the working directory or a parent into the process
/// environment. Variables that are already set keep their values.
///
/// Returns `Ok(None)` when no file exists.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(err) => Err(ConfigError::InvalidValue {
                key,
                reason: err.to_string(),
                value,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.store_uri, None);
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert_eq!(config.pages_dir, PathBuf::from("."));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("MONGO_URI", "sqlite://data/meerab.db"),
            ("PUBLIC_DIR", "/srv/public"),
            ("LOG_LEVEL", "warn"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_uri.as_deref(), Some("sqlite://data/meerab.db"));
        assert_eq!(config.public_dir, PathBuf::from("/srv/public"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn blank_store_uri_counts_as_missing() {
        let config = config_from(&[("MONGO_URI", "   ")]).unwrap();
        assert_eq!(config.store_uri, None);
    }

    #[test]
    fn dotenv_file_populates_config() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(
            &env_file,
            "MONGO_URI=sqlite://from-dotenv.db\nPUBLIC_DIR=/srv/from-dotenv\n",
        )
        .unwrap();

        dotenvy::from_path(&env_file).unwrap();
        let config = Config::load().unwrap();
        assert_eq!(config.store_uri.as_deref(), Some("sqlite://from-dotenv.db"));
        assert_eq!(config.public_dir, PathBuf::from("/srv/from-dotenv"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }
}
