//! Worker configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use diamondline_reconciliation::config::ReconcileConfig;

use crate::error::AppError;

/// Runtime configuration for the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub host: String,
    pub port: u16,
    /// Root of the per-season catalog and feed files.
    pub data_dir: PathBuf,
    pub reconcile: ReconcileConfig,
}

impl WorkerConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or malformed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// `HOST` defaults to `0.0.0.0`, `PORT` to `3000` and
    /// `DIAMONDLINE_SEASON_START` (`MM-DD`) to `01-01`.
    /// `DIAMONDLINE_DATA_DIR` is required.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is missing or malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };
        let data_dir = lookup("DIAMONDLINE_DATA_DIR")
            .map(PathBuf::from)
            .ok_or_else(|| {
                AppError::Config("DIAMONDLINE_DATA_DIR environment variable must be set".into())
            })?;
        let reconcile = match lookup("DIAMONDLINE_SEASON_START") {
            Some(value) => parse_season_start(&value)?,
            None => ReconcileConfig::default(),
        };

        Ok(Self {
            host,
            port,
            data_dir,
            reconcile,
        })
    }

    /// Returns the address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if host and port do not form an address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_season_start(value: &str) -> Result<ReconcileConfig, AppError> {
    let invalid = || {
        AppError::Config(format!(
            "DIAMONDLINE_SEASON_START must be MM-DD, got {value:?}"
        ))
    };
    let (month, day) = value.split_once('-').ok_or_else(invalid)?;
    let config = ReconcileConfig {
        season_start_month: month.parse().map_err(|_| invalid())?,
        season_start_day: day.parse().map_err(|_| invalid())?,
    };
    // Must exist in every year, so Feb 29 is rejected.
    chrono::NaiveDate::from_ymd_opt(2023, config.season_start_month, config.season_start_day)
        .ok_or_else(invalid)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_applies_defaults() {
        let config = WorkerConfig::from_lookup(lookup(&[("DIAMONDLINE_DATA_DIR", "/data")])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.reconcile, ReconcileConfig::default());
        assert_eq!(config.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_from_lookup_requires_data_dir() {
        let result = WorkerConfig::from_lookup(lookup(&[]));

        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("DIAMONDLINE_DATA_DIR")));
    }

    #[test]
    fn test_from_lookup_parses_season_start() {
        // Arrange
        let vars = lookup(&[
            ("DIAMONDLINE_DATA_DIR", "/data"),
            ("DIAMONDLINE_SEASON_START", "03-28"),
            ("PORT", "8080"),
        ]);

        // Act
        let config = WorkerConfig::from_lookup(vars).unwrap();

        // Assert
        assert_eq!(config.port, 8080);
        assert_eq!(config.reconcile.season_start_month, 3);
        assert_eq!(config.reconcile.season_start_day, 28);
    }

    #[test]
    fn test_from_lookup_rejects_malformed_values() {
        for (key, value) in [
            ("PORT", "eighty"),
            ("DIAMONDLINE_SEASON_START", "March 28"),
            ("DIAMONDLINE_SEASON_START", "02-30"),
        ] {
            let result =
                WorkerConfig::from_lookup(lookup(&[("DIAMONDLINE_DATA_DIR", "/data"), (key, value)]));
            assert!(matches!(result, Err(AppError::Config(_))), "{key}={value}");
        }
    }
}
