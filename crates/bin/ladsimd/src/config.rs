//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `ladsim.toml` in the working directory, or the file named by
//! `LADSIM_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use ladsim_adapter_virtual::{DeviceDefinition, VirtualNodeset};
use ladsim_app::services::synthesis::DEFAULT_AMPLITUDE;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Simulation loop settings.
    pub simulation: SimulationConfig,
    /// Historian settings.
    pub history: HistoryConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Devices instantiated in the nodeset, in order.
    pub devices: Vec<DeviceDefinition>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Simulation loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Milliseconds between two rounds.
    pub period_ms: u64,
    /// Milliseconds a single device tick may take before it is abandoned.
    pub tick_timeout_ms: u64,
    /// Bound of the random perturbation, drawn from `[-amplitude, amplitude)`.
    pub amplitude: f64,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
}

/// Where recorded values are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryBackend {
    Memory,
    Sqlite,
}

/// Historian configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub backend: HistoryBackend,
    /// `SQLite` connection URL, used by the `sqlite` backend.
    pub database_url: String,
    /// Per-series cap of the `memory` backend; oldest records are evicted.
    pub max_records_per_series: Option<usize>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `ladsim.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("LADSIM_CONFIG").unwrap_or_else(|_| "ladsim.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides looked up through `var`, so tests never touch the
    /// process environment. Unparsable numbers are ignored; an unknown
    /// history backend is an error.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(val) = var("LADSIM_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("LADSIM_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("LADSIM_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("LADSIM_HISTORY_BACKEND") {
            self.history.backend = match val.as_str() {
                "memory" => HistoryBackend::Memory,
                "sqlite" => HistoryBackend::Sqlite,
                other => {
                    return Err(ConfigError::Validation(format!(
                        "unknown history backend: {other}"
                    )));
                }
            };
        }
        if let Some(val) = var("LADSIM_DATABASE_URL") {
            self.history.database_url = val;
        }
        if let Some(period) = var("LADSIM_PERIOD_MS").and_then(|val| val.parse().ok()) {
            self.simulation.period_ms = period;
        }
        if let Some(val) = var("LADSIM_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Validation(msg.to_string()));
        if self.server.port == 0 {
            return invalid("port must be non-zero");
        }
        if self.simulation.period_ms == 0 {
            return invalid("simulation period must be non-zero");
        }
        if self.simulation.tick_timeout_ms == 0
            || self.simulation.tick_timeout_ms > self.simulation.period_ms
        {
            return invalid("tick timeout must be non-zero and at most one period");
        }
        if !self.simulation.amplitude.is_finite() || self.simulation.amplitude < 0.0 {
            return invalid("amplitude must be a finite, non-negative number");
        }
        if self.history.max_records_per_series == Some(0) {
            return invalid("max_records_per_series must be non-zero");
        }
        if self.history.backend == HistoryBackend::Sqlite && self.history.database_url.is_empty() {
            return invalid("sqlite backend requires a database_url");
        }
        if self.devices.is_empty() {
            return invalid("at least one device must be configured");
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.simulation.period_ms)
    }

    #[must_use]
    pub fn tick_timeout(&self) -> Duration {
        Duration::from_millis(self.simulation.tick_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            simulation: SimulationConfig::default(),
            history: HistoryConfig::default(),
            logging: LoggingConfig::default(),
            devices: VirtualNodeset::default().devices().to_vec(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            period_ms: 1_000,
            tick_timeout_ms: 500,
            amplitude: DEFAULT_AMPLITUDE,
            seed: None,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: HistoryBackend::Memory,
            database_url: "sqlite:ladsim.db?mode=rwc".to_string(),
            max_records_per_series: Some(3_600),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ladsimd=info,ladsim=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use ladsim_adapter_virtual::DeviceKind;

    fn overridden(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).cloned())?;
        Ok(config)
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.period(), Duration::from_secs(1));
        assert_eq!(config.tick_timeout(), Duration::from_millis(500));
        assert_eq!(config.history.backend, HistoryBackend::Memory);
        assert_eq!(config.history.database_url, "sqlite:ladsim.db?mode=rwc");
        assert_eq!(config.devices.len(), 2);
        assert_eq!(config.devices[0].kind, DeviceKind::AbsorbanceReader);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.simulation.period_ms, 1_000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [simulation]
            period_ms = 250
            tick_timeout_ms = 100
            amplitude = 0.1
            seed = 42

            [history]
            backend = 'sqlite'
            database_url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [[devices]]
            name = 'Reader'
            kind = 'absorbance_reader'
            serial_number = 'X-1'

            [[devices]]
            name = 'Bath'
            kind = 'thermostat'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.period(), Duration::from_millis(250));
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.history.backend, HistoryBackend::Sqlite);
        assert_eq!(config.history.database_url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(
            config.devices,
            vec![
                DeviceDefinition::absorbance_reader("Reader").with_serial_number("X-1"),
                DeviceDefinition::thermostat("Bath"),
            ]
        );
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [simulation]
            seed = 7
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.tick_timeout_ms, 500);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.devices.len(), 2);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("[history]\nbackend = 'postgres'");
        assert!(result.is_err());
    }

    #[test]
    fn should_apply_env_overrides() {
        let config = overridden(&[
            ("LADSIM_BIND", "127.0.0.1:8080"),
            ("LADSIM_HISTORY_BACKEND", "sqlite"),
            ("LADSIM_DATABASE_URL", "sqlite::memory:"),
            ("LADSIM_PERIOD_MS", "2000"),
            ("LADSIM_LOG", "warn"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.history.backend, HistoryBackend::Sqlite);
        assert_eq!(config.history.database_url, "sqlite::memory:");
        assert_eq!(config.period(), Duration::from_secs(2));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_prefer_rust_log_over_ladsim_log() {
        let config = overridden(&[("LADSIM_LOG", "warn"), ("RUST_LOG", "trace")]).unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_numeric_overrides() {
        let config = overridden(&[("LADSIM_PORT", "http"), ("LADSIM_PERIOD_MS", "-1")]).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.simulation.period_ms, 1_000);
    }

    #[test]
    fn should_reject_unknown_backend_override() {
        let result = overridden(&[("LADSIM_HISTORY_BACKEND", "postgres")]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_tick_timeout_longer_than_period() {
        let mut config = Config::default();
        config.simulation.tick_timeout_ms = 1_500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_negative_amplitude() {
        let mut config = Config::default();
        config.simulation.amplitude = -0.1;
        assert!(config.validate().is_err());
        config.simulation.amplitude = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_device_list() {
        let mut config = Config::default();
        config.devices.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }
}
