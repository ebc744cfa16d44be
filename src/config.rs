use std::env;
use std::path::PathBuf;

use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_MODEL_DIR: &str = "models";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_PARALLELISM: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct ForecastConfig {
    pub model_dir: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
    pub parallelism: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Pretty,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl ForecastConfig {
    /// Reads `MODEL_DIR`, `LOG_LEVEL`, `LOG_FORMAT` and `PREDICT_PARALLELISM`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let model_dir = lookup("MODEL_DIR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.model_dir);
        let log_level = lookup("LOG_LEVEL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.log_level);
        let log_format = match lookup("LOG_FORMAT")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        let parallelism = lookup("PREDICT_PARALLELISM")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.parallelism)
            .clamp(1, 32);
        Self {
            model_dir,
            log_level,
            log_format,
            parallelism,
        }
    }

    /// `RUST_LOG` wins over the configured level when set. Returns false when
    /// a global subscriber was already installed; that one stays in place.
    pub fn init_logging(&self) -> bool {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
        let installed = match self.log_format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Pretty => builder.try_init(),
        };
        match installed {
            Ok(()) => true,
            Err(err) => {
                debug!(error = %err, "logging already initialised, keeping existing subscriber");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ForecastConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ForecastConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.model_dir, PathBuf::from("models"));
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.parallelism, 4);
    }

    #[test]
    fn values_are_parsed_and_clamped() {
        let cfg = config_from(&[
            ("MODEL_DIR", " /srv/models "),
            ("LOG_FORMAT", "JSON"),
            ("PREDICT_PARALLELISM", "500"),
        ]);
        assert_eq!(cfg.model_dir, PathBuf::from("/srv/models"));
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.parallelism, 32);
    }

    #[test]
    fn second_logging_init_keeps_the_first_subscriber() {
        let cfg = config_from(&[("LOG_LEVEL", "warn")]);
        cfg.init_logging();
        assert!(!cfg.init_logging());
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let cfg = config_from(&[("PREDICT_PARALLELISM", "many"), ("MODEL_DIR", "  ")]);
        assert_eq!(cfg.parallelism, 4);
        assert_eq!(cfg.model_dir, PathBuf::from("models"));
    }
}
