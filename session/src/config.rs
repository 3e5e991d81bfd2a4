//! Configuration loading.

use std::fs;
use std::path::Path;

use mend_transaction::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> SessionResult<Self> {
        toml::from_str(contents)
            .map_err(|e| SessionError::config(format!("failed to parse config: {e}")))
    }

    /// Load from `path`, then apply environment overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> SessionResult<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| {
                SessionError::config(format!("failed to read {}: {e}", path.display()))
            })?;
            Self::from_toml_str(&contents)?
        } else {
            Self::default()
        };
        apply_env_overrides(&mut config);
        Ok(config)
    }

    /// Like `load`, but falls back to defaults on a broken file.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("config load failed, using defaults: {e}");
                let mut config = Self::default();
                apply_env_overrides(&mut config);
                config
            }
        }
    }

    pub fn to_toml_string(&self) -> SessionResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SessionError::config(format!("failed to render config: {e}")))
    }
}

/// Apply `MEND_*` variables from the process environment.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`. Invalid values are logged and ignored.
pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(raw) = lookup("MEND_VERIFY_COMPENSATIONS") {
        match parse_bool(raw.trim()) {
            Some(value) => config.engine.verify_compensations = value,
            None => tracing::warn!("invalid MEND_VERIFY_COMPENSATIONS, ignoring: {raw}"),
        }
    }

    if let Some(raw) = lookup("MEND_MAX_PLAN_STEPS") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            match trimmed.parse::<usize>() {
                Ok(0) => tracing::warn!("MEND_MAX_PLAN_STEPS must be positive, ignoring"),
                Ok(value) => config.engine.max_plan_steps = value,
                Err(err) => tracing::warn!("invalid MEND_MAX_PLAN_STEPS, ignoring: {err}"),
            }
        }
    }

    if let Some(raw) = lookup("MEND_LOG") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.logging.filter = trimmed.to_string();
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
