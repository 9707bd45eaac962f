//! Studio configuration.

use crate::generator::GeneratorConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A configuration value that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value '{value}' for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: &'static str,
}

/// Configuration for a studio session.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Model to use for generation.
    pub model: Option<String>,

    /// Maximum tokens for generated content.
    pub max_tokens: usize,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Upper bound on a single generation call.
    pub timeout: Duration,

    /// Directory exports are written to.
    pub export_dir: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 4096,
            temperature: Some(0.8),
            timeout: Duration::from_secs(120),
            export_dir: PathBuf::from("."),
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `NEXUS_*` environment variables.
    ///
    /// Reads `NEXUS_MODEL`, `NEXUS_MAX_TOKENS`, `NEXUS_TEMPERATURE`,
    /// `NEXUS_TIMEOUT_SECS` and `NEXUS_EXPORT_DIR`. Unset or empty variables
    /// keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`StudioConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(model) = get("NEXUS_MODEL") {
            config.model = Some(model);
        }
        if let Some(raw) = get("NEXUS_MAX_TOKENS") {
            config.max_tokens = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid("NEXUS_MAX_TOKENS", raw, "expected a positive integer")),
            };
        }
        if let Some(raw) = get("NEXUS_TEMPERATURE") {
            config.temperature = match raw.trim().parse::<f32>() {
                Ok(t) if (0.0..=1.0).contains(&t) => Some(t),
                _ => return Err(invalid("NEXUS_TEMPERATURE", raw, "expected a number between 0 and 1")),
            };
        }
        if let Some(raw) = get("NEXUS_TIMEOUT_SECS") {
            config.timeout = match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(invalid("NEXUS_TIMEOUT_SECS", raw, "expected a positive number of seconds")),
            };
        }
        if let Some(dir) = get("NEXUS_EXPORT_DIR") {
            config.export_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set max tokens for generated content.
    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    /// Set temperature for generation.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }
}

fn invalid(var: &'static str, value: String, reason: &'static str) -> ConfigError {
    ConfigError { var, value, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_builder() {
        let config = StudioConfig::new()
            .with_model("claude-haiku")
            .with_max_tokens(2048)
            .with_timeout(Duration::from_secs(30))
            .with_export_dir("out");

        assert_eq!(config.model.as_deref(), Some("claude-haiku"));
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.generator_config().timeout, Duration::from_secs(30));
        assert_eq!(config.export_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_from_lookup_overrides_defaults() {
        let config = StudioConfig::from_lookup(lookup(&[
            ("NEXUS_MODEL", "claude-opus"),
            ("NEXUS_TIMEOUT_SECS", "45"),
            ("NEXUS_TEMPERATURE", "0.3"),
            ("NEXUS_EXPORT_DIR", ""),
        ]))
        .unwrap();

        assert_eq!(config.model.as_deref(), Some("claude-opus"));
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_from_lookup_rejects_bad_numbers() {
        let err = StudioConfig::from_lookup(lookup(&[("NEXUS_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(err.var, "NEXUS_TIMEOUT_SECS");

        let err = StudioConfig::from_lookup(lookup(&[("NEXUS_TEMPERATURE", "1.5")])).unwrap_err();
        assert_eq!(err.var, "NEXUS_TEMPERATURE");
    }
}
