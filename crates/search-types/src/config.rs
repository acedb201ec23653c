//! Search configuration.
//!
//! Uses Figment to merge built-in defaults, `dine-search.toml` and
//! `DINE_SEARCH_*` environment variables, in that order. Each component
//! receives the values it needs at construction time; nothing reads the
//! environment afterwards.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Most bound parameters a structured query may carry
    pub max_parameters: usize,
    /// Most WHERE clauses a structured query may carry
    pub max_filters: usize,
    /// Longest summary, in characters
    pub summary_max_chars: usize,
    /// Budget for one call to the understanding service
    pub understanding_timeout_ms: u64,
    /// LIMIT applied to every structured query
    pub result_limit: usize,
    /// Facet candidates below this confidence are dropped
    pub min_confidence: f32,
    /// gRPC address of the understanding service; lexicon-only parsing when unset
    pub understanding_addr: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_parameters: 12,
            max_filters: 8,
            summary_max_chars: 280,
            understanding_timeout_ms: 2000,
            result_limit: 20,
            min_confidence: 0.5,
            understanding_addr: None,
        }
    }
}

impl SearchConfig {
    pub const FILE_NAME: &'static str = "dine-search.toml";
    pub const ENV_PREFIX: &'static str = "DINE_SEARCH_";

    /// Load from `dine-search.toml` in the working directory plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Load from an explicit file path plus the environment.
    ///
    /// A missing file is not an error; defaults and env vars still apply.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: SearchConfig = Self::figment(path).extract()?;
        config.validate()?;
        debug!(?config, path = %path.display(), "Loaded search configuration");
        Ok(config)
    }

    /// The provider stack used by `load_from`
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(SearchConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_parameters", self.max_parameters),
            ("max_filters", self.max_filters),
            ("summary_max_chars", self.summary_max_chars),
            ("result_limit", self.result_limit),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".into(),
                });
            }
        }
        if self.understanding_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "understanding_timeout_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::Invalid {
                field: "min_confidence",
                reason: format!("{} is outside 0..=1", self.min_confidence),
            });
        }
        Ok(())
    }

    pub fn understanding_timeout(&self) -> Duration {
        Duration::from_millis(self.understanding_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_are_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.understanding_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                SearchConfig::FILE_NAME,
                r#"
                    max_parameters = 6
                    summary_max_chars = 120
                "#,
            )?;
            jail.set_env("DINE_SEARCH_SUMMARY_MAX_CHARS", "90");

            let config = SearchConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.max_parameters, 6);
            // env wins over the file
            assert_eq!(config.summary_max_chars, 90);
            // untouched keys keep their defaults
            assert_eq!(config.result_limit, 20);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = SearchConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config, SearchConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_rejects_zero_caps() {
        let config = SearchConfig { max_parameters: 0, ..SearchConfig::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_parameters"));
    }

    #[test]
    fn test_rejects_confidence_out_of_range() {
        let config = SearchConfig { min_confidence: 1.5, ..SearchConfig::default() };
        assert!(config.validate().is_err());
    }
}
