//! Client configuration.
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `CATALOG_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_domain::{HeaderRule, HeaderRules, QueryPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "CATALOG_CONFIG";

/// Prefix of configuration environment variables, e.g. `CATALOG_BASE_URL`.
pub const ENV_PREFIX: &str = "CATALOG";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings of the catalog admin client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the product service API.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Whether a sort change goes back to page 1.
    pub reset_page_on_sort: bool,
    /// Largest import file accepted, in bytes.
    pub max_import_bytes: u64,
    /// Extra header rules, tried after the built-in ones.
    pub header_synonyms: Vec<HeaderRule>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_ms: 10_000,
            user_agent: format!("catalog-admin/{}", env!("CARGO_PKG_VERSION")),
            reset_page_on_sort: false,
            max_import_bytes: 10 * 1024 * 1024,
            header_synonyms: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the default file location and the
    /// process environment.
    ///
    /// The file is `$CATALOG_CONFIG` when set, otherwise
    /// `<config dir>/catalog-admin/config.toml`; a missing default file is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::load_from(Some(Path::new(&path)), true, None),
            None => Self::load_from(Self::default_path().as_deref(), false, None),
        }
    }

    /// Default configuration file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("catalog-admin").join("config.toml"))
    }

    /// Loads the configuration from `path` and the environment.
    ///
    /// `env` replaces the process environment when given.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed, a required file is
    /// missing, or a value is invalid.
    pub fn load_from(
        path: Option<&Path>,
        required: bool,
        env: Option<Vec<(String, String)>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(required),
            );
        }
        let environment = config::Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(env.map(|vars| vars.into_iter().collect()));
        let settings = builder.add_source(environment).build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        tracing::debug!(base_url = %config.base_url, timeout_ms = config.timeout_ms, "configuration loaded");
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {}: {e}", self.base_url)))?;
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be positive".to_string()));
        }
        if self.max_import_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_import_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Query controller policy.
    #[must_use]
    pub const fn query_policy(&self) -> QueryPolicy {
        QueryPolicy {
            reset_page_on_sort: self.reset_page_on_sort,
        }
    }

    /// Header rules: the built-in ones followed by the configured synonyms.
    #[must_use]
    pub fn header_rules(&self) -> HeaderRules {
        HeaderRules::with_synonyms(self.header_synonyms.iter().cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use catalog_domain::CanonicalField;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn no_env() -> Option<Vec<(String, String)>> {
        Some(Vec::new())
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = ClientConfig::load_from(None, false, no_env()).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
base_url = "https://catalog.example.com/api"
reset_page_on_sort = true

[[header_synonyms]]
contains = "cost"
field = "price"
"#
        )
        .unwrap();

        let config = ClientConfig::load_from(Some(file.path()), true, no_env()).unwrap();
        assert_eq!(config.base_url, "https://catalog.example.com/api");
        assert!(config.query_policy().reset_page_on_sort);
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(
            config.header_rules().field_for("Unit cost"),
            Some(CanonicalField::Price)
        );
    }

    #[test]
    fn test_environment_overrides_file() {
        let env = vec![
            ("CATALOG_TIMEOUT_MS".to_string(), "2500".to_string()),
            ("CATALOG_BASE_URL".to_string(), "http://10.0.0.5:9000/api".to_string()),
        ];
        let config = ClientConfig::load_from(None, false, Some(env)).unwrap();
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.base_url, "http://10.0.0.5:9000/api");
    }

    #[test]
    fn test_missing_optional_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(ClientConfig::load_from(Some(&path), false, no_env()).is_ok());
        assert!(ClientConfig::load_from(Some(&path), true, no_env()).is_err());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let env = vec![("CATALOG_TIMEOUT_MS".to_string(), "0".to_string())];
        let err = ClientConfig::load_from(None, false, Some(env)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let env = vec![("CATALOG_BASE_URL".to_string(), "localhost".to_string())];
        assert!(ClientConfig::load_from(None, false, Some(env)).is_err());
    }
}
