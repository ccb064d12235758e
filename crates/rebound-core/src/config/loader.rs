//! Hierarchical retry configuration loader
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. Config file (~/.rebound/retry.yaml, or an explicit path)
//! 3. Environment variables (REBOUND_* prefix)
//! 4. CLI flags (handled by caller)

use crate::error::{Error, Result};
use crate::types::RetryConfig;
use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use std::env;
use std::fs;

/// Overrides `max-attempts` of the default policy
pub const ENV_MAX_ATTEMPTS: &str = "REBOUND_MAX_ATTEMPTS";

/// Overrides `base-delay-ms` of the default policy
pub const ENV_BASE_DELAY_MS: &str = "REBOUND_BASE_DELAY_MS";

const DEFAULTS_FILE: &str = "retry-defaults.yaml";
const CONFIG_FILE: &str = "retry.yaml";

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// Config file layered over the embedded defaults
    config_file: Utf8PathBuf,
    /// Whether a missing config file is an error
    required: bool,
}

impl ConfigLoader {
    /// Create a loader reading the optional `~/.rebound/retry.yaml`
    pub fn new() -> Result<Self> {
        let config_file = Self::get_config_dir()?.join(CONFIG_FILE);
        Ok(Self {
            config_file,
            required: false,
        })
    }

    /// Create a loader for an explicit config file, which must exist
    pub fn with_file(config_file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
            required: true,
        }
    }

    /// Path of the config file this loader layers over the defaults
    pub fn config_file(&self) -> &Utf8Path {
        &self.config_file
    }

    /// Get the standard config directory (~/.rebound)
    fn get_config_dir() -> Result<Utf8PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::invalid_config("Could not determine home directory"))?;

        let home = Utf8PathBuf::from_path_buf(home).map_err(|p| {
            Error::invalid_config(format!("Home directory is not UTF-8: {}", p.display()))
        })?;

        Ok(home.join(".rebound"))
    }

    /// Load retry configuration with hierarchical precedence
    pub fn load(&self) -> Result<RetryConfig> {
        // Start with embedded defaults
        let mut config = Self::load_embedded_defaults()?;

        if self.config_file.exists() {
            let file_config = Self::load_yaml_file(&self.config_file)?;
            config = Self::merge(config, file_config);
        } else if self.required {
            return Err(Error::config_not_found(self.config_file.as_str()));
        }

        config = Self::apply_env_overrides(config)?;
        config.validate()?;

        tracing::debug!(
            config_file = %self.config_file,
            operations = config.operations.len(),
            max_attempts = config.default.max_attempts,
            base_delay_ms = config.default.base_delay_ms,
            "loaded retry configuration"
        );

        Ok(config)
    }

    /// Load the embedded defaults
    pub fn load_embedded_defaults() -> Result<RetryConfig> {
        let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::config_not_found(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;

        serde_yaml_ng::from_str(content)
            .map_err(|e| Error::yaml_parse(format!("embedded config {}", DEFAULTS_FILE), e))
    }

    fn load_yaml_file(path: &Utf8Path) -> Result<RetryConfig> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content).map_err(|e| Error::yaml_parse(path.as_str(), e))
    }

    /// Overlay operations replace base operations by name; overlay default wins
    fn merge(mut base: RetryConfig, overlay: RetryConfig) -> RetryConfig {
        for (name, policy) in overlay.operations {
            base.operations.insert(name, policy);
        }
        base.default = overlay.default;
        base
    }

    fn apply_env_overrides(mut config: RetryConfig) -> Result<RetryConfig> {
        if let Ok(val) = env::var(ENV_MAX_ATTEMPTS) {
            config.default.max_attempts = val.parse().map_err(|_| {
                Error::invalid_config(format!("{} must be a valid number", ENV_MAX_ATTEMPTS))
            })?;
        }

        if let Ok(val) = env::var(ENV_BASE_DELAY_MS) {
            config.default.base_delay_ms = val.parse().map_err(|_| {
                Error::invalid_config(format!("{} must be a valid number", ENV_BASE_DELAY_MS))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RetryPolicy;
    use serial_test::serial;

    fn clear_env() {
        env::remove_var(ENV_MAX_ATTEMPTS);
        env::remove_var(ENV_BASE_DELAY_MS);
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("retry.yaml")).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_embedded_defaults() {
        let config = ConfigLoader::load_embedded_defaults().unwrap();
        assert_eq!(config.default, RetryPolicy::default());
        assert!(config.operations.contains_key("network"));
        assert!(config.operations.contains_key("storage-write"));
    }

    #[test]
    #[serial]
    fn test_missing_optional_file_uses_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader {
            config_file: Utf8PathBuf::from_path_buf(dir.path().join("absent.yaml")).unwrap(),
            required: false,
        };

        let config = loader.load().unwrap();
        assert_eq!(config.default.max_attempts, 3);
        assert_eq!(config.default.base_delay_ms, 500);
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_error() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.yaml")).unwrap();

        let result = ConfigLoader::with_file(path).load();
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "default:\n  max-attempts: 6\noperations:\n  network:\n    base-delay-ms: 50\n  search:\n    max-attempts: 2\n",
        );

        let config = ConfigLoader::with_file(path).load().unwrap();
        assert_eq!(config.default.max_attempts, 6);
        assert_eq!(config.default.base_delay_ms, 500);
        assert_eq!(config.policy_for("network").base_delay_ms, 50);
        assert_eq!(config.policy_for("network").max_attempts, 3);
        assert_eq!(config.policy_for("search").max_attempts, 2);
        // Untouched embedded operations survive the merge
        assert_eq!(config.policy_for("storage-write").max_attempts, 4);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "default:\n  max-attempts: 6\n");

        env::set_var(ENV_MAX_ATTEMPTS, "9");
        env::set_var(ENV_BASE_DELAY_MS, "10");
        let config = ConfigLoader::with_file(path).load();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.default.max_attempts, 9);
        assert_eq!(config.default.base_delay_ms, 10);
    }

    #[test]
    #[serial]
    fn test_invalid_env_value() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "{}\n");

        env::set_var(ENV_BASE_DELAY_MS, "soon");
        let result = ConfigLoader::with_file(path).load();
        clear_env();

        let err = result.unwrap_err();
        assert!(err.to_string().contains(ENV_BASE_DELAY_MS));
    }

    #[test]
    #[serial]
    fn test_zero_attempts_rejected() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "default:\n  max-attempts: 0\n");

        let result = ConfigLoader::with_file(path).load();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    #[serial]
    fn test_malformed_yaml() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "default: [not, a, policy]\n");

        let result = ConfigLoader::with_file(path.clone()).load();
        match result {
            Err(Error::YamlParse { path: reported, .. }) => assert_eq!(reported, path.as_str()),
            other => panic!("expected YAML parse error, got {:?}", other),
        }
    }
}
