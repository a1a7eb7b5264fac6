//! Configuration management for mylo.
//!
//! Loads configuration from ${MYLO_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Which provider implementation backs the auth and profile clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Firebase Identity Toolkit + Firestore over REST (default)
    #[default]
    Firebase,
    /// In-process stores, nothing leaves the machine
    Memory,
}

/// Firebase project settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    /// Web API key of the Firebase project.
    pub api_key: String,
    /// Project id (used in Firestore document paths).
    pub project_id: String,
    pub auth_base_url: String,
    /// Secure Token service, used to refresh expired id tokens.
    pub token_base_url: String,
    pub firestore_base_url: String,
    /// Collection holding one profile document per user.
    pub collection: String,
}

impl FirebaseConfig {
    pub const DEFAULT_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
    pub const DEFAULT_TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com";
    pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
    pub const DEFAULT_COLLECTION: &str = "usuarios";
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            auth_base_url: Self::DEFAULT_AUTH_BASE_URL.to_string(),
            token_base_url: Self::DEFAULT_TOKEN_BASE_URL.to_string(),
            firestore_base_url: Self::DEFAULT_FIRESTORE_BASE_URL.to_string(),
            collection: Self::DEFAULT_COLLECTION.to_string(),
        }
    }
}

/// Log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive when MYLO_LOG is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub mod paths {
    //! Path resolution for mylo configuration and data directories.
    //!
    //! MYLO_HOME resolution order:
    //! 1. MYLO_HOME environment variable (if set)
    //! 2. ~/.config/mylo (default)

    use std::path::PathBuf;

    /// Returns the mylo home directory.
    pub fn mylo_home() -> PathBuf {
        if let Ok(home) = std::env::var("MYLO_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".mylo"),
            |h| h.join(".config").join("mylo"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        mylo_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        mylo_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,

    #[serde(default)]
    pub firebase: FirebaseConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Loads configuration from the default config path, then applies env overrides.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Applies environment overrides through `lookup` (non-empty values only).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get("MYLO_FIREBASE_API_KEY") {
            self.firebase.api_key = key;
        }
        if let Some(project) = get("MYLO_FIREBASE_PROJECT") {
            self.firebase.project_id = project;
        }
        if let Some(url) = get("MYLO_AUTH_BASE_URL") {
            self.firebase.auth_base_url = url;
        }
        if let Some(url) = get("MYLO_TOKEN_BASE_URL") {
            self.firebase.token_base_url = url;
        }
        if let Some(url) = get("MYLO_FIRESTORE_BASE_URL") {
            self.firebase.firestore_base_url = url;
        }
    }

    /// Checks that the selected backend has what it needs.
    ///
    /// # Errors
    /// Returns an error naming the missing setting.
    pub fn validate(&self) -> Result<()> {
        if self.backend == Backend::Memory {
            return Ok(());
        }
        if self.firebase.api_key.trim().is_empty() {
            bail!(
                "Firebase backend requires an API key.\n\
                 Set firebase.api_key in the config or MYLO_FIREBASE_API_KEY, \
                 or run with --offline."
            );
        }
        if self.firebase.project_id.trim().is_empty() {
            bail!(
                "Firebase backend requires a project id.\n\
                 Set firebase.project_id in the config or MYLO_FIREBASE_PROJECT."
            );
        }
        if self.firebase.collection.trim().is_empty() {
            bail!("firebase.collection must not be empty");
        }
        Ok(())
    }

    /// Creates a new config file with the default template.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

/// Commented template written by `mylo config init`.
pub fn default_config_template() -> &'static str {
    r#"# mylo configuration

# "firebase" talks to a Firebase project, "memory" keeps everything in-process.
backend = "firebase"

[firebase]
# Web API key of the Firebase project (or MYLO_FIREBASE_API_KEY)
api_key = ""
# Project id (or MYLO_FIREBASE_PROJECT)
project_id = ""
# auth_base_url = "https://identitytoolkit.googleapis.com"
# token_base_url = "https://securetoken.googleapis.com"
# firestore_base_url = "https://firestore.googleapis.com"
collection = "usuarios"

[log]
# Overridden by MYLO_LOG (EnvFilter syntax)
level = "info"
"#
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    /// Config loading: missing file returns defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.backend, Backend::Firebase);
        assert_eq!(config.firebase.collection, "usuarios");
        assert_eq!(
            config.firebase.auth_base_url,
            FirebaseConfig::DEFAULT_AUTH_BASE_URL
        );
        assert_eq!(
            config.firebase.token_base_url,
            FirebaseConfig::DEFAULT_TOKEN_BASE_URL
        );
        assert_eq!(config.log.level, "info");
    }

    /// Config loading: partial config merges with defaults.
    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "backend = \"memory\"\n[firebase]\nproject_id = \"demo\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.firebase.project_id, "demo");
        assert_eq!(config.firebase.collection, "usuarios");
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "backend = [").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_creates_config_with_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("backend = \"firebase\""));
        assert!(contents.contains("# auth_base_url ="));
        // Template must parse back into a config.
        let parsed = Config::load_from(&config_path).unwrap();
        assert_eq!(parsed.firebase.collection, "usuarios");
    }

    /// Config init: fails if file exists (no silent overwrite).
    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        let err = Config::init(&config_path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_env_overrides_ignore_empty_values() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "MYLO_FIREBASE_API_KEY" => Some("key-123".to_string()),
            "MYLO_FIREBASE_PROJECT" => Some("  ".to_string()),
            "MYLO_AUTH_BASE_URL" => Some("http://127.0.0.1:9099".to_string()),
            "MYLO_TOKEN_BASE_URL" => Some("http://127.0.0.1:9099/securetoken".to_string()),
            _ => None,
        });
        assert_eq!(config.firebase.api_key, "key-123");
        assert_eq!(config.firebase.project_id, "");
        assert_eq!(config.firebase.auth_base_url, "http://127.0.0.1:9099");
        assert_eq!(
            config.firebase.token_base_url,
            "http://127.0.0.1:9099/securetoken"
        );
        assert_eq!(
            config.firebase.firestore_base_url,
            FirebaseConfig::DEFAULT_FIRESTORE_BASE_URL
        );
    }

    #[test]
    fn test_validate_firebase_requires_key_and_project() {
        let mut config = Config::default();
        assert!(config.validate().unwrap_err().to_string().contains("API key"));

        config.firebase.api_key = "k".to_string();
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("project id")
        );

        config.firebase.project_id = "p".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_memory_backend_needs_nothing() {
        let config = Config {
            backend: Backend::Memory,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
