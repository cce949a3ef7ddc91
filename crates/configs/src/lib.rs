//! # configs
//!
//! Layered settings for the ABOS binaries, lowest priority first:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`abos.toml` unless told otherwise)
//! 3. `.env` entries and process environment, prefixed `ABOS__`
//!    (e.g. `ABOS__STORAGE__BACKEND=memory`, `ABOS__LOG__FORMAT=json`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "abos.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Lost when the process exits
    Memory,
    /// One JSON file per collection under `data_dir`
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub key_prefix: String,
    /// Seed empty collections with demo records on open
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// An `EnvFilter` directive, e.g. `info` or `services=debug`
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub storage: StorageSettings,
    pub log: LogSettings,
    /// The `.env` file that was loaded, if any. Reported once logging is up.
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

impl Settings {
    /// Reads `.env`, then `abos.toml` if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let env_file = dotenvy::dotenv().ok();
        let config = defaults()?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("ABOS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let mut settings = Self::finish(config)?;
        settings.env_file = env_file;
        Ok(settings)
    }

    /// Parses settings from TOML text layered over the defaults. No
    /// environment lookup.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config = defaults()?
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Self::finish(config)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let prefix = &self.storage.key_prefix;
        let valid = !prefix.is_empty()
            && prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ConfigError::Invalid(format!(
                "storage.key_prefix must be non-empty and use only [A-Za-z0-9_-], got {prefix:?}"
            )));
        }
        if self.storage.backend == StorageBackend::File
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(
                "storage.data_dir is required for the file backend".to_string(),
            ));
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("storage.backend", "file")?
        .set_default("storage.data_dir", "./data")?
        .set_default("storage.key_prefix", "abos")?
        .set_default("storage.seed_demo_data", true)?
        .set_default("log.level", "info")?
        .set_default("log.format", "pretty")?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.storage.backend, StorageBackend::File);
        assert_eq!(settings.storage.data_dir, PathBuf::from("./data"));
        assert_eq!(settings.storage.key_prefix, "abos");
        assert!(settings.storage.seed_demo_data);
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.log.format, LogFormat::Pretty);
        assert_eq!(settings.env_file, None);
    }

    #[test]
    fn file_values_override_defaults() {
        let settings = Settings::from_toml(
            r#"
            [storage]
            backend = "memory"
            key_prefix = "tower_b"
            seed_demo_data = false

            [log]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.storage.key_prefix, "tower_b");
        assert!(!settings.storage.seed_demo_data);
        assert_eq!(settings.log.format, LogFormat::Json);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn bad_prefix_is_rejected() {
        let err = Settings::from_toml("[storage]\nkey_prefix = \"../x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_backend_is_a_load_error() {
        let err = Settings::from_toml("[storage]\nbackend = \"redis\"").unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
