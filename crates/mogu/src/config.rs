//! Configuration management for mogu.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "mogu";

/// Default record file name.
const DATA_FILE_NAME: &str = "restaurants.json";

/// Unprefixed variables read for the chat platform credentials.
const PLATFORM_ENV_VARS: [&str; 3] = ["TOKEN", "CLIENT_ID", "GUILD_ID"];

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. `TOKEN`, `CLIENT_ID` and `GUILD_ID` environment variables
/// 2. Environment variables prefixed with `MOGU_`, nested with `__`
///    (e.g. `MOGU_STORAGE__DATA_PATH`)
/// 3. TOML config file at `~/.config/mogu/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Chat platform configuration.
    pub bot: BotConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the restaurant file.
    /// Defaults to `~/.local/share/mogu/restaurants.json`
    pub data_path: Option<PathBuf>,
    /// Write the file as a versioned envelope instead of a bare array.
    pub versioned: bool,
}

/// Chat platform configuration.
///
/// The credentials are only used by the gateway and command deploy tooling;
/// the command core never reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Bot authentication token.
    #[serde(deserialize_with = "lenient::opt_string")]
    pub token: Option<String>,
    /// Application (client) id.
    #[serde(deserialize_with = "lenient::opt_string")]
    pub application_id: Option<String>,
    /// Server (guild) id the commands are registered in.
    #[serde(deserialize_with = "lenient::opt_string")]
    pub guild_id: Option<String>,
    /// User ids allowed to run administrator commands in addition to the
    /// platform's own administrators.
    #[serde(deserialize_with = "lenient::string_vec")]
    pub admin_ids: Vec<String>,
}

/// Ids look like numbers, and figment parses numeric-looking environment
/// values as integers. Accept both.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn stringify<E: serde::de::Error>(value: Value) -> Result<String, E> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(E::custom(format!("expected a string or number, got {other}"))),
        }
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => stringify(value).map(Some),
        }
    }

    pub fn string_vec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items.into_iter().map(stringify).collect(),
            single => stringify(single).map(|s| vec![s]),
        }
    }
}

/// Map the unprefixed platform variables onto their config keys.
fn platform_env_key(key: &UncasedStr) -> Uncased<'_> {
    match key.as_str().to_ascii_uppercase().as_str() {
        "TOKEN" => "bot.token".into(),
        "CLIENT_ID" => "bot.application_id".into(),
        "GUILD_ID" => "bot.guild_id".into(),
        _ => key.into(),
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("MOGU_").split("__"))
            .merge(Env::raw().only(&PLATFORM_ENV_VARS).map(platform_env_key));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.storage.data_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "data_path cannot be empty".to_string(),
                });
            }
            if path.is_dir() {
                return Err(Error::ConfigValidation {
                    message: format!("data_path {} is a directory", path.display()),
                });
            }
        }

        if self.bot.admin_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(Error::ConfigValidation {
                message: "admin_ids cannot contain blank ids".to_string(),
            });
        }

        Ok(())
    }

    /// Get the restaurant file path, resolving defaults if not set.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.storage
            .data_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATA_FILE_NAME))
    }

    /// A copy safe to print, with the token masked.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.bot.token.is_some() {
            config.bot.token = Some("********".to_string());
        }
        config
    }
}
