use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::instrument;

use crate::{
    errors::{AppError, Result},
    utils::parse_release_date,
};

/// Default location of the config file, relative to the working dir
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Persisted state of the watcher
#[derive(Clone, Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Config {
    /// Webhook receiving the notifications
    pub webhook_url: String,
    /// Users to be pinged on new releases
    #[serde(default)]
    pub mention_user_ids: Vec<String>,
    /// Release date of the last announced firmware
    pub last_bios_release: String,
    /// The document as read from the file, so saving keeps unknown keys and the original key order
    #[serde(skip)]
    raw: Map<String, Value>,
}

impl Config {
    /// Parses the stored release marker
    pub fn last_release(&self) -> Result<DateTime<Utc>> {
        parse_release_date(&self.last_bios_release)
    }

    /// Builds the document to be written back, known keys are updated in place
    fn to_document(&self) -> Map<String, Value> {
        let mut doc = self.raw.clone();
        doc.insert("webhook_url".into(), Value::from(self.webhook_url.clone()));
        if doc.contains_key("mention_user_ids") || !self.mention_user_ids.is_empty() {
            doc.insert("mention_user_ids".into(), Value::from(self.mention_user_ids.clone()));
        }
        doc.insert("last_bios_release".into(), Value::from(self.last_bios_release.clone()));
        doc
    }
}

/// Reads and writes the [Config] from a single JSON file
#[derive(Clone, Debug)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a new store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the config file
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Config> {
        let content = fs::read_to_string(&self.path).await.map_err(|source| AppError::ConfigRead {
            path: self.path.clone(),
            source,
        })?;

        let parse_err = |err: serde_json::Error| AppError::ConfigParse {
            path: self.path.clone(),
            reason: err.to_string(),
        };
        let raw: Map<String, Value> = serde_json::from_str(&content).map_err(parse_err)?;
        let mut config: Config = serde_json::from_value(Value::Object(raw.clone())).map_err(parse_err)?;
        config.raw = raw;

        // The marker must always be comparable against the vendor dates
        if let Err(err) = config.last_release() {
            return Err(AppError::ConfigParse {
                path: self.path.clone(),
                reason: format!("invalid last_bios_release: {err}"),
            });
        }

        tracing::debug!("Loaded config, last release: {}", config.last_bios_release);
        Ok(config)
    }

    /// Overwrites the config file with the given config, pretty-printed
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub async fn save(&self, config: &Config) -> Result<()> {
        let content = serde_json::to_string_pretty(&config.to_document()).map_err(|err| AppError::ConfigWrite {
            path: self.path.clone(),
            source: io::Error::other(err),
        })?;

        fs::write(&self.path, content)
            .await
            .map_err(|source| AppError::ConfigWrite {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!("Saved config, last release: {}", config.last_bios_release);
        Ok(())
    }
}
