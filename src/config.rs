//! Configuration file handling.
//!
//! The configuration file is stored at `$GOALS_HOME/config.json` and holds the URL of the
//! spreadsheet endpoint that all records are read from and written to.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "goals";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$GOALS_HOME` and from there it loads `$GOALS_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    api_url: Url,
}

impl Config {
    /// Creates the home directory if needed and writes an initial `config.json` pointing at
    /// `api_url`.
    ///
    /// # Errors
    /// - Returns an error if `api_url` is not an absolute http(s) URL.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, api_url: &str) -> Result<Self> {
        let api_url = parse_api_url(api_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the goals home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            api_url: api_url.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            api_url,
        })
    }

    /// Validates that `goals_home` and its config file exist, then loads the config file.
    pub async fn load(goals_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = goals_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Goals home is missing, run 'goals init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let api_url = parse_api_url(&config_file.api_url)
            .with_context(|| format!("Invalid api_url in {}", config_path.display()))?;

        Ok(Self {
            root,
            config_path,
            config_file,
            api_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn config_version(&self) -> u8 {
        self.config_file.config_version
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "goals",
///   "config_version": 1,
///   "api_url": "https://script.google.com/macros/s/AKfycbx9/exec"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "goals"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL of the deployed spreadsheet endpoint
    api_url: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: String::new(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from `path`, checking that it belongs to this app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }
}

fn parse_api_url(s: &str) -> Result<Url> {
    let url = Url::parse(s.trim()).with_context(|| format!("'{s}' is not a valid URL"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("The endpoint URL must use http or https, not '{other}'"),
    }
}
