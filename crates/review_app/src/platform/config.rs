//! Session configuration: optional RON file, overridden by command-line flags.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use review_core::DEFAULT_LINK_BASE;
use review_engine::FetchSettings;
use serde::Deserialize;

use crate::cli::Cli;

const DEFAULT_CONFIG_FILENAME: &str = "review.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Directory or http(s) URL with `manifest.json`, `human/` and one folder per machine source.
    pub content_root: String,
    pub state_dir: PathBuf,
    pub export_dir: PathBuf,
    pub link_base: String,
    /// Name exports `ratings-<UTC timestamp>.json` instead of overwriting `ratings.json`.
    pub timestamped_export: bool,
    pub log_level: String,
    pub fetch: FetchConfig,
    /// File the values came from; `None` when running on defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_bytes: u64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            content_root: ".".to_string(),
            state_dir: PathBuf::from("."),
            export_dir: PathBuf::from("."),
            link_base: DEFAULT_LINK_BASE.to_string(),
            timestamped_export: false,
            log_level: "info".to_string(),
            fetch: FetchConfig::default(),
            source: None,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            connect_timeout_ms: defaults.connect_timeout.as_millis() as u64,
            request_timeout_ms: defaults.request_timeout.as_millis() as u64,
            max_bytes: defaults.max_bytes,
        }
    }
}

impl ReviewConfig {
    /// Reads `explicit` if given, else `./review.ron` if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILENAME);
                match fs::read_to_string(path) {
                    Ok(text) => Self::parse(path, &text),
                    Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
                    Err(source) => Err(ConfigError::Read {
                        path: path.to_path_buf(),
                        source,
                    }),
                }
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            ..config
        })
    }

    /// Command-line flags win over file values.
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(root) = &cli.root {
            self.content_root = root.clone();
        }
        if let Some(dir) = &cli.state_dir {
            self.state_dir = dir.clone();
        }
        if let Some(dir) = &cli.export_dir {
            self.export_dir = dir.clone();
        }
        if let Some(link_base) = &cli.link_base {
            self.link_base = link_base.clone();
        }
        if cli.verbose {
            self.log_level = "debug".to_string();
        }
        self
    }

    pub fn level(&self) -> LevelFilter {
        review_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_millis(self.fetch.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.fetch.request_timeout_ms),
            max_bytes: self.fetch.max_bytes,
            ..FetchSettings::default()
        }
    }
}
