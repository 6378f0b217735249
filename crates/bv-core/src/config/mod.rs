//! Configuration loading and validation for bv-core.
//!
//! This module handles:
//! - Loading `config.toml`
//! - Config resolution order (CLI > env > XDG > defaults)
//! - Semantic validation (non-empty source, positive timeout, parseable address)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bv_render::RenderConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetch::{is_http_location, source_from_location, BugSource};

/// Default XDG config directory name.
const CONFIG_DIR_NAME: &str = "bugview";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Where bug data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// `http(s)://` origin or static-asset directory.
    pub location: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: "public".to_string(),
        }
    }
}

/// Fetch behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout; unset means a request may wait indefinitely.
    pub timeout_secs: Option<u64>,
}

/// Static server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub addr: String,
    /// Static-asset root; defaults to the source directory.
    pub root: Option<PathBuf>,
    /// How long a request waits for the bug list before answering 504.
    pub settle_timeout_secs: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            root: None,
            settle_timeout_secs: 30,
        }
    }
}

/// Complete bugview configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugviewConfig {
    pub source: SourceConfig,
    pub fetch: FetchConfig,
    pub render: RenderConfig,
    pub serve: ServeConfig,
}

impl BugviewConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Semantic validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.location.trim().is_empty() {
            return Err(ConfigError::Invalid("source.location must not be empty".into()));
        }
        if self.fetch.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "fetch.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.serve.settle_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "serve.settle_timeout_secs must be greater than zero".into(),
            ));
        }
        self.serve_addr()?;
        self.render
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch.timeout_secs.map(Duration::from_secs)
    }

    pub fn serve_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.serve.addr.parse().map_err(|e| {
            ConfigError::Invalid(format!("serve.addr '{}': {}", self.serve.addr, e))
        })
    }

    /// Static-asset root: explicit `serve.root`, else a directory source, else `public`.
    pub fn serve_root(&self) -> PathBuf {
        if let Some(root) = &self.serve.root {
            return root.clone();
        }
        if is_http_location(&self.source.location) {
            PathBuf::from(SourceConfig::default().location)
        } else {
            PathBuf::from(&self.source.location)
        }
    }

    /// Build the configured bug source.
    pub fn bug_source(&self) -> Arc<dyn BugSource> {
        source_from_location(&self.source.location, self.fetch_timeout())
    }

    /// Longest a served page waits for the bug list.
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs(self.serve.settle_timeout_secs)
    }

    /// Fetch timeout for the server: `fetch.timeout_secs`, else the settle timeout.
    pub fn serve_fetch_timeout(&self) -> Duration {
        self.fetch_timeout().unwrap_or_else(|| self.settle_timeout())
    }

    /// Bug source for the server. Its fetches always time out.
    pub fn serve_source(&self) -> Arc<dyn BugSource> {
        source_from_location(&self.source.location, Some(self.serve_fetch_timeout()))
    }
}

/// Resolved configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: BugviewConfig,
    /// File the configuration was read from (None if using defaults).
    pub path: Option<PathBuf>,
}

/// Configuration resolution options from the command line.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// Explicit config file (highest priority).
    pub config_path: Option<PathBuf>,
    /// Source override.
    pub source: Option<String>,
    /// Fetch timeout override.
    pub timeout_secs: Option<u64>,
}

/// Environment inputs to resolution.
#[derive(Debug, Default, Clone)]
pub struct ConfigEnv {
    /// `BUGVIEW_CONFIG`
    pub config_path: Option<PathBuf>,
    /// `BUGVIEW_SOURCE`
    pub source: Option<String>,
    /// `XDG_CONFIG_HOME`, falling back to `~/.config`
    pub config_home: Option<PathBuf>,
}

impl ConfigEnv {
    /// Read the process environment.
    pub fn from_process() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            config_path: non_empty("BUGVIEW_CONFIG").map(PathBuf::from),
            source: non_empty("BUGVIEW_SOURCE"),
            config_home: non_empty("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|| dirs::home_dir().map(|home| home.join(".config"))),
        }
    }
}

/// Load configuration with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit CLI flags (via ConfigOptions)
/// 2. Environment variables (BUGVIEW_CONFIG, BUGVIEW_SOURCE)
/// 3. XDG config home (~/.config/bugview/config.toml)
/// 4. Built-in defaults
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    load_config_from(options, &ConfigEnv::from_process())
}

/// [`load_config`] with explicit environment inputs.
pub fn load_config_from(
    options: &ConfigOptions,
    env: &ConfigEnv,
) -> Result<ResolvedConfig, ConfigError> {
    let path = resolve_config_path(options, env)?;
    let mut config = match &path {
        Some(path) => load_file(path)?,
        None => BugviewConfig::default(),
    };

    if let Some(source) = &env.source {
        config.source.location = source.clone();
    }
    if let Some(source) = &options.source {
        config.source.location = source.clone();
    }
    if let Some(timeout) = options.timeout_secs {
        config.fetch.timeout_secs = Some(timeout);
    }

    config.validate()?;
    Ok(ResolvedConfig { config, path })
}

/// Pick the config file to read, if any.
fn resolve_config_path(
    options: &ConfigOptions,
    env: &ConfigEnv,
) -> Result<Option<PathBuf>, ConfigError> {
    // Explicit paths must exist
    if let Some(path) = options.config_path.as_ref().or(env.config_path.as_ref()) {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.clone() });
        }
        return Ok(Some(path.clone()));
    }

    // XDG location is optional
    Ok(env
        .config_home
        .as_ref()
        .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .filter(|path| path.exists()))
}

fn load_file(path: &Path) -> Result<BugviewConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    BugviewConfig::from_toml(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}
