use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub backend: BackendConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub log: LogConfig,
  #[serde(default)]
  pub ui: UiConfig,
  /// Custom title for header (defaults to the backend label if not set)
  pub title: Option<String>,
}

/// Where transactions come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
  /// In-process data set, paged locally with simulated latency
  Fixture {
    /// JSON file with `employees` and `transactions`; bundled data if unset
    #[serde(default)]
    data: Option<PathBuf>,
    #[serde(default = "default_latency_ms")]
    latency_ms: u64,
    #[serde(default = "default_page_size")]
    page_size: usize,
  },
  /// Remote JSON-over-HTTP service
  Http {
    url: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
  },
}

impl Default for BackendConfig {
  fn default() -> Self {
    BackendConfig::Fixture {
      data: None,
      latency_ms: default_latency_ms(),
      page_size: default_page_size(),
    }
  }
}

fn default_latency_ms() -> u64 {
  300
}

fn default_page_size() -> usize {
  5
}

fn default_timeout_secs() -> u64 {
  10
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
  /// Seconds after which a cached response is refetched; never if unset
  #[serde(default)]
  pub stale_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// Default filter directive, overridden by TXR_LOG or RUST_LOG
  #[serde(default = "default_log_level")]
  pub level: String,
  /// Directory for the rolling log file
  #[serde(default)]
  pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      dir: None,
    }
  }
}

fn default_log_level() -> String {
  "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
  #[serde(default = "default_tick_ms")]
  pub tick_ms: u64,
}

impl Default for UiConfig {
  fn default() -> Self {
    Self {
      tick_ms: default_tick_ms(),
    }
  }
}

fn default_tick_ms() -> u64 {
  250
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./txr.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/txr/config.yaml
  ///
  /// Without any file the defaults are used (bundled fixture backend).
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("txr.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("txr").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // An empty file deserializes to null, which serde_yaml rejects for a struct
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents).map_err(|e| eyre!("{}", e))
  }

  /// Point the backend at a remote service, keeping its timeout if already HTTP.
  pub fn with_url(self, url: String) -> Self {
    let timeout_secs = match self.backend {
      BackendConfig::Http { timeout_secs, .. } => timeout_secs,
      BackendConfig::Fixture { .. } => default_timeout_secs(),
    };
    Self {
      backend: BackendConfig::Http { url, timeout_secs },
      ..self
    }
  }

  /// Header title: the configured one, else the backend label.
  pub fn title_or<'a>(&'a self, label: &'a str) -> &'a str {
    self.title.as_deref().unwrap_or(label)
  }
}
