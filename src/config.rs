use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub search: SearchConfig,
  /// Where log files go (default: $XDG_DATA_HOME/userdeck/logs)
  pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
    }
  }
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Seconds before the cached user list is refetched on read
  #[serde(default = "default_stale_secs")]
  pub stale_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      stale_secs: default_stale_secs(),
    }
  }
}

fn default_stale_secs() -> u64 {
  60
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
  /// Milliseconds the search box must be idle before the list is filtered
  #[serde(default = "default_debounce_ms")]
  pub debounce_ms: u64,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      debounce_ms: default_debounce_ms(),
    }
  }
}

fn default_debounce_ms() -> u64 {
  500
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./userdeck.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/userdeck/config.yaml
  ///
  /// Falls back to built-in defaults when no file exists.
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

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    config.base_url()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("userdeck.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("userdeck").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file means "all defaults"
    if contents.trim().is_empty() {
      return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  /// The remote base URL, validated.
  pub fn base_url(&self) -> Result<Url> {
    let url = Url::parse(&self.api.base_url)
      .map_err(|e| eyre!("Invalid api.base_url '{}': {}", self.api.base_url, e))?;

    match url.scheme() {
      "http" | "https" => Ok(url),
      other => Err(eyre!(
        "Invalid api.base_url '{}': unsupported scheme '{}'",
        self.api.base_url,
        other
      )),
    }
  }

  /// Header label: explicit title, else the API host.
  pub fn display_title(&self) -> String {
    if let Some(title) = &self.title {
      return title.clone();
    }
    self
      .base_url()
      .ok()
      .and_then(|url| url.host_str().map(String::from))
      .unwrap_or_else(|| self.api.base_url.clone())
  }

  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.cache.stale_secs)
  }

  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.search.debounce_ms)
  }

  /// Directory for log files.
  pub fn log_dir(&self) -> Result<PathBuf> {
    if let Some(dir) = &self.log_dir {
      return Ok(dir.clone());
    }

    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("userdeck").join("logs"))
  }
}
