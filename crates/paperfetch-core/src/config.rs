use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::CurlOptions;
use crate::generator::UrlTemplate;
use crate::params::{ConfigError, PaperParams};
use crate::retry::RetryPolicy;

/// Retry policy parameters (`[retry]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per URL (including the first).
    pub max_attempts: u32,
    /// Lower bound of the random wait between attempts, in seconds.
    pub min_backoff_secs: f64,
    /// Upper bound of the random wait between attempts, in seconds.
    pub max_backoff_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_backoff_secs: 5.0,
            max_backoff_secs: 10.0,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy, ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "retry.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        let min = secs("retry.min_backoff_secs", self.min_backoff_secs)?;
        let max = secs("retry.max_backoff_secs", self.max_backoff_secs)?;
        if min > max {
            return Err(ConfigError::InvalidSetting {
                field: "retry.min_backoff_secs",
                reason: "must not exceed retry.max_backoff_secs".to_string(),
            });
        }
        Ok(RetryPolicy::new(self.max_attempts, min, max))
    }
}

/// Per-attempt HTTP limits (`[http]` in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: f64,
    /// Whole-attempt timeout; a stalled connection fails the attempt after this.
    pub timeout_secs: f64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30.0,
            timeout_secs: 120.0,
        }
    }
}

impl HttpConfig {
    pub fn to_curl_options(&self) -> Result<CurlOptions, ConfigError> {
        let connect_timeout = secs("http.connect_timeout_secs", self.connect_timeout_secs)?;
        let timeout = secs("http.timeout_secs", self.timeout_secs)?;
        if timeout.is_zero() {
            // curl treats 0 as "no timeout".
            return Err(ConfigError::InvalidSetting {
                field: "http.timeout_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(CurlOptions {
            connect_timeout,
            timeout,
        })
    }
}

fn secs(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|e| ConfigError::InvalidSetting {
        field,
        reason: e.to_string(),
    })
}

/// Run configuration loaded from `~/.config/paperfetch/config.toml`.
/// Command-line flags are applied on top by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Directory downloaded papers are written to.
    pub destination: PathBuf,
    /// Overrides the host and path prefix papers are fetched from.
    pub base_url: Option<String>,
    /// Worker threads; unset uses available parallelism.
    pub workers: Option<usize>,
    pub retry: RetryConfig,
    pub http: HttpConfig,
    pub papers: PaperParams,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("downloads"),
            base_url: None,
            workers: None,
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            papers: PaperParams::default(),
        }
    }
}

impl FetchConfig {
    pub fn url_template(&self) -> Result<UrlTemplate, ConfigError> {
        match &self.base_url {
            Some(base) => UrlTemplate::new(base),
            None => Ok(UrlTemplate::default()),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("paperfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the XDG config dir, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file. Missing keys take defaults.
pub fn load_from_path(path: &Path) -> Result<FetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: FetchConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FetchConfig::default();
        assert_eq!(cfg.destination, PathBuf::from("downloads"));
        assert!(cfg.base_url.is_none());
        assert!(cfg.workers.is_none());
        assert_eq!(cfg.retry.to_policy().unwrap(), RetryPolicy::default());
        assert_eq!(cfg.http.to_curl_options().unwrap(), CurlOptions::default());
        assert_eq!(cfg.papers, PaperParams::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut cfg = FetchConfig::default();
        cfg.workers = Some(3);
        cfg.base_url = Some("http://mirror.example/papers/".to_string());
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: FetchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let toml = r#"
            destination = "papers"

            [papers]
            codes = ["9701", "9702"]
            years = ["21", "22"]
        "#;
        let cfg: FetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.destination, PathBuf::from("papers"));
        assert_eq!(cfg.papers.codes, vec!["9701", "9702"]);
        assert_eq!(cfg.papers.years, vec!["21", "22"]);
        assert_eq!(cfg.papers.seasons, vec!["s"]);
        assert_eq!(cfg.retry, RetryConfig::default());
    }

    #[test]
    fn retry_and_http_sections() {
        let toml = r#"
            workers = 8

            [retry]
            max_attempts = 3
            min_backoff_secs = 0.5
            max_backoff_secs = 1.5

            [http]
            timeout_secs = 15
        "#;
        let cfg: FetchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.workers, Some(8));
        let policy = cfg.retry.to_policy().unwrap();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.min_backoff, Duration::from_millis(500));
        assert_eq!(policy.max_backoff, Duration::from_millis(1500));
        let curl = cfg.http.to_curl_options().unwrap();
        assert_eq!(curl.timeout, Duration::from_secs(15));
        assert_eq!(curl.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut retry = RetryConfig::default();
        retry.max_attempts = 0;
        assert!(retry.to_policy().is_err());

        let mut retry = RetryConfig::default();
        retry.min_backoff_secs = -1.0;
        assert!(retry.to_policy().is_err());

        let mut retry = RetryConfig::default();
        retry.min_backoff_secs = 20.0;
        assert!(retry.to_policy().is_err());

        let mut http = HttpConfig::default();
        http.timeout_secs = 0.0;
        assert!(http.to_curl_options().is_err());
    }

    #[test]
    fn bad_base_url_surfaces_as_config_error() {
        let mut cfg = FetchConfig::default();
        cfg.base_url = Some("ftp://nope/".to_string());
        assert!(matches!(
            cfg.url_template(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "workers = 2\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.workers, Some(2));
        assert!(load_from_path(&dir.path().join("missing.toml")).is_err());
    }
}
