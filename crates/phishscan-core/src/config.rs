use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Path of the analysis endpoint relative to `server_url`.
pub const PREDICT_PATH: &str = "predict";

/// Global configuration loaded from `~/.config/phishscan/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Base URL of the analysis backend (e.g. `http://127.0.0.1:5000`).
    pub server_url: String,
    /// Seconds to wait for the TCP/TLS connection to be established.
    pub connect_timeout_secs: u64,
    /// Upper bound on the whole exchange. None = wait for the backend indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Optional User-Agent sent with every request.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: None,
            user_agent: None,
        }
    }
}

impl ScanConfig {
    /// Full `/predict` URL derived from `server_url`.
    ///
    /// A trailing path on the base is kept (`http://host/api` -> `http://host/api/predict`).
    pub fn predict_url(&self) -> Result<url::Url> {
        let mut base = url::Url::parse(self.server_url.trim())
            .with_context(|| format!("invalid server_url {:?}", self.server_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            anyhow::bail!("server_url must be http or https, got {}", base.scheme());
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(PREDICT_PATH)?)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("phishscan")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ScanConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ScanConfig> {
    if !path.exists() {
        let default_cfg = ScanConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ScanConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
