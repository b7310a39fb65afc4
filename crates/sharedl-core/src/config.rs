use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::http::ClientOptions;
use crate::provider::Provider;

/// Provider host layout (optional `[provider]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Scheme used for URLs the resolver builds ("https" in production).
    pub scheme: String,
    /// Provider's main domain; canonical download URLs are built here.
    pub primary_host: String,
    /// Alternate content-hosting domain that sometimes rejects anonymous GETs.
    pub content_host: String,
    /// Short-link redirector hosts (only used to label input links).
    pub short_hosts: Vec<String>,
    /// Explicit port for built URLs. Unset means the scheme default.
    pub port: Option<u16>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            primary_host: "onedrive.live.com".to_string(),
            content_host: "my.microsoftpersonalcontent.com".to_string(),
            short_hosts: vec!["1drv.ms".to_string()],
            port: None,
        }
    }
}

/// Global configuration loaded from `~/.config/sharedl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SharedlConfig {
    /// TCP/TLS connect timeout for every request.
    pub connect_timeout_secs: u64,
    /// Total timeout for a header-only probe (including redirect hops).
    pub probe_timeout_secs: u64,
    /// Total timeout for the committed download (including redirect hops).
    pub fetch_timeout_secs: u64,
    /// Maximum redirect hops followed per request.
    pub max_redirections: u32,
    /// Content-Length above which a response counts as file-like.
    pub file_like_min_bytes: u64,
    /// Upper bound on a buffered download body.
    pub max_body_bytes: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
    pub provider: ProviderConfig,
}

impl Default for SharedlConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            probe_timeout_secs: 30,
            fetch_timeout_secs: 45,
            max_redirections: 10,
            file_like_min_bytes: 1024,
            max_body_bytes: 256 * 1024 * 1024,
            user_agent: concat!("sharedl/", env!("CARGO_PKG_VERSION")).to_string(),
            provider: ProviderConfig::default(),
        }
    }
}

impl SharedlConfig {
    /// HTTP client settings derived from this config.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            max_redirections: self.max_redirections,
            max_body_bytes: self.max_body_bytes,
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn provider(&self) -> Provider {
        Provider::from_config(&self.provider)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sharedl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SharedlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SharedlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: SharedlConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = SharedlConfig::default();
        assert_eq!(cfg.file_like_min_bytes, 1024);
        assert_eq!(cfg.max_redirections, 10);
        assert_eq!(cfg.provider.primary_host, "onedrive.live.com");
        assert_eq!(cfg.provider.content_host, "my.microsoftpersonalcontent.com");
        assert!(cfg.provider.port.is_none());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = SharedlConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: SharedlConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.probe_timeout_secs, cfg.probe_timeout_secs);
        assert_eq!(parsed.fetch_timeout_secs, cfg.fetch_timeout_secs);
        assert_eq!(parsed.max_body_bytes, cfg.max_body_bytes);
        assert_eq!(parsed.provider, cfg.provider);
    }

    #[test]
    fn config_toml_partial_uses_defaults() {
        let toml = r#"
            file_like_min_bytes = 4096
            probe_timeout_secs = 5
        "#;
        let cfg: SharedlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.file_like_min_bytes, 4096);
        assert_eq!(cfg.probe_timeout_secs, 5);
        assert_eq!(cfg.fetch_timeout_secs, 45);
        assert_eq!(cfg.provider, ProviderConfig::default());
    }

    #[test]
    fn config_toml_provider_section() {
        let toml = r#"
            [provider]
            scheme = "http"
            primary_host = "127.0.0.1"
            port = 8080
        "#;
        let cfg: SharedlConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.provider.scheme, "http");
        assert_eq!(cfg.provider.primary_host, "127.0.0.1");
        assert_eq!(cfg.provider.port, Some(8080));
        assert_eq!(cfg.provider.content_host, "my.microsoftpersonalcontent.com");
    }

    #[test]
    fn client_options_follow_config() {
        let mut cfg = SharedlConfig::default();
        cfg.probe_timeout_secs = 7;
        cfg.max_redirections = 3;
        let opts = cfg.client_options();
        assert_eq!(opts.probe_timeout, Duration::from_secs(7));
        assert_eq!(opts.max_redirections, 3);
    }
}
