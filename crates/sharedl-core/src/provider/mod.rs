//! Provider URL shapes: hosts, share parameters and canonical download URLs.

mod query;

pub use query::{encode_query, query_param};

use url::Url;

use crate::config::ProviderConfig;

/// Hosts and scheme of the storage provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub scheme: String,
    pub primary_host: String,
    pub content_host: String,
    pub short_hosts: Vec<String>,
    pub port: Option<u16>,
}

impl Default for Provider {
    fn default() -> Self {
        Self::from_config(&ProviderConfig::default())
    }
}

/// `resid` / `authkey` / `cid` query parameters addressing a shared item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareParams {
    pub resid: String,
    pub authkey: String,
    pub cid: Option<String>,
}

impl ShareParams {
    /// Reads the parameters from a URL query; `None` unless both resid and authkey are set.
    pub fn from_url(url: &Url) -> Option<Self> {
        let resid = query_param(url, "resid").filter(|v| !v.is_empty())?;
        let authkey = query_param(url, "authkey").filter(|v| !v.is_empty())?;
        let cid = query_param(url, "cid").filter(|v| !v.is_empty());
        Some(Self { resid, authkey, cid })
    }

    /// Fills `cid` from `resid` when missing.
    pub fn with_derived_cid(mut self) -> Self {
        if self.cid.is_none() {
            self.cid = derive_cid(&self.resid);
        }
        self
    }
}

/// Collection id is the part of a resource id before its first `!`.
pub fn derive_cid(resid: &str) -> Option<String> {
    let (cid, _) = resid.split_once('!')?;
    (!cid.is_empty()).then(|| cid.to_string())
}

impl Provider {
    pub fn from_config(cfg: &ProviderConfig) -> Self {
        Self {
            scheme: cfg.scheme.clone(),
            primary_host: cfg.primary_host.to_ascii_lowercase(),
            content_host: cfg.content_host.to_ascii_lowercase(),
            short_hosts: cfg
                .short_hosts
                .iter()
                .map(|h| h.to_ascii_lowercase())
                .collect(),
            port: cfg.port,
        }
    }

    pub fn is_primary(&self, url: &Url) -> bool {
        host_is(url, &self.primary_host)
    }

    pub fn is_content(&self, url: &Url) -> bool {
        host_is(url, &self.content_host)
    }

    pub fn is_short(&self, url: &Url) -> bool {
        self.short_hosts.iter().any(|h| host_is(url, h))
    }

    /// `{scheme}://{primary}[:port]{path}` with an already-encoded query.
    pub fn primary_url(&self, path: &str, query: &str) -> Option<Url> {
        let authority = match self.port {
            Some(port) => format!("{}:{}", self.primary_host, port),
            None => self.primary_host.clone(),
        };
        let mut raw = format!("{}://{}{}", self.scheme, authority, path);
        if !query.is_empty() {
            raw.push('?');
            raw.push_str(query);
        }
        Url::parse(&raw).ok()
    }

    /// Canonical download form: `.../download?[cid=C&]resid=R&authkey=K`.
    pub fn download_url(&self, params: &ShareParams) -> Option<Url> {
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(3);
        if let Some(cid) = params.cid.as_deref() {
            pairs.push(("cid", cid));
        }
        pairs.push(("resid", params.resid.as_str()));
        pairs.push(("authkey", params.authkey.as_str()));
        self.primary_url("/download", &encode_query(&pairs))
    }

    /// A primary-host URL whose path is a `/download` endpoint.
    pub fn is_download_form(&self, url: &Url) -> bool {
        self.is_primary(url) && url.path().to_ascii_lowercase().contains("/download")
    }

    /// Same URL with the host swapped to the primary host; path, query and port kept.
    pub fn to_primary_host(&self, url: &Url) -> Option<Url> {
        let mut out = url.clone();
        out.set_host(Some(&self.primary_host)).ok()?;
        Some(out)
    }
}

fn host_is(url: &Url, host: &str) -> bool {
    url.host_str()
        .map(|h| h.eq_ignore_ascii_case(host))
        .unwrap_or(false)
}
