//! Share link input model.

use std::fmt;
use url::Url;

use crate::error::ResolveError;
use crate::provider::Provider;

/// Known shapes of provider share links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareLinkKind {
    /// Short-link redirector (e.g. `1drv.ms/x/s!...`).
    Short,
    /// `.../embed?resid=...&authkey=...`
    Embed,
    /// Any other page on the provider's primary or content host.
    Viewer,
    Other,
}

impl fmt::Display for ShareLinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShareLinkKind::Short => "short",
            ShareLinkKind::Embed => "embed",
            ShareLinkKind::Viewer => "viewer",
            ShareLinkKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// A parsed, absolute http(s) share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    raw: String,
    url: Url,
}

impl ShareLink {
    pub fn parse(input: &str) -> Result<Self, ResolveError> {
        let raw = input.trim();
        let invalid = |reason: String| ResolveError::InvalidLink {
            input: input.to_string(),
            reason,
        };
        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            url,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self, provider: &Provider) -> ShareLinkKind {
        if provider.is_short(&self.url) {
            ShareLinkKind::Short
        } else if provider.is_primary(&self.url) && is_embed_path(&self.url) {
            ShareLinkKind::Embed
        } else if provider.is_primary(&self.url) || provider.is_content(&self.url) {
            ShareLinkKind::Viewer
        } else {
            ShareLinkKind::Other
        }
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub(crate) fn is_embed_path(url: &Url) -> bool {
    url.path().contains("/embed")
}
