//! Ordered URL-shape strategies.
//!
//! Each strategy is a pure function from the resolution context to an
//! optional candidate URL. Probing and acceptance live in the resolver so
//! every candidate is validated the same way.

mod doc_viewer;
mod download_flag;
mod embed;
mod pass_through;
mod redirect_chain;

pub use doc_viewer::DocViewer;
pub use download_flag::DownloadFlag;
pub use embed::EmbedForm;
pub use pass_through::PassThrough;
pub use redirect_chain::RedirectChainParams;

use serde::Serialize;
use std::fmt;
use url::Url;

use crate::http::ResponseHeaders;
use crate::provider::Provider;
use crate::share_link::ShareLink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    EmbedForm,
    RedirectChain,
    DocViewer,
    DownloadFlag,
    PassThrough,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrategyKind::EmbedForm => "embed-form",
            StrategyKind::RedirectChain => "redirect-chain",
            StrategyKind::DocViewer => "doc-viewer",
            StrategyKind::DownloadFlag => "download-flag",
            StrategyKind::PassThrough => "pass-through",
        };
        f.write_str(s)
    }
}

/// What following the share link produced.
#[derive(Debug, Clone)]
pub struct Followed {
    /// Visited URLs, start first. Just the link itself when following failed.
    pub chain: Vec<Url>,
    /// Status and headers of the terminal response, if the follow succeeded.
    pub terminal: Option<(u32, ResponseHeaders)>,
}

impl Followed {
    pub fn final_url(&self) -> Option<&Url> {
        self.chain.last()
    }
}

/// Inputs available to a strategy.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub link: &'a ShareLink,
    pub provider: &'a Provider,
    /// `None` until a strategy that needs the redirect chain is reached.
    pub followed: Option<&'a Followed>,
    pub min_file_bytes: u64,
}

/// A generated URL and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: Url,
    pub strategy: StrategyKind,
}

pub trait Strategy {
    fn kind(&self) -> StrategyKind;

    /// Whether the strategy reads the redirect chain.
    fn needs_chain(&self) -> bool {
        true
    }

    /// Whether the candidate must be probed before it can be accepted.
    fn needs_validation(&self) -> bool {
        true
    }

    fn candidate(&self, ctx: &ResolveContext<'_>) -> Option<Url>;

    /// The candidate URL tagged with the strategy that produced it.
    fn propose(&self, ctx: &ResolveContext<'_>) -> Option<Candidate> {
        self.candidate(ctx).map(|url| Candidate {
            url,
            strategy: self.kind(),
        })
    }
}

/// Strategies in priority order.
pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(EmbedForm),
        Box::new(RedirectChainParams),
        Box::new(DocViewer),
        Box::new(DownloadFlag),
        Box::new(PassThrough),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn followed(chain: &[&str], terminal: Option<(u32, ResponseHeaders)>) -> Followed {
        Followed {
            chain: chain.iter().map(|s| Url::parse(s).unwrap()).collect(),
            terminal,
        }
    }

    pub fn run(strategy: &dyn Strategy, link: &str, followed: Option<&Followed>) -> Option<String> {
        let link = ShareLink::parse(link).unwrap();
        let provider = Provider::default();
        let ctx = ResolveContext {
            link: &link,
            provider: &provider,
            followed,
            min_file_bytes: crate::classify::DEFAULT_MIN_FILE_BYTES,
        };
        strategy.candidate(&ctx).map(|u| u.to_string())
    }
}
