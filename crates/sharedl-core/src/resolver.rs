//! Share link → validated direct URL.
//!
//! Strategies run in priority order. The link is only followed once a
//! strategy needs the redirect chain, and each candidate is accepted only
//! after a header-only probe returns 200 with a file-like response. Probe
//! failures reject the candidate; only running out of strategies is fatal.

use url::Url;

use crate::classify::{self, DEFAULT_MIN_FILE_BYTES};
use crate::config::SharedlConfig;
use crate::error::ResolveError;
use crate::fetch::{fetch_with_fallback, Fetched};
use crate::http::HttpClient;
use crate::provider::Provider;
use crate::share_link::{ShareLink, ShareLinkKind};
use crate::strategy::{default_strategies, Candidate, Followed, ResolveContext, Strategy, StrategyKind};
use crate::trail::{DebugTrail, Stage};

/// A validated direct URL and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub direct_url: Url,
    pub strategy: StrategyKind,
    pub link_kind: ShareLinkKind,
}

/// Resolution followed by the committed download.
#[derive(Debug, Clone)]
pub struct Downloaded {
    pub resolution: Resolution,
    pub file: Fetched,
}

pub struct ShareLinkResolver<C> {
    client: C,
    provider: Provider,
    min_file_bytes: u64,
    strategies: Vec<Box<dyn Strategy>>,
}

impl<C: HttpClient> ShareLinkResolver<C> {
    pub fn new(client: C, provider: Provider) -> Self {
        Self {
            client,
            provider,
            min_file_bytes: DEFAULT_MIN_FILE_BYTES,
            strategies: default_strategies(),
        }
    }

    pub fn from_config(client: C, cfg: &SharedlConfig) -> Self {
        Self::new(client, cfg.provider()).with_min_file_bytes(cfg.file_like_min_bytes)
    }

    pub fn with_min_file_bytes(mut self, min_file_bytes: u64) -> Self {
        self.min_file_bytes = min_file_bytes;
        self
    }

    pub fn resolve(&self, link: &ShareLink) -> Result<Resolution, ResolveError> {
        self.resolve_traced(link, &mut DebugTrail::new())
    }

    /// Like [`resolve`](Self::resolve), recording every request into `trail`.
    pub fn resolve_traced(
        &self,
        link: &ShareLink,
        trail: &mut DebugTrail,
    ) -> Result<Resolution, ResolveError> {
        let link_kind = link.kind(&self.provider);
        tracing::info!(link = %link, kind = %link_kind, "resolving share link");

        let mut followed: Option<Followed> = None;
        let mut rejected: Vec<Url> = Vec::new();

        for strategy in &self.strategies {
            let kind = strategy.kind();
            if strategy.needs_chain() && followed.is_none() {
                followed = Some(self.follow(link, trail));
            }
            let ctx = ResolveContext {
                link,
                provider: &self.provider,
                followed: followed.as_ref(),
                min_file_bytes: self.min_file_bytes,
            };
            let Some(candidate) = strategy.propose(&ctx) else {
                tracing::debug!(strategy = %kind, "no candidate");
                continue;
            };
            if strategy.needs_validation() {
                if rejected.contains(&candidate.url) {
                    tracing::debug!(strategy = %kind, url = %candidate.url, "candidate already rejected");
                    continue;
                }
                if !self.validate(&candidate, trail) {
                    rejected.push(candidate.url);
                    continue;
                }
            }
            tracing::info!("resolved {} via {}: {}", link, candidate.strategy, candidate.url);
            return Ok(Resolution {
                direct_url: candidate.url,
                strategy: candidate.strategy,
                link_kind,
            });
        }

        tracing::warn!("no strategy resolved {}", link);
        Err(ResolveError::Resolution {
            input: link.to_string(),
            attempted: trail.attempted_urls(),
        })
    }

    /// Resolves `link`, then downloads the direct URL with host/cid fallbacks.
    pub fn fetch(&self, link: &ShareLink, trail: &mut DebugTrail) -> Result<Downloaded, ResolveError> {
        let resolution = self.resolve_traced(link, trail)?;
        let file = fetch_with_fallback(
            &self.client,
            &self.provider,
            &resolution.direct_url,
            self.min_file_bytes,
            trail,
        )?;
        Ok(Downloaded { resolution, file })
    }

    fn follow(&self, link: &ShareLink, trail: &mut DebugTrail) -> Followed {
        match self.client.probe(link.url()) {
            Ok(probe) => {
                let file_like = classify::accepts(&probe, self.min_file_bytes);
                trail.record_response(Stage::Follow, None, link.as_str(), &probe, file_like);
                tracing::debug!(
                    hops = probe.chain.len().saturating_sub(1),
                    status = probe.status,
                    terminal = ?probe.final_url().map(Url::as_str),
                    "followed share link"
                );
                Followed {
                    chain: probe.chain,
                    terminal: Some((probe.status, probe.headers)),
                }
            }
            Err(err) => {
                tracing::warn!("following {} failed: {}", link, err);
                trail.record_error(Stage::Follow, None, link.as_str(), &err);
                Followed {
                    chain: vec![link.url().clone()],
                    terminal: None,
                }
            }
        }
    }

    fn validate(&self, candidate: &Candidate, trail: &mut DebugTrail) -> bool {
        let (url, kind) = (&candidate.url, candidate.strategy);
        match self.client.probe(url) {
            Ok(probe) => {
                let verdict = classify::classify(&probe.headers, self.min_file_bytes);
                let accepted = probe.is_ok() && verdict.is_file_like();
                if !accepted {
                    tracing::debug!(strategy = %kind, %url, status = probe.status, ?verdict, "candidate rejected");
                }
                trail.record_response(Stage::Validate, Some(kind), url.as_str(), &probe, accepted);
                accepted
            }
            Err(err) => {
                tracing::debug!(strategy = %kind, %url, error = %err, "candidate probe failed");
                trail.record_error(Stage::Validate, Some(kind), url.as_str(), &err);
                false
            }
        }
    }
}
