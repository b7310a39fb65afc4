//! Debug trail: every URL touched during resolution and fetch, for troubleshooting.

use serde::Serialize;

use crate::http::{HttpError, ProbeResult};
use crate::strategy::StrategyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Following the share link itself.
    Follow,
    /// Probing a strategy candidate.
    Validate,
    /// Downloading the accepted URL (or a fallback of it).
    Fetch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Accepted,
    Rejected,
    /// Request failed before a response was classified.
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct TrailEntry {
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyKind>,
    pub url: String,
    /// Redirect hops after `url`, terminal last.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub redirects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_disposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<String>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugTrail {
    pub entries: Vec<TrailEntry>,
}

impl DebugTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_response(
        &mut self,
        stage: Stage,
        strategy: Option<StrategyKind>,
        url: &str,
        probe: &ProbeResult,
        accepted: bool,
    ) {
        self.entries.push(TrailEntry {
            stage,
            strategy,
            url: url.to_string(),
            redirects: probe.chain.iter().skip(1).map(|u| u.to_string()).collect(),
            status: Some(probe.status),
            content_type: probe.headers.content_type.clone(),
            content_disposition: probe.headers.content_disposition.clone(),
            content_length: probe.headers.content_length.clone(),
            outcome: if accepted {
                Outcome::Accepted
            } else {
                Outcome::Rejected
            },
        });
    }

    pub fn record_error(
        &mut self,
        stage: Stage,
        strategy: Option<StrategyKind>,
        url: &str,
        err: &HttpError,
    ) {
        self.entries.push(TrailEntry {
            stage,
            strategy,
            url: url.to_string(),
            redirects: Vec::new(),
            status: None,
            content_type: None,
            content_disposition: None,
            content_length: None,
            outcome: Outcome::Failed(err.to_string()),
        });
    }

    /// Distinct URLs requested, in first-seen order.
    pub fn attempted_urls(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for e in &self.entries {
            if !out.contains(&e.url) {
                out.push(e.url.clone());
            }
        }
        out
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
