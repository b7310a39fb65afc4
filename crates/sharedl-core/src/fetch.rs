//! Download of a validated direct URL, with host and cid fallbacks.

use url::Url;

use crate::classify;
use crate::error::ResolveError;
use crate::http::{HttpClient, ResponseHeaders};
use crate::provider::{derive_cid, encode_query, query_param, Provider, ShareParams};
use crate::trail::{DebugTrail, Stage};

/// Bytes of the downloaded file plus the response that carried them.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// URL that finally served the bytes (after redirects).
    pub url: Url,
    pub headers: ResponseHeaders,
    pub bytes: Vec<u8>,
}

/// GETs `direct`; on failure retries on the primary host (for content-host
/// URLs) and then with a derived `cid` (for canonical download URLs lacking one).
pub fn fetch_with_fallback<C: HttpClient>(
    client: &C,
    provider: &Provider,
    direct: &Url,
    min_file_bytes: u64,
    trail: &mut DebugTrail,
) -> Result<Fetched, ResolveError> {
    let mut attempted: Vec<String> = Vec::new();
    let mut current = direct.clone();

    if let Some(file) = try_download(client, &current, min_file_bytes, trail) {
        return Ok(file);
    }
    attempted.push(current.to_string());

    if provider.is_content(&current) {
        if let Some(alt) = provider.to_primary_host(&current) {
            tracing::info!("retrying {} on primary host: {}", current, alt);
            current = alt;
            if let Some(file) = try_download(client, &current, min_file_bytes, trail) {
                return Ok(file);
            }
            attempted.push(current.to_string());
        }
    }

    if provider.is_download_form(&current) {
        if let Some(alt) = with_derived_cid(&current) {
            tracing::info!("retrying with derived cid: {}", alt);
            current = alt;
            if let Some(file) = try_download(client, &current, min_file_bytes, trail) {
                return Ok(file);
            }
            attempted.push(current.to_string());
        }
    }

    Err(ResolveError::Transport {
        last_url: current.to_string(),
        attempted,
    })
}

fn try_download<C: HttpClient>(
    client: &C,
    url: &Url,
    min_file_bytes: u64,
    trail: &mut DebugTrail,
) -> Option<Fetched> {
    match client.download(url) {
        Ok(resp) => {
            let accepted = classify::accepts(&resp, min_file_bytes) && resp.body.is_some();
            trail.record_response(Stage::Fetch, None, url.as_str(), &resp, accepted);
            if !accepted {
                tracing::debug!(%url, status = resp.status, "download rejected");
                return None;
            }
            let final_url = resp.final_url().unwrap_or(url).clone();
            let bytes = resp.body?;
            tracing::info!("downloaded {} bytes from {}", bytes.len(), final_url);
            Some(Fetched {
                url: final_url,
                headers: resp.headers,
                bytes,
            })
        }
        Err(err) => {
            tracing::warn!("download of {} failed: {}", url, err);
            trail.record_error(Stage::Fetch, None, url.as_str(), &err);
            None
        }
    }
}

/// `url` with `cid=<resid prefix>` appended, if cid is missing and derivable.
fn with_derived_cid(url: &Url) -> Option<Url> {
    if query_param(url, "cid").is_some() {
        return None;
    }
    let params = ShareParams::from_url(url)?;
    let cid = derive_cid(&params.resid)?;
    let extra = encode_query(&[("cid", cid.as_str())]);
    let query = match url.query() {
        Some(q) if !q.is_empty() => format!("{}&{}", q, extra),
        _ => extra,
    };
    let mut out = url.clone();
    out.set_query(Some(&query));
    Some(out)
}
