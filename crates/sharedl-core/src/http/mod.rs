//! HTTP boundary used by the resolver.
//!
//! The resolver only depends on [`HttpClient`]; [`CurlClient`] is the libcurl
//! implementation. Redirects are followed hop by hop so the full chain of
//! visited URLs is available to the strategies.

mod curl_client;
mod headers;
#[cfg(test)]
pub(crate) mod scripted;

pub use curl_client::CurlClient;
pub use headers::{parse_headers, ResponseHeaders};

use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Timeouts and limits applied to every request.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    pub probe_timeout: Duration,
    pub fetch_timeout: Duration,
    pub max_redirections: u32,
    pub max_body_bytes: u64,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        crate::config::SharedlConfig::default().client_options()
    }
}

/// Outcome of a GET with redirects followed.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// Every URL visited, starting with the requested one and ending with the terminal one.
    pub chain: Vec<Url>,
    /// Status of the terminal response.
    pub status: u32,
    pub headers: ResponseHeaders,
    /// Terminal body; `None` for header-only probes and non-2xx responses.
    pub body: Option<Vec<u8>>,
}

impl ProbeResult {
    /// Terminal URL; `None` only for a hand-built result with an empty chain.
    pub fn final_url(&self) -> Option<&Url> {
        self.chain.last()
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("{url}: {source}")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },
    #[error("{url}: more than {limit} redirects")]
    TooManyRedirects { url: String, limit: u32 },
    #[error("{url}: unusable redirect location {location:?}")]
    BadRedirect { url: String, location: String },
    #[error("{url}: no response within {limit:?}")]
    Timeout { url: String, limit: Duration },
    #[error("{url}: body exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: u64 },
}

/// Minimal client capabilities needed for resolution and download.
pub trait HttpClient {
    /// GET `url` following redirects; reads only the terminal response headers.
    fn probe(&self, url: &Url) -> Result<ProbeResult, HttpError>;

    /// GET `url` following redirects; buffers the terminal body when the status is 2xx.
    fn download(&self, url: &Url) -> Result<ProbeResult, HttpError>;
}

impl<C: HttpClient + ?Sized> HttpClient for &C {
    fn probe(&self, url: &Url) -> Result<ProbeResult, HttpError> {
        (**self).probe(url)
    }

    fn download(&self, url: &Url) -> Result<ProbeResult, HttpError> {
        (**self).download(url)
    }
}

pub(crate) fn is_redirect(status: u32) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}
