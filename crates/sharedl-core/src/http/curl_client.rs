//! libcurl-backed [`HttpClient`].
//!
//! Redirects are followed hop by hop on one easy handle, so the chain of
//! visited URLs is observed directly and cookies set along the way are sent
//! on later hops. The probe/fetch timeout bounds the whole chain. Bodies of
//! redirects, error responses and header-only probes are cut off at the
//! first byte.

use curl::easy::Easy;
use std::cell::Cell;
use std::str;
use std::time::{Duration, Instant};
use url::Url;

use super::{is_redirect, parse_headers, ClientOptions, HttpClient, HttpError, ProbeResult, ResponseHeaders};

/// curl rounds timeouts to milliseconds and treats 0 as "no timeout".
const MIN_HOP_BUDGET: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    Skip,
    Buffer,
}

struct Hop {
    headers: ResponseHeaders,
    status: u32,
    body: Option<Vec<u8>>,
}

/// Blocking client; runs in the current thread.
#[derive(Debug, Clone, Default)]
pub struct CurlClient {
    opts: ClientOptions,
}

impl CurlClient {
    pub fn new(opts: ClientOptions) -> Self {
        Self { opts }
    }

    fn follow(&self, start: &Url, mode: BodyMode) -> Result<ProbeResult, HttpError> {
        let budget = match mode {
            BodyMode::Skip => self.opts.probe_timeout,
            BodyMode::Buffer => self.opts.fetch_timeout,
        };
        let deadline = Instant::now() + budget;
        let timed_out = || HttpError::Timeout {
            url: start.to_string(),
            limit: budget,
        };

        let mut easy = self.handle().map_err(|source| HttpError::Curl {
            url: start.to_string(),
            source,
        })?;
        let mut chain = vec![start.clone()];

        loop {
            let current = chain[chain.len() - 1].clone();
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining < MIN_HOP_BUDGET {
                return Err(timed_out());
            }
            let hop = match self.exchange(&mut easy, &current, mode, remaining) {
                Err(HttpError::Curl { source, .. }) if source.is_operation_timedout() => {
                    return Err(timed_out());
                }
                other => other?,
            };

            if is_redirect(hop.status) {
                if let Some(location) = hop.headers.location.as_deref() {
                    if chain.len() > self.opts.max_redirections as usize {
                        return Err(HttpError::TooManyRedirects {
                            url: start.to_string(),
                            limit: self.opts.max_redirections,
                        });
                    }
                    let next = current
                        .join(location)
                        .ok()
                        .filter(|u| matches!(u.scheme(), "http" | "https"))
                        .ok_or_else(|| HttpError::BadRedirect {
                            url: current.to_string(),
                            location: location.to_string(),
                        })?;
                    tracing::trace!(from = %current, to = %next, status = hop.status, "redirect");
                    chain.push(next);
                    continue;
                }
            }

            return Ok(ProbeResult {
                chain,
                status: hop.status,
                headers: hop.headers,
                body: hop.body,
            });
        }
    }

    /// Handle shared by every hop of one chain; an empty cookie file turns on the in-memory jar.
    fn handle(&self) -> Result<Easy, curl::Error> {
        let mut easy = Easy::new();
        easy.get(true)?;
        easy.follow_location(false)?;
        easy.cookie_file("")?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.useragent(&self.opts.user_agent)?;
        Ok(easy)
    }

    /// One GET without redirect following.
    fn exchange(
        &self,
        easy: &mut Easy,
        url: &Url,
        mode: BodyMode,
        timeout: Duration,
    ) -> Result<Hop, HttpError> {
        let curl_err = |source: curl::Error| HttpError::Curl {
            url: url.to_string(),
            source,
        };
        let limit = self.opts.max_body_bytes;

        let mut lines: Vec<String> = Vec::new();
        let mut buf: Vec<u8> = Vec::new();
        let status = Cell::new(0u32);
        let cut_off = Cell::new(false);
        let overflow = Cell::new(false);

        easy.url(url.as_str()).map_err(curl_err)?;
        easy.timeout(timeout).map_err(curl_err)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    if let Ok(s) = str::from_utf8(data) {
                        let line = s.trim_end();
                        if line.starts_with("HTTP/") {
                            if let Some(code) =
                                line.split_whitespace().nth(1).and_then(|c| c.parse().ok())
                            {
                                status.set(code);
                            }
                        }
                        lines.push(line.to_string());
                    }
                    true
                })
                .map_err(curl_err)?;
            transfer
                .write_function(|data| {
                    if mode == BodyMode::Skip || !(200..300).contains(&status.get()) {
                        cut_off.set(true);
                        return Ok(0); // abort: headers are all we need
                    }
                    if buf.len() as u64 + data.len() as u64 > limit {
                        overflow.set(true);
                        return Ok(0);
                    }
                    buf.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_err)?;
            transfer.perform()
        };

        match performed {
            Ok(()) => {}
            Err(e) if e.is_write_error() && overflow.get() => {
                return Err(HttpError::BodyTooLarge {
                    url: url.to_string(),
                    limit,
                });
            }
            Err(e) if e.is_write_error() && cut_off.get() => {}
            Err(e) => return Err(curl_err(e)),
        }

        let headers = parse_headers(&lines);
        let code = match headers.status {
            Some(code) => code,
            None => easy.response_code().map_err(curl_err)?,
        };
        let complete = mode == BodyMode::Buffer && (200..300).contains(&code) && !cut_off.get();
        tracing::trace!(%url, status = code, bytes = buf.len(), "exchange done");

        Ok(Hop {
            headers,
            status: code,
            body: complete.then_some(buf),
        })
    }
}

impl HttpClient for CurlClient {
    fn probe(&self, url: &Url) -> Result<ProbeResult, HttpError> {
        self.follow(url, BodyMode::Skip)
    }

    fn download(&self, url: &Url) -> Result<ProbeResult, HttpError> {
        self.follow(url, BodyMode::Buffer)
    }
}
