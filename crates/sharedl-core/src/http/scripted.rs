//! In-memory [`HttpClient`] for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use url::Url;

use super::{is_redirect, HttpClient, HttpError, ProbeResult, ResponseHeaders};

const CURLE_COULDNT_RESOLVE_HOST: i32 = 6;

#[derive(Debug, Clone)]
pub(crate) struct Route {
    pub status: u32,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

/// Serves canned responses keyed by exact URL; unknown URLs fail like a DNS error.
#[derive(Debug, Default)]
pub(crate) struct ScriptedClient {
    routes: HashMap<String, Route>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        let headers = ResponseHeaders {
            status: Some(302),
            location: Some(to.to_string()),
            ..ResponseHeaders::default()
        };
        self.routes.insert(
            from.to_string(),
            Route {
                status: 302,
                headers,
                body: Vec::new(),
            },
        );
        self
    }

    pub fn html(self, url: &str) -> Self {
        self.respond(url, 200, Some("text/html; charset=utf-8"), None, b"<html></html>")
    }

    pub fn file(self, url: &str, body: &[u8]) -> Self {
        self.respond(
            url,
            200,
            Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            Some("attachment; filename=\"book.xlsx\""),
            body,
        )
    }

    pub fn respond(
        mut self,
        url: &str,
        status: u32,
        content_type: Option<&str>,
        content_disposition: Option<&str>,
        body: &[u8],
    ) -> Self {
        let headers = ResponseHeaders {
            status: Some(status),
            content_type: content_type.map(String::from),
            content_disposition: content_disposition.map(String::from),
            content_length: Some(body.len().to_string()),
            location: None,
        };
        self.routes.insert(
            url.to_string(),
            Route {
                status,
                headers,
                body: body.to_vec(),
            },
        );
        self
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.as_str() == url).count()
    }

    fn follow(&self, start: &Url, buffer: bool) -> Result<ProbeResult, HttpError> {
        let mut chain = vec![start.clone()];
        loop {
            let current = chain[chain.len() - 1].clone();
            self.calls.borrow_mut().push(current.to_string());
            let route = self
                .routes
                .get(current.as_str())
                .ok_or_else(|| HttpError::Curl {
                    url: current.to_string(),
                    source: curl::Error::new(CURLE_COULDNT_RESOLVE_HOST as _),
                })?;
            if is_redirect(route.status) {
                if let Some(location) = route.headers.location.as_deref() {
                    if chain.len() > 10 {
                        return Err(HttpError::TooManyRedirects {
                            url: start.to_string(),
                            limit: 10,
                        });
                    }
                    let next = current.join(location).map_err(|_| HttpError::BadRedirect {
                        url: current.to_string(),
                        location: location.to_string(),
                    })?;
                    chain.push(next);
                    continue;
                }
            }
            let body = (buffer && (200..300).contains(&route.status)).then(|| route.body.clone());
            return Ok(ProbeResult {
                chain,
                status: route.status,
                headers: route.headers.clone(),
                body,
            });
        }
    }
}

impl HttpClient for ScriptedClient {
    fn probe(&self, url: &Url) -> Result<ProbeResult, HttpError> {
        self.follow(url, false)
    }

    fn download(&self, url: &Url) -> Result<ProbeResult, HttpError> {
        self.follow(url, true)
    }
}
