//! Parse HTTP response header lines into ResponseHeaders.

use serde::Serialize;

/// Headers the classifier and redirect follower care about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseHeaders {
    /// Status code from the last status line seen.
    pub status: Option<u32>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    /// Raw `Content-Length` value; may be non-numeric.
    pub content_length: Option<String>,
    pub location: Option<String>,
}

impl ResponseHeaders {
    /// `Content-Length` when present and numeric.
    pub fn content_length_bytes(&self) -> Option<u64> {
        self.content_length.as_deref()?.trim().parse().ok()
    }
}

/// Parse collected header lines. A new status line (interim 1xx, proxy
/// CONNECT) resets everything collected so far.
pub fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            out = ResponseHeaders {
                status: line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|code| code.parse().ok()),
                ..ResponseHeaders::default()
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim().to_string();
            if name.eq_ignore_ascii_case("content-type") {
                out.content_type = Some(value);
            } else if name.eq_ignore_ascii_case("content-disposition") {
                out.content_disposition = Some(value);
            } else if name.eq_ignore_ascii_case("content-length") {
                out.content_length = Some(value);
            } else if name.eq_ignore_ascii_case("location") {
                out.location = Some(value);
            }
        }
    }

    out
}
