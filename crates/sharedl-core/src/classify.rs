//! Header-only file-likeness classifier.
//!
//! Decides whether a response carries downloadable file content or an HTML
//! viewer / redirect stub. Never looks at the body.

use crate::http::{ProbeResult, ResponseHeaders};

/// Default `Content-Length` threshold; tiny payloads are usually HTML stubs.
pub const DEFAULT_MIN_FILE_BYTES: u64 = 1024;

/// Content-Type markers that identify file content outright.
const FILE_MIME_MARKERS: &[&str] = &[
    "application/vnd.openxmlformats-officedocument",
    "application/vnd.ms-excel",
    "application/octet-stream",
];

/// Why a response was (or was not) considered file-like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    FileMime,
    Attachment,
    LargeBody,
    /// No strong signal either way; treated as not file-like.
    Ambiguous,
}

impl Verdict {
    pub fn is_file_like(self) -> bool {
        !matches!(self, Verdict::Ambiguous)
    }
}

/// Applies the rules in order: file MIME type, attachment disposition,
/// then a numeric `Content-Length` strictly above `min_bytes`.
pub fn classify(headers: &ResponseHeaders, min_bytes: u64) -> Verdict {
    let content_type = headers
        .content_type
        .as_deref()
        .unwrap_or("")
        .to_ascii_lowercase();
    if FILE_MIME_MARKERS.iter().any(|m| content_type.contains(m)) {
        return Verdict::FileMime;
    }

    let disposition = headers
        .content_disposition
        .as_deref()
        .unwrap_or("")
        .to_ascii_lowercase();
    if disposition.contains("attachment") {
        return Verdict::Attachment;
    }

    match headers.content_length_bytes() {
        Some(n) if n > min_bytes => Verdict::LargeBody,
        _ => Verdict::Ambiguous,
    }
}

pub fn looks_like_file(headers: &ResponseHeaders, min_bytes: u64) -> bool {
    classify(headers, min_bytes).is_file_like()
}

/// A probe accepts a candidate only on HTTP 200 with a file-like verdict.
pub fn accepts(probe: &ProbeResult, min_bytes: u64) -> bool {
    probe.is_ok() && looks_like_file(&probe.headers, min_bytes)
}
