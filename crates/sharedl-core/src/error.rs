//! Errors surfaced by resolution and fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Input is not an absolute http(s) URL.
    #[error("invalid share link {input:?}: {reason}")]
    InvalidLink { input: String, reason: String },

    /// No strategy produced a validated direct URL.
    #[error(
        "could not resolve a direct download URL for {input} (tried: {}); \
         check that the link is shared with \"anyone with the link\"",
        join_attempts(.attempted)
    )]
    Resolution {
        input: String,
        attempted: Vec<String>,
    },

    /// A validated direct URL could not be fetched, fallbacks included.
    #[error("failed to download {last_url} (tried: {})", join_attempts(.attempted))]
    Transport {
        last_url: String,
        attempted: Vec<String>,
    },
}

impl ResolveError {
    /// URLs attempted before giving up, in order.
    pub fn attempted(&self) -> &[String] {
        match self {
            ResolveError::InvalidLink { .. } => &[],
            ResolveError::Resolution { attempted, .. } | ResolveError::Transport { attempted, .. } => {
                attempted.as_slice()
            }
        }
    }
}

fn join_attempts(attempted: &[String]) -> String {
    if attempted.is_empty() {
        "nothing".to_string()
    } else {
        attempted.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_message_names_input_and_guidance() {
        let err = ResolveError::Resolution {
            input: "https://1drv.ms/x/s!abc".to_string(),
            attempted: vec!["https://onedrive.live.com/download?resid=A".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("https://1drv.ms/x/s!abc"));
        assert!(msg.contains("download?resid=A"));
        assert!(msg.contains("anyone with the link"));
    }

    #[test]
    fn transport_message_names_last_url() {
        let err = ResolveError::Transport {
            last_url: "https://onedrive.live.com/download?cid=A".to_string(),
            attempted: vec![],
        };
        let msg = err.to_string();
        assert!(msg.contains("download?cid=A"));
        assert!(msg.contains("tried: nothing"));
        assert!(err.attempted().is_empty());
    }
}
