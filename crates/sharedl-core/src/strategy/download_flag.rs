use url::Url;

use super::{ResolveContext, Strategy, StrategyKind};
use crate::provider::query_param;

/// Appends `download=1` to a primary-host terminal URL that lacks the flag.
pub struct DownloadFlag;

impl Strategy for DownloadFlag {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DownloadFlag
    }

    fn candidate(&self, ctx: &ResolveContext<'_>) -> Option<Url> {
        let terminal = ctx.followed?.final_url()?;
        if !ctx.provider.is_primary(terminal) || query_param(terminal, "download").is_some() {
            return None;
        }
        let mut url = terminal.clone();
        let query = match terminal.query() {
            Some(q) if !q.is_empty() => format!("{}&download=1", q),
            _ => "download=1".to_string(),
        };
        url.set_query(Some(&query));
        Some(url)
    }
}
