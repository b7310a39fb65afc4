use url::Url;

use super::{ResolveContext, Strategy, StrategyKind};
use crate::classify;

/// The terminal URL is already a file; it was validated by the follow itself.
pub struct PassThrough;

impl Strategy for PassThrough {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PassThrough
    }

    fn needs_validation(&self) -> bool {
        false
    }

    fn candidate(&self, ctx: &ResolveContext<'_>) -> Option<Url> {
        let followed = ctx.followed?;
        let (status, headers) = followed.terminal.as_ref()?;
        if *status == 200 && classify::looks_like_file(headers, ctx.min_file_bytes) {
            followed.final_url().cloned()
        } else {
            None
        }
    }
}
