//! Embed links carry resid and authkey directly.

use url::Url;

use super::{ResolveContext, Strategy, StrategyKind};
use crate::provider::ShareParams;
use crate::share_link::is_embed_path;

/// `.../embed?resid=R&authkey=K` → `.../download?resid=R&authkey=K`, no network needed.
pub struct EmbedForm;

impl Strategy for EmbedForm {
    fn kind(&self) -> StrategyKind {
        StrategyKind::EmbedForm
    }

    fn needs_chain(&self) -> bool {
        false
    }

    fn candidate(&self, ctx: &ResolveContext<'_>) -> Option<Url> {
        let url = ctx.link.url();
        if !ctx.provider.is_primary(url) || !is_embed_path(url) {
            return None;
        }
        let params = ShareParams::from_url(url)?;
        // cid is not carried over from embed links
        ctx.provider.download_url(&ShareParams { cid: None, ..params })
    }
}
