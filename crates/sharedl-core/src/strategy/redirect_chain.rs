//! Pick share parameters out of any URL visited while following the link.

use url::Url;

use super::{ResolveContext, Strategy, StrategyKind};
use crate::provider::ShareParams;

/// First provider URL in the chain carrying resid and authkey wins.
pub struct RedirectChainParams;

impl Strategy for RedirectChainParams {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RedirectChain
    }

    fn candidate(&self, ctx: &ResolveContext<'_>) -> Option<Url> {
        let followed = ctx.followed?;
        let params = followed
            .chain
            .iter()
            .filter(|u| ctx.provider.is_primary(u) || ctx.provider.is_content(u))
            .find_map(ShareParams::from_url)?;
        tracing::debug!(resid = %params.resid, cid = ?params.cid, "share params found in redirect chain");
        ctx.provider.download_url(&params.with_derived_cid())
    }
}
