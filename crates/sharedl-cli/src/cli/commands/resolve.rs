//! `sharedl resolve <link>` – print the direct download URL.

use anyhow::Result;
use sharedl_core::http::HttpClient;
use sharedl_core::resolver::ShareLinkResolver;
use sharedl_core::share_link::ShareLink;
use sharedl_core::trail::DebugTrail;

use super::emit_trail;

pub fn run_resolve<C: HttpClient>(
    resolver: &ShareLinkResolver<C>,
    link: &str,
    show_trail: bool,
) -> Result<()> {
    let link = ShareLink::parse(link)?;
    let mut trail = DebugTrail::new();
    let result = resolver.resolve_traced(&link, &mut trail);
    emit_trail(show_trail, &trail);

    let resolution = result?;
    println!("{}", resolution.direct_url);
    tracing::debug!(
        "{} link resolved via {}",
        resolution.link_kind,
        resolution.strategy
    );
    Ok(())
}
