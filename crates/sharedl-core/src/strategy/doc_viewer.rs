//! Office viewer pages (`_layouts/15/Doc.aspx?sourcedoc=...`) have a sibling download page.

use url::Url;

use super::{ResolveContext, Strategy, StrategyKind};
use crate::provider::{encode_query, query_param};

const VIEWER_SUFFIX: &str = "/_layouts/15/doc.aspx";
const DOWNLOAD_PAGE: &str = "Download.aspx";

pub struct DocViewer;

impl Strategy for DocViewer {
    fn kind(&self) -> StrategyKind {
        StrategyKind::DocViewer
    }

    fn candidate(&self, ctx: &ResolveContext<'_>) -> Option<Url> {
        let terminal = ctx.followed?.final_url()?;
        let path = terminal.path();
        if !path.to_ascii_lowercase().ends_with(VIEWER_SUFFIX) {
            return None;
        }
        let sourcedoc = query_param(terminal, "sourcedoc").filter(|s| !s.is_empty())?;
        // keep whatever casing the provider used for the prefix
        let prefix = &path[..path.len() - "Doc.aspx".len()];
        let download_path = format!("{}{}", prefix, DOWNLOAD_PAGE);
        let query = encode_query(&[
            ("UniqueId", sourcedoc.as_str()),
            ("Translate", "false"),
            ("download", "1"),
        ]);
        ctx.provider.primary_url(&download_path, &query)
    }
}
