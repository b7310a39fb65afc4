//! CLI command handlers, one per file.

mod fetch;
mod resolve;
mod show;

pub use fetch::run_fetch;
pub use resolve::run_resolve;
pub use show::{run_show, ShowOptions};

use sharedl_core::trail::DebugTrail;

/// Dumps the trail as JSON on stderr when requested.
fn emit_trail(enabled: bool, trail: &DebugTrail) {
    if !enabled {
        return;
    }
    match trail.to_json_pretty() {
        Ok(json) => eprintln!("{}", json),
        Err(e) => tracing::warn!("could not serialize trail: {}", e),
    }
}
