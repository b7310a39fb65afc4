//! `sharedl fetch <link>` – download the shared file to disk.

use anyhow::{Context, Result};
use sharedl_core::checksum;
use sharedl_core::filename::derive_filename;
use sharedl_core::http::HttpClient;
use sharedl_core::resolver::ShareLinkResolver;
use sharedl_core::share_link::ShareLink;
use sharedl_core::trail::DebugTrail;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::emit_trail;

pub fn run_fetch<C: HttpClient>(
    resolver: &ShareLinkResolver<C>,
    link: &str,
    output: &Path,
    show_trail: bool,
) -> Result<()> {
    let link = ShareLink::parse(link)?;
    let mut trail = DebugTrail::new();
    let result = resolver.fetch(&link, &mut trail);
    emit_trail(show_trail, &trail);
    let downloaded = result?;

    let file = &downloaded.file;
    let name = derive_filename(&file.url, file.headers.content_disposition.as_deref());
    let target = target_path(output, &name);
    write_atomically(&target, &file.bytes)?;

    println!("Saved {} bytes to {}", file.bytes.len(), target.display());
    println!("  sha256  {}", checksum::sha256_hex(&file.bytes));
    println!("  source  {}", downloaded.resolution.direct_url);
    Ok(())
}

/// Directories get the derived name appended; anything else is used as-is.
pub(crate) fn target_path(output: &Path, name: &str) -> PathBuf {
    if output.is_dir() {
        output.join(name)
    } else {
        output.to_path_buf()
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("write {}", tmp.path().display()))?;
    tmp.persist(path)
        .with_context(|| format!("rename into {}", path.display()))?;
    Ok(())
}
