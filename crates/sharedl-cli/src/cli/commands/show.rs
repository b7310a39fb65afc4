//! `sharedl show <link>` – decode a shared CSV and print it with a bar chart.

use anyhow::{bail, Result};
use sharedl_core::filename::derive_filename;
use sharedl_core::http::HttpClient;
use sharedl_core::resolver::ShareLinkResolver;
use sharedl_core::share_link::ShareLink;
use sharedl_core::table;
use sharedl_core::trail::DebugTrail;

use super::emit_trail;
use crate::cli::render;

const CHART_WIDTH: usize = 40;

#[derive(Debug, Clone)]
pub struct ShowOptions {
    pub rows: usize,
    pub chart: Option<String>,
    pub label: Option<String>,
}

pub fn run_show<C: HttpClient>(
    resolver: &ShareLinkResolver<C>,
    link: &str,
    opts: &ShowOptions,
    show_trail: bool,
) -> Result<()> {
    let link = ShareLink::parse(link)?;
    let mut trail = DebugTrail::new();
    let result = resolver.fetch(&link, &mut trail);
    emit_trail(show_trail, &trail);
    let downloaded = result?;

    let file = &downloaded.file;
    let name = derive_filename(&file.url, file.headers.content_disposition.as_deref());
    let format = table::detect_format(Some(name.as_str()), file.headers.content_type.as_deref(), &file.bytes);
    tracing::debug!("decoding {} ({} bytes) as {}", name, file.bytes.len(), format);
    let table = table::decode(&file.bytes, format)?;

    println!("{} ({} rows)", name, table.rows.len());
    print!("{}", render::table(&table, opts.rows));

    let value_col = match opts.chart.as_deref() {
        Some(col) => match table.column_index(col) {
            Some(i) => Some(i),
            None => bail!("no column named {:?}", col),
        },
        None => table.first_numeric_column(),
    };
    let Some(value_col) = value_col else {
        println!("(no numeric column to chart)");
        return Ok(());
    };
    let label_col = match opts.label.as_deref() {
        Some(col) => match table.column_index(col) {
            Some(i) => Some(i),
            None => bail!("no column named {:?}", col),
        },
        None => (value_col != 0).then_some(0),
    };

    let series = table.numeric_series(value_col, label_col);
    println!();
    println!("{}", table.headers[value_col]);
    print!("{}", render::bar_chart(&series, CHART_WIDTH));
    Ok(())
}
