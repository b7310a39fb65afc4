//! Plain-text table and bar chart rendering.

use sharedl_core::table::Table;

const MAX_CELL: usize = 24;

fn clip(cell: &str) -> String {
    let flat = cell.replace(|c: char| c == '\n' || c == '\r', " ");
    if flat.chars().count() <= MAX_CELL {
        flat
    } else {
        let mut s: String = flat.chars().take(MAX_CELL - 1).collect();
        s.push('…');
        s
    }
}

/// Header, separator and the first `max_rows` rows, columns padded to width.
pub fn table(t: &Table, max_rows: usize) -> String {
    let headers: Vec<String> = t.headers.iter().map(|h| clip(h)).collect();
    let rows: Vec<Vec<String>> = t
        .rows
        .iter()
        .take(max_rows)
        .map(|r| r.iter().map(|c| clip(c)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };

    let mut out = line(&headers);
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", sep.join("-+-")));
    for row in &rows {
        out.push_str(&line(row));
    }
    if t.rows.len() > max_rows {
        out.push_str(&format!("… {} more rows\n", t.rows.len() - max_rows));
    }
    out
}

/// One bar per value, scaled so the largest magnitude spans `width` cells.
pub fn bar_chart(series: &[(String, f64)], width: usize) -> String {
    let max = series
        .iter()
        .map(|(_, v)| v.abs())
        .fold(0.0_f64, f64::max);
    let label_width = series
        .iter()
        .map(|(l, _)| clip(l).chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, value) in series {
        let len = if max > 0.0 {
            ((value.abs() / max) * width as f64).round() as usize
        } else {
            0
        };
        let bar = if *value < 0.0 { "░" } else { "█" }.repeat(len);
        out.push_str(&format!(
            "{:<lw$} {} {}\n",
            clip(label),
            bar,
            value,
            lw = label_width
        ));
    }
    out
}
