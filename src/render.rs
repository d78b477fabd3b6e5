use crate::generator::GeneratedResult;
use std::io::{self, Write};

pub const HEADERS: [&str; 5] = ["No", "ISSUER", "IDENTIFIER", "TOTP", "REMAINING"];
const PADDING: usize = 5;

/// Print one left-aligned row per result, numbered by store position.
pub fn render_table<W: Write>(out: &mut W, results: &[GeneratedResult]) -> io::Result<()> {
    let rows: Vec<[String; 5]> = results
        .iter()
        .enumerate()
        .map(|(index, r)| {
            [
                index.to_string(),
                r.issuer.clone(),
                r.identifier.clone(),
                r.code.clone(),
                r.remaining.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header = HEADERS.map(str::to_string);
    for row in std::iter::once(&header).chain(&rows) {
        let mut line = String::new();
        for (cell, width) in row.iter().zip(widths) {
            line.push_str(cell);
            let fill = width - cell.chars().count() + PADDING;
            line.extend(std::iter::repeat_n(' ', fill));
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}
