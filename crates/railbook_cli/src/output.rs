//! Output formatting shared by every command.

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::Result;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Box-drawn table for humans
    #[default]
    Table,
    /// Pretty JSON for scripts
    Json,
}

/// Print `value` as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Render rows under `headers` as a box-drawn table.
///
/// Column widths follow the widest cell, counted in chars so that `₹` and
/// `→` line up.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, segments.join(mid), right)
    };
    let line = |cells: &[String]| {
        let padded: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let pad = w - cell.chars().count();
                format!(" {}{} ", cell, " ".repeat(pad))
            })
            .collect();
        format!("│{}│\n", padded.join("│"))
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut table = rule("┌", "┬", "┐");
    table.push_str(&line(&header_cells));
    table.push_str(&rule("├", "┼", "┤"));
    for row in rows {
        table.push_str(&line(row));
    }
    table.push_str(&rule("└", "┴", "┘"));
    table
}

/// Print a table, or `empty` when there are no rows.
pub fn write_table(
    out: &mut dyn Write,
    headers: &[&str],
    rows: &[Vec<String>],
    empty: &str,
) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "{}", empty)?;
    } else {
        write!(out, "{}", render_table(headers, rows))?;
    }
    Ok(())
}
