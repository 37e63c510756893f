//! Pipe-table cell model shared by the parser, the serializer and the HTML bridge.
//!
//! Rows are `| a | b |` lines. Cells are stored raw (inline markdown), with
//! two encodings undone on the way in and redone on the way out:
//!
//! | In a cell      | In the row text |
//! |----------------|-----------------|
//! | `|`            | `\|`            |
//! | newline        | `<br>`          |
//!
//! Grids handed to a [`crate::ir::Table`] are always rectangular: rows are
//! padded with empty cells up to the widest row, never truncated.

use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATOR_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:?-{3,}:?$").expect("separator pattern is valid"));

static LINE_BREAK_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern is valid"));

/// The separator cell the serializer emits.
pub const SEPARATOR: &str = "---";

/// Splits a pipe row into cells, or `None` when the line is not a row.
///
/// A row contains at least one pipe and starts or ends with one. Cells are
/// split on unescaped pipes and trimmed; `\|` is restored to `|`.
pub fn parse_row(line: &str) -> Option<Vec<String>> {
    let line = line.trim();
    if !line.contains('|') || !(line.starts_with('|') || line.ends_with('|')) {
        return None;
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);

    if line.starts_with('|') {
        cells.remove(0);
    }
    if ends_with_unescaped_pipe(line) {
        cells.pop();
    }

    Some(cells.into_iter().map(|c| c.trim().to_string()).collect())
}

fn ends_with_unescaped_pipe(line: &str) -> bool {
    // A lone "|" both starts and ends the row with the same pipe.
    line.len() > 1 && line.ends_with('|') && !line.ends_with("\\|")
}

/// True when `line` is a header separator with exactly `expected_columns` cells.
pub fn is_separator_row(line: &str, expected_columns: usize) -> bool {
    match parse_row(line) {
        Some(cells) => {
            cells.len() == expected_columns
                && cells.iter().all(|cell| {
                    let compact: String = cell.chars().filter(|c| !c.is_whitespace()).collect();
                    SEPARATOR_CELL.is_match(&compact)
                })
        }
        None => false,
    }
}

/// Pads every row with empty cells up to the widest row.
pub fn normalize_columns(rows: &mut [Vec<String>]) -> usize {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(columns, String::new());
    }
    columns
}

/// Decodes a parsed cell: `<br>` markers become newlines.
pub fn unescape_cell(cell: &str) -> String {
    LINE_BREAK_MARKER.replace_all(cell, "\n").into_owned()
}

/// Encodes a cell for a row: pipes escaped, newlines collapsed to `<br>`.
pub fn escape_cell(cell: &str) -> String {
    let mut out = String::with_capacity(cell.len());
    let mut chars = cell.trim().chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '|' => out.push_str("\\|"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("<br>");
            }
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders one row from already-escaped cells.
pub fn format_row<S: AsRef<str>>(cells: &[S]) -> String {
    let mut out = String::from("|");
    for cell in cells {
        out.push(' ');
        out.push_str(cell.as_ref());
        out.push_str(" |");
    }
    out
}

/// Renders the `| --- | --- |` separator for `columns` columns.
pub fn separator_row(columns: usize) -> String {
    format_row(&vec![SEPARATOR; columns])
}
