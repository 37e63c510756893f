//! Markdown serialization (block document → text)
//!
//! Each block renders on its own; non-empty renders are joined with one blank
//! line and the document ends with exactly one newline. Output is canonical:
//! serializing, parsing and serializing again gives the same text.
//!
//! | Block          | Rendering                                                    |
//! |----------------|--------------------------------------------------------------|
//! | heading        | `#`×level, a space, single-line inline content                |
//! | paragraph      | inline content; lines that would open a block are escaped    |
//! | quote          | `> ` before every line (`>` for empty lines)                  |
//! | callout        | `> [!KIND]`, then the message as quote lines                 |
//! | list           | depth-first, indented per level, numbering per sibling group |
//! | table          | padded rows, `---` separator row, escaped cells              |
//! | code / diagram | backtick fence long enough for the content                   |
//! | thematic break | `---`                                                        |
//! | raw            | verbatim                                                     |
//! | unknown        | `json` fence holding `{"type", "data"}`                      |

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use tracing::debug;

use super::inline::render_inline;
use super::parser::{is_thematic_break, normalize_line_endings, opens_block, starts_table};
use crate::common::nested_to_flat::tree_to_lines;
use crate::common::table::{escape_cell, format_row, separator_row};
use crate::ir::inline::RichText;
use crate::ir::nodes::{Block, Callout, Document, List, ListStyle, Table, UnknownBlock};
use crate::options::CodecOptions;

static ORDERED_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,9})\.(\s|$)").expect("ordered start pattern is valid"));

/// Serialize a block document to canonical markdown.
pub fn serialize_markdown(doc: &Document, options: &CodecOptions) -> String {
    let rendered: Vec<String> = doc
        .iter_blocks()
        .map(|block| render_block(block, options))
        .filter(|text| !text.is_empty())
        .collect();

    debug!(
        blocks = doc.len(),
        rendered = rendered.len(),
        "serialized markdown"
    );

    let mut out = rendered.join("\n\n");
    out.push('\n');
    out
}

/// Render one block without surrounding blank lines.
pub fn render_block(block: &Block, options: &CodecOptions) -> String {
    match block {
        Block::Heading(heading) => {
            let level = heading.level.clamp(1, 6) as usize;
            format!("{} {}", "#".repeat(level), single_line(&heading.content))
        }
        Block::Paragraph(paragraph) => render_paragraph(&paragraph.content),
        Block::Quote(quote) => quote_lines(&normalize_line_endings(&quote.text)),
        Block::Callout(callout) => render_callout(callout),
        Block::List(list) => render_list(list, options),
        Block::Table(table) => render_table(table),
        Block::Code(code) => fenced(&code.language, &code.code),
        Block::Diagram(diagram) => fenced(&options.diagram_language, &diagram.source),
        Block::ThematicBreak => "---".to_string(),
        Block::Raw(raw) => normalize_line_endings(&raw.html),
        Block::Unknown(unknown) => render_unknown(unknown),
    }
}

/// Inline content flattened onto one line.
fn single_line(content: &RichText) -> String {
    render_inline(content)
        .split('\n')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_paragraph(content: &RichText) -> String {
    let mut lines: Vec<String> = render_inline(content)
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(escape_block_start)
        .collect();
    escape_table_separators(&mut lines);
    lines.join("\n")
}

/// Keeps a paragraph line from being read back as the start of another block.
fn escape_block_start(line: &str) -> String {
    if let Some(caps) = ORDERED_START.captures(line) {
        let digits = caps.get(1).map_or(0, |m| m.end());
        return format!("{}\\{}", &line[..digits], &line[digits..]);
    }
    if opens_block(line) {
        format!("\\{line}")
    } else {
        line.to_string()
    }
}

/// Escapes the pipes of any line that would read back as the separator row
/// of a table headed by the line above it.
fn escape_table_separators(lines: &mut [String]) {
    for index in 1..lines.len() {
        let pair = [lines[index - 1].as_str(), lines[index].as_str()];
        if starts_table(&pair, 0) {
            lines[index] = escape_bare_pipes(&lines[index]);
        }
    }
}

fn escape_bare_pipes(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 4);
    let mut prev = None;
    for c in line.chars() {
        if c == '|' && prev != Some('\\') {
            out.push('\\');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn quote_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_callout(callout: &Callout) -> String {
    let marker = format!("> [!{}]", callout.kind.as_token());
    let message = render_inline(&callout.message);
    if message.trim().is_empty() {
        marker
    } else {
        format!("{marker}\n{}", quote_lines(&message))
    }
}

fn render_list(list: &List, options: &CodecOptions) -> String {
    if list.items.is_empty() {
        return match list.style {
            ListStyle::Ordered => "1. ",
            ListStyle::Unordered => "- ",
            ListStyle::Checklist => "- [ ] ",
        }
        .to_string();
    }

    let mut lines: Vec<String> = tree_to_lines(&list.items)
        .into_iter()
        .map(|line| {
            let indent = " ".repeat(options.list_indent * line.depth);
            let marker = match (list.style, line.item.checked) {
                (ListStyle::Checklist, checked) => checkbox(checked.unwrap_or(false)),
                (_, Some(checked)) => checkbox(checked),
                (ListStyle::Ordered, None) => format!("{}. ", line.index),
                (ListStyle::Unordered, None) => "- ".to_string(),
            };
            let content = single_line(&line.item.content);
            let rendered = format!("{indent}{marker}{content}");
            // `- ---` would read back as a thematic break.
            if is_thematic_break(&rendered) {
                format!("{indent}{marker}\\{content}")
            } else {
                rendered
            }
        })
        .collect();
    escape_table_separators(&mut lines);
    lines.join("\n")
}

fn checkbox(checked: bool) -> String {
    if checked {
        "- [x] ".to_string()
    } else {
        "- [ ] ".to_string()
    }
}

fn render_table(table: &Table) -> String {
    let columns = table.column_count().max(1);
    let pad = |row: &[String]| -> Vec<String> {
        (0..columns)
            .map(|col| escape_cell(row.get(col).map(String::as_str).unwrap_or("")))
            .collect()
    };

    let (header, body) = match table.content.split_first() {
        Some((first, rest)) if table.with_headings => (pad(first.as_slice()), rest),
        _ => (vec![String::new(); columns], table.content.as_slice()),
    };

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(format_row(&header));
    lines.push(separator_row(columns));
    for row in body {
        lines.push(format_row(&pad(row.as_slice())));
    }
    lines.join("\n")
}

fn fenced(language: &str, code: &str) -> String {
    let code = normalize_line_endings(code);
    let fence = "`".repeat(fence_length(&code));
    if code.is_empty() {
        format!("{fence}{language}\n{fence}")
    } else {
        format!("{fence}{language}\n{code}\n{fence}")
    }
}

/// One backtick longer than any backtick run opening a line of `code`.
fn fence_length(code: &str) -> usize {
    let longest = code
        .lines()
        .map(|line| line.trim_start().chars().take_while(|c| *c == '`').count())
        .max()
        .unwrap_or(0);
    (longest + 1).max(3)
}

fn render_unknown(unknown: &UnknownBlock) -> String {
    let dump = json!({ "type": unknown.kind, "data": unknown.data });
    let text = serde_json::to_string_pretty(&dump).unwrap_or_default();
    fenced("json", &text)
}
