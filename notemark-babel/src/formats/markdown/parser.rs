//! Markdown parsing (text → block document)
//!
//! The scanner walks the line array with an explicit cursor. At each non-blank
//! position it tries one `try_*` function per block kind, in priority order;
//! the first that recognizes the line returns the block and the index of the
//! first line it did not consume. Paragraph is the fallback and always
//! consumes at least one line, so the scan is linear in the number of lines.
//!
//! Priority order:
//!
//! | # | Kind            | Start condition                                     |
//! |---|-----------------|-----------------------------------------------------|
//! | 1 | blank           | skipped                                             |
//! | 2 | heading         | `#`×1–6 then a space                                |
//! | 3 | thematic break  | 3+ of one of `-`, `*`, `_`, spaces allowed          |
//! | 4 | fence           | 3+ backticks, optional language                     |
//! | 5 | quote / callout | `>`                                                 |
//! | 6 | table           | pipe row followed by a matching separator row       |
//! | 7 | list            | `1.`, `- [ ]`/`- [x]`, or `-`/`*`/`+`               |
//! | 8 | raw             | 4-space/tab indent, `|` or `<`                      |
//! | 9 | paragraph       | anything else, until blank line or a block start    |
//!
//! Parsing never fails: every line ends up in some block.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::inline::parse_inline;
use crate::common::flat_to_nested::{lines_to_tree, FlatItem};
use crate::common::table::{is_separator_row, normalize_columns, parse_row, unescape_cell};
use crate::ir::inline::{Inline, RichText};
use crate::ir::nodes::{Block, Callout, CalloutKind, Document, List, ListItem, ListStyle, Table};
use crate::options::CodecOptions;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*))?$").expect("heading pattern is valid"));

static CALLOUT_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[!([A-Za-z]+)\][ \t]*(.*)$").expect("callout pattern is valid")
});

static CHECKBOX_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([ \t]*)[-*+] \[([ xX])\](?:[ \t]+(.*))?$").expect("checkbox pattern is valid")
});

static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([ \t]*)\d{1,9}\.(?:[ \t]+(.*))?$").expect("ordered pattern is valid")
});

static BULLET_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([ \t]*)[-*+](?:[ \t]+(.*))?$").expect("bullet pattern is valid")
});

/// Parse a markdown string into a block document.
pub fn parse_markdown(source: &str, options: &CodecOptions) -> Document {
    let normalized = normalize_line_endings(source);
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut blocks = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        if is_blank(lines[index]) {
            index += 1;
            continue;
        }
        let (block, next) = next_block(&lines, index, options);
        trace!(kind = block.kind(), line = index + 1, consumed = next - index, "block");
        blocks.push(block);
        index = next;
    }

    debug!(lines = lines.len(), blocks = blocks.len(), "parsed markdown");
    Document::from_blocks(blocks)
}

pub(crate) fn normalize_line_endings(source: &str) -> String {
    source.replace("\r\n", "\n").replace('\r', "\n")
}

fn next_block(lines: &[&str], index: usize, options: &CodecOptions) -> (Block, usize) {
    try_heading(lines, index)
        .or_else(|| try_thematic_break(lines, index))
        .or_else(|| try_fence(lines, index, options))
        .or_else(|| try_quote(lines, index))
        .or_else(|| try_table(lines, index))
        .or_else(|| try_list(lines, index))
        .or_else(|| try_raw(lines, index))
        .unwrap_or_else(|| parse_paragraph(lines, index))
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Leading indentation in columns; a tab counts as four.
fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

// ---------------------------------------------------------------------------
// Heading
// ---------------------------------------------------------------------------

fn try_heading(lines: &[&str], index: usize) -> Option<(Block, usize)> {
    let caps = HEADING.captures(lines[index])?;
    let level = caps.get(1).map_or(1, |m| m.as_str().len()) as u8;
    let text = caps.get(2).map_or("", |m| m.as_str()).trim();
    Some((Block::heading(level, parse_inline(text)), index + 1))
}

// ---------------------------------------------------------------------------
// Thematic break
// ---------------------------------------------------------------------------

pub(crate) fn is_thematic_break(line: &str) -> bool {
    if indent_width(line) >= 4 {
        return false;
    }
    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let Some(first) = marks.next() else {
        return false;
    };
    if !matches!(first, '-' | '*' | '_') {
        return false;
    }
    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

fn try_thematic_break(lines: &[&str], index: usize) -> Option<(Block, usize)> {
    is_thematic_break(lines[index]).then_some((Block::ThematicBreak, index + 1))
}

// ---------------------------------------------------------------------------
// Fenced code and diagrams
// ---------------------------------------------------------------------------

struct FenceOpen<'a> {
    indent: usize,
    ticks: usize,
    language: &'a str,
}

fn fence_open(line: &str) -> Option<FenceOpen<'_>> {
    let indent = indent_width(line);
    if indent >= 4 {
        return None;
    }
    let rest = line.trim_start();
    let ticks = rest.chars().take_while(|c| *c == '`').count();
    if ticks < 3 {
        return None;
    }
    let info = rest[ticks..].trim();
    if info.contains('`') {
        return None;
    }
    let language = info.split_whitespace().next().unwrap_or("");
    Some(FenceOpen {
        indent,
        ticks,
        language,
    })
}

pub(crate) fn is_fence_open(line: &str) -> bool {
    fence_open(line).is_some()
}

fn closes_fence(line: &str, ticks: usize) -> bool {
    if indent_width(line) >= 4 {
        return false;
    }
    let rest = line.trim();
    let run = rest.chars().take_while(|c| *c == '`').count();
    run >= ticks && run == rest.len()
}

fn try_fence(lines: &[&str], index: usize, options: &CodecOptions) -> Option<(Block, usize)> {
    let open = fence_open(lines[index])?;

    let mut body = Vec::new();
    let mut next = index + 1;
    let mut closed = false;
    while next < lines.len() {
        let line = lines[next];
        next += 1;
        if closes_fence(line, open.ticks) {
            closed = true;
            break;
        }
        body.push(strip_indent(line, open.indent));
    }
    if !closed {
        debug!(line = index + 1, "unterminated fence runs to end of input");
    }

    let code = body.join("\n");
    let block = if options.is_diagram_language(open.language) {
        Block::diagram(code)
    } else {
        Block::code(open.language, code)
    };
    Some((block, next))
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let strip = line
        .char_indices()
        .take(indent)
        .take_while(|(_, c)| *c == ' ')
        .count();
    &line[strip..]
}

// ---------------------------------------------------------------------------
// Quotes and callouts
// ---------------------------------------------------------------------------

pub(crate) fn is_quote_line(line: &str) -> bool {
    indent_width(line) < 4 && line.trim_start().starts_with('>')
}

fn strip_quote_marker(line: &str) -> &str {
    let rest = line.trim_start();
    let rest = rest.strip_prefix('>').unwrap_or(rest);
    rest.strip_prefix(' ').unwrap_or(rest)
}

fn try_quote(lines: &[&str], index: usize) -> Option<(Block, usize)> {
    if !is_quote_line(lines[index]) {
        return None;
    }
    let mut next = index;
    let mut stripped = Vec::new();
    while next < lines.len() && is_quote_line(lines[next]) {
        stripped.push(strip_quote_marker(lines[next]));
        next += 1;
    }

    if let Some(caps) = CALLOUT_MARKER.captures(stripped[0]) {
        let kind = CalloutKind::from_token(caps.get(1).map_or("", |m| m.as_str()));
        let lead = caps.get(2).map_or("", |m| m.as_str()).trim();
        let mut message_lines: Vec<&str> = Vec::with_capacity(stripped.len());
        if !lead.is_empty() {
            message_lines.push(lead);
        }
        message_lines.extend(stripped[1..].iter().copied());
        let message = parse_inline(message_lines.join("\n").trim());
        return Some((Block::Callout(Callout { kind, message }), next));
    }

    Some((Block::quote(stripped.join("\n")), next))
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn table_row(line: &str) -> Option<Vec<String>> {
    if indent_width(line) >= 4 || is_blank(line) {
        return None;
    }
    parse_row(line)
}

pub(crate) fn starts_table(lines: &[&str], index: usize) -> bool {
    match (table_row(lines[index]), lines.get(index + 1)) {
        (Some(header), Some(separator)) => is_separator_row(separator, header.len()),
        _ => false,
    }
}

fn try_table(lines: &[&str], index: usize) -> Option<(Block, usize)> {
    if !starts_table(lines, index) {
        return None;
    }
    let header = table_row(lines[index])?;

    let mut next = index + 2;
    let mut rows = Vec::new();
    while let Some(row) = lines.get(next).and_then(|line| table_row(line)) {
        rows.push(row);
        next += 1;
    }

    let with_headings = header.iter().any(|cell| !cell.is_empty());
    let mut content: Vec<Vec<String>> = if with_headings {
        std::iter::once(header).chain(rows).collect()
    } else {
        rows
    };
    for row in content.iter_mut() {
        for cell in row.iter_mut() {
            *cell = unescape_cell(cell);
        }
    }
    normalize_columns(&mut content);

    Some((
        Block::Table(Table {
            with_headings,
            content,
        }),
        next,
    ))
}

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Marker {
    Bullet,
    Ordered,
    Checkbox(bool),
}

impl Marker {
    fn style(self) -> ListStyle {
        match self {
            Marker::Bullet => ListStyle::Unordered,
            Marker::Ordered => ListStyle::Ordered,
            Marker::Checkbox(_) => ListStyle::Checklist,
        }
    }
}

struct ListLine<'a> {
    indent: usize,
    marker: Marker,
    text: &'a str,
}

fn list_line(line: &str) -> Option<ListLine<'_>> {
    let (caps, marker) = if let Some(caps) = CHECKBOX_ITEM.captures(line) {
        let checked = caps.get(2).is_some_and(|m| m.as_str() != " ");
        (caps, Marker::Checkbox(checked))
    } else if let Some(caps) = ORDERED_ITEM.captures(line) {
        (caps, Marker::Ordered)
    } else if let Some(caps) = BULLET_ITEM.captures(line) {
        (caps, Marker::Bullet)
    } else {
        return None;
    };
    let indent = caps.get(1).map_or(0, |m| indent_width(m.as_str()));
    let text_group = if matches!(marker, Marker::Checkbox(_)) { 3 } else { 2 };
    let text = caps.get(text_group).map_or("", |m| m.as_str());
    Some(ListLine {
        indent,
        marker,
        text,
    })
}

pub(crate) fn is_list_start(line: &str) -> bool {
    list_line(line).is_some_and(|parsed| parsed.indent < 4)
}

fn try_list(lines: &[&str], index: usize) -> Option<(Block, usize)> {
    let first = list_line(lines[index]).filter(|parsed| parsed.indent < 4)?;
    let style = first.marker.style();
    let base = first.indent;

    let mut flat: Vec<FlatItem> = Vec::new();
    let mut next = index;
    while next < lines.len() {
        let line = lines[next];
        if is_blank(line) {
            break;
        }
        match list_line(line) {
            Some(parsed) => {
                // A different marker family at the top level starts a new list.
                if parsed.indent <= base && parsed.marker.style() != style {
                    break;
                }
                flat.push(FlatItem::new(parsed.indent, list_item(&parsed, style)));
            }
            None if indent_width(line) > base && !flat.is_empty() => {
                // Lazy continuation of the previous item.
                if let Some(last) = flat.last_mut() {
                    append_continuation(&mut last.item.content, line.trim());
                }
            }
            None => break,
        }
        next += 1;
    }

    Some((
        Block::List(List {
            style,
            items: lines_to_tree(flat),
        }),
        next,
    ))
}

fn list_item(line: &ListLine<'_>, style: ListStyle) -> ListItem {
    let item = ListItem::new(parse_inline(line.text.trim()));
    match line.marker {
        Marker::Checkbox(checked) => item.with_checked(checked),
        _ if style == ListStyle::Checklist => item.with_checked(false),
        _ => item,
    }
}

fn append_continuation(content: &mut RichText, line: &str) {
    let more = parse_inline(line);
    if more.is_empty() {
        return;
    }
    if !content.is_empty() {
        content.0.push(Inline::Text(" ".to_string()));
    }
    for node in more.0 {
        match (content.0.last_mut(), node) {
            (Some(Inline::Text(last)), Inline::Text(next)) => last.push_str(&next),
            (_, node) => content.0.push(node),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw fallback
// ---------------------------------------------------------------------------

pub(crate) fn is_raw_start(line: &str) -> bool {
    if indent_width(line) >= 4 {
        return true;
    }
    let rest = line.trim_start();
    rest.starts_with('|') || rest.starts_with('<')
}

fn try_raw(lines: &[&str], index: usize) -> Option<(Block, usize)> {
    if !is_raw_start(lines[index]) {
        return None;
    }
    let mut next = index;
    while next < lines.len() && !is_blank(lines[next]) {
        next += 1;
    }
    Some((Block::raw(lines[index..next].join("\n")), next))
}

// ---------------------------------------------------------------------------
// Paragraph
// ---------------------------------------------------------------------------

/// True when `line` on its own would start a block other than a paragraph.
pub(crate) fn opens_block(line: &str) -> bool {
    HEADING.is_match(line)
        || is_thematic_break(line)
        || is_fence_open(line)
        || is_quote_line(line)
        || is_list_start(line)
        || is_raw_start(line)
}

fn starts_block(lines: &[&str], index: usize) -> bool {
    opens_block(lines[index]) || starts_table(lines, index)
}

fn parse_paragraph(lines: &[&str], index: usize) -> (Block, usize) {
    let mut next = index + 1;
    while next < lines.len() && !is_blank(lines[next]) && !starts_block(lines, next) {
        next += 1;
    }
    let text = lines[index..next]
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");
    (Block::paragraph(parse_inline(&text)), next)
}
