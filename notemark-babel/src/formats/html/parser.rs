//! HTML parsing (clipboard HTML → blocks → markdown)
//!
//! The fragment is parsed with `html5ever` into an `RcDom`, then walked once.
//! Block-level elements become [`Block`]s directly; inline content collects
//! into a pending [`RichText`] buffer that is flushed as a paragraph whenever a
//! block boundary is reached. The blocks are then rendered by the markdown
//! serializer, so pasted content re-enters the editor through exactly the
//! same text the scanner reads for typed or loaded notes.
//!
//! Every `href` goes through the sanitizer. A rejected target keeps only its
//! label, wrapped in literal brackets, so unsafe schemes never reach the
//! output text. Unrecognized tags contribute their converted children.

use std::rc::Rc;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::debug;

use crate::common::links::sanitize_href;
use crate::formats::markdown::inline::{push_node, render_inline};
use crate::formats::markdown::serializer::{render_block, serialize_markdown};
use crate::ir::inline::{Inline, LinkedRef, RichText, LINK_TARGET_ATTRIBUTE};
use crate::ir::nodes::{Block, Document, List, ListItem, ListStyle, Table};
use crate::options::CodecOptions;

/// Elements that contribute nothing, not even text.
const SKIPPED: &[&str] = &[
    "script", "style", "head", "template", "noscript", "title", "meta", "link",
];

/// Elements that only delimit blocks.
const CONTAINERS: &[&str] = &[
    "html",
    "body",
    "div",
    "section",
    "article",
    "main",
    "header",
    "footer",
    "nav",
    "aside",
    "figure",
    "figcaption",
    "details",
    "summary",
    "form",
    "fieldset",
    "address",
    "dl",
    "dt",
    "dd",
    "li",
];

/// Convert an HTML fragment to markdown with default options.
pub fn html_to_markdown(html: &str) -> String {
    html_to_markdown_with_options(html, &CodecOptions::default())
}

pub fn html_to_markdown_with_options(html: &str, options: &CodecOptions) -> String {
    let blocks = html_to_blocks(html, options);
    debug!(bytes = html.len(), blocks = blocks.len(), "converted html");
    serialize_markdown(&Document::from_blocks(blocks), options)
}

/// Convert an HTML fragment to blocks without going through text.
pub fn html_to_blocks(html: &str, options: &CodecOptions) -> Vec<Block> {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    let mut builder = BlockBuilder::new(options);
    builder.walk_children(&dom.document);
    builder.finish()
}

struct BlockBuilder<'o> {
    options: &'o CodecOptions,
    blocks: Vec<Block>,
    pending: Vec<Inline>,
}

impl<'o> BlockBuilder<'o> {
    fn new(options: &'o CodecOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }

    fn flush(&mut self) {
        let content = trim_rich(std::mem::take(&mut self.pending));
        if !content.is_empty() {
            self.blocks.push(Block::paragraph(content));
        }
    }

    fn walk_children(&mut self, handle: &Handle) {
        for child in handle.children.borrow().iter() {
            self.walk(child);
        }
    }

    fn walk(&mut self, handle: &Handle) {
        match &handle.data {
            NodeData::Document => self.walk_children(handle),
            NodeData::Text { contents } => push_text(&mut self.pending, &contents.borrow()),
            NodeData::Element { name, .. } => self.element(handle, &name.local),
            _ => {}
        }
    }

    fn element(&mut self, handle: &Handle, tag: &str) {
        match tag {
            _ if SKIPPED.contains(&tag) => {}
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush();
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                self.blocks
                    .push(Block::heading(level, trim_rich(inline_children(handle))));
            }
            "p" => {
                self.flush();
                self.walk_children(handle);
                self.flush();
            }
            "br" => self.pending.push(Inline::LineBreak),
            "hr" => {
                self.flush();
                self.blocks.push(Block::ThematicBreak);
            }
            "ul" | "ol" => {
                self.flush();
                self.blocks.push(list_block(handle, tag == "ol"));
            }
            "blockquote" => {
                self.flush();
                let mut inner = BlockBuilder::new(self.options);
                inner.walk_children(handle);
                let text = inner
                    .finish()
                    .iter()
                    .map(|block| render_block(block, self.options))
                    .filter(|text| !text.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                if !text.is_empty() {
                    self.blocks.push(Block::quote(text));
                }
            }
            "pre" => {
                self.flush();
                self.blocks.push(code_block(handle));
            }
            "table" => {
                self.flush();
                if let Some(table) = table_block(handle) {
                    self.blocks.push(table);
                }
            }
            _ if CONTAINERS.contains(&tag) => {
                self.flush();
                self.walk_children(handle);
                self.flush();
            }
            _ => {
                for node in inline_element(handle, tag) {
                    push_node(&mut self.pending, node);
                }
            }
        }
    }
}

fn tag_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn attribute(handle: &Handle, key: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == key)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    collect_text(handle, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { name, .. } if &*name.local == "br" => out.push('\n'),
        _ => {
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
    }
}

/// Appends text with whitespace runs collapsed to one space.
fn push_text(nodes: &mut Vec<Inline>, raw: &str) {
    let mut collapsed = String::with_capacity(raw.len());
    let mut in_space = matches!(nodes.last(), Some(Inline::Text(t)) if t.ends_with(' '));
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !in_space {
                collapsed.push(' ');
            }
            in_space = true;
        } else {
            collapsed.push(ch);
            in_space = false;
        }
    }
    if !collapsed.is_empty() {
        push_node(nodes, Inline::Text(collapsed));
    }
}

/// Drops edge whitespace and edge line breaks.
fn trim_rich(mut nodes: Vec<Inline>) -> RichText {
    loop {
        match nodes.first_mut() {
            Some(Inline::LineBreak) => {
                nodes.remove(0);
            }
            Some(Inline::Text(text)) => {
                let trimmed = text.trim_start().to_string();
                if trimmed.is_empty() {
                    nodes.remove(0);
                } else {
                    *text = trimmed;
                    break;
                }
            }
            _ => break,
        }
    }
    loop {
        match nodes.last_mut() {
            Some(Inline::LineBreak) => {
                nodes.pop();
            }
            Some(Inline::Text(text)) => {
                let trimmed = text.trim_end().to_string();
                if trimmed.is_empty() {
                    nodes.pop();
                } else {
                    *text = trimmed;
                    break;
                }
            }
            _ => break,
        }
    }
    RichText::new(nodes)
}

fn inline_children(handle: &Handle) -> Vec<Inline> {
    let mut nodes = Vec::new();
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => push_text(&mut nodes, &contents.borrow()),
            NodeData::Element { name, .. } => {
                for node in inline_element(child, &name.local) {
                    push_node(&mut nodes, node);
                }
            }
            _ => {}
        }
    }
    nodes
}

fn inline_element(handle: &Handle, tag: &str) -> Vec<Inline> {
    match tag {
        _ if SKIPPED.contains(&tag) => Vec::new(),
        "strong" | "b" => vec![Inline::Bold(inline_children(handle))],
        "em" | "i" => vec![Inline::Italic(inline_children(handle))],
        "s" | "strike" | "del" => vec![Inline::Strike(inline_children(handle))],
        "code" | "kbd" | "samp" => {
            let code = text_content(handle).replace('\n', " ");
            if code.is_empty() {
                Vec::new()
            } else {
                vec![Inline::Code(code)]
            }
        }
        "a" => anchor(handle),
        "br" => vec![Inline::LineBreak],
        "input" | "img" => Vec::new(),
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "pre" | "blockquote" | "ul" | "ol"
        | "table" | "tr" => {
            let mut nodes = inline_children(handle);
            nodes.push(Inline::LineBreak);
            nodes
        }
        _ if CONTAINERS.contains(&tag) => {
            let mut nodes = inline_children(handle);
            nodes.push(Inline::LineBreak);
            nodes
        }
        _ => inline_children(handle),
    }
}

fn anchor(handle: &Handle) -> Vec<Inline> {
    let children = inline_children(handle);

    let target = attribute(handle, LINK_TARGET_ATTRIBUTE)
        .map(|target| target.trim().to_string())
        .filter(|target| !target.is_empty() && !target.contains('\n'));
    if let Some(target) = target {
        let label = RichText::new(children).plain_text().trim().to_string();
        let alias = (!label.is_empty()).then_some(label);
        return vec![Inline::LinkedRef(LinkedRef::new(target, alias))];
    }

    let Some(href) = attribute(handle, "href") else {
        return children;
    };
    match sanitize_href(&href) {
        Some(href) => vec![Inline::Link { href, children }],
        None => {
            debug!("pasted link degraded to bracketed text");
            let mut nodes = vec![Inline::Text("[".to_string())];
            for node in children {
                push_node(&mut nodes, node);
            }
            push_node(&mut nodes, Inline::Text("]".to_string()));
            nodes
        }
    }
}

fn list_block(handle: &Handle, ordered: bool) -> Block {
    let items = list_items(handle);
    let style = if ordered {
        ListStyle::Ordered
    } else if items.iter().any(|item| item.checked.is_some()) {
        ListStyle::Checklist
    } else {
        ListStyle::Unordered
    };
    Block::List(List { style, items })
}

fn list_items(handle: &Handle) -> Vec<ListItem> {
    let mut items: Vec<ListItem> = Vec::new();
    for child in handle.children.borrow().iter() {
        match tag_name(child) {
            Some("li") => items.push(list_item(child)),
            // A list nested directly in a list belongs to the previous item.
            Some("ul" | "ol") => {
                let nested = list_items(child);
                match items.last_mut() {
                    Some(last) => last.items.extend(nested),
                    None => items.extend(nested),
                }
            }
            _ => {}
        }
    }
    items
}

fn list_item(handle: &Handle) -> ListItem {
    let mut content = Vec::new();
    let mut children = Vec::new();
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => push_text(&mut content, &contents.borrow()),
            NodeData::Element { name, .. } => match &*name.local {
                "ul" | "ol" => children.extend(list_items(child)),
                tag => {
                    for node in inline_element(child, tag) {
                        push_node(&mut content, node);
                    }
                }
            },
            _ => {}
        }
    }

    let item = ListItem::new(trim_rich(content)).with_children(children);
    match checkbox_state(handle) {
        Some(checked) => item.with_checked(checked),
        None => item,
    }
}

/// Checked state of the first checkbox in an item, not looking into nested lists.
fn checkbox_state(handle: &Handle) -> Option<bool> {
    for child in handle.children.borrow().iter() {
        match tag_name(child) {
            Some("ul" | "ol") => continue,
            Some("input") => {
                let is_checkbox = attribute(child, "type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("checkbox"));
                if is_checkbox {
                    return Some(attribute(child, "checked").is_some());
                }
            }
            Some(_) => {
                if let Some(checked) = checkbox_state(child) {
                    return Some(checked);
                }
            }
            None => {}
        }
    }
    None
}

fn code_block(handle: &Handle) -> Block {
    let code_child = handle
        .children
        .borrow()
        .iter()
        .find(|child| tag_name(child) == Some("code"))
        .map(Rc::clone);
    let language = class_language(handle)
        .or_else(|| code_child.as_ref().and_then(class_language))
        .unwrap_or_default();

    let mut code = text_content(handle);
    if code.ends_with('\n') {
        code.pop();
    }
    Block::code(language, code)
}

fn class_language(handle: &Handle) -> Option<String> {
    let classes = attribute(handle, "class")?;
    classes
        .split_whitespace()
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
        })
        .filter(|language| !language.is_empty())
        .map(str::to_string)
}

fn table_block(handle: &Handle) -> Option<Block> {
    let mut rows: Vec<(bool, Vec<String>)> = Vec::new();
    collect_rows(handle, false, &mut rows);
    let with_headings = rows.first().is_some_and(|(header, _)| *header);
    let content: Vec<Vec<String>> = rows.into_iter().map(|(_, cells)| cells).collect();
    if content.is_empty() {
        return None;
    }
    Some(Block::Table(Table {
        with_headings,
        content,
    }))
}

fn collect_rows(handle: &Handle, in_head: bool, rows: &mut Vec<(bool, Vec<String>)>) {
    for child in handle.children.borrow().iter() {
        match tag_name(child) {
            Some("thead") => collect_rows(child, true, rows),
            Some("tbody" | "tfoot") => collect_rows(child, false, rows),
            Some("tr") => {
                let mut all_headers = true;
                let mut cells = Vec::new();
                for cell in child.children.borrow().iter() {
                    let tag = tag_name(cell);
                    if !matches!(tag, Some("th" | "td")) {
                        continue;
                    }
                    all_headers &= tag == Some("th");
                    let text = render_inline(&trim_rich(inline_children(cell)));
                    cells.push(text);
                }
                if !cells.is_empty() {
                    rows.push((in_head || all_headers, cells));
                }
            }
            _ => {}
        }
    }
}
