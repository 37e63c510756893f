//! Rich-text content carried inside block payloads.
//!
//! Rich text is a small node tree built directly by the inline scanner. It is
//! never persisted as-is: the serializer turns it back into inline markdown,
//! and [`RichText::to_html`] renders the editor's lightweight markup.

use serde::{Deserialize, Serialize};

/// Attribute naming the target of a linked reference in editor markup.
pub const LINK_TARGET_ATTRIBUTE: &str = "data-link-target";

/// A run of inline content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<Inline>);

/// One inline node. Containers own their children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    Strike(Vec<Inline>),
    Code(String),
    Link { href: String, children: Vec<Inline> },
    LinkedRef(LinkedRef),
    LineBreak,
}

/// A `[[target]]` / `[[target|alias]]` reference to another note or heading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkedRef {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl LinkedRef {
    /// Builds a reference, dropping an alias that only repeats the default label.
    pub fn new(target: impl Into<String>, alias: Option<String>) -> Self {
        let mut linked = Self {
            target: target.into(),
            alias: None,
        };
        linked.alias = alias.filter(|a| !a.is_empty() && a != linked.default_label());
        linked
    }

    /// The label shown when no alias is given: the heading of an anchor-only
    /// target, otherwise the target verbatim.
    pub fn default_label(&self) -> &str {
        match self.target.strip_prefix('#') {
            Some(anchor) => anchor,
            None => &self.target,
        }
    }

    pub fn label(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.default_label())
    }

    /// The alias, but only when it differs from the default label.
    pub fn explicit_alias(&self) -> Option<&str> {
        self.alias
            .as_deref()
            .filter(|alias| *alias != self.default_label())
    }

    /// The note part of the target (`None` for anchor-only references).
    pub fn page(&self) -> Option<&str> {
        let page = self.target.split('#').next().unwrap_or_default();
        (!page.is_empty()).then_some(page)
    }

    /// The heading anchor part of the target, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.target
            .split_once('#')
            .map(|(_, anchor)| anchor)
            .filter(|anchor| !anchor.is_empty())
    }
}

impl RichText {
    pub fn new(nodes: Vec<Inline>) -> Self {
        Self(nodes)
    }

    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Self::default()
        } else {
            Self(vec![Inline::Text(text)])
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn nodes(&self) -> &[Inline] {
        &self.0
    }

    /// Display text: formatting dropped, links by label, line breaks as `\n`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        push_plain(&self.0, &mut out);
        out
    }

    /// Renders the editor markup, HTML-escaping every literal.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        push_html(&self.0, &mut out);
        out
    }

    /// Every linked reference, depth-first in reading order.
    pub fn linked_refs(&self) -> Vec<&LinkedRef> {
        let mut refs = Vec::new();
        collect_refs(&self.0, &mut refs);
        refs
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        RichText::text(text)
    }
}

impl From<Vec<Inline>> for RichText {
    fn from(nodes: Vec<Inline>) -> Self {
        RichText(nodes)
    }
}

fn push_plain(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Bold(children)
            | Inline::Italic(children)
            | Inline::Strike(children)
            | Inline::Link { children, .. } => push_plain(children, out),
            Inline::LinkedRef(linked) => out.push_str(linked.label()),
            Inline::LineBreak => out.push('\n'),
        }
    }
}

fn push_html(nodes: &[Inline], out: &mut String) {
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Inline::Bold(children) => wrap_html("b", children, out),
            Inline::Italic(children) => wrap_html("i", children, out),
            Inline::Strike(children) => wrap_html("s", children, out),
            Inline::Code(code) => {
                out.push_str("<code>");
                out.push_str(&html_escape::encode_text(code));
                out.push_str("</code>");
            }
            Inline::Link { href, children } => {
                out.push_str("<a href=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(href));
                out.push_str("\">");
                push_html(children, out);
                out.push_str("</a>");
            }
            Inline::LinkedRef(linked) => {
                out.push_str("<a ");
                out.push_str(LINK_TARGET_ATTRIBUTE);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(&linked.target));
                out.push_str("\">");
                out.push_str(&html_escape::encode_text(linked.label()));
                out.push_str("</a>");
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
}

fn wrap_html(tag: &str, children: &[Inline], out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    push_html(children, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn collect_refs<'a>(nodes: &'a [Inline], refs: &mut Vec<&'a LinkedRef>) {
    for node in nodes {
        match node {
            Inline::LinkedRef(linked) => refs.push(linked),
            Inline::Bold(children)
            | Inline::Italic(children)
            | Inline::Strike(children)
            | Inline::Link { children, .. } => collect_refs(children, refs),
            Inline::Text(_) | Inline::Code(_) | Inline::LineBreak => {}
        }
    }
}
