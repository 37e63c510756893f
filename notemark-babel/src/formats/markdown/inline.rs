//! Inline markdown ⇄ rich text.
//!
//! Parsing works one range at a time. For a range the scanner first lays out,
//! right to left, which token starts at every character offset and where the
//! token after it begins. At each offset it tries, in order:
//!
//! - a backslash escape of ASCII punctuation (always literal)
//! - a code span: single backticks with `` \` `` escapes, or double backticks
//!   taken verbatim (contents never reinterpreted)
//! - a `[[target|alias]]` linked reference, then a `[label](href)` link
//! - emphasis, with `~~` before `**`/`__` before `*`/`_`
//! - otherwise one character, line breaks included
//!
//! Every entry only looks further right, so finding a closer is a table lookup
//! and laying out a range is linear in its length. The token chain from the
//! range start then becomes nodes, recursing into emphasis bodies and link
//! labels. Past [`MAX_NESTING`] levels a range still honours escapes, code
//! spans and linked references but reads emphasis and link syntax literally.
//!
//! Emphasis needs a non-whitespace character right inside both delimiters,
//! and `_` never opens or closes inside a word. Every delimiter is ASCII, so
//! byte slicing only ever lands on character boundaries.
//!
//! Rendering is the inverse walk. It escapes exactly the characters the
//! scanner would otherwise pick up, so `parse_inline(&render_inline(x))`
//! gives `x` back for any tree the scanner can produce.

use std::borrow::Cow;

use crate::common::links::sanitize_href;
use crate::ir::inline::{Inline, LinkedRef, RichText};

/// Emphasis and link nesting deeper than this reads as literal text.
pub const MAX_NESTING: usize = 32;

/// Table entry for "no such offset".
const NONE: usize = usize::MAX;

/// Parses one run of inline markdown. Never fails; anything unrecognized
/// stays literal text.
pub fn parse_inline(source: &str) -> RichText {
    let scanner = InlineScanner::new(source);
    RichText::new(scanner.parse_range(0, source.len(), 0))
}

/// Renders rich text back into inline markdown.
pub fn render_inline(text: &RichText) -> String {
    render_nodes(text.nodes())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Strike,
    StrongStar,
    StrongUnderscore,
    EmStar,
    EmUnderscore,
}

impl Delimiter {
    const PRECEDENCE: [Delimiter; 5] = [
        Delimiter::Strike,
        Delimiter::StrongStar,
        Delimiter::StrongUnderscore,
        Delimiter::EmStar,
        Delimiter::EmUnderscore,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    fn marker(self) -> &'static str {
        match self {
            Delimiter::Strike => "~~",
            Delimiter::StrongStar => "**",
            Delimiter::StrongUnderscore => "__",
            Delimiter::EmStar => "*",
            Delimiter::EmUnderscore => "_",
        }
    }

    fn len(self) -> usize {
        self.marker().len()
    }

    /// A single `*`/`_` touching another copy of itself is part of a longer run.
    fn doubles_into(self, neighbour: char) -> bool {
        match self {
            Delimiter::EmStar => neighbour == '*',
            Delimiter::EmUnderscore => neighbour == '_',
            _ => false,
        }
    }

    fn is_underscore(self) -> bool {
        matches!(self, Delimiter::StrongUnderscore | Delimiter::EmUnderscore)
    }

    fn wrap(self, children: Vec<Inline>) -> Inline {
        match self {
            Delimiter::Strike => Inline::Strike(children),
            Delimiter::StrongStar | Delimiter::StrongUnderscore => Inline::Bold(children),
            Delimiter::EmStar | Delimiter::EmUnderscore => Inline::Italic(children),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CodeSpan {
    /// Backticks on each side.
    fence: usize,
    /// Offset of the closing fence.
    close: usize,
}

/// The token starting at one offset of a range.
#[derive(Debug, Clone, Copy)]
enum Step {
    Char,
    Escape,
    Code(CodeSpan),
    LinkedRef { end: usize },
    Link { label_end: usize, href_end: usize },
    Emphasis { delimiter: Delimiter, close: usize },
}

/// Next-occurrence tables over the whole source: entry `k` is the first
/// offset at or after `k` where the pattern starts, or `NONE`.
struct Lookahead {
    newline: Vec<usize>,
    /// Backticks not preceded by a backslash.
    tick: Vec<usize>,
    tick_pair: Vec<usize>,
    ref_close: Vec<usize>,
    pipe: Vec<usize>,
    /// Character boundaries holding a non-whitespace character.
    visible: Vec<usize>,
}

impl Lookahead {
    fn new(src: &str) -> Self {
        let bytes = src.as_bytes();
        let len = bytes.len();
        Self {
            newline: next_matching(len, |k| bytes[k] == b'\n'),
            tick: next_matching(len, |k| {
                bytes[k] == b'`' && (k == 0 || bytes[k - 1] != b'\\')
            }),
            tick_pair: next_matching(len, |k| bytes[k..].starts_with(b"``")),
            ref_close: next_matching(len, |k| bytes[k..].starts_with(b"]]")),
            pipe: next_matching(len, |k| bytes[k] == b'|'),
            visible: next_matching(len, |k| {
                src.is_char_boundary(k)
                    && src[k..].chars().next().is_some_and(|c| !c.is_whitespace())
            }),
        }
    }
}

fn next_matching(len: usize, hit: impl Fn(usize) -> bool) -> Vec<usize> {
    let mut table = vec![NONE; len + 1];
    for k in (0..len).rev() {
        table[k] = if hit(k) { k } else { table[k + 1] };
    }
    table
}

struct InlineScanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    ahead: Lookahead,
}

impl<'a> InlineScanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            ahead: Lookahead::new(src),
        }
    }

    fn parse_range(&self, start: usize, end: usize, depth: usize) -> Vec<Inline> {
        let src = self.src;
        let mut nodes = Vec::new();
        let mut text = String::new();

        for (at, step) in self.chain(start, end, depth) {
            match step {
                Step::Char => match src[at..].chars().next() {
                    Some('\n') => {
                        flush_text(&mut nodes, &mut text);
                        nodes.push(Inline::LineBreak);
                    }
                    Some(ch) => text.push(ch),
                    None => {}
                },
                Step::Escape => text.push(char::from(self.bytes[at + 1])),
                Step::Code(span) => {
                    flush_text(&mut nodes, &mut text);
                    nodes.push(Inline::Code(self.code_text(at, span)));
                }
                Step::LinkedRef { end: after } => {
                    flush_text(&mut nodes, &mut text);
                    nodes.push(Inline::LinkedRef(self.linked_ref(at, after)));
                }
                Step::Link {
                    label_end,
                    href_end,
                } => {
                    let label = self.parse_range(at + 1, label_end, depth + 1);
                    let raw_href = &src[label_end + 2..href_end];
                    match sanitize_href(raw_href) {
                        Some(href) => {
                            flush_text(&mut nodes, &mut text);
                            nodes.push(Inline::Link {
                                href,
                                children: label,
                            });
                        }
                        None => {
                            // Rejected targets stay visible as literal text.
                            text.push('[');
                            flush_text(&mut nodes, &mut text);
                            for node in label {
                                push_node(&mut nodes, node);
                            }
                            text.push_str("](");
                            text.push_str(raw_href);
                            text.push(')');
                        }
                    }
                }
                Step::Emphasis { delimiter, close } => {
                    flush_text(&mut nodes, &mut text);
                    let children = self.parse_range(at + delimiter.len(), close, depth + 1);
                    nodes.push(delimiter.wrap(children));
                }
            }
        }

        flush_text(&mut nodes, &mut text);
        nodes
    }

    /// The tokens covering `start..end`, in order, each with its offset.
    fn chain(&self, start: usize, end: usize, depth: usize) -> Vec<(usize, Step)> {
        let flat = depth >= MAX_NESTING;
        let len = end - start;
        let (brackets, parens) = if flat {
            (Vec::new(), Vec::new())
        } else {
            (self.bracket_table(start, end), self.paren_table(start, end))
        };

        let mut steps = vec![Step::Char; len];
        let mut next = vec![end; len];
        // Per delimiter: the first offset at or after `k`, following the
        // token chain, where that delimiter closes.
        let closer_len = if flat { 0 } else { len + 1 };
        let mut closers: [Vec<usize>; 5] = std::array::from_fn(|_| vec![NONE; closer_len]);

        for (offset, ch) in self.src[start..end].char_indices().rev() {
            let at = start + offset;
            let step = match self.bytes[at] {
                b'\\' if self.escapes(at, end) => Step::Escape,
                b'`' => self.code_span(at, end).map_or(Step::Char, Step::Code),
                b'[' => self.bracket_step(at, start, end, &brackets, &parens),
                b'~' | b'*' | b'_' if !flat => self.emphasis_at(at, start, end, &next, &closers),
                _ => Step::Char,
            };
            let after = match step {
                Step::Char => at + ch.len_utf8(),
                Step::Escape => at + 2,
                Step::Code(span) => span.close + span.fence,
                Step::LinkedRef { end: after_ref } => after_ref,
                Step::Link { href_end, .. } => href_end + 1,
                Step::Emphasis { delimiter, close } => close + delimiter.len(),
            };
            steps[offset] = step;
            next[offset] = after;
            if !flat {
                for delimiter in Delimiter::PRECEDENCE {
                    let table = &mut closers[delimiter.slot()];
                    table[offset] = if self.closes(delimiter, at, end) {
                        at
                    } else {
                        table[after - start]
                    };
                }
            }
        }

        let mut chain = Vec::new();
        let mut at = start;
        while at < end {
            chain.push((at, steps[at - start]));
            at = next[at - start];
        }
        chain
    }

    /// The first delimiter (by precedence) that opens at `at` and has a
    /// closer further along the chain.
    fn emphasis_at(
        &self,
        at: usize,
        start: usize,
        end: usize,
        next: &[usize],
        closers: &[Vec<usize>; 5],
    ) -> Step {
        Delimiter::PRECEDENCE
            .into_iter()
            .find_map(|delimiter| {
                if !self.opens(delimiter, at, end) {
                    return None;
                }
                // `opens` saw a character after the marker, so the body is in range.
                let body = at + delimiter.len();
                let close = closers[delimiter.slot()][next[body - start] - start];
                (close != NONE).then_some(Step::Emphasis { delimiter, close })
            })
            .unwrap_or(Step::Char)
    }

    /// A linked reference or link at `at`. Flat ranges have no bracket
    /// table, so only linked references match there.
    fn bracket_step(
        &self,
        at: usize,
        start: usize,
        end: usize,
        brackets: &[usize],
        parens: &[usize],
    ) -> Step {
        if let Some(after) = self.linked_ref_end(at, end) {
            return Step::LinkedRef { end: after };
        }
        self.link_at(at, start, end, brackets, parens).unwrap_or(Step::Char)
    }

    fn opens(&self, delimiter: Delimiter, at: usize, end: usize) -> bool {
        let marker = delimiter.marker();
        if !self.src[at..end].starts_with(marker) {
            return false;
        }
        match self.src[at + marker.len()..end].chars().next() {
            Some(next) if !next.is_whitespace() && !delimiter.doubles_into(next) => {}
            _ => return false,
        }
        !(delimiter.is_underscore() && self.prev_char(at).is_some_and(char::is_alphanumeric))
    }

    fn closes(&self, delimiter: Delimiter, at: usize, end: usize) -> bool {
        let marker = delimiter.marker();
        if !self.src[at..end].starts_with(marker) {
            return false;
        }
        match self.prev_char(at) {
            Some(prev) if !prev.is_whitespace() && !delimiter.doubles_into(prev) => {}
            _ => return false,
        }
        !(delimiter.is_underscore()
            && self.src[at + marker.len()..end]
                .chars()
                .next()
                .is_some_and(char::is_alphanumeric))
    }

    fn prev_char(&self, at: usize) -> Option<char> {
        self.src[..at].chars().next_back()
    }

    fn escapes(&self, at: usize, end: usize) -> bool {
        at + 1 < end && self.bytes[at + 1].is_ascii_punctuation()
    }

    /// The code span opened at `at`, if it closes on the same line and
    /// inside the range.
    fn code_span(&self, at: usize, end: usize) -> Option<CodeSpan> {
        let bytes = self.bytes;
        if at + 1 >= end {
            return None;
        }
        let (fence, close) = if bytes[at + 1] != b'`' {
            (1, self.ahead.tick[at + 2])
        } else if at + 2 < end && bytes[at + 2] != b'`' {
            (2, self.ahead.tick_pair[at + 2])
        } else {
            return None;
        };
        let fits = close != NONE && close + fence <= end && close < self.ahead.newline[at + 1];
        fits.then_some(CodeSpan { fence, close })
    }

    fn code_text(&self, at: usize, span: CodeSpan) -> String {
        let raw = &self.src[at + span.fence..span.close];
        if span.fence == 1 {
            return raw.replace("\\`", "`");
        }
        // One space of padding on both sides is dropped.
        raw.strip_prefix(' ')
            .and_then(|inner| inner.strip_suffix(' '))
            .unwrap_or(raw)
            .to_string()
    }

    /// End offset of a `[[...]]` linked reference starting at `at`.
    fn linked_ref_end(&self, at: usize, end: usize) -> Option<usize> {
        if !self.src[at..end].starts_with("[[") {
            return None;
        }
        let body = at + 2;
        let close = self.ahead.ref_close[body];
        let fits = close != NONE
            && close + 2 <= end
            && self.ahead.newline[body] > close
            && self.ahead.visible[body] < self.ahead.pipe[body].min(close);
        fits.then_some(close + 2)
    }

    fn linked_ref(&self, at: usize, after: usize) -> LinkedRef {
        let inner = &self.src[at + 2..after - 2];
        let (target, alias) = match inner.split_once('|') {
            Some((target, alias)) => (target.trim(), Some(alias.trim())),
            None => (inner.trim(), None),
        };
        let alias = alias.filter(|a| !a.is_empty()).map(str::to_string);
        LinkedRef::new(target, alias)
    }

    fn link_at(
        &self,
        at: usize,
        start: usize,
        end: usize,
        brackets: &[usize],
        parens: &[usize],
    ) -> Option<Step> {
        let label_end = lookup(brackets, start, at + 1)?;
        if label_end + 1 >= end || self.bytes[label_end + 1] != b'(' {
            return None;
        }
        let href_end = lookup(parens, start, label_end + 2)?;
        Some(Step::Link {
            label_end,
            href_end,
        })
    }

    /// Entry `j`: the first `]` at bracket depth zero scanning from `j`,
    /// stepping over escapes and code spans.
    fn bracket_table(&self, start: usize, end: usize) -> Vec<usize> {
        let mut table = vec![NONE; end - start + 1];
        for at in (start..end).rev() {
            let hit = match self.bytes[at] {
                b']' => at,
                b'[' => match table[at + 1 - start] {
                    NONE => NONE,
                    inner => table[inner + 1 - start],
                },
                b'\\' if self.escapes(at, end) => table[at + 2 - start],
                b'`' => match self.code_span(at, end) {
                    Some(span) => table[span.close + span.fence - start],
                    None => table[at + 1 - start],
                },
                _ => table[at + 1 - start],
            };
            table[at - start] = hit;
        }
        table
    }

    /// Entry `j`: the first `)` at parenthesis depth zero scanning from `j`,
    /// or `NONE` if a line ends first.
    fn paren_table(&self, start: usize, end: usize) -> Vec<usize> {
        let mut table = vec![NONE; end - start + 1];
        for at in (start..end).rev() {
            let hit = match self.bytes[at] {
                b'\n' => NONE,
                b')' => at,
                b'(' => match table[at + 1 - start] {
                    NONE => NONE,
                    inner => table[inner + 1 - start],
                },
                _ => table[at + 1 - start],
            };
            table[at - start] = hit;
        }
        table
    }
}

fn lookup(table: &[usize], start: usize, at: usize) -> Option<usize> {
    table.get(at - start).copied().filter(|&hit| hit != NONE)
}

fn flush_text(nodes: &mut Vec<Inline>, text: &mut String) {
    if !text.is_empty() {
        push_node(nodes, Inline::Text(std::mem::take(text)));
    }
}

pub(crate) fn push_node(nodes: &mut Vec<Inline>, node: Inline) {
    if let (Some(Inline::Text(last)), Inline::Text(more)) = (nodes.last_mut(), &node) {
        last.push_str(more);
        return;
    }
    nodes.push(node);
}

fn render_nodes(nodes: &[Inline]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(&escape_text(text)),
            Inline::Bold(children) => push_wrapped(&mut out, "**", children),
            Inline::Italic(children) => {
                // `***x***` reads back as bold-around-italic.
                let marker = if starts_or_ends_bold(children) { "_" } else { "*" };
                push_wrapped(&mut out, marker, children);
            }
            Inline::Strike(children) => push_wrapped(&mut out, "~~", children),
            Inline::Code(code) => push_code(&mut out, code),
            Inline::Link { href, children } => {
                out.push('[');
                out.push_str(&render_nodes(children));
                out.push_str("](");
                out.push_str(&link_destination(href));
                out.push(')');
            }
            Inline::LinkedRef(linked) => {
                out.push_str("[[");
                out.push_str(&linked.target);
                if let Some(alias) = linked.explicit_alias() {
                    out.push('|');
                    out.push_str(alias);
                }
                out.push_str("]]");
            }
            Inline::LineBreak => out.push('\n'),
        }
    }
    out
}

fn push_code(out: &mut String, code: &str) {
    if code.is_empty() {
        return;
    }
    let code = code.replace('\n', " ");
    if code.ends_with('\\') && !code.contains("``") {
        // A trailing backslash would escape a single closing backtick.
        out.push_str("`` ");
        out.push_str(&code);
        out.push_str(" ``");
    } else {
        out.push('`');
        out.push_str(&code.replace('`', "\\`"));
        out.push('`');
    }
}

/// The href as written between `(` and `)`. Parentheses and whitespace are
/// percent-encoded unless the parentheses balance and nothing else could end
/// the destination early.
fn link_destination(href: &str) -> Cow<'_, str> {
    let awkward = |c: char| c.is_whitespace() || c.is_control();
    if parens_balance(href) && !href.chars().any(awkward) {
        return Cow::Borrowed(href);
    }
    let mut out = String::with_capacity(href.len());
    for c in href.chars() {
        if awkward(c) || c == '(' || c == ')' {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut [0; 4])));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn parens_balance(href: &str) -> bool {
    let mut depth = 0usize;
    for c in href.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(outer) => depth = outer,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn starts_or_ends_bold(children: &[Inline]) -> bool {
    matches!(children.first(), Some(Inline::Bold(_)))
        || matches!(children.last(), Some(Inline::Bold(_)))
}

/// Wraps rendered children in `marker`, keeping edge whitespace outside the
/// delimiters so the result still parses as emphasis.
fn push_wrapped(out: &mut String, marker: &str, children: &[Inline]) {
    let inner = render_nodes(children);
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        out.push_str(&inner);
        return;
    }
    let leading = &inner[..inner.len() - inner.trim_start().len()];
    let trailing = &inner[inner.trim_end().len()..];
    out.push_str(leading);
    out.push_str(marker);
    out.push_str(trimmed);
    out.push_str(marker);
    out.push_str(trailing);
}

/// Backslash-escapes every character of a literal run that the scanner
/// would otherwise treat as syntax.
pub fn escape_text(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (idx, &ch) in chars.iter().enumerate() {
        let prev = idx.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(idx + 1).copied();
        let escape = match ch {
            '`' | '*' | '[' | ']' => true,
            '\\' => next.map_or(true, |n| n.is_ascii_punctuation()),
            '_' => !(prev.is_some_and(char::is_alphanumeric)
                && next.is_some_and(char::is_alphanumeric)),
            '~' => prev.map_or(true, |p| p == '~') || next.map_or(true, |n| n == '~'),
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
