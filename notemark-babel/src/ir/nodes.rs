//! Core data structures for the block document.
//!
//! A [`Document`] is an ordered sequence of [`BlockRecord`]s. Order is the
//! document order and is the only structural invariant between blocks; each
//! record carries one [`Block`] variant with its own strongly-typed payload.

use super::inline::RichText;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The complete structured document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub blocks: Vec<BlockRecord>,
}

impl Document {
    pub fn new(blocks: Vec<BlockRecord>) -> Self {
        Self { blocks }
    }

    /// Builds a document from bare blocks, leaving every id unassigned.
    pub fn from_blocks<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = Block>,
    {
        Self {
            blocks: blocks.into_iter().map(BlockRecord::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Iterates the blocks in document order, ignoring ids.
    pub fn iter_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().map(|record| &record.block)
    }
}

/// One entry of the structured document.
///
/// The id is assigned by the editor and carried through untouched; the codec
/// never generates or interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireRecord", into = "WireRecord")]
pub struct BlockRecord {
    pub id: Option<String>,
    pub block: Block,
}

impl BlockRecord {
    pub fn new(block: Block) -> Self {
        Self { id: None, block }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl From<Block> for BlockRecord {
    fn from(block: Block) -> Self {
        Self::new(block)
    }
}

/// A block with its kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(Heading),
    Paragraph(Paragraph),
    Quote(Quote),
    Callout(Callout),
    List(List),
    Table(Table),
    Code(Code),
    Diagram(Diagram),
    ThematicBreak,
    Raw(Raw),
    /// A kind this version does not know, kept verbatim for forward compatibility.
    Unknown(UnknownBlock),
}

impl Block {
    /// The wire name of this block's kind.
    pub fn kind(&self) -> &str {
        match self {
            Block::Heading(_) => "heading",
            Block::Paragraph(_) => "paragraph",
            Block::Quote(_) => "quote",
            Block::Callout(_) => "callout",
            Block::List(_) => "list",
            Block::Table(_) => "table",
            Block::Code(_) => "code",
            Block::Diagram(_) => "diagram",
            Block::ThematicBreak => "thematic_break",
            Block::Raw(_) => "raw",
            Block::Unknown(unknown) => &unknown.kind,
        }
    }

    pub fn heading(level: u8, content: RichText) -> Self {
        Block::Heading(Heading { level, content })
    }

    pub fn paragraph(content: RichText) -> Self {
        Block::Paragraph(Paragraph { content })
    }

    pub fn quote(text: impl Into<String>) -> Self {
        Block::Quote(Quote { text: text.into() })
    }

    pub fn code(language: impl Into<String>, code: impl Into<String>) -> Self {
        Block::Code(Code {
            language: language.into(),
            code: code.into(),
        })
    }

    pub fn diagram(source: impl Into<String>) -> Self {
        Block::Diagram(Diagram {
            source: source.into(),
        })
    }

    pub fn raw(html: impl Into<String>) -> Self {
        Block::Raw(Raw { html: html.into() })
    }

    fn payload(&self) -> Value {
        match self {
            Block::Heading(b) => to_payload(b),
            Block::Paragraph(b) => to_payload(b),
            Block::Quote(b) => to_payload(b),
            Block::Callout(b) => to_payload(b),
            Block::List(b) => to_payload(b),
            Block::Table(b) => to_payload(b),
            Block::Code(b) => to_payload(b),
            Block::Diagram(b) => to_payload(b),
            Block::ThematicBreak => Value::Object(Default::default()),
            Block::Raw(b) => to_payload(b),
            Block::Unknown(b) => b.data.clone(),
        }
    }

    fn from_wire(kind: String, data: Value) -> Self {
        let known = match kind.as_str() {
            "heading" => from_payload(&data).map(Block::Heading),
            "paragraph" => from_payload(&data).map(Block::Paragraph),
            "quote" => from_payload(&data).map(Block::Quote),
            "callout" => from_payload(&data).map(Block::Callout),
            "list" => from_payload(&data).map(Block::List),
            "table" => from_payload(&data).map(Block::Table),
            "code" => from_payload(&data).map(Block::Code),
            "diagram" => from_payload(&data).map(Block::Diagram),
            "thematic_break" => Some(Block::ThematicBreak),
            "raw" => from_payload(&data).map(Block::Raw),
            _ => None,
        };
        known.unwrap_or(Block::Unknown(UnknownBlock { kind, data }))
    }
}

fn to_payload<T: Serialize>(payload: &T) -> Value {
    // Payload types only hold strings, numbers, bools and vectors of them.
    serde_json::to_value(payload).unwrap_or_default()
}

fn from_payload<T: DeserializeOwned>(data: &Value) -> Option<T> {
    let data = if data.is_null() {
        Value::Object(Default::default())
    } else {
        data.clone()
    };
    serde_json::from_value(data).ok()
}

/// On-the-wire shape of a block record: `{"id"?, "type", "data"}`.
#[derive(Serialize, Deserialize)]
struct WireRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl From<WireRecord> for BlockRecord {
    fn from(wire: WireRecord) -> Self {
        BlockRecord {
            id: wire.id,
            block: Block::from_wire(wire.kind, wire.data),
        }
    }
}

impl From<BlockRecord> for WireRecord {
    fn from(record: BlockRecord) -> Self {
        WireRecord {
            data: record.block.payload(),
            kind: record.block.kind().to_string(),
            id: record.id,
        }
    }
}

/// Heading with a level in `1..=6`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Heading {
    pub level: u8,
    pub content: RichText,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    pub content: RichText,
}

/// Block quote; nested quote markers stay literal inside `text`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Quote {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Callout {
    pub kind: CalloutKind,
    pub message: RichText,
}

/// The fixed callout vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CalloutKind {
    #[default]
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl CalloutKind {
    pub const ALL: [CalloutKind; 5] = [
        CalloutKind::Note,
        CalloutKind::Tip,
        CalloutKind::Important,
        CalloutKind::Warning,
        CalloutKind::Caution,
    ];

    /// Normalizes a marker token. Unrecognized tokens fall back to [`CalloutKind::Note`].
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "TIP" | "HINT" | "SUCCESS" | "CHECK" | "DONE" => CalloutKind::Tip,
            "IMPORTANT" | "TODO" | "QUESTION" | "HELP" | "FAQ" => CalloutKind::Important,
            "WARNING" | "ATTENTION" | "WARN" => CalloutKind::Warning,
            "CAUTION" | "DANGER" | "ERROR" | "BUG" | "FAILURE" | "FAIL" => CalloutKind::Caution,
            _ => CalloutKind::Note,
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            CalloutKind::Note => "NOTE",
            CalloutKind::Tip => "TIP",
            CalloutKind::Important => "IMPORTANT",
            CalloutKind::Warning => "WARNING",
            CalloutKind::Caution => "CAUTION",
        }
    }
}

impl fmt::Display for CalloutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl From<String> for CalloutKind {
    fn from(token: String) -> Self {
        CalloutKind::from_token(&token)
    }
}

impl From<CalloutKind> for String {
    fn from(kind: CalloutKind) -> Self {
        kind.as_token().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
    Checklist,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct List {
    pub style: ListStyle,
    pub items: Vec<ListItem>,
}

/// A list item owning its nested children.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListItem {
    pub content: RichText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ListItem>,
}

impl ListItem {
    pub fn new(content: RichText) -> Self {
        Self {
            content,
            checked: None,
            items: Vec::new(),
        }
    }

    pub fn with_children(mut self, items: Vec<ListItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }
}

/// Pipe table. Cells are raw inline markdown; row 0 is the header row when
/// `with_headings` is set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Table {
    pub with_headings: bool,
    pub content: Vec<Vec<String>>,
}

impl Table {
    /// Widest row length; the column count every row is padded to.
    pub fn column_count(&self) -> usize {
        self.content.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cells run through the inline engine, for consumers that want formatting.
    pub fn rich_cells(&self) -> Vec<Vec<RichText>> {
        self.content
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| crate::formats::markdown::inline::parse_inline(cell))
                    .collect()
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Code {
    pub language: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagram {
    pub source: String,
}

/// Source text kept verbatim because no structured reading is safe.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Raw {
    pub html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownBlock {
    pub kind: String,
    pub data: Value,
}
