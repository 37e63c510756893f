//! Intermediate Representation (IR) for notemark documents.
//!
//! The block document is what the editor consumes and mutates: an ordered
//! list of typed blocks ([`nodes`]) whose text payloads are rich-text trees
//! ([`inline`]). Every format in this crate converts to or from it.

pub mod inline;
pub mod nodes;

pub use inline::{Inline, LinkedRef, RichText};
pub use nodes::{
    Block, BlockRecord, Callout, CalloutKind, Code, Diagram, Document, Heading, List, ListItem,
    ListStyle, Paragraph, Quote, Raw, Table, UnknownBlock,
};
