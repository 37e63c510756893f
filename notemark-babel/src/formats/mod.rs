//! Format implementations
//!
//! Each format converts between its text representation and the block
//! [`Document`](crate::ir::nodes::Document).

pub mod html;
pub mod json;
pub mod markdown;

pub use html::HtmlFormat;
pub use json::JsonFormat;
pub use markdown::MarkdownFormat;
