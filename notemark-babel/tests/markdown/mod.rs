//! Markdown format tests
//!
//! Tests for bidirectional markdown ↔ block document conversion.

mod export;
mod import;
mod lists;
mod roundtrip;
mod table;
