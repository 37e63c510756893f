//! Shared helpers for the integration tests.

use notemark_babel::ir::nodes::Block;
use notemark_babel::{parse, serialize, CodecOptions};

/// Blocks of `markdown`, ids dropped.
pub fn blocks(markdown: &str) -> Vec<Block> {
    parse(markdown)
        .blocks
        .into_iter()
        .map(|record| record.block)
        .collect()
}

/// Parse then serialize with default options.
pub fn round_trip(markdown: &str) -> String {
    serialize(&parse(markdown))
}

/// Asserts that canonical text survives parse and serialize unchanged.
pub fn assert_canonical(markdown: &str) {
    pretty_assertions::assert_eq!(round_trip(markdown), markdown);
}

pub fn options() -> CodecOptions {
    CodecOptions::default()
}
