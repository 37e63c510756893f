//! Helpers shared by the parse and serialize directions.

pub mod flat_to_nested;
pub mod links;
pub mod nested_to_flat;
pub mod table;
