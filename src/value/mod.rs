//! CSS value model, value-definition grammar, and value parsing
//!
//! This module owns everything about property values: the parsed
//! representation ([`StyleValue`]), the registry of `<…>` data types, the
//! compiler for the W3C value-definition mini-language, and the matcher that
//! parses value text against a compiled definition.

pub mod matcher;
pub(crate) mod parse_cache;
pub mod parsers;
pub mod registry;
pub mod syntax;
pub mod types;

// Re-exports for convenience
pub use matcher::parse_value;
pub use registry::{ValueParseFn, ValueTypeRecord, ValueTypeRegistry};
pub use syntax::{compile, ValueDef, ValueDefGroup, ValueDefSign, REPEAT_UNBOUNDED};
pub use types::{ColorValue, CssUnit, FontFace, FontStyle, FontWeight, StyleValue, UnitValue};
