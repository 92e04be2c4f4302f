//! Error types for faststyle
//!
//! This module provides error types for all subsystems:
//! - Parse errors (selectors, value definitions, property values)
//! - Registry errors (duplicate registrations, unknown identifiers)
//!
//! All errors use the `thiserror` crate for minimal boilerplate and
//! proper error trait implementations.

use thiserror::Error;

/// Result type alias for faststyle operations
///
/// This is a convenience type that uses our Error type as the error variant.
///
/// # Examples
///
/// ```
/// use faststyle::Result;
///
/// fn parse_selector(text: &str) -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for faststyle
///
/// Each variant wraps a more specific error type for that subsystem.
#[derive(Error, Debug)]
pub enum Error {
  /// Selector, value-definition, or property-value syntax error
  #[error("Parse error: {0}")]
  Parse(#[from] ParseError),

  /// Registration collision or unknown identifier
  #[error("Registry error: {0}")]
  Registry(#[from] RegistryError),
}

/// Errors that occur while parsing selectors, value definitions, or
/// property values
///
/// These cover the input-syntax and capacity error kinds: the input text
/// could not be understood, or it exceeded a structural bound. Callers are
/// expected to skip the offending rule and keep loading the stylesheet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  /// Unexpected character in a selector
  #[error("Invalid selector '{selector}': unexpected character {found:?} at offset {offset}")]
  InvalidSelector {
    selector: String,
    found: char,
    offset: usize,
  },

  /// Selector with a structurally broken node (empty class name, second id, …)
  #[error("Invalid selector '{selector}': {message}")]
  MalformedSelector { selector: String, message: String },

  /// Selector exceeds the node-chain depth bound
  #[error("Selector too deep: {length} nodes exceeds the {limit} limit")]
  SelectorTooDeep { length: usize, limit: usize },

  /// A generated selector name exceeds the length bound
  #[error("Selector name too long: {length} bytes exceeds the {limit} limit")]
  NameTooLong { length: usize, limit: usize },

  /// Malformed value-definition syntax
  #[error("Invalid value definition near '{near}': {message}")]
  InvalidValueDef { message: String, near: String },

  /// A property value does not match the property's value definition
  #[error("Invalid value for property '{property}': {value}")]
  InvalidPropertyValue { property: String, value: String },
}

/// Errors that occur while registering or resolving keywords, properties,
/// and value types
///
/// These cover the duplicate and not-found error kinds. Registration is
/// append-only; a collision never overwrites the existing entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
  /// Keyword id or name already registered
  #[error("Keyword {id} / '{name}' is already registered")]
  DuplicateKeyword { id: i32, name: String },

  /// Property name or key already registered
  #[error("Property '{name}' is already registered")]
  DuplicateProperty { name: String },

  /// Value type already registered
  #[error("Value type <{name}> is already registered")]
  DuplicateValueType { name: String },

  /// Value-type alias already registered, or it shadows a keyword
  #[error("Value-type alias '{name}' is already taken")]
  DuplicateAlias { name: String },

  /// Identifier in a value definition is neither an alias nor a keyword
  #[error("Unknown keyword: '{name}'")]
  UnknownKeyword { name: String },

  /// `<type>` reference in a value definition is not registered
  #[error("Unknown data type: <{name}>")]
  UnknownValueType { name: String },

  /// Property lookup by a name that was never registered
  #[error("Unknown property: '{name}'")]
  UnknownProperty { name: String },
}
