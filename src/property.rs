//! Property registry
//!
//! Properties are registered once during initialization and addressed by a
//! dense integer key afterwards; declarations are arrays indexed by that key.
//! Each definition carries the compiled value-definition tree of its allowed
//! syntax and the parsed initial value.

use crate::error::RegistryError;
use crate::value::syntax::ValueDef;
use crate::value::types::StyleValue;
use rustc_hash::FxHashMap;

/// Dense integer key of a registered property.
pub type PropertyKey = usize;

/// A registered property definition.
#[derive(Debug)]
pub struct PropertyDef {
  pub key: PropertyKey,
  pub name: String,
  pub syntax: ValueDef,
  /// Parsed initial value; `StyleValue::Invalid` when the declared initial
  /// text does not match the syntax.
  pub initial: StyleValue,
}

/// Append-only property table with name lookup.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
  defs: Vec<Option<PropertyDef>>,
  by_name: FxHashMap<String, PropertyKey>,
}

impl PropertyRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a property under the next free key.
  pub fn register(
    &mut self,
    name: &str,
    syntax: ValueDef,
    initial: StyleValue,
  ) -> Result<PropertyKey, RegistryError> {
    let key = self.defs.len();
    self.register_with_key(key, name, syntax, initial)
  }

  /// Register a property under a specific key, growing the table as needed.
  ///
  /// Used for builtins whose keys are fixed constants. Both the key slot and
  /// the name must be free.
  pub fn register_with_key(
    &mut self,
    key: PropertyKey,
    name: &str,
    syntax: ValueDef,
    initial: StyleValue,
  ) -> Result<PropertyKey, RegistryError> {
    if self.by_name.contains_key(name) || self.defs.get(key).is_some_and(Option::is_some) {
      return Err(RegistryError::DuplicateProperty {
        name: name.to_string(),
      });
    }
    if key >= self.defs.len() {
      self.defs.resize_with(key + 1, || None);
    }
    self.defs[key] = Some(PropertyDef {
      key,
      name: name.to_string(),
      syntax,
      initial,
    });
    self.by_name.insert(name.to_string(), key);
    Ok(key)
  }

  /// Look up a property by name.
  pub fn get(&self, name: &str) -> Option<&PropertyDef> {
    self.by_name.get(name).and_then(|key| self.get_by_key(*key))
  }

  /// Look up a property by key.
  pub fn get_by_key(&self, key: PropertyKey) -> Option<&PropertyDef> {
    self.defs.get(key).and_then(Option::as_ref)
  }

  /// One past the largest key seen; declarations are sized to this.
  pub fn count(&self) -> usize {
    self.defs.len()
  }
}

/// Builtin property keys, assigned by [`crate::StyleEngine::new`].
///
/// Keys run dense from zero in table order, so declarations for an engine
/// with only builtin properties have no holes.
pub mod keys {
  use super::PropertyKey;

  pub const LEFT: PropertyKey = 0;
  pub const RIGHT: PropertyKey = 1;
  pub const TOP: PropertyKey = 2;
  pub const BOTTOM: PropertyKey = 3;
  pub const POSITION: PropertyKey = 4;
  pub const VISIBILITY: PropertyKey = 5;
  pub const DISPLAY: PropertyKey = 6;
  pub const Z_INDEX: PropertyKey = 7;
  pub const OPACITY: PropertyKey = 8;
  pub const BOX_SIZING: PropertyKey = 9;
  pub const WIDTH: PropertyKey = 10;
  pub const HEIGHT: PropertyKey = 11;
  pub const MIN_WIDTH: PropertyKey = 12;
  pub const MIN_HEIGHT: PropertyKey = 13;
  pub const MAX_WIDTH: PropertyKey = 14;
  pub const MAX_HEIGHT: PropertyKey = 15;
  pub const MARGIN_TOP: PropertyKey = 16;
  pub const MARGIN_RIGHT: PropertyKey = 17;
  pub const MARGIN_BOTTOM: PropertyKey = 18;
  pub const MARGIN_LEFT: PropertyKey = 19;
  pub const PADDING_TOP: PropertyKey = 20;
  pub const PADDING_RIGHT: PropertyKey = 21;
  pub const PADDING_BOTTOM: PropertyKey = 22;
  pub const PADDING_LEFT: PropertyKey = 23;
  pub const VERTICAL_ALIGN: PropertyKey = 24;
  pub const BORDER_TOP_WIDTH: PropertyKey = 25;
  pub const BORDER_TOP_STYLE: PropertyKey = 26;
  pub const BORDER_TOP_COLOR: PropertyKey = 27;
  pub const BORDER_RIGHT_WIDTH: PropertyKey = 28;
  pub const BORDER_RIGHT_STYLE: PropertyKey = 29;
  pub const BORDER_RIGHT_COLOR: PropertyKey = 30;
  pub const BORDER_BOTTOM_WIDTH: PropertyKey = 31;
  pub const BORDER_BOTTOM_STYLE: PropertyKey = 32;
  pub const BORDER_BOTTOM_COLOR: PropertyKey = 33;
  pub const BORDER_LEFT_WIDTH: PropertyKey = 34;
  pub const BORDER_LEFT_STYLE: PropertyKey = 35;
  pub const BORDER_LEFT_COLOR: PropertyKey = 36;
  pub const BORDER_TOP_LEFT_RADIUS: PropertyKey = 37;
  pub const BORDER_TOP_RIGHT_RADIUS: PropertyKey = 38;
  pub const BORDER_BOTTOM_LEFT_RADIUS: PropertyKey = 39;
  pub const BORDER_BOTTOM_RIGHT_RADIUS: PropertyKey = 40;
  pub const BACKGROUND_COLOR: PropertyKey = 41;
  pub const BACKGROUND_IMAGE: PropertyKey = 42;
  pub const BACKGROUND_SIZE: PropertyKey = 43;
  pub const BACKGROUND_POSITION: PropertyKey = 44;
  pub const BOX_SHADOW: PropertyKey = 45;
  pub const FLEX_BASIS: PropertyKey = 46;
  pub const FLEX_GROW: PropertyKey = 47;
  pub const FLEX_SHRINK: PropertyKey = 48;
  pub const FLEX_DIRECTION: PropertyKey = 49;
  pub const FLEX_WRAP: PropertyKey = 50;
  pub const JUSTIFY_CONTENT: PropertyKey = 51;
  pub const ALIGN_CONTENT: PropertyKey = 52;
  pub const ALIGN_ITEMS: PropertyKey = 53;
  pub const COLOR: PropertyKey = 54;
  pub const FONT_SIZE: PropertyKey = 55;
  pub const FONT_STYLE: PropertyKey = 56;
  pub const FONT_FAMILY: PropertyKey = 57;
  pub const LINE_HEIGHT: PropertyKey = 58;
  pub const TEXT_ALIGN: PropertyKey = 59;
  pub const CONTENT: PropertyKey = 60;
  pub const WHITE_SPACE: PropertyKey = 61;
  pub const POINTER_EVENTS: PropertyKey = 62;
}

/// Builtin properties: `(key, name, syntax, initial)`.
///
/// Syntax references:
/// <https://developer.mozilla.org/en-US/docs/Web/CSS> per property.
pub(crate) const BUILTIN_PROPERTIES: &[(PropertyKey, &str, &str, &str)] = &[
  (keys::LEFT, "left", "<length> | <percentage> | auto", "auto"),
  (keys::RIGHT, "right", "<length> | <percentage> | auto", "auto"),
  (keys::TOP, "top", "<length> | <percentage> | auto", "auto"),
  (keys::BOTTOM, "bottom", "<length> | <percentage> | auto", "auto"),
  (keys::POSITION, "position", "static | relative | absolute", "static"),
  (keys::VISIBILITY, "visibility", "visible | hidden", "visible"),
  (keys::DISPLAY, "display", "none | block | inline-block | flex", "block"),
  (keys::Z_INDEX, "z-index", "auto | <integer>", "auto"),
  (keys::OPACITY, "opacity", "<number> | <percentage>", "1"),
  (keys::BOX_SIZING, "box-sizing", "content-box | border-box", "content-box"),
  (keys::WIDTH, "width", "auto | <length> | <percentage>", "auto"),
  (keys::HEIGHT, "height", "auto | <length> | <percentage>", "auto"),
  (keys::MIN_WIDTH, "min-width", "auto | <length> | <percentage>", "auto"),
  (keys::MIN_HEIGHT, "min-height", "auto | <length> | <percentage>", "auto"),
  (keys::MAX_WIDTH, "max-width", "auto | <length> | <percentage>", "auto"),
  (keys::MAX_HEIGHT, "max-height", "auto | <length> | <percentage>", "auto"),
  (keys::MARGIN_TOP, "margin-top", "<length> | <percentage>", "0"),
  (keys::MARGIN_RIGHT, "margin-right", "<length> | <percentage>", "0"),
  (keys::MARGIN_BOTTOM, "margin-bottom", "<length> | <percentage>", "0"),
  (keys::MARGIN_LEFT, "margin-left", "<length> | <percentage>", "0"),
  (keys::PADDING_TOP, "padding-top", "<length> | <percentage>", "0"),
  (keys::PADDING_RIGHT, "padding-right", "<length> | <percentage>", "0"),
  (keys::PADDING_BOTTOM, "padding-bottom", "<length> | <percentage>", "0"),
  (keys::PADDING_LEFT, "padding-left", "<length> | <percentage>", "0"),
  (keys::VERTICAL_ALIGN, "vertical-align", "middle | bottom | top", "top"),
  (keys::BORDER_TOP_WIDTH, "border-top-width", "<length>", "0"),
  (keys::BORDER_TOP_STYLE, "border-top-style", "none | solid", "none"),
  (keys::BORDER_TOP_COLOR, "border-top-color", "<color>", "transparent"),
  (keys::BORDER_RIGHT_WIDTH, "border-right-width", "<length>", "0"),
  (keys::BORDER_RIGHT_STYLE, "border-right-style", "none | solid", "none"),
  (keys::BORDER_RIGHT_COLOR, "border-right-color", "<color>", "transparent"),
  (keys::BORDER_BOTTOM_WIDTH, "border-bottom-width", "<length>", "0"),
  (keys::BORDER_BOTTOM_STYLE, "border-bottom-style", "none | solid", "none"),
  (keys::BORDER_BOTTOM_COLOR, "border-bottom-color", "<color>", "transparent"),
  (keys::BORDER_LEFT_WIDTH, "border-left-width", "<length>", "0"),
  (keys::BORDER_LEFT_STYLE, "border-left-style", "none | solid", "none"),
  (keys::BORDER_LEFT_COLOR, "border-left-color", "<color>", "transparent"),
  (keys::BORDER_TOP_LEFT_RADIUS, "border-top-left-radius", "<length> | <percentage>", "0"),
  (keys::BORDER_TOP_RIGHT_RADIUS, "border-top-right-radius", "<length> | <percentage>", "0"),
  (keys::BORDER_BOTTOM_LEFT_RADIUS, "border-bottom-left-radius", "<length> | <percentage>", "0"),
  (keys::BORDER_BOTTOM_RIGHT_RADIUS, "border-bottom-right-radius", "<length> | <percentage>", "0"),
  (keys::BACKGROUND_COLOR, "background-color", "<color>", "transparent"),
  (keys::BACKGROUND_IMAGE, "background-image", "none | <image>", "none"),
  (
    keys::BACKGROUND_SIZE,
    "background-size",
    "[ <length> | <percentage> | auto ]{1,2} | cover | contain",
    "auto auto",
  ),
  (
    keys::BACKGROUND_POSITION,
    "background-position",
    "[ [ left | center | right | top | bottom | <length> | <percentage> ] \
     | [ left | center | right | <length> | <percentage> ] [ top | center | bottom | <length> | <percentage> ] ]",
    "0% 0%",
  ),
  (keys::BOX_SHADOW, "box-shadow", "none | shadow", "none"),
  (keys::FLEX_BASIS, "flex-basis", "auto | width", "auto"),
  (keys::FLEX_GROW, "flex-grow", "<number>", "0"),
  (keys::FLEX_SHRINK, "flex-shrink", "<number>", "1"),
  (keys::FLEX_DIRECTION, "flex-direction", "row | column", "row"),
  (keys::FLEX_WRAP, "flex-wrap", "nowrap | wrap", "nowrap"),
  (
    keys::JUSTIFY_CONTENT,
    "justify-content",
    "normal | baseline-position | content-distribution | content-position",
    "normal",
  ),
  (
    keys::ALIGN_CONTENT,
    "align-content",
    "normal | baseline-position | content-distribution | content-position",
    "normal",
  ),
  (
    keys::ALIGN_ITEMS,
    "align-items",
    "normal | stretch | content-position",
    "normal",
  ),
  (keys::COLOR, "color", "<color>", "#000"),
  (keys::FONT_SIZE, "font-size", "<length> | <percentage>", "16px"),
  (keys::FONT_STYLE, "font-style", "normal | italic | oblique", "normal"),
  (keys::FONT_FAMILY, "font-family", "<string>", ""),
  (keys::LINE_HEIGHT, "line-height", "<number> | <length> | <percentage>", "1.6"),
  (keys::TEXT_ALIGN, "text-align", "left | center | right", "left"),
  (keys::CONTENT, "content", "<string>", ""),
  (keys::WHITE_SPACE, "white-space", "normal | nowrap", "normal"),
  (keys::POINTER_EVENTS, "pointer-events", "auto | none", "auto"),
];

/// Builtin value-definition aliases, expanded in place by the compiler.
///
/// Aliases are referenced as bare identifiers in a syntax (`none | shadow`);
/// the `<…>` form is reserved for data types.
pub(crate) const BUILTIN_ALIASES: &[(&str, &str)] = &[
  ("width", "<length> | <percentage>"),
  ("shadow", "<length>{2,4} && <color>?"),
  ("baseline-position", "[ first | last ]? baseline"),
  ("content-position", "center | start | end | flex-start | flex-end"),
  (
    "content-distribution",
    "space-between | space-around | space-evenly | stretch",
  ),
];

#[cfg(test)]
mod tests {
  use super::*;

  fn any_syntax() -> ValueDef {
    ValueDef::Keyword(0)
  }

  #[test]
  fn register_assigns_sequential_keys() {
    let mut registry = PropertyRegistry::new();
    let a = registry.register("width", any_syntax(), StyleValue::None).unwrap();
    let b = registry.register("height", any_syntax(), StyleValue::None).unwrap();
    assert_eq!((a, b), (0, 1));
    assert_eq!(registry.count(), 2);
    assert_eq!(registry.get("height").unwrap().key, 1);
  }

  #[test]
  fn register_with_key_grows_the_table() {
    let mut registry = PropertyRegistry::new();
    registry
      .register_with_key(5, "opacity", any_syntax(), StyleValue::Number(1.0))
      .unwrap();
    assert_eq!(registry.count(), 6);
    assert!(registry.get_by_key(4).is_none());
    assert_eq!(registry.get_by_key(5).unwrap().name, "opacity");
    // The next sequential registration lands after the grown tail.
    let key = registry.register("color", any_syntax(), StyleValue::None).unwrap();
    assert_eq!(key, 6);
  }

  #[test]
  fn duplicate_name_or_key_is_rejected() {
    let mut registry = PropertyRegistry::new();
    registry.register("width", any_syntax(), StyleValue::None).unwrap();
    assert!(registry.register("width", any_syntax(), StyleValue::None).is_err());
    assert!(registry
      .register_with_key(0, "other", any_syntax(), StyleValue::None)
      .is_err());
  }

  #[test]
  fn builtin_keys_are_dense_and_in_table_order() {
    for (i, (key, ..)) in BUILTIN_PROPERTIES.iter().enumerate() {
      assert_eq!(*key, i);
    }
  }
}
