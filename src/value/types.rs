//! The CSS value model
//!
//! Every parsed property value is one of the [`StyleValue`] variants. The
//! enum is closed on purpose: cascade merging, printing, and hosts consuming
//! computed styles all pattern-match exhaustively. Values own their strings,
//! so cloning a value is a deep copy.

use crate::keyword::KeywordId;
use std::fmt;

/// A CSS value in parsed form.
///
/// `None` marks an unset declaration slot; `Invalid` marks a value that
/// failed to parse against its property's value definition. Everything else
/// is a concrete value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StyleValue {
  #[default]
  None,
  Invalid,
  /// Raw text that was deliberately left unparsed.
  Unparsed(String),
  /// Juxtaposed component values, e.g. `0% 0%` or a shadow.
  Array(Vec<StyleValue>),
  Number(f64),
  Integer(i32),
  String(String),
  Keyword(KeywordId),
  Color(ColorValue),
  /// Image reference by URL or path.
  Image(String),
  /// A number with an attached unit, e.g. `100px`.
  Unit(UnitValue),
  /// A resolved length in device-independent pixels.
  Length(f64),
  Percentage(f64),
}

impl StyleValue {
  /// Whether this slot carries a value (including `Invalid`).
  ///
  /// Declaration merging copies set slots and skips unset ones.
  pub fn is_set(&self) -> bool {
    !matches!(self, StyleValue::None)
  }
}

impl fmt::Display for StyleValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StyleValue::None => write!(f, "<none>"),
      StyleValue::Invalid => write!(f, "<invalid value>"),
      StyleValue::Unparsed(text) => write!(f, "{}", text),
      StyleValue::Array(items) => {
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            write!(f, " ")?;
          }
          write!(f, "{}", item)?;
        }
        Ok(())
      }
      StyleValue::Number(n) => write!(f, "{}", n),
      StyleValue::Integer(n) => write!(f, "{}", n),
      StyleValue::String(s) => write!(f, "{}", s),
      // Resolving the name needs the keyword registry; see
      // StyleEngine::format_value for the named form.
      StyleValue::Keyword(id) => write!(f, "keyword({})", id),
      StyleValue::Color(c) => write!(f, "{}", c),
      StyleValue::Image(url) => write!(f, "{}", url),
      StyleValue::Unit(u) => write!(f, "{}", u),
      StyleValue::Length(px) => write!(f, "{}px", px),
      StyleValue::Percentage(p) => write!(f, "{}%", p),
    }
  }
}

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorValue {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl ColorValue {
  pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }

  pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b, a: 255 }
  }
}

impl fmt::Display for ColorValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.a < 255 {
      write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, f64::from(self.a) / 255.0)
    } else {
      write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
  }
}

/// A numeric value with its source unit, e.g. `{100, "px"}`.
///
/// The unit is kept exactly as written (at most three ASCII characters);
/// interpreting it is the consumer's business.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitValue {
  pub value: f64,
  pub unit: CssUnit,
}

impl UnitValue {
  pub fn new(value: f64, unit: &str) -> Option<Self> {
    Some(Self {
      value,
      unit: CssUnit::new(unit)?,
    })
  }
}

impl fmt::Display for UnitValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.value, self.unit)
  }
}

/// A unit name of at most three ASCII bytes, stored inline.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CssUnit {
  bytes: [u8; 3],
  len: u8,
}

impl CssUnit {
  /// Returns `None` if the unit is empty, longer than three bytes, or not
  /// ASCII.
  pub fn new(unit: &str) -> Option<Self> {
    let raw = unit.as_bytes();
    if raw.is_empty() || raw.len() > 3 || !unit.is_ascii() {
      return None;
    }
    let mut bytes = [0u8; 3];
    bytes[..raw.len()].copy_from_slice(raw);
    Some(Self {
      bytes,
      len: raw.len() as u8,
    })
  }

  pub fn as_str(&self) -> &str {
    // Only constructed from ASCII in `new`.
    std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or("")
  }
}

impl fmt::Debug for CssUnit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", self.as_str())
  }
}

impl fmt::Display for CssUnit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Font style as declared by a font-face rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
  #[default]
  Normal,
  Italic,
  Oblique,
}

/// Font weight as declared by a font-face rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
  Thin = 100,
  ExtraLight = 200,
  Light = 300,
  #[default]
  Normal = 400,
  Medium = 500,
  SemiBold = 600,
  Bold = 700,
  ExtraBold = 800,
  Black = 900,
}

/// A font-face descriptor.
///
/// The style engine only defines the data shape; loading the referenced font
/// is the host's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontFace {
  pub font_family: String,
  pub font_style: FontStyle,
  pub font_weight: FontWeight,
  pub src: String,
}
