//! Builtin data-type parsers
//!
//! Each function implements one `<…>` data type of the value-definition
//! grammar. They all take a single component token and return `None` when the
//! token does not belong to the type, letting the matcher try the next
//! alternative.

use super::types::{ColorValue, StyleValue, UnitValue};

/// Length unit suffixes, longest first so `rem` wins over `em`.
const LENGTH_UNITS: &[&str] = &[
  "rem", "px", "pt", "pc", "mm", "cm", "in", "em", "ex", "ch", "vw", "vh", "sp", "dp", "q",
];

/// Parse a `<length>` token: a number with a length unit, or `0`.
pub fn parse_length(s: &str) -> Option<StyleValue> {
  let s = s.trim();
  if s == "0" {
    return UnitValue::new(0.0, "px").map(StyleValue::Unit);
  }
  for unit in LENGTH_UNITS {
    if let Some(rest) = s.strip_suffix(unit) {
      let value: f64 = rest.parse().ok()?;
      return UnitValue::new(value, unit).map(StyleValue::Unit);
    }
  }
  None
}

/// Parse a `<percentage>` token.
pub fn parse_percentage(s: &str) -> Option<StyleValue> {
  let rest = s.trim().strip_suffix('%')?;
  rest.parse::<f64>().ok().map(StyleValue::Percentage)
}

/// Parse a `<number>` token.
pub fn parse_number(s: &str) -> Option<StyleValue> {
  s.trim().parse::<f64>().ok().map(StyleValue::Number)
}

/// Parse an `<integer>` token.
pub fn parse_integer(s: &str) -> Option<StyleValue> {
  s.trim().parse::<i32>().ok().map(StyleValue::Integer)
}

/// Parse a `<color>` token: hex, `rgb()`/`rgba()`, or a named color.
pub fn parse_color(s: &str) -> Option<StyleValue> {
  let color = csscolorparser::parse(s.trim()).ok()?;
  let [r, g, b, a] = color.to_rgba8();
  Some(StyleValue::Color(ColorValue::rgba(r, g, b, a)))
}

/// Parse a `<string>` token, stripping one level of matching quotes.
pub fn parse_string(s: &str) -> Option<StyleValue> {
  let s = s.trim();
  let inner = strip_quotes(s).unwrap_or(s);
  Some(StyleValue::String(inner.to_string()))
}

/// Parse an `<image>` token: `url(…)` or a bare path.
pub fn parse_image(s: &str) -> Option<StyleValue> {
  let s = s.trim();
  if s.is_empty() {
    return None;
  }
  let url = match s.strip_prefix("url(").and_then(|rest| rest.strip_suffix(')')) {
    Some(inner) => {
      let inner = inner.trim();
      strip_quotes(inner).unwrap_or(inner)
    }
    None => s,
  };
  Some(StyleValue::Image(url.to_string()))
}

fn strip_quotes(s: &str) -> Option<&str> {
  let first = s.chars().next()?;
  if (first == '"' || first == '\'') && s.len() >= 2 && s.ends_with(first) {
    Some(&s[1..s.len() - 1])
  } else {
    None
  }
}
