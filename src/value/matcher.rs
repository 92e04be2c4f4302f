//! Property-value parsing against a compiled definition
//!
//! Walks a [`ValueDef`] tree over the whitespace-split component tokens of a
//! value string. Group signs carry their W3C meaning: juxtaposition consumes
//! children in order, `&&` consumes all children in any order, `||` consumes
//! one or more in any order, `|` picks exactly one alternative. When several
//! parses are possible the leftmost choice in source order wins, and
//! repetition is greedy.
//!
//! A definition that is a bare `<type>` reference delegates the whole
//! (trimmed) value text to the type parser, so `<string>` properties can
//! carry spaces and empty strings.

use super::syntax::{ValueDef, ValueDefGroup, ValueDefSign};
use super::types::StyleValue;
use crate::keyword::KeywordRegistry;

/// A partial match: the component values produced so far and the token
/// position reached.
type Candidate = (Vec<StyleValue>, usize);

/// Parse `text` against a compiled value definition.
///
/// Returns `None` when the text does not match the definition; the caller
/// decides whether that becomes an invalid value or a skipped declaration.
pub fn parse_value(def: &ValueDef, text: &str, keywords: &KeywordRegistry) -> Option<StyleValue> {
  let text = text.trim();
  if let ValueDef::Type(record) = def {
    return (record.parse)(text);
  }
  let tokens: Vec<&str> = text.split_whitespace().collect();
  if tokens.is_empty() {
    return None;
  }
  let candidates = match_def(def, &tokens, 0, keywords);
  let (mut values, _) = candidates.into_iter().find(|(_, pos)| *pos == tokens.len())?;
  match values.len() {
    0 => None,
    1 => values.pop(),
    _ => Some(StyleValue::Array(values)),
  }
}

/// All ways `def` can match starting at `pos`, in preference order, deduped
/// by end position.
fn match_def(def: &ValueDef, tokens: &[&str], pos: usize, keywords: &KeywordRegistry) -> Vec<Candidate> {
  match def {
    ValueDef::Keyword(id) => match tokens.get(pos) {
      Some(token) if keywords.key_of(token) == Some(*id) => {
        vec![(vec![StyleValue::Keyword(*id)], pos + 1)]
      }
      _ => Vec::new(),
    },
    ValueDef::Type(record) => match tokens.get(pos).and_then(|token| (record.parse)(token)) {
      Some(value) => vec![(vec![value], pos + 1)],
      None => Vec::new(),
    },
    ValueDef::Group(group) => match_group(group, tokens, pos, keywords),
  }
}

/// Match one group including its repetition bounds. Greedy: more repetitions
/// are preferred, then candidates in child source order.
fn match_group(group: &ValueDefGroup, tokens: &[&str], pos: usize, keywords: &KeywordRegistry) -> Vec<Candidate> {
  // Cap the useful repetition count by the remaining input.
  let max = group.max.min((tokens.len() - pos + 1) as u32);
  let mut out = Vec::new();
  repeat_content(group, tokens, pos, 0, max, &mut Vec::new(), &mut out, keywords);
  dedup_by_pos(out)
}

#[allow(clippy::too_many_arguments)]
fn repeat_content(
  group: &ValueDefGroup,
  tokens: &[&str],
  pos: usize,
  count: u32,
  max: u32,
  values: &mut Vec<StyleValue>,
  out: &mut Vec<Candidate>,
  keywords: &KeywordRegistry,
) {
  if count < max {
    for (more, next) in match_content(group, tokens, pos, keywords) {
      if next == pos {
        // A zero-width iteration would repeat forever.
        continue;
      }
      let mark = values.len();
      values.extend(more);
      repeat_content(group, tokens, next, count + 1, max, values, out, keywords);
      values.truncate(mark);
    }
  }
  if count >= group.min {
    out.push((values.clone(), pos));
  }
}

/// Match the group's children once, per the group sign.
fn match_content(group: &ValueDefGroup, tokens: &[&str], pos: usize, keywords: &KeywordRegistry) -> Vec<Candidate> {
  let children = &group.children;
  let candidates = match group.sign {
    ValueDefSign::Juxtaposition | ValueDefSign::Brackets => match_sequence(children, tokens, pos, keywords),
    ValueDefSign::SingleBar => {
      let mut out = Vec::new();
      for child in children {
        out.extend(match_def(child, tokens, pos, keywords));
      }
      out
    }
    ValueDefSign::DoubleAmpersand => {
      let mut out = Vec::new();
      match_any_order(children, tokens, pos, 0, false, &mut Vec::new(), &mut out, keywords);
      out
    }
    ValueDefSign::DoubleBar => {
      let mut out = Vec::new();
      match_any_order(children, tokens, pos, 0, true, &mut Vec::new(), &mut out, keywords);
      out
    }
  };
  dedup_by_pos(candidates)
}

/// Children in order, all required.
fn match_sequence(children: &[ValueDef], tokens: &[&str], pos: usize, keywords: &KeywordRegistry) -> Vec<Candidate> {
  let mut acc: Vec<Candidate> = vec![(Vec::new(), pos)];
  for child in children {
    let mut next = Vec::new();
    for (values, at) in &acc {
      for (more, after) in match_def(child, tokens, *at, keywords) {
        let mut combined = values.clone();
        combined.extend(more);
        next.push((combined, after));
      }
    }
    acc = dedup_by_pos(next);
    if acc.is_empty() {
      break;
    }
  }
  acc
}

/// Children in any order. With `partial` (the `||` sign) any non-empty subset
/// succeeds; otherwise (`&&`) every child must match. Extension is explored
/// before stopping, so greedier parses come first.
#[allow(clippy::too_many_arguments)]
fn match_any_order(
  children: &[ValueDef],
  tokens: &[&str],
  pos: usize,
  used: u32,
  partial: bool,
  values: &mut Vec<StyleValue>,
  out: &mut Vec<Candidate>,
  keywords: &KeywordRegistry,
) {
  for (i, child) in children.iter().enumerate() {
    if used & (1 << i) != 0 {
      continue;
    }
    for (more, next) in match_def(child, tokens, pos, keywords) {
      let mark = values.len();
      values.extend(more);
      match_any_order(children, tokens, next, used | (1 << i), partial, values, out, keywords);
      values.truncate(mark);
    }
  }
  let complete = used.count_ones() as usize == children.len();
  if complete || (partial && used != 0) {
    out.push((values.clone(), pos));
  }
}

/// Keep the first candidate for each end position, preserving order.
fn dedup_by_pos(candidates: Vec<Candidate>) -> Vec<Candidate> {
  let mut seen = Vec::new();
  let mut out = Vec::new();
  for (values, pos) in candidates {
    if !seen.contains(&pos) {
      seen.push(pos);
      out.push((values, pos));
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::value::parsers;
  use crate::value::registry::ValueTypeRegistry;
  use crate::value::syntax::compile;
  use crate::value::types::{ColorValue, UnitValue};

  fn registries() -> (KeywordRegistry, ValueTypeRegistry) {
    let mut keywords = KeywordRegistry::new();
    for (id, name) in [
      (0, "none"),
      (1, "auto"),
      (2, "cover"),
      (3, "contain"),
      (4, "solid"),
      (5, "inset"),
    ] {
      keywords.register(id, name).unwrap();
    }
    let mut types = ValueTypeRegistry::new();
    types.register("length", parsers::parse_length).unwrap();
    types.register("percentage", parsers::parse_percentage).unwrap();
    types.register("color", parsers::parse_color).unwrap();
    types.register("string", parsers::parse_string).unwrap();
    (keywords, types)
  }

  fn parse(syntax: &str, text: &str) -> Option<StyleValue> {
    let (keywords, types) = registries();
    let def = compile(syntax, &keywords, &types).unwrap();
    parse_value(&def, text, &keywords)
  }

  fn px(value: f64) -> StyleValue {
    StyleValue::Unit(UnitValue::new(value, "px").unwrap())
  }

  #[test]
  fn single_alternative_picks_the_matching_branch() {
    assert_eq!(parse("auto | <length> | <percentage>", "auto"), Some(StyleValue::Keyword(1)));
    assert_eq!(parse("auto | <length> | <percentage>", "100px"), Some(px(100.0)));
    assert_eq!(
      parse("auto | <length> | <percentage>", "50%"),
      Some(StyleValue::Percentage(50.0))
    );
    assert_eq!(parse("auto | <length> | <percentage>", "wat"), None);
  }

  #[test]
  fn juxtaposition_requires_all_in_order() {
    assert_eq!(
      parse("<length> <length>", "1px 2px"),
      Some(StyleValue::Array(vec![px(1.0), px(2.0)]))
    );
    assert_eq!(parse("<length> <length>", "1px"), None);
    assert_eq!(parse("<length> <length>", "1px 2px 3px"), None);
  }

  #[test]
  fn leftmost_alternative_wins_on_ambiguity() {
    // `0` parses as both a length and (not) a percentage; the keyword branch
    // is listed first and must win for `auto`.
    assert_eq!(parse("auto | <length>", "auto"), Some(StyleValue::Keyword(1)));
  }

  #[test]
  fn repetition_bounds_are_enforced() {
    assert_eq!(parse("<length>{2,4}", "1px"), None);
    assert_eq!(
      parse("<length>{2,4}", "1px 2px 3px"),
      Some(StyleValue::Array(vec![px(1.0), px(2.0), px(3.0)]))
    );
    assert_eq!(parse("<length>{2,4}", "1px 2px 3px 4px 5px"), None);
  }

  #[test]
  fn double_ampersand_matches_any_order() {
    let syntax = "solid && <color>";
    let expected = |first_solid: bool| {
      let color = StyleValue::Color(ColorValue::rgb(255, 0, 0));
      let solid = StyleValue::Keyword(4);
      if first_solid {
        StyleValue::Array(vec![solid, color])
      } else {
        StyleValue::Array(vec![color, solid])
      }
    };
    assert_eq!(parse(syntax, "solid #f00"), Some(expected(true)));
    assert_eq!(parse(syntax, "#f00 solid"), Some(expected(false)));
    assert_eq!(parse(syntax, "solid"), None);
  }

  #[test]
  fn double_bar_matches_any_nonempty_subset() {
    let syntax = "solid || <color>";
    assert_eq!(parse(syntax, "solid"), Some(StyleValue::Keyword(4)));
    assert_eq!(
      parse(syntax, "#f00 solid"),
      Some(StyleValue::Array(vec![
        StyleValue::Color(ColorValue::rgb(255, 0, 0)),
        StyleValue::Keyword(4),
      ]))
    );
    assert_eq!(parse(syntax, "solid solid"), None);
  }

  #[test]
  fn shadow_like_grammar_parses_both_orders() {
    let syntax = "<length>{2,4} && <color>?";
    assert_eq!(
      parse(syntax, "1px 2px #f00"),
      Some(StyleValue::Array(vec![
        px(1.0),
        px(2.0),
        StyleValue::Color(ColorValue::rgb(255, 0, 0)),
      ]))
    );
    assert_eq!(
      parse(syntax, "1px 2px 3px"),
      Some(StyleValue::Array(vec![px(1.0), px(2.0), px(3.0)]))
    );
    assert_eq!(parse(syntax, "#f00"), None);
  }

  #[test]
  fn bare_type_definition_gets_the_whole_text() {
    assert_eq!(
      parse("<string>", "Noto Sans, sans-serif"),
      Some(StyleValue::String("Noto Sans, sans-serif".to_string()))
    );
    assert_eq!(parse("<string>", ""), Some(StyleValue::String(String::new())));
  }

  #[test]
  fn optional_group_may_be_absent() {
    let syntax = "[ <length> | <percentage> | auto ]{1,2} | cover | contain";
    assert_eq!(
      parse(syntax, "auto auto"),
      Some(StyleValue::Array(vec![StyleValue::Keyword(1), StyleValue::Keyword(1)]))
    );
    assert_eq!(parse(syntax, "cover"), Some(StyleValue::Keyword(2)));
    assert_eq!(parse(syntax, "cover cover"), None);
  }

  #[test]
  fn empty_text_fails_structured_definitions() {
    assert_eq!(parse("auto | <length>", ""), None);
    assert_eq!(parse("auto | <length>", "   "), None);
  }
}
