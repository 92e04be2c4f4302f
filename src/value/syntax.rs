//! Value-definition grammar compiler
//!
//! Compiles the W3C value-definition mini-language into a [`ValueDef`] tree:
//!
//! ```text
//! auto | <length> | <percentage>
//! [ <length> | <percentage> | auto ]{1,2} | cover | contain
//! <length>{2,4} && <color>?
//! ```
//!
//! Scanning is a small state machine over the current target (nothing, a
//! keyword, a data-type reference) with a scratch buffer; structure building
//! keeps a push-down stack of open bracket groups. Combinators bind per the
//! usual precedence: juxtaposition over `&&` over `||` over `|`, with
//! brackets overriding. Multiplier suffixes (`?`, `*`, `+`, `{m,n}`) apply to
//! the immediately preceding term or bracket group.
//!
//! Reference: CSS Values and Units Module Level 4, "Value Definition Syntax"
//! <https://drafts.csswg.org/css-values/#value-defs>

use super::registry::{ValueTypeRecord, ValueTypeRegistry};
use crate::error::{Error, ParseError, RegistryError};
use crate::keyword::{KeywordId, KeywordRegistry};
use std::rc::Rc;

/// Repetition bound meaning "no upper limit".
pub const REPEAT_UNBOUNDED: u32 = u32::MAX;

/// How a group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDefSign {
  /// All children, in order.
  Juxtaposition,
  /// All children, any order (`&&`).
  DoubleAmpersand,
  /// One or more children, any order (`||`).
  DoubleBar,
  /// Exactly one child (`|`).
  SingleBar,
  /// Explicit `[ … ]` group; also the repetition wrapper for multipliers.
  Brackets,
}

/// A compiled value definition.
#[derive(Debug, Clone)]
pub enum ValueDef {
  /// A literal identifier, stored by keyword id.
  Keyword(KeywordId),
  /// A `<…>` data-type reference.
  Type(Rc<ValueTypeRecord>),
  Group(ValueDefGroup),
}

#[derive(Debug, Clone)]
pub struct ValueDefGroup {
  pub sign: ValueDefSign,
  /// Minimum repetitions of the whole group.
  pub min: u32,
  /// Maximum repetitions; [`REPEAT_UNBOUNDED`] for `*` and `+`.
  pub max: u32,
  pub children: Vec<ValueDef>,
}

// ============================================================================
// Scanner
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
  Keyword(String),
  DataType(String),
  Sep(Separator),
  Open,
  Close,
  Multiplier(u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
  SingleBar,
  DoubleBar,
  DoubleAmpersand,
}

fn is_ident_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn syntax_error(message: &str, near: &str) -> ParseError {
  const NEAR_LEN: usize = 32;
  let near: String = near.chars().take(NEAR_LEN).collect();
  ParseError::InvalidValueDef {
    message: message.to_string(),
    near,
  }
}

/// Tokenize a value definition.
///
/// The scanner works through one of three targets: nothing (looking at
/// whitespace and signs), a keyword, or a `<…>` data-type reference; keyword
/// characters accumulate in a scratch buffer until a sign or whitespace
/// commits the token.
fn scan(input: &str) -> Result<Vec<Token>, ParseError> {
  #[derive(PartialEq)]
  enum Target {
    None,
    Keyword,
    DataType,
  }

  let chars: Vec<char> = input.chars().collect();
  let mut tokens = Vec::new();
  let mut buf = String::new();
  let mut target = Target::None;
  let mut pos = 0;

  while pos < chars.len() {
    let ch = chars[pos];
    match target {
      Target::None => {
        match ch {
          c if c.is_whitespace() => {}
          '<' => {
            buf.clear();
            target = Target::DataType;
          }
          '|' => {
            if chars.get(pos + 1) == Some(&'|') {
              pos += 1;
              tokens.push(Token::Sep(Separator::DoubleBar));
            } else {
              tokens.push(Token::Sep(Separator::SingleBar));
            }
          }
          '&' => {
            if chars.get(pos + 1) == Some(&'&') {
              pos += 1;
              tokens.push(Token::Sep(Separator::DoubleAmpersand));
            } else {
              return Err(syntax_error("stray '&'", &input[..]));
            }
          }
          '[' => tokens.push(Token::Open),
          ']' => tokens.push(Token::Close),
          '?' => tokens.push(Token::Multiplier(0, 1)),
          '*' => tokens.push(Token::Multiplier(0, REPEAT_UNBOUNDED)),
          '+' => tokens.push(Token::Multiplier(1, REPEAT_UNBOUNDED)),
          '{' => {
            let (token, consumed) = scan_repeat_bounds(&chars[pos..], input)?;
            tokens.push(token);
            pos += consumed - 1;
          }
          c if is_ident_char(c) => {
            buf.clear();
            buf.push(c);
            target = Target::Keyword;
          }
          _ => return Err(syntax_error("unexpected character", &format!("{}", ch))),
        }
        pos += 1;
      }
      Target::Keyword => {
        if is_ident_char(ch) {
          buf.push(ch);
          pos += 1;
        } else if ch == '>' {
          return Err(syntax_error("stray '>'", &buf));
        } else {
          // Whitespace or a sign commits the keyword; the sign is
          // reprocessed in the none target.
          tokens.push(Token::Keyword(std::mem::take(&mut buf)));
          target = Target::None;
        }
      }
      Target::DataType => {
        if ch == '>' {
          // The reference may carry a range suffix (`<integer [0,∞]>`);
          // only the leading identifier names the type.
          let name = buf.split_whitespace().next().unwrap_or("").to_string();
          if name.is_empty() {
            return Err(syntax_error("empty data-type reference", "<>"));
          }
          tokens.push(Token::DataType(name));
          buf.clear();
          target = Target::None;
          pos += 1;
        } else if ch == '<' {
          return Err(syntax_error("nested '<' in data-type reference", &buf));
        } else {
          buf.push(ch);
          pos += 1;
        }
      }
    }
  }

  match target {
    Target::Keyword => tokens.push(Token::Keyword(buf)),
    Target::DataType => return Err(syntax_error("unterminated data-type reference", &buf)),
    Target::None => {}
  }
  Ok(tokens)
}

/// Scan a `{m}`, `{m,}` or `{m,n}` multiplier starting at `chars[0] == '{'`.
/// Returns the token and the number of characters consumed including both
/// braces.
fn scan_repeat_bounds(chars: &[char], input: &str) -> Result<(Token, usize), ParseError> {
  let close = chars
    .iter()
    .position(|c| *c == '}')
    .ok_or_else(|| syntax_error("unterminated '{m,n}' multiplier", input))?;
  let body: String = chars[1..close].iter().collect();
  let body = body.trim();
  let parse_bound = |s: &str| {
    s.trim()
      .parse::<u32>()
      .map_err(|_| syntax_error("expected a number in '{m,n}'", body))
  };
  let (min, max) = match body.split_once(',') {
    None => {
      let n = parse_bound(body)?;
      (n, n)
    }
    Some((m, "")) => (parse_bound(m)?, REPEAT_UNBOUNDED),
    Some((m, n)) => (parse_bound(m)?, parse_bound(n)?),
  };
  if min > max {
    return Err(syntax_error("'{m,n}' with m greater than n", body));
  }
  Ok((Token::Multiplier(min, max), close + 1))
}

// ============================================================================
// Structure builder
// ============================================================================

#[derive(Debug)]
enum Item {
  Term(ValueDef),
  Sep(Separator),
}

/// Compile a value-definition string against the keyword and value-type
/// registries.
///
/// Bare identifiers resolve through the alias table first, then the keyword
/// registry; unknown identifiers and unknown `<types>` are not-found errors.
pub fn compile(
  input: &str,
  keywords: &KeywordRegistry,
  types: &ValueTypeRegistry,
) -> Result<ValueDef, Error> {
  let tokens = scan(input)?;
  // Stack of open bracket groups; the bottom frame is the whole definition.
  let mut stack: Vec<Vec<Item>> = vec![Vec::new()];

  for token in tokens {
    match token {
      Token::Keyword(name) => {
        let term = if let Some(alias) = types.resolve_alias(&name) {
          (**alias).clone()
        } else if let Some(id) = keywords.key_of(&name) {
          ValueDef::Keyword(id)
        } else {
          return Err(RegistryError::UnknownKeyword { name }.into());
        };
        stack.last_mut().expect("frame").push(Item::Term(term));
      }
      Token::DataType(name) => {
        let record = types
          .get(&name)
          .ok_or(RegistryError::UnknownValueType { name })?;
        stack
          .last_mut()
          .expect("frame")
          .push(Item::Term(ValueDef::Type(record.clone())));
      }
      Token::Sep(sep) => {
        let frame = stack.last_mut().expect("frame");
        if !matches!(frame.last(), Some(Item::Term(_))) {
          return Err(syntax_error("combinator without a left operand", input).into());
        }
        frame.push(Item::Sep(sep));
      }
      Token::Open => stack.push(Vec::new()),
      Token::Close => {
        let frame = stack.pop().expect("frame");
        if stack.is_empty() {
          return Err(syntax_error("unbalanced ']'", input).into());
        }
        let inner = reduce(frame, input)?;
        let group = ValueDef::Group(ValueDefGroup {
          sign: ValueDefSign::Brackets,
          min: 1,
          max: 1,
          children: vec![inner],
        });
        stack.last_mut().expect("frame").push(Item::Term(group));
      }
      Token::Multiplier(min, max) => {
        let frame = stack.last_mut().expect("frame");
        match frame.last_mut() {
          Some(Item::Term(term)) => apply_multiplier(term, min, max),
          _ => return Err(syntax_error("multiplier without a preceding term", input).into()),
        }
      }
    }
  }

  if stack.len() != 1 {
    return Err(syntax_error("unterminated bracket group", input).into());
  }
  reduce(stack.pop().expect("frame"), input).map_err(Error::from)
}

/// Attach repetition bounds to the preceding term, wrapping non-groups in a
/// bracket group so the bounds have somewhere to live.
fn apply_multiplier(term: &mut ValueDef, min: u32, max: u32) {
  match term {
    ValueDef::Group(group) if group.sign == ValueDefSign::Brackets && group.min == 1 && group.max == 1 => {
      group.min = min;
      group.max = max;
    }
    other => {
      let inner = std::mem::replace(other, ValueDef::Keyword(0));
      *other = ValueDef::Group(ValueDefGroup {
        sign: ValueDefSign::Brackets,
        min,
        max,
        children: vec![inner],
      });
    }
  }
}

/// Reduce a frame's flat item sequence into a tree, splitting at the loosest
/// combinator first so tighter signs end up deeper.
fn reduce(items: Vec<Item>, input: &str) -> Result<ValueDef, ParseError> {
  if items.is_empty() {
    return Err(syntax_error("empty value definition", input));
  }
  if matches!(items.last(), Some(Item::Sep(_))) {
    return Err(syntax_error("dangling combinator", input));
  }
  reduce_level(items, 0, input)
}

/// Separator for each precedence level, loosest first.
const LEVELS: &[(Separator, ValueDefSign)] = &[
  (Separator::SingleBar, ValueDefSign::SingleBar),
  (Separator::DoubleBar, ValueDefSign::DoubleBar),
  (Separator::DoubleAmpersand, ValueDefSign::DoubleAmpersand),
];

fn reduce_level(items: Vec<Item>, level: usize, input: &str) -> Result<ValueDef, ParseError> {
  let Some((sep, sign)) = LEVELS.get(level).copied() else {
    return reduce_juxtaposition(items, input);
  };
  let mut parts: Vec<Vec<Item>> = vec![Vec::new()];
  for item in items {
    match item {
      Item::Sep(s) if s == sep => parts.push(Vec::new()),
      other => parts.last_mut().expect("part").push(other),
    }
  }
  if parts.len() == 1 {
    let part = parts.pop().expect("part");
    return reduce_level(part, level + 1, input);
  }
  let mut children = Vec::with_capacity(parts.len());
  for part in parts {
    children.push(reduce_level(part, level + 1, input)?);
  }
  Ok(ValueDef::Group(ValueDefGroup {
    sign,
    min: 1,
    max: 1,
    children,
  }))
}

fn reduce_juxtaposition(items: Vec<Item>, input: &str) -> Result<ValueDef, ParseError> {
  let mut children = Vec::with_capacity(items.len());
  for item in items {
    match item {
      Item::Term(term) => children.push(term),
      Item::Sep(_) => return Err(syntax_error("combinator out of precedence order", input)),
    }
  }
  if children.len() == 1 {
    return Ok(children.pop().expect("child"));
  }
  Ok(ValueDef::Group(ValueDefGroup {
    sign: ValueDefSign::Juxtaposition,
    min: 1,
    max: 1,
    children,
  }))
}
