//! Selector model and parsing
//!
//! A selector is an ordered chain of simple-selector nodes separated by
//! whitespace (the descendant combinator), written ancestor-first:
//!
//! ```text
//! panel.sidebar button#ok:hover
//! ```
//!
//! Each node carries an optional type, an optional id, and sorted sets of
//! classes and pseudo-class states. The node's `fullname` is its canonical
//! text form (`type#id.class:state` with classes and states sorted); the
//! selector's hash is a DJB2 hash over the node fullnames, and `batch_num`
//! is a process-wide creation counter that breaks specificity ties in favor
//! of later rules.

pub mod names;

use crate::error::{ParseError, Result};
use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};

/// Maximum number of simple-selector nodes in one selector.
pub const SELECTOR_MAX_DEPTH: usize = 32;

/// Maximum length in bytes of a generated selector name.
pub const SELECTOR_MAX_LEN: usize = 1024;

/// Specificity weights per saved component.
const TYPE_RANK: i32 = 1;
const CLASS_RANK: i32 = 10;
const STATUS_RANK: i32 = 10;
const ID_RANK: i32 = 100;

static NEXT_BATCH_NUM: AtomicI32 = AtomicI32::new(0);

fn next_batch_num() -> i32 {
  NEXT_BATCH_NUM.fetch_add(1, Ordering::Relaxed) + 1
}

fn is_ident_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '*'
}

/// DJB2 over `bytes`, continuing from `hash`.
pub(crate) fn djb2_extend(hash: u32, bytes: &[u8]) -> u32 {
  let mut h = hash;
  for b in bytes {
    h = h.wrapping_mul(33).wrapping_add(u32::from(*b));
  }
  h
}

/// One simple selector: the building block of a selector chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorNode {
  /// Element type, `*` for the wildcard.
  pub type_name: Option<String>,
  pub id: Option<String>,
  /// Class names, sorted and duplicate-free.
  pub classes: Vec<String>,
  /// Pseudo-class states, sorted and duplicate-free.
  pub status: Vec<String>,
  /// Canonical `type#id.class:state` form; derived by [`Self::update`].
  pub fullname: String,
  /// Specificity contribution; derived by [`Self::update`].
  pub rank: i32,
}

impl SelectorNode {
  /// Recompute `fullname` and `rank` from the node's content.
  pub fn update(&mut self) {
    let mut rank = 0;
    let mut fullname = String::new();
    if let Some(type_name) = &self.type_name {
      fullname.push_str(type_name);
      rank += TYPE_RANK;
    }
    if let Some(id) = &self.id {
      fullname.push('#');
      fullname.push_str(id);
      rank += ID_RANK;
    }
    for class in &self.classes {
      fullname.push('.');
      fullname.push_str(class);
      rank += CLASS_RANK;
    }
    for status in &self.status {
      fullname.push(':');
      fullname.push_str(status);
      rank += STATUS_RANK;
    }
    self.fullname = fullname;
    self.rank = rank;
  }

  /// Whether this node (a concrete element) satisfies `pattern`.
  ///
  /// The pattern's id and type must match exactly (a `*` type matches any);
  /// its classes and states must be subsets of this node's.
  pub fn matches(&self, pattern: &SelectorNode) -> bool {
    if let Some(id) = &pattern.id {
      if self.id.as_deref() != Some(id.as_str()) {
        return false;
      }
    }
    if let Some(type_name) = &pattern.type_name {
      if type_name != "*" && self.type_name.as_deref() != Some(type_name.as_str()) {
        return false;
      }
    }
    pattern.classes.iter().all(|c| self.classes.binary_search(c).is_ok())
      && pattern.status.iter().all(|s| self.status.binary_search(s).is_ok())
  }

  /// Every compound name this node can be requested under; see
  /// [`names`] for the enumeration.
  pub fn name_list(&self) -> Vec<String> {
    names::collect_names(self)
  }

  /// Insert into a sorted set, absorbing duplicates. Returns whether the
  /// value was added.
  fn sorted_insert(set: &mut Vec<String>, value: &str) -> bool {
    match set.binary_search_by(|probe| probe.as_str().cmp(value)) {
      Ok(_) => false,
      Err(at) => {
        set.insert(at, value.to_string());
        true
      }
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveKind {
  Type,
  Id,
  Class,
  Status,
}

impl SaveKind {
  fn prefix(self) -> char {
    match self {
      SaveKind::Type => '\0',
      SaveKind::Id => '#',
      SaveKind::Class => '.',
      SaveKind::Status => ':',
    }
  }
}

/// A parsed compound selector: nodes in ancestor-to-target order plus the
/// derived cascade keys.
#[derive(Debug, Clone)]
pub struct Selector {
  nodes: Vec<SelectorNode>,
  /// Total specificity across nodes.
  pub rank: i32,
  /// Creation-order tie-break; later wins at equal rank.
  pub batch_num: i32,
  /// DJB2 hash over the node fullnames.
  pub hash: u32,
}

impl Selector {
  /// Parse a selector string.
  ///
  /// Nodes are separated by whitespace; within a node, `#`, `.` and `:`
  /// introduce id, class, and state tokens, and a leading identifier is the
  /// element type. Identifier characters are letters, digits, `-`, `_`, and
  /// `*`. Anything else aborts the parse.
  pub fn parse(text: &str) -> Result<Selector> {
    let mut nodes: Vec<SelectorNode> = Vec::new();
    let mut node = SelectorNode::default();
    let mut token = String::new();
    let mut kind = SaveKind::Type;
    let mut saving = false;

    for (offset, ch) in text.char_indices() {
      match ch {
        '#' | '.' | ':' => {
          if saving {
            Self::commit(text, &mut node, &token, kind)?;
          }
          saving = true;
          kind = match ch {
            '#' => SaveKind::Id,
            '.' => SaveKind::Class,
            _ => SaveKind::Status,
          };
          token.clear();
        }
        c if c.is_whitespace() => {
          if saving {
            Self::commit(text, &mut node, &token, kind)?;
            Self::finish(text, &mut nodes, std::mem::take(&mut node))?;
            saving = false;
            kind = SaveKind::Type;
            token.clear();
          }
        }
        c if is_ident_char(c) => {
          if !saving {
            saving = true;
            kind = SaveKind::Type;
          }
          token.push(c);
        }
        other => {
          log::warn!("[css] {}: unknown char {:?} at {}", text, other, offset);
          return Err(
            ParseError::InvalidSelector {
              selector: text.to_string(),
              found: other,
              offset,
            }
            .into(),
          );
        }
      }
    }
    if saving {
      Self::commit(text, &mut node, &token, kind)?;
      Self::finish(text, &mut nodes, node)?;
    }

    let mut selector = Selector {
      nodes,
      rank: 0,
      batch_num: next_batch_num(),
      hash: 5381,
    };
    let mut name_len = 0;
    for node in &selector.nodes {
      selector.rank += node.rank;
      selector.hash = djb2_extend(selector.hash, node.fullname.as_bytes());
      name_len += node.fullname.len() + 1;
    }
    if name_len > SELECTOR_MAX_LEN + 1 {
      log::warn!("[css] {}: selector name is too long", text);
      return Err(
        ParseError::NameTooLong {
          length: name_len - 1,
          limit: SELECTOR_MAX_LEN,
        }
        .into(),
      );
    }
    Ok(selector)
  }

  fn commit(text: &str, node: &mut SelectorNode, token: &str, kind: SaveKind) -> Result<()> {
    if token.is_empty() {
      return Err(
        ParseError::MalformedSelector {
          selector: text.to_string(),
          message: format!("missing identifier after '{}'", kind.prefix()),
        }
        .into(),
      );
    }
    match kind {
      SaveKind::Type => {
        if node.type_name.is_some() {
          return Err(Self::malformed(text, "type written twice in one node"));
        }
        node.type_name = Some(token.to_string());
      }
      SaveKind::Id => {
        if node.id.is_some() {
          return Err(Self::malformed(text, "id written twice in one node"));
        }
        node.id = Some(token.to_string());
      }
      SaveKind::Class => {
        SelectorNode::sorted_insert(&mut node.classes, token);
      }
      SaveKind::Status => {
        SelectorNode::sorted_insert(&mut node.status, token);
      }
    }
    Ok(())
  }

  fn malformed(text: &str, message: &str) -> crate::error::Error {
    ParseError::MalformedSelector {
      selector: text.to_string(),
      message: message.to_string(),
    }
    .into()
  }

  fn finish(text: &str, nodes: &mut Vec<SelectorNode>, mut node: SelectorNode) -> Result<()> {
    node.update();
    if nodes.len() >= SELECTOR_MAX_DEPTH {
      log::warn!("[css] {}: selector node list is too long", text);
      return Err(
        ParseError::SelectorTooDeep {
          length: nodes.len() + 1,
          limit: SELECTOR_MAX_DEPTH,
        }
        .into(),
      );
    }
    nodes.push(node);
    Ok(())
  }

  /// Append a node to the target end of the chain.
  ///
  /// The node's derived fields are refreshed; the selector's rank, hash, and
  /// name-length bound are maintained.
  pub fn append(&mut self, mut node: SelectorNode) -> Result<()> {
    if self.nodes.len() >= SELECTOR_MAX_DEPTH {
      log::warn!("[css] selector node list is too long");
      return Err(
        ParseError::SelectorTooDeep {
          length: self.nodes.len() + 1,
          limit: SELECTOR_MAX_DEPTH,
        }
        .into(),
      );
    }
    node.update();
    let name_len: usize = self.nodes.iter().map(|n| n.fullname.len() + 1).sum::<usize>() + node.fullname.len();
    if name_len > SELECTOR_MAX_LEN {
      log::warn!("[css] selector name is too long");
      return Err(
        ParseError::NameTooLong {
          length: name_len,
          limit: SELECTOR_MAX_LEN,
        }
        .into(),
      );
    }
    self.rank += node.rank;
    self.hash = djb2_extend(self.hash, node.fullname.as_bytes());
    self.nodes.push(node);
    Ok(())
  }

  /// Nodes in ancestor-to-target order.
  pub fn nodes(&self) -> &[SelectorNode] {
    &self.nodes
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}

impl fmt::Display for Selector {
  /// The canonical text form: node fullnames joined by single spaces.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, node) in self.nodes.iter().enumerate() {
      if i > 0 {
        write!(f, " ")?;
      }
      f.write_str(&node.fullname)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_a_single_node_with_all_parts() {
    let s = Selector::parse("textview#main.red.big:hover").unwrap();
    assert_eq!(s.len(), 1);
    let node = &s.nodes()[0];
    assert_eq!(node.type_name.as_deref(), Some("textview"));
    assert_eq!(node.id.as_deref(), Some("main"));
    assert_eq!(node.classes, vec!["big", "red"]);
    assert_eq!(node.status, vec!["hover"]);
    assert_eq!(node.fullname, "textview#main.big.red:hover");
    assert_eq!(node.rank, 1 + 100 + 20 + 10);
    assert_eq!(s.rank, 131);
  }

  #[test]
  fn whitespace_separates_descendant_nodes() {
    let s = Selector::parse("panel .list  button:active").unwrap();
    assert_eq!(s.len(), 3);
    assert_eq!(s.nodes()[0].fullname, "panel");
    assert_eq!(s.nodes()[1].fullname, ".list");
    assert_eq!(s.nodes()[2].fullname, "button:active");
    assert_eq!(s.rank, 1 + 10 + 11);
  }

  #[test]
  fn classes_and_states_are_sorted_and_deduplicated() {
    let s = Selector::parse("div.b.a.b:z:a").unwrap();
    let node = &s.nodes()[0];
    assert_eq!(node.classes, vec!["a", "b"]);
    assert_eq!(node.status, vec!["a", "z"]);
    assert_eq!(node.rank, 1 + 20 + 20);
  }

  #[test]
  fn canonical_form_reparses_to_an_equal_selector() {
    let original = Selector::parse("tv#m.c.b:h:a").unwrap();
    let canonical = format!("{}", original);
    assert_eq!(canonical, "tv#m.b.c:a:h");
    let reparsed = Selector::parse(&canonical).unwrap();
    assert_eq!(reparsed.nodes(), original.nodes());
    assert_eq!(reparsed.hash, original.hash);
    assert_eq!(reparsed.rank, original.rank);
  }

  #[test]
  fn unknown_characters_abort_the_parse() {
    let err = Selector::parse("div > p").unwrap_err();
    assert!(matches!(
      err,
      crate::Error::Parse(ParseError::InvalidSelector { found: '>', .. })
    ));
    assert!(Selector::parse("a[href]").is_err());
  }

  #[test]
  fn dangling_prefix_is_malformed() {
    assert!(Selector::parse("div.").is_err());
    assert!(Selector::parse(".").is_err());
    assert!(Selector::parse("div..x").is_err());
  }

  #[test]
  fn duplicate_id_is_malformed() {
    assert!(Selector::parse("div#a#b").is_err());
  }

  #[test]
  fn batch_numbers_strictly_increase() {
    let a = Selector::parse("a").unwrap();
    let b = Selector::parse("a").unwrap();
    assert!(b.batch_num > a.batch_num);
    assert_eq!(a.hash, b.hash);
  }

  #[test]
  fn clone_preserves_batch_number_and_hash() {
    let a = Selector::parse("div.red").unwrap();
    let b = a.clone();
    assert_eq!(a.batch_num, b.batch_num);
    assert_eq!(a.hash, b.hash);
    assert_eq!(a.nodes(), b.nodes());
  }

  #[test]
  fn depth_limit_is_enforced() {
    let text = vec!["a"; SELECTOR_MAX_DEPTH + 1].join(" ");
    let err = Selector::parse(&text).unwrap_err();
    assert!(matches!(
      err,
      crate::Error::Parse(ParseError::SelectorTooDeep { .. })
    ));
    assert!(Selector::parse(&vec!["a"; SELECTOR_MAX_DEPTH].join(" ")).is_ok());
  }

  #[test]
  fn name_length_limit_is_enforced() {
    let long = "x".repeat(SELECTOR_MAX_LEN + 1);
    assert!(matches!(
      Selector::parse(&long).unwrap_err(),
      crate::Error::Parse(ParseError::NameTooLong { .. })
    ));
  }

  #[test]
  fn append_maintains_rank_and_hash() {
    let mut built = Selector::parse("panel").unwrap();
    let mut node = SelectorNode {
      type_name: Some("button".to_string()),
      ..SelectorNode::default()
    };
    node.classes.push("ok".to_string());
    built.append(node).unwrap();

    let parsed = Selector::parse("panel button.ok").unwrap();
    assert_eq!(built.rank, parsed.rank);
    assert_eq!(built.hash, parsed.hash);
  }

  #[test]
  fn node_matching_is_subset_based() {
    let concrete = &Selector::parse("button#ok.big.red:hover:focus").unwrap().nodes()[0].clone();
    let matches = |pattern: &str| concrete.matches(&Selector::parse(pattern).unwrap().nodes()[0]);
    assert!(matches("button"));
    assert!(matches("*"));
    assert!(matches("button.red"));
    assert!(matches("#ok.big:focus"));
    assert!(!matches("button.blue"));
    assert!(!matches("label"));
    assert!(!matches("#cancel"));
  }

  #[test]
  fn wildcard_selector_parses() {
    let s = Selector::parse("*").unwrap();
    assert_eq!(s.nodes()[0].fullname, "*");
    assert_eq!(s.rank, 1);
  }
}
