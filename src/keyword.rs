//! Keyword registry
//!
//! CSS keyword values (`auto`, `none`, `flex-start`, …) are interned once at
//! startup and referred to by small integer ids everywhere else. The registry
//! is an exact-match bidirectional mapping; registration never overwrites an
//! existing entry in either direction.

use crate::error::RegistryError;
use rustc_hash::FxHashMap;

/// Integer id of a registered keyword.
pub type KeywordId = i32;

/// Builtin keyword ids, registered by [`crate::StyleEngine::new`].
///
/// Hosts may register additional keywords with ids that do not collide with
/// these.
pub mod builtin {
  use super::KeywordId;

  pub const NONE: KeywordId = 0;
  pub const AUTO: KeywordId = 1;
  pub const NORMAL: KeywordId = 2;
  pub const INHERIT: KeywordId = 3;
  pub const INITIAL: KeywordId = 4;
  pub const CONTAIN: KeywordId = 5;
  pub const COVER: KeywordId = 6;
  pub const LEFT: KeywordId = 7;
  pub const CENTER: KeywordId = 8;
  pub const RIGHT: KeywordId = 9;
  pub const TOP: KeywordId = 10;
  pub const MIDDLE: KeywordId = 11;
  pub const BOTTOM: KeywordId = 12;
  pub const SOLID: KeywordId = 13;
  pub const CONTENT_BOX: KeywordId = 14;
  pub const BORDER_BOX: KeywordId = 15;
  pub const STATIC: KeywordId = 16;
  pub const RELATIVE: KeywordId = 17;
  pub const ABSOLUTE: KeywordId = 18;
  pub const BLOCK: KeywordId = 19;
  pub const INLINE_BLOCK: KeywordId = 20;
  pub const FLEX: KeywordId = 21;
  pub const FLEX_START: KeywordId = 22;
  pub const FLEX_END: KeywordId = 23;
  pub const STRETCH: KeywordId = 24;
  pub const SPACE_BETWEEN: KeywordId = 25;
  pub const SPACE_AROUND: KeywordId = 26;
  pub const SPACE_EVENLY: KeywordId = 27;
  pub const WRAP: KeywordId = 28;
  pub const NOWRAP: KeywordId = 29;
  pub const ROW: KeywordId = 30;
  pub const COLUMN: KeywordId = 31;
  pub const VISIBLE: KeywordId = 32;
  pub const HIDDEN: KeywordId = 33;
  pub const ITALIC: KeywordId = 34;
  pub const OBLIQUE: KeywordId = 35;
  pub const BASELINE: KeywordId = 36;
  pub const FIRST: KeywordId = 37;
  pub const LAST: KeywordId = 38;
  pub const START: KeywordId = 39;
  pub const END: KeywordId = 40;
}

/// The builtin keyword table, in registration order.
///
/// Every entry is referenced by a builtin property syntax or alias, except
/// the CSS-wide `inherit`/`initial`, which hosts resolve during cascade.
pub(crate) const BUILTIN_KEYWORDS: &[(KeywordId, &str)] = &[
  (builtin::NONE, "none"),
  (builtin::AUTO, "auto"),
  (builtin::NORMAL, "normal"),
  (builtin::INHERIT, "inherit"),
  (builtin::INITIAL, "initial"),
  (builtin::CONTAIN, "contain"),
  (builtin::COVER, "cover"),
  (builtin::LEFT, "left"),
  (builtin::CENTER, "center"),
  (builtin::RIGHT, "right"),
  (builtin::TOP, "top"),
  (builtin::MIDDLE, "middle"),
  (builtin::BOTTOM, "bottom"),
  (builtin::SOLID, "solid"),
  (builtin::CONTENT_BOX, "content-box"),
  (builtin::BORDER_BOX, "border-box"),
  (builtin::STATIC, "static"),
  (builtin::RELATIVE, "relative"),
  (builtin::ABSOLUTE, "absolute"),
  (builtin::BLOCK, "block"),
  (builtin::INLINE_BLOCK, "inline-block"),
  (builtin::FLEX, "flex"),
  (builtin::FLEX_START, "flex-start"),
  (builtin::FLEX_END, "flex-end"),
  (builtin::STRETCH, "stretch"),
  (builtin::SPACE_BETWEEN, "space-between"),
  (builtin::SPACE_AROUND, "space-around"),
  (builtin::SPACE_EVENLY, "space-evenly"),
  (builtin::WRAP, "wrap"),
  (builtin::NOWRAP, "nowrap"),
  (builtin::ROW, "row"),
  (builtin::COLUMN, "column"),
  (builtin::VISIBLE, "visible"),
  (builtin::HIDDEN, "hidden"),
  (builtin::ITALIC, "italic"),
  (builtin::OBLIQUE, "oblique"),
  (builtin::BASELINE, "baseline"),
  (builtin::FIRST, "first"),
  (builtin::LAST, "last"),
  (builtin::START, "start"),
  (builtin::END, "end"),
];

/// Bidirectional keyword mapping.
#[derive(Debug, Default)]
pub struct KeywordRegistry {
  by_name: FxHashMap<String, KeywordId>,
  by_id: FxHashMap<KeywordId, String>,
}

impl KeywordRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a keyword under both directions.
  ///
  /// Fails without side effects if either the id or the name is already
  /// taken.
  pub fn register(&mut self, id: KeywordId, name: &str) -> Result<(), RegistryError> {
    if self.by_name.contains_key(name) || self.by_id.contains_key(&id) {
      return Err(RegistryError::DuplicateKeyword {
        id,
        name: name.to_string(),
      });
    }
    self.by_name.insert(name.to_string(), id);
    self.by_id.insert(id, name.to_string());
    Ok(())
  }

  /// Exact-match lookup of a keyword id by name.
  pub fn key_of(&self, name: &str) -> Option<KeywordId> {
    self.by_name.get(name).copied()
  }

  /// Exact-match lookup of a keyword name by id.
  pub fn name_of(&self, id: KeywordId) -> Option<&str> {
    self.by_id.get(&id).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.by_id.len()
  }

  pub fn is_empty(&self) -> bool {
    self.by_id.is_empty()
  }

  pub(crate) fn register_builtins(&mut self) {
    for (id, name) in BUILTIN_KEYWORDS {
      // The builtin table is collision-free by construction.
      let _ = self.register(*id, name);
    }
  }
}
