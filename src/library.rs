//! The style library: rule indexing, cascade queries, and the computed-style
//! cache
//!
//! Rules are indexed in a multi-level trie keyed for reverse (target-first)
//! lookup. Level `d` maps the compound name of the node `d` steps above the
//! target to a link group; within a group, links are keyed by the running
//! selector text below that node (`"*"` at the target level). Each link owns
//! the rules declared at exactly its position and a `parents` table naming
//! which deeper links continue the trail, so a query can chase ancestors
//! through any intervening elements, which is the descendant-combinator
//! semantics.
//!
//! Cascade order is `(rank, batch_num)` descending: specificity first, then
//! source order, with merging done first-writer-wins over that order. Results
//! are cached per selector hash and the whole cache is dropped on every rule
//! insertion.

use crate::declaration::{StyleDeclaration, StyleProperties};
use crate::error::{ParseError, RegistryError, Result};
use crate::keyword::{KeywordId, KeywordRegistry};
use crate::property::{PropertyDef, PropertyKey, PropertyRegistry, BUILTIN_ALIASES, BUILTIN_PROPERTIES};
use crate::selector::Selector;
use crate::value::parse_cache::{self, ParsedValueCacheKey};
use crate::value::registry::{ValueParseFn, ValueTypeRegistry};
use crate::value::syntax::{self, ValueDef};
use crate::value::types::StyleValue;
use crate::value::{matcher, parsers};
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cache key type: the selector's DJB2 hash.
///
/// Collisions are accepted as cache pollution rather than paying for full
/// selector-text keys; `query_selector` remains the uncached truth.
pub type SelectorHash = u32;

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// A rule as stored in the trie: the declarations of one
/// `add_style_sheet` call plus its cascade keys.
#[derive(Debug)]
pub struct StyleRule {
  /// Origin tag (usually the source file path), interned per engine.
  pub origin: Option<Rc<str>>,
  /// Canonical selector text the rule was filed under.
  pub selector: String,
  pub rank: i32,
  pub batch_num: i32,
  pub properties: StyleProperties,
}

/// A trie node. A link's key in its group is the space-joined fullnames of
/// the nodes below it (nearest first), `"*"` at the target level. `parents`
/// maps an ancestor node's fullname to the key of the link that continues
/// the trail one level deeper; resolving by key instead of holding
/// references keeps the trie free of cycles.
#[derive(Debug, Default)]
struct StyleLink {
  rules: Vec<Rc<StyleRule>>,
  parents: FxHashMap<String, String>,
}

/// All links whose own node has the same compound name (the group's key in
/// its level map).
#[derive(Debug, Default)]
struct LinkGroup {
  links: FxHashMap<String, StyleLink>,
}

/// One trie level: compound node name → link group.
type StyleGroup = FxHashMap<String, LinkGroup>;

/// The style engine: registries, the rule trie, and the computed-style
/// cache.
///
/// One engine owns all process-lifetime state the cascade needs. It is not
/// internally synchronized; hosts driving it from several threads serialize
/// access externally. Tear-down is `Drop`.
#[derive(Debug)]
pub struct StyleEngine {
  keywords: KeywordRegistry,
  properties: PropertyRegistry,
  value_types: ValueTypeRegistry,
  groups: Vec<StyleGroup>,
  cache: FxHashMap<SelectorHash, Rc<StyleDeclaration>>,
  origins: FxHashSet<Rc<str>>,
  id: u64,
}

impl Default for StyleEngine {
  fn default() -> Self {
    Self::new()
  }
}

impl StyleEngine {
  /// An engine with the builtin keywords, value types, aliases, and
  /// properties registered.
  pub fn new() -> Self {
    let mut engine = Self::empty();
    engine.keywords.register_builtins();
    engine.register_builtin_value_types();
    for (alias, syntax) in BUILTIN_ALIASES {
      engine
        .register_value_type_alias(alias, syntax)
        .expect("builtin alias table must compile");
    }
    for (key, name, syntax, initial) in BUILTIN_PROPERTIES {
      engine
        .register_property_with_key(*key, name, syntax, initial)
        .expect("builtin property table must compile");
    }
    engine
  }

  /// An engine with empty registries; hosts register everything themselves.
  pub fn empty() -> Self {
    Self {
      keywords: KeywordRegistry::new(),
      properties: PropertyRegistry::new(),
      value_types: ValueTypeRegistry::new(),
      groups: Vec::new(),
      cache: FxHashMap::default(),
      origins: FxHashSet::default(),
      id: NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed),
    }
  }

  fn register_builtin_value_types(&mut self) {
    let builtin: &[(&str, ValueParseFn)] = &[
      ("number", parsers::parse_number),
      ("integer", parsers::parse_integer),
      ("length", parsers::parse_length),
      ("percentage", parsers::parse_percentage),
      ("color", parsers::parse_color),
      ("string", parsers::parse_string),
      ("image", parsers::parse_image),
    ];
    for (name, parse) in builtin {
      self
        .value_types
        .register(name, *parse)
        .expect("builtin value types are collision-free");
    }
  }

  // ==========================================================================
  // Registries
  // ==========================================================================

  pub fn keywords(&self) -> &KeywordRegistry {
    &self.keywords
  }

  pub fn register_keyword(&mut self, id: KeywordId, name: &str) -> Result<()> {
    self.keywords.register(id, name).map_err(Into::into)
  }

  /// Register the parser behind a `<name>` data-type reference.
  pub fn register_value_type(&mut self, name: &str, parse: ValueParseFn) -> Result<()> {
    self.value_types.register(name, parse).map_err(Into::into)
  }

  /// Register `alias` as a shorthand for the value definition `syntax`.
  ///
  /// The expansion is compiled immediately, so it may only reference
  /// already-registered keywords, types, and aliases.
  pub fn register_value_type_alias(&mut self, alias: &str, syntax: &str) -> Result<()> {
    if self.keywords.key_of(alias).is_some() {
      return Err(
        RegistryError::DuplicateAlias {
          name: alias.to_string(),
        }
        .into(),
      );
    }
    let def = syntax::compile(syntax, &self.keywords, &self.value_types)?;
    self.value_types.register_alias(alias, def).map_err(Into::into)
  }

  /// The compiled expansion behind an alias, if registered.
  pub fn resolve_value_type(&self, alias: &str) -> Option<&ValueDef> {
    self.value_types.resolve_alias(alias).map(Rc::as_ref)
  }

  /// Register a property under the next free key.
  ///
  /// A syntax that does not compile aborts the registration; an initial
  /// value that does not parse leaves the initial as
  /// [`StyleValue::Invalid`].
  pub fn register_property(&mut self, name: &str, syntax: &str, initial: &str) -> Result<PropertyKey> {
    let (syntax, initial) = self.compile_property(syntax, initial)?;
    self.properties.register(name, syntax, initial).map_err(Into::into)
  }

  /// Register a property under a fixed key (used for builtins).
  pub fn register_property_with_key(
    &mut self,
    key: PropertyKey,
    name: &str,
    syntax: &str,
    initial: &str,
  ) -> Result<PropertyKey> {
    let (syntax, initial) = self.compile_property(syntax, initial)?;
    self
      .properties
      .register_with_key(key, name, syntax, initial)
      .map_err(Into::into)
  }

  fn compile_property(&self, syntax: &str, initial: &str) -> Result<(ValueDef, StyleValue)> {
    let syntax = syntax::compile(syntax, &self.keywords, &self.value_types)?;
    let initial = matcher::parse_value(&syntax, initial, &self.keywords).unwrap_or(StyleValue::Invalid);
    Ok((syntax, initial))
  }

  pub fn property(&self, name: &str) -> Option<&PropertyDef> {
    self.properties.get(name)
  }

  pub fn property_by_key(&self, key: PropertyKey) -> Option<&PropertyDef> {
    self.properties.get_by_key(key)
  }

  pub fn property_count(&self) -> usize {
    self.properties.count()
  }

  /// Parse a value string against a registered property's syntax.
  ///
  /// Repeated literals are served from a per-thread LRU keyed by engine,
  /// property, and value fingerprint.
  pub fn parse_property_value(&self, name: &str, text: &str) -> Result<StyleValue> {
    let def = self.properties.get(name).ok_or_else(|| RegistryError::UnknownProperty {
      name: name.to_string(),
    })?;
    let cache_key = ParsedValueCacheKey::new(self.id, def.key, text);
    if let Some(hit) = parse_cache::get(&cache_key) {
      return Ok(hit);
    }
    let value =
      matcher::parse_value(&def.syntax, text, &self.keywords).ok_or_else(|| ParseError::InvalidPropertyValue {
        property: name.to_string(),
        value: text.to_string(),
      })?;
    parse_cache::put(cache_key, value.clone());
    Ok(value)
  }

  // ==========================================================================
  // Rule insertion
  // ==========================================================================

  /// File `style` under `selector`, tagged with an optional origin.
  ///
  /// Flushes the computed-style cache: every previously returned declaration
  /// keeps its contents, but later queries recompute.
  pub fn add_style_sheet(&mut self, selector: &Selector, style: &StyleDeclaration, origin: Option<&str>) -> Result<()> {
    self.cache.clear();
    if selector.is_empty() {
      return Ok(());
    }

    // Walk target-first, creating the group/link spine and wiring each new
    // link into the previous level's parents table.
    let mut running = String::new();
    let mut prev: Option<(usize, String, String)> = None;
    for (depth, node) in selector.nodes().iter().rev().enumerate() {
      if depth >= self.groups.len() {
        self.groups.push(StyleGroup::default());
      }
      let key = if depth == 0 { "*".to_string() } else { running.clone() };
      {
        let group = &mut self.groups[depth];
        let link_group = group.entry(node.fullname.clone()).or_default();
        link_group.links.entry(key.clone()).or_default();
      }
      if let Some((prev_depth, prev_group, prev_key)) = &prev {
        if let Some(link) = self
          .groups[*prev_depth]
          .get_mut(prev_group)
          .and_then(|group| group.links.get_mut(prev_key))
        {
          link.parents.entry(node.fullname.clone()).or_insert_with(|| key.clone());
        }
      }
      running = if depth == 0 {
        node.fullname.clone()
      } else {
        format!("{} {}", node.fullname, running)
      };
      prev = Some((depth, node.fullname.clone(), key));
    }

    let (depth, group_name, key) = prev.expect("selector has nodes");
    let rule = Rc::new(StyleRule {
      origin: origin.map(|origin| self.intern_origin(origin)),
      selector: running,
      rank: selector.rank,
      batch_num: selector.batch_num,
      properties: StyleProperties::from_declaration(style),
    });
    self
      .groups[depth]
      .get_mut(&group_name)
      .and_then(|group| group.links.get_mut(&key))
      .expect("link created above")
      .rules
      .push(rule);
    Ok(())
  }

  /// Intern an origin string in the engine-wide pool, de-duplicating source
  /// file paths across rules.
  fn intern_origin(&mut self, origin: &str) -> Rc<str> {
    if let Some(interned) = self.origins.get(origin) {
      return Rc::clone(interned);
    }
    let interned: Rc<str> = Rc::from(origin);
    self.origins.insert(Rc::clone(&interned));
    interned
  }

  // ==========================================================================
  // Queries
  // ==========================================================================

  /// Every rule matching `selector`, in cascade order: `(rank, batch_num)`
  /// descending.
  pub fn query_selector(&self, selector: &Selector) -> Vec<Rc<StyleRule>> {
    let mut out = Vec::new();
    if selector.is_empty() {
      return out;
    }
    let Some(group) = self.groups.first() else {
      return out;
    };
    let target_index = selector.len() - 1;
    let mut names = selector.nodes()[target_index].name_list();
    if !names.iter().any(|name| name == "*") {
      names.push("*".to_string());
    }
    for name in &names {
      let Some(link_group) = group.get(name.as_str()) else {
        continue;
      };
      for link in link_group.links.values() {
        self.query_link(link, selector, target_index, 1, &mut out);
      }
    }
    out
  }

  /// Collect a link's rules, then chase ancestors. Every remaining requester
  /// ancestor is offered to the link's parents table, so any element in the
  /// document chain can satisfy the next selector ancestor.
  fn query_link(
    &self,
    link: &StyleLink,
    selector: &Selector,
    node_index: usize,
    parent_depth: usize,
    out: &mut Vec<Rc<StyleRule>>,
  ) {
    merge_rules(out, &link.rules);
    let mut i = node_index;
    while i > 0 {
      i -= 1;
      for name in selector.nodes()[i].name_list() {
        let Some(parent_key) = link.parents.get(&name) else {
          continue;
        };
        let Some(parent) = self
          .groups
          .get(parent_depth)
          .and_then(|group| group.get(&name))
          .and_then(|link_group| link_group.links.get(parent_key))
        else {
          continue;
        };
        self.query_link(parent, selector, i, parent_depth + 1, out);
      }
    }
  }

  /// The cascaded declaration for `selector`.
  ///
  /// Served from the cache when the selector hash was seen since the last
  /// rule insertion; the returned declaration is shared and read-only.
  pub fn computed_style(&mut self, selector: &Selector) -> Rc<StyleDeclaration> {
    if let Some(cached) = self.cache.get(&selector.hash) {
      return Rc::clone(cached);
    }
    let mut decl = StyleDeclaration::with_len(self.properties.count());
    for rule in self.query_selector(selector) {
      decl.merge_properties(&rule.properties);
    }
    let decl = Rc::new(decl);
    self.cache.insert(selector.hash, Rc::clone(&decl));
    decl
  }

  /// Compute (or fetch) the cascaded declaration and overwrite `out` with
  /// it.
  pub fn computed_style_into(&mut self, selector: &Selector, out: &mut StyleDeclaration) {
    let decl = self.computed_style(selector);
    out.clear();
    out.replace(&decl);
  }

  // ==========================================================================
  // Debug printing
  // ==========================================================================

  /// Render a value with keyword ids resolved to their names.
  pub fn format_value(&self, value: &StyleValue) -> String {
    match value {
      StyleValue::Keyword(id) => match self.keywords.name_of(*id) {
        Some(name) => name.to_string(),
        None => format!("keyword({})", id),
      },
      StyleValue::Array(items) => items
        .iter()
        .map(|item| self.format_value(item))
        .collect::<Vec<_>>()
        .join(" "),
      other => other.to_string(),
    }
  }

  fn property_name(&self, key: PropertyKey) -> String {
    match self.properties.get_by_key(key) {
      Some(def) => def.name.clone(),
      None => format!("<unknown style {}>", key),
    }
  }

  fn log_rule_body(&self, heading: &str, rule: &StyleRule) {
    log::debug!("[{}][rank: {}]", rule.origin.as_deref().unwrap_or("<none>"), rule.rank);
    log::debug!("{} {{", heading);
    for property in rule.properties.iter() {
      log::debug!("\t{}: {};", self.property_name(property.key), self.format_value(&property.value));
    }
    log::debug!("}}");
  }

  /// Log every rule matching `selector` plus the merged result, at `debug`.
  pub fn print_style_rules(&self, selector: &Selector) {
    let rules = self.query_selector(selector);
    let mut decl = StyleDeclaration::with_len(self.properties.count());
    log::debug!("selector({}) stylesheets begin", selector.hash);
    for rule in &rules {
      self.log_rule_body(&rule.selector, rule);
      decl.merge_properties(&rule.properties);
    }
    log::debug!("[selector({}) final stylesheet] {{", selector.hash);
    for (key, value) in decl.iter_set() {
      log::debug!("\t{}: {};", self.property_name(key), self.format_value(value));
    }
    log::debug!("}}");
    log::debug!("selector({}) stylesheets end", selector.hash);
  }

  /// Log the whole trie, walking parent links from every target-level entry.
  pub fn print_all(&self) {
    log::debug!("style library begin");
    if let Some(group) = self.groups.first() {
      for (name, link_group) in group {
        for link in link_group.links.values() {
          self.print_link(link, name, 1, None);
        }
      }
    }
    log::debug!("style library end");
  }

  fn print_link(&self, link: &StyleLink, group_name: &str, parent_depth: usize, tail: Option<&str>) {
    let heading = match tail {
      Some(tail) => format!("{} {}", group_name, tail),
      None => group_name.to_string(),
    };
    for rule in &link.rules {
      self.log_rule_body(&heading, rule);
    }
    for (name, key) in &link.parents {
      if let Some(parent) = self
        .groups
        .get(parent_depth)
        .and_then(|group| group.get(name))
        .and_then(|link_group| link_group.links.get(key))
      {
        self.print_link(parent, name, parent_depth + 1, Some(&heading));
      }
    }
  }

  #[cfg(test)]
  fn link(&self, depth: usize, group_name: &str, key: &str) -> Option<&StyleLink> {
    self
      .groups
      .get(depth)
      .and_then(|group| group.get(group_name))
      .and_then(|link_group| link_group.links.get(key))
  }

  #[cfg(test)]
  fn cache_len(&self) -> usize {
    self.cache.len()
  }
}

/// Insert `rules` into `out` keeping `(rank, batch_num)` descending; ties
/// preserve insertion order.
fn merge_rules(out: &mut Vec<Rc<StyleRule>>, rules: &[Rc<StyleRule>]) {
  for rule in rules {
    let at = out
      .iter()
      .position(|existing| (rule.rank, rule.batch_num) > (existing.rank, existing.batch_num));
    match at {
      Some(at) => out.insert(at, Rc::clone(rule)),
      None => out.push(Rc::clone(rule)),
    }
  }
}
