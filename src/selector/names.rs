//! Compound-name expansion
//!
//! For indexing and matching, a simple-selector node is addressable under
//! every compound name a stylesheet could request it by: the bare type, the
//! id, every subset of its classes and states, and their combinations. The
//! collector walks levels (type, id, class subsets, state subsets) writing
//! into one scratch buffer, so the only allocations are the emitted names.
//!
//! For `tv#m.a.b:h` this yields `tv`, `tv#m`, `tv#m.a`, `tv#m.a.b`,
//! `tv#m.a.b:h`, `tv#m.a:h`, `tv#m.b`, …, `.a`, `.a.b`, …, `:h`.

use super::{SelectorNode, SELECTOR_MAX_LEN};

struct NameCollector<'a> {
  node: &'a SelectorNode,
  buf: String,
}

/// Enumerate every compound name for `node`, in deterministic collection
/// order. The wildcard `"*"` is the query's business, not the expansion's.
pub fn collect_names(node: &SelectorNode) -> Vec<String> {
  let mut out = Vec::new();
  let mut collector = NameCollector {
    node,
    buf: String::with_capacity(SELECTOR_MAX_LEN.min(256)),
  };
  collector.type_level(&mut out);
  collector.id_level(&mut out);
  collector.class_level(0, &mut out);
  collector.status_level(0, &mut out);
  out
}

impl NameCollector<'_> {
  fn emit(&self, out: &mut Vec<String>) {
    out.push(self.buf.clone());
  }

  fn type_level(&mut self, out: &mut Vec<String>) {
    let Some(type_name) = &self.node.type_name else {
      return;
    };
    let mark = self.buf.len();
    self.buf.push_str(type_name);
    self.emit(out);
    self.id_level(out);
    self.class_level(0, out);
    self.status_level(0, out);
    self.buf.truncate(mark);
  }

  fn id_level(&mut self, out: &mut Vec<String>) {
    let Some(id) = &self.node.id else {
      return;
    };
    let mark = self.buf.len();
    self.buf.push('#');
    self.buf.push_str(id);
    self.emit(out);
    self.class_level(0, out);
    self.status_level(0, out);
    self.buf.truncate(mark);
  }

  /// Subsets of `classes[start..]` that keep sorted order, each optionally
  /// followed by state subsets.
  fn class_level(&mut self, start: usize, out: &mut Vec<String>) {
    for i in start..self.node.classes.len() {
      let mark = self.buf.len();
      self.buf.push('.');
      self.buf.push_str(&self.node.classes[i]);
      self.emit(out);
      self.class_level(i + 1, out);
      self.status_level(0, out);
      self.buf.truncate(mark);
    }
  }

  fn status_level(&mut self, start: usize, out: &mut Vec<String>) {
    for i in start..self.node.status.len() {
      let mark = self.buf.len();
      self.buf.push(':');
      self.buf.push_str(&self.node.status[i]);
      self.emit(out);
      self.status_level(i + 1, out);
      self.buf.truncate(mark);
    }
  }
}
