//! Thread-local cache for parsed property values.
//!
//! Stylesheets repeat the same literal values over and over (`0`, `none`,
//! `#fff`). Parsing every declaration independently would re-match the same
//! strings against the same value definitions, so this module keeps a small
//! per-thread LRU keyed by an engine/property/value fingerprint. Entries are
//! engine-scoped: property syntaxes are append-only per engine, which keeps a
//! hit valid for that engine's lifetime.

use super::types::StyleValue;
use crate::property::PropertyKey;
use lru::LruCache;
use rustc_hash::{FxBuildHasher, FxHasher};
use std::cell::RefCell;
use std::hash::Hasher;
use std::num::NonZeroUsize;

/// Number of entries to keep per thread.
const PARSED_VALUE_CACHE_CAPACITY: usize = 4 * 1024;

const VALUE_PREFIX_LEN: usize = 16;

fn hash_bytes(bytes: &[u8]) -> u64 {
  let mut hasher = FxHasher::default();
  hasher.write(bytes);
  hasher.finish()
}

fn prefix_bytes<const N: usize>(bytes: &[u8]) -> [u8; N] {
  let mut out = [0u8; N];
  let len = bytes.len().min(N);
  out[..len].copy_from_slice(&bytes[..len]);
  out
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct ParsedValueCacheKey {
  engine: u64,
  property: PropertyKey,
  value_hash: u64,
  value_len: u32,
  value_prefix: [u8; VALUE_PREFIX_LEN],
}

impl ParsedValueCacheKey {
  #[inline]
  pub(crate) fn new(engine: u64, property: PropertyKey, value_str: &str) -> Self {
    let bytes = value_str.as_bytes();
    Self {
      engine,
      property,
      value_hash: hash_bytes(bytes),
      value_len: bytes.len().min(u32::MAX as usize) as u32,
      value_prefix: prefix_bytes(bytes),
    }
  }
}

type ParsedValueCache = LruCache<ParsedValueCacheKey, StyleValue, FxBuildHasher>;

fn new_cache() -> ParsedValueCache {
  let cap = NonZeroUsize::new(PARSED_VALUE_CACHE_CAPACITY).expect("cache capacity must be non-zero");
  ParsedValueCache::with_hasher(cap, FxBuildHasher::default())
}

thread_local! {
  static PARSED_VALUE_CACHE: RefCell<ParsedValueCache> = RefCell::new(new_cache());
}

#[inline]
pub(crate) fn get(key: &ParsedValueCacheKey) -> Option<StyleValue> {
  PARSED_VALUE_CACHE.with(|cache| cache.borrow_mut().get(key).cloned())
}

#[inline]
pub(crate) fn put(key: ParsedValueCacheKey, value: StyleValue) {
  PARSED_VALUE_CACHE.with(|cache| {
    cache.borrow_mut().put(key, value);
  });
}

#[cfg(test)]
pub(crate) fn reset_for_tests() {
  PARSED_VALUE_CACHE.with(|cache| {
    *cache.borrow_mut() = new_cache();
  });
}
