//! Vocabulary container types used by callers of [`crate::alloc`] and the
//! rest of the engine this crate was lifted from.
//!
//! These are sketches, not a containers library: real call sites mostly
//! reach for `std::collections::HashMap` and `Vec` directly (as the engine
//! does throughout its resource-list and command-batch code), so this module
//! only documents the couple of named vocabulary types the wider codebase
//! gives a name to.

use std::collections::HashMap;

/// A lightweight identifier-to-label lookup, matching the shape of the
/// engine's resource listing entries (`id` + optional display `label`).
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    entries: HashMap<u32, Option<String>>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, label: Option<String>) {
        self.entries.insert(id, label);
    }

    pub fn remove(&mut self, id: u32) -> Option<Option<String>> {
        self.entries.remove(&id)
    }

    pub fn label(&self, id: u32) -> Option<&str> {
        self.entries.get(&id)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
