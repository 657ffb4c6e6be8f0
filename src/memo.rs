//! Run-scoped dedup store for emitted declarations.
//!
//! Keys are raw schema names shared across construct kinds. A key is
//! claimed before its body is built, so a revisit during construction
//! (self or mutual reference) sees it as taken and backs off.

use std::collections::HashMap;

use crate::decl::Declaration;

#[derive(Debug, Default)]
pub struct MemoStore {
    index: HashMap<String, usize>,
    /// Bodies in claim order; `None` while under construction.
    slots: Vec<Option<Declaration>>,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Claim `key` for emission. Returns `false` if it was already claimed.
    pub fn claim(&mut self, key: &str) -> bool {
        if self.index.contains_key(key) {
            return false;
        }
        self.index.insert(key.to_string(), self.slots.len());
        self.slots.push(None);
        true
    }

    /// Store the body for a claimed key. The first recorded body wins.
    pub fn record(&mut self, decl: Declaration) {
        let slot = match self.index.get(&decl.key) {
            Some(&slot) => slot,
            None => {
                self.index.insert(decl.key.clone(), self.slots.len());
                self.slots.push(None);
                self.slots.len() - 1
            }
        };
        if self.slots[slot].is_none() {
            self.slots[slot] = Some(decl);
        }
    }

    /// Recorded declarations in claim order. Claims never filled are dropped.
    pub fn into_declarations(self) -> Vec<Declaration> {
        self.slots.into_iter().flatten().collect()
    }
}
