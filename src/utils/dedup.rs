use serde::Serialize;
use std::collections::HashSet;

/// Identity of a selected file for duplicate detection: name plus byte size
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DedupKey {
    pub name: String,
    pub size: u64,
}

impl DedupKey {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Keys of the current selection plus everything accepted so far in the
/// running batch.
#[derive(Debug, Default)]
pub struct DedupIndex {
    keys: HashSet<DedupKey>,
}

impl DedupIndex {
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = DedupKey>,
    {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn is_duplicate(&self, candidate: &DedupKey) -> bool {
        self.keys.contains(candidate)
    }

    /// Records a key; returns false if it was already present
    pub fn insert(&mut self, key: DedupKey) -> bool {
        self.keys.insert(key)
    }
}
