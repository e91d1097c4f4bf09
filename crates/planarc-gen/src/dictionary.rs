use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Lookup source for candidate matches compatible with a connector query.
pub trait Dictionary<Q, S> {
    /// Zero or more matches for `query`, best first.
    fn matches(&self, query: &Q) -> Vec<S>;
}

/// In-memory dictionary backed by a query-to-matches map.
#[derive(Debug, Clone)]
pub struct MapDictionary<Q, S> {
    entries: FxHashMap<Q, Vec<S>>,
}

impl<Q: Eq + Hash, S> MapDictionary<Q, S> {
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Appends a match for `query`, after any already registered.
    pub fn insert(&mut self, query: Q, candidate: S) {
        self.entries.entry(query).or_default().push(candidate);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Q: Eq + Hash, S> Default for MapDictionary<Q, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: Eq + Hash, S: Clone> Dictionary<Q, S> for MapDictionary<Q, S> {
    fn matches(&self, query: &Q) -> Vec<S> {
        self.entries.get(query).cloned().unwrap_or_default()
    }
}
