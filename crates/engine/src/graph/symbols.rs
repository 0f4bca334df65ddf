//! Symbol → node tag mapping owned by one graph.

use rustc_hash::FxHashMap;

/// Maps lower-cased symbols to the tags created for them, in creation order.
///
/// The first tag recorded for a symbol is its representative: edges that
/// resolve an endpoint by annotation symbol attach to it.
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    tags: FxHashMap<String, Vec<String>>,
}

impl SymbolIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `tag` was created for `symbol`. Repeats are ignored.
    pub fn insert(&mut self, symbol: &str, tag: &str) {
        let tags = self.tags.entry(symbol.to_lowercase()).or_default();
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }

    /// First tag created for a symbol.
    pub fn representative(&self, symbol: &str) -> Option<&str> {
        self.tags
            .get(&symbol.to_lowercase())
            .and_then(|tags| tags.first())
            .map(String::as_str)
    }

    /// Every tag created for a symbol.
    pub fn tags(&self, symbol: &str) -> &[String] {
        self.tags
            .get(&symbol.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no symbol was recorded.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
