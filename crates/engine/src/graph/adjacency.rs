//! Adjacency index over node tags.
//!
//! Edges are multi-edges keyed by instance; the index only records which
//! instances leave and enter each tag. Edge payloads live in the graph.

use rustc_hash::FxHashMap;

/// Forward and reverse adjacency of one graph.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    /// Forward adjacency: src → [(dst, instance)]
    pub outgoing: FxHashMap<String, Vec<(String, String)>>,
    /// Reverse adjacency: dst → [(src, instance)]
    pub incoming: FxHashMap<String, Vec<(String, String)>>,
}

impl AdjacencyIndex {
    /// Create a new empty adjacency index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge to the index. Duplicates are the caller's concern.
    pub fn add_edge(&mut self, src: &str, dst: &str, instance: &str) {
        self.outgoing
            .entry(src.to_string())
            .or_default()
            .push((dst.to_string(), instance.to_string()));
        self.incoming
            .entry(dst.to_string())
            .or_default()
            .push((src.to_string(), instance.to_string()));
    }

    /// Outgoing (dst, instance) pairs of a tag.
    pub fn outgoing(&self, tag: &str) -> &[(String, String)] {
        self.outgoing.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Incoming (src, instance) pairs of a tag.
    pub fn incoming(&self, tag: &str) -> &[(String, String)] {
        self.incoming.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }
}
