//! In-memory interaction graph grown by the expansion driver.
//!
//! A directed multigraph keyed by node *tag* (symbol plus class suffix).
//! Edges are keyed by a unique *instance* string. Nodes and edges are only
//! ever added; adding an existing tag or instance is a no-op, which makes
//! repeated discovery across rounds idempotent.

pub mod adjacency;
mod snapshot;
pub mod symbols;
pub mod traversal;
pub mod types;

use std::collections::BTreeMap;

use mirnet_core::{NetError, NetResult, SharedId};
use rustc_hash::FxHashMap;

use adjacency::AdjacencyIndex;
use symbols::SymbolIndex;
pub use types::*;

/// The network built by one expansion run.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    name: String,
    shells: u32,
    nodes: BTreeMap<String, NodeData>,
    edges: Vec<Edge>,
    instances: FxHashMap<String, usize>,
    adjacency: AdjacencyIndex,
    symbols: SymbolIndex,
    ids: FxHashMap<SharedId, String>,
    reactions: u64,
}

impl InteractionGraph {
    /// Create an empty graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Network name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of shells grown so far.
    pub fn shells(&self) -> u32 {
        self.shells
    }

    /// Open the next shell and return its index.
    pub fn open_shell(&mut self) -> u32 {
        self.shells += 1;
        self.shells
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Add a node unless its tag already exists. Returns whether it was added.
    pub fn add_node(&mut self, tag: &str, data: NodeData) -> bool {
        if self.nodes.contains_key(tag) {
            return false;
        }
        self.symbols.insert(&data.name, tag);
        if let Some(id) = data.shared_id {
            self.ids.entry(id).or_insert_with(|| tag.to_string());
        }
        self.nodes.insert(tag.to_string(), data);
        true
    }

    /// Whether a tag exists.
    pub fn contains_node(&self, tag: &str) -> bool {
        self.nodes.contains_key(tag)
    }

    /// Node data by tag.
    pub fn node(&self, tag: &str) -> Option<&NodeData> {
        self.nodes.get(tag)
    }

    /// Iterate nodes in tag order.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeData)> {
        self.nodes.iter().map(|(t, d)| (t.as_str(), d))
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// First tag created for a symbol (case-insensitive).
    pub fn tag_for_symbol(&self, symbol: &str) -> Option<&str> {
        self.symbols.representative(symbol)
    }

    /// First tag created for a shared id.
    pub fn tag_for_id(&self, id: SharedId) -> Option<&str> {
        self.ids.get(&id).map(String::as_str)
    }

    /// The symbol → tag index.
    pub fn symbols(&self) -> &SymbolIndex {
        &self.symbols
    }

    /// Frontier nodes carrying a resolvable symbol: tag → symbol.
    pub fn outer_shell(&self) -> BTreeMap<String, String> {
        self.nodes
            .iter()
            .filter(|(_, d)| d.frontier)
            .filter_map(|(t, d)| d.symbol.clone().map(|s| (t.clone(), s)))
            .collect()
    }

    /// Tags of every frontier node.
    pub fn frontier(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, d)| d.frontier)
            .map(|(t, _)| t.as_str())
            .collect()
    }

    /// Clear the frontier flag of the given tags.
    pub fn clear_frontier<'a>(&mut self, tags: impl IntoIterator<Item = &'a String>) {
        for tag in tags {
            if let Some(node) = self.nodes.get_mut(tag) {
                node.frontier = false;
            }
        }
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// Add an edge unless its instance already exists. Returns whether it was added.
    ///
    /// Both endpoints must already exist.
    pub fn add_edge(
        &mut self,
        src: &str,
        dst: &str,
        instance: &str,
        data: EdgeData,
    ) -> NetResult<bool> {
        for end in [src, dst] {
            if !self.nodes.contains_key(end) {
                return Err(NetError::invalid_argument(format!(
                    "edge '{}' references missing node '{}'",
                    instance, end
                )));
            }
        }
        if self.instances.contains_key(instance) {
            return Ok(false);
        }
        self.adjacency.add_edge(src, dst, instance);
        self.instances.insert(instance.to_string(), self.edges.len());
        self.edges.push(Edge {
            src: src.to_string(),
            dst: dst.to_string(),
            instance: instance.to_string(),
            data,
        });
        Ok(true)
    }

    /// Whether an edge instance exists.
    pub fn contains_edge(&self, instance: &str) -> bool {
        self.instances.contains_key(instance)
    }

    /// Edge by instance.
    pub fn edge(&self, instance: &str) -> Option<&Edge> {
        self.instances.get(instance).map(|&i| &self.edges[i])
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Draw the next pseudo-reaction id.
    pub fn next_reaction_id(&mut self) -> String {
        self.reactions += 1;
        format!("psre{}", self.reactions)
    }
}
