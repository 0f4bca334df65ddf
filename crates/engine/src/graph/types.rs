//! Node, edge and snapshot types of the interaction graph.

use std::collections::BTreeMap;

use mirnet_core::{Evidence, MoleculeClass, Polarity, SharedId, TaxonId};
use serde::{Deserialize, Serialize};

/// Data stored on a graph node. The node's tag is its key in the graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeData {
    /// Display name (annotation symbol, colon-joined for complexes).
    pub name: String,
    /// Symbol re-resolved at the start of each round; absent for complexes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Provenance; absent for placeholder subunits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_id: Option<SharedId>,
    /// Molecule class.
    pub class: MoleculeClass,
    /// Shell in which the node was added (seeds are shell 0).
    pub shell: u32,
    /// Whether the node still has to be expanded.
    pub frontier: bool,
    /// Whether the node was a seed.
    #[serde(default)]
    pub seed: bool,
    /// Repeat count of identical subunits (1 for everything but homomultimers).
    #[serde(default = "one")]
    pub homomultimer: u32,
    /// Sorted member tags of a complex.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    /// Owning species.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<TaxonId>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

fn one() -> u32 {
    1
}

impl NodeData {
    /// A fresh frontier node with no provenance.
    pub fn new(name: impl Into<String>, class: MoleculeClass, shell: u32) -> Self {
        let name = name.into();
        let symbol = match class {
            MoleculeClass::Complex => None,
            _ => Some(name.clone()),
        };
        Self {
            name,
            symbol,
            shared_id: None,
            class,
            shell,
            frontier: true,
            seed: false,
            homomultimer: 1,
            members: Vec::new(),
            species: None,
            description: String::new(),
        }
    }

    /// Whether the node is a complex.
    pub fn is_complex(&self) -> bool {
        self.class == MoleculeClass::Complex
    }
}

/// Kind of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    /// Interaction reported by a database table.
    Database,
    /// Subunit membership in a complex.
    ComplexAssociation,
}

/// Data stored on a graph edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeData {
    /// Edge kind.
    pub kind: EdgeKind,
    /// Derived polarity.
    pub polarity: Polarity,
    /// Pseudo-reaction id, `psre<N>`.
    pub reaction: String,
    /// Provenance of database edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
}

/// Full edge representation including endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    /// Source node tag.
    pub src: String,
    /// Destination node tag.
    pub dst: String,
    /// Unique instance key.
    pub instance: String,
    /// Edge data.
    pub data: EdgeData,
}

/// Direction for neighbor queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Follow outgoing edges (src → dst).
    Outgoing,
    /// Follow incoming edges (dst → src).
    Incoming,
    /// Follow edges in both directions.
    Both,
}

/// A neighbor entry returned by neighbor queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// The neighbor's tag.
    pub node_id: String,
    /// Instance key of the connecting edge.
    pub instance: String,
    /// Kind of the connecting edge.
    pub kind: EdgeKind,
    /// Polarity of the connecting edge.
    pub polarity: Polarity,
}

/// A point-in-time copy of a graph, ordered for stable output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    /// Network name.
    pub name: String,
    /// Number of shells grown.
    pub shells: u32,
    /// All nodes: tag → NodeData.
    pub nodes: BTreeMap<String, NodeData>,
    /// All edges in insertion order.
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    /// Number of nodes in the snapshot.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges in the snapshot.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Convert to edge list: (src, dst, instance, polarity).
    pub fn to_edge_list(&self) -> Vec<(String, String, String, i8)> {
        self.edges
            .iter()
            .map(|e| {
                (
                    e.src.clone(),
                    e.dst.clone(),
                    e.instance.clone(),
                    e.data.polarity.value(),
                )
            })
            .collect()
    }

    /// Convert to adjacency list: src → [(dst, instance)].
    pub fn to_adjacency_list(&self) -> BTreeMap<String, Vec<(String, String)>> {
        let mut adj: BTreeMap<String, Vec<(String, String)>> = BTreeMap::new();
        for e in &self.edges {
            adj.entry(e.src.clone())
                .or_default()
                .push((e.dst.clone(), e.instance.clone()));
        }
        adj
    }

    /// Pretty-printed JSON dump.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
