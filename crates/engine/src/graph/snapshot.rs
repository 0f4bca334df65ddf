//! Graph snapshots.

use super::types::GraphSnapshot;
use super::InteractionGraph;

impl InteractionGraph {
    /// Copy the current state into an ordered, serializable snapshot.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            name: self.name.clone(),
            shells: self.shells,
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }
}
