//! Neighbor and degree queries.

use super::types::*;
use super::InteractionGraph;

impl InteractionGraph {
    /// Get neighbors of a node in a given direction, optionally filtered by edge kind.
    pub fn neighbors(
        &self,
        tag: &str,
        direction: Direction,
        kind_filter: Option<EdgeKind>,
    ) -> Vec<Neighbor> {
        let outgoing = || self.neighbor_entries(self.adjacency.outgoing(tag), kind_filter);
        let incoming = || self.neighbor_entries(self.adjacency.incoming(tag), kind_filter);
        match direction {
            Direction::Outgoing => outgoing(),
            Direction::Incoming => incoming(),
            Direction::Both => {
                // Self-loops appear once from each direction.
                let mut out = outgoing();
                out.extend(incoming());
                out
            }
        }
    }

    /// Get the degree of a node (number of edges in a given direction).
    pub fn degree(&self, tag: &str, direction: Direction) -> usize {
        match direction {
            Direction::Outgoing => self.adjacency.outgoing(tag).len(),
            Direction::Incoming => self.adjacency.incoming(tag).len(),
            Direction::Both => {
                self.adjacency.outgoing(tag).len() + self.adjacency.incoming(tag).len()
            }
        }
    }

    /// Subunit tags of a complex, via its association edges.
    pub fn subunits(&self, complex: &str) -> Vec<String> {
        self.neighbors(complex, Direction::Incoming, Some(EdgeKind::ComplexAssociation))
            .into_iter()
            .map(|n| n.node_id)
            .collect()
    }

    fn neighbor_entries(
        &self,
        pairs: &[(String, String)],
        kind_filter: Option<EdgeKind>,
    ) -> Vec<Neighbor> {
        pairs
            .iter()
            .filter_map(|(other, instance)| {
                let edge = self.edge(instance)?;
                if kind_filter.map_or(false, |k| k != edge.data.kind) {
                    return None;
                }
                Some(Neighbor {
                    node_id: other.clone(),
                    instance: instance.clone(),
                    kind: edge.data.kind,
                    polarity: edge.data.polarity,
                })
            })
            .collect()
    }
}
