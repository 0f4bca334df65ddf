//! Round limits, deduplication, tag stability and failure handling.

use std::collections::BTreeSet;

use mirnet::mirnet_core::{
    Alias, AnchorColumns, Annotation, Namespace, NamespaceId, RawInteraction, TaxonId,
};
use mirnet::mirnet_engine::EdgeKind;
use mirnet::{
    expand_network, ExpansionOptions, ExpansionStatus, GeneFilter, MemoryStore, NetError,
    NetResult, RecordStore, SharedId,
};

use crate::fixtures;

const SEEDS: [&str; 3] = ["TP53", "HUB", "nothing"];

// ============================================================================
// Round limits
// ============================================================================

#[test]
fn depth_zero_adds_no_nodes_beyond_seeds() {
    let store = fixtures::store();
    let config = fixtures::config();
    let outcome = expand_network(&store, &config, SEEDS, 0, &ExpansionOptions::new()).unwrap();

    assert_eq!(outcome.report.rounds.len(), 1);
    assert!(outcome.report.rounds[0].terminal);
    let tags: Vec<&str> = outcome.graph.nodes().map(|(t, _)| t).collect();
    assert_eq!(tags, vec!["HUB#pro", "TP53#pro"]);
    assert!(outcome.graph.nodes().all(|(_, n)| n.seed && n.shell == 0));
    assert!(outcome.report.orphan_seeds.contains("nothing"));
}

#[test]
fn runs_finish_within_depth_plus_one_rounds() {
    let store = fixtures::store();
    let config = fixtures::config();
    for depth in 0..5 {
        let outcome =
            expand_network(&store, &config, SEEDS, depth, &ExpansionOptions::new()).unwrap();
        assert!(outcome.is_complete());
        assert!(outcome.report.rounds.len() <= depth as usize + 1);
        assert!(outcome.graph.shells() <= depth);
    }
}

#[test]
fn exhausted_network_stops_early() {
    let store = fixtures::store();
    let config = fixtures::config();
    let outcome = expand_network(&store, &config, ["TP53"], 10, &ExpansionOptions::new()).unwrap();

    // round 1 finds MDM2, round 2 finds nothing new
    assert_eq!(outcome.report.rounds.len(), 2);
    assert_eq!(outcome.report.rounds[1].nodes_added, 0);
    assert!(!outcome.report.rounds[1].terminal);
    assert_eq!(outcome.graph.node_count(), 2);
}

// ============================================================================
// Deduplication and stability
// ============================================================================

#[test]
fn edges_are_never_duplicated() {
    let store = fixtures::store();
    let config = fixtures::config();
    let options = ExpansionOptions::new();
    let outcome = expand_network(&store, &config, ["TP53", "MDM2", "HUB"], 3, &options).unwrap();
    let g = &outcome.graph;

    let instances: BTreeSet<&str> = g.edges().iter().map(|e| e.instance.as_str()).collect();
    assert_eq!(instances.len(), g.edge_count());

    let database_edges: Vec<(&str, &str)> = g
        .edges()
        .iter()
        .filter(|e| e.data.kind == EdgeKind::Database)
        .map(|e| (e.src.as_str(), e.dst.as_str()))
        .collect();
    let distinct: BTreeSet<(&str, &str)> = database_edges.iter().copied().collect();
    assert_eq!(database_edges.len(), 3);
    assert_eq!(
        distinct,
        [
            ("HUB#pro", "GENEA#pro"),
            ("HUB#pro", "GENEA:GENEB#com"),
            ("TP53#pro", "MDM2#pro"),
        ]
        .into_iter()
        .collect()
    );
}

#[test]
fn reaction_ids_are_unique_per_database_edge() {
    let store = fixtures::store();
    let config = fixtures::config();
    let options = ExpansionOptions::new();
    let outcome = expand_network(&store, &config, ["TP53", "HUB"], 2, &options).unwrap();

    let reactions: Vec<&str> = outcome
        .graph
        .edges()
        .iter()
        .filter(|e| e.data.kind == EdgeKind::Database)
        .map(|e| e.data.reaction.as_str())
        .collect();
    let distinct: BTreeSet<&str> = reactions.iter().copied().collect();
    assert_eq!(distinct.len(), reactions.len());
    assert!(reactions.iter().all(|r| r.starts_with("psre")));
}

#[test]
fn tags_are_stable_across_depths() {
    let store = fixtures::store();
    let config = fixtures::config();
    let shallow = expand_network(&store, &config, ["HUB"], 1, &ExpansionOptions::new()).unwrap();
    let deep = expand_network(&store, &config, ["HUB"], 3, &ExpansionOptions::new()).unwrap();

    for (tag, node) in shallow.graph.nodes() {
        let other = deep.graph.node(tag).unwrap();
        assert_eq!(other.shell, node.shell, "shell of {}", tag);
        assert_eq!(other.shared_id, node.shared_id, "provenance of {}", tag);
    }
    for edge in shallow.graph.edges() {
        assert!(deep.graph.contains_edge(&edge.instance));
    }
}

// ============================================================================
// Stalls and failures
// ============================================================================

#[test]
fn stalled_run_keeps_partial_graph() {
    let store = fixtures::store();
    let config = fixtures::config();
    let options = ExpansionOptions::new().gene_filter(GeneFilter::new(["UNRELATED"]));
    let outcome = expand_network(&store, &config, ["TP53"], 2, &options).unwrap();

    assert_eq!(
        outcome.status,
        ExpansionStatus::Stalled {
            shell: 1,
            candidates: 1
        }
    );
    assert_eq!(outcome.graph.node_count(), 1);
    assert_eq!(outcome.graph.edge_count(), 0);
    let err = outcome.into_result().unwrap_err();
    assert!(matches!(err, NetError::ExpansionStalled { shell: 1, .. }));
}

/// Delegates to a [`MemoryStore`] but fails every interaction lookup.
struct FailingStore(MemoryStore);

impl RecordStore for FailingStore {
    fn namespaces(&self) -> NetResult<Vec<Namespace>> {
        self.0.namespaces()
    }

    fn lookup_aliases(
        &self,
        candidates: &BTreeSet<String>,
        namespaces: Option<&BTreeSet<NamespaceId>>,
        species: Option<&BTreeSet<TaxonId>>,
    ) -> NetResult<Vec<Alias>> {
        self.0.lookup_aliases(candidates, namespaces, species)
    }

    fn lookup_aliases_of(
        &self,
        ids: &BTreeSet<SharedId>,
        namespaces: Option<&BTreeSet<NamespaceId>>,
    ) -> NetResult<Vec<Alias>> {
        self.0.lookup_aliases_of(ids, namespaces)
    }

    fn lookup_annotations(&self, ids: &BTreeSet<SharedId>) -> NetResult<Vec<Annotation>> {
        self.0.lookup_annotations(ids)
    }

    fn lookup_interactions(
        &self,
        table: &str,
        _columns: AnchorColumns,
        _anchors: &BTreeSet<SharedId>,
    ) -> NetResult<Vec<RawInteraction>> {
        Err(NetError::store(format!("connection lost while reading {}", table)))
    }

    fn lookup_taxa(&self, names: &BTreeSet<String>) -> NetResult<BTreeSet<TaxonId>> {
        self.0.lookup_taxa(names)
    }
}

#[test]
fn store_failure_aborts_the_run() {
    let store = FailingStore(fixtures::store());
    let config = fixtures::config();
    let err = expand_network(&store, &config, ["TP53"], 1, &ExpansionOptions::new()).unwrap_err();
    assert!(matches!(err, NetError::Store { .. }));
    assert!(err.is_fatal());
}

#[test]
fn unknown_database_is_rejected_before_any_lookup() {
    let store = fixtures::store();
    let config = fixtures::config();
    let options = ExpansionOptions::new()
        .restriction(mirnet::InteractionRestriction::new().databases(["BioGRID"]));
    let err = expand_network(&store, &config, ["TP53"], 1, &options).unwrap_err();
    assert!(matches!(err, NetError::InvalidArgument { .. }));
    assert_eq!(store.stats().alias_lookups, 0);
}
