//! End-to-end networks with known shape.

use std::collections::BTreeSet;

use mirnet::mirnet_engine::Direction;
use mirnet::{
    expand_network, AliasResolver, AliasRestriction, ComplexFilterMode, ExpansionOptions,
    ExpansionStatus, GeneFilter, MemoryStore, NetworkConfig, Polarity, SharedId,
};

use crate::fixtures::{self, GENEA, GENEA_GENEB, MDM2, TP53, TRP53};

// ============================================================================
// TP53 -> MDM2
// ============================================================================

#[test]
fn tp53_mdm2_depth_one() {
    let store = fixtures::store();
    let config = fixtures::config();
    let outcome =
        expand_network(&store, &config, ["TP53"], 1, &ExpansionOptions::new()).unwrap();

    assert!(outcome.is_complete());
    let g = &outcome.graph;
    let tags: Vec<&str> = g.nodes().map(|(t, _)| t).collect();
    assert_eq!(tags, vec!["MDM2#pro", "TP53#pro"]);
    assert_eq!(g.edge_count(), 1);

    let edge = g.edge("TP53#pro -o MDM2#pro [HPRD]").unwrap();
    assert_eq!(edge.data.polarity, Polarity::Activating);
    let evidence = edge.data.evidence.as_ref().unwrap();
    assert_eq!(evidence.release, "9");
    assert_eq!(evidence.evidence_list().collect::<Vec<_>>(), vec!["8875929"]);

    assert_eq!(g.node("TP53#pro").unwrap().shell, 0);
    assert_eq!(g.node("MDM2#pro").unwrap().shell, 1);
    assert_eq!(g.node("MDM2#pro").unwrap().shared_id, Some(SharedId(MDM2)));
    assert_eq!(outcome.report.seeds, vec!["TP53#pro".to_string()]);
}

#[test]
fn reverse_seed_discovers_the_same_edge() {
    let store = fixtures::store();
    let config = fixtures::config();
    let outcome =
        expand_network(&store, &config, ["mdm2"], 1, &ExpansionOptions::new()).unwrap();

    let g = &outcome.graph;
    assert!(g.contains_node("TP53#pro"));
    assert!(g.contains_edge("TP53#pro -o MDM2#pro [HPRD]"));
    assert_eq!(g.degree("MDM2#pro", Direction::Incoming), 1);
}

#[test]
fn snapshot_serializes_the_network() {
    let store = fixtures::store();
    let config = fixtures::config();
    let options = ExpansionOptions::new().name("p53 network");
    let outcome = expand_network(&store, &config, ["TP53"], 1, &options).unwrap();

    let snapshot = outcome.graph.snapshot();
    assert_eq!(snapshot.name, "p53 network");
    let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(value["nodes"].as_object().unwrap().len(), 2);
    assert_eq!(value["edges"].as_array().unwrap().len(), 1);
    assert_eq!(value["edges"][0]["data"]["polarity"], 1);
}

// ============================================================================
// Ambiguity
// ============================================================================

#[test]
fn p53_is_ambiguous_across_species() {
    let store = fixtures::store();
    let resolver = AliasResolver::new(&store).unwrap();
    let r = resolver
        .resolve(["p53"], &AliasRestriction::any(), None)
        .unwrap();

    let ids = &r.ambiguous["p53"];
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&SharedId(TP53)));
    assert!(ids.contains(&SharedId(TRP53)));
    assert!(r.identified.is_empty());
}

#[test]
fn species_restriction_resolves_p53() {
    let store = fixtures::store();
    let resolver = AliasResolver::new(&store).unwrap();
    let mouse = resolver.species_restriction(["Mouse"]).unwrap();
    let r = resolver
        .resolve(["p53"], &AliasRestriction::any(), Some(&mouse))
        .unwrap();
    assert_eq!(r.identified.get("p53"), Some(&SharedId(TRP53)));
}

#[test]
fn ambiguous_seed_is_reported_not_expanded() {
    let store = fixtures::store();
    let config = fixtures::config();
    let outcome = expand_network(&store, &config, ["p53", "MDM2"], 0, &ExpansionOptions::new())
        .unwrap();

    assert_eq!(outcome.report.ambiguous_seeds["p53"].len(), 2);
    assert_eq!(outcome.graph.node_count(), 1);
    assert!(outcome.graph.contains_node("MDM2#pro"));
}

// ============================================================================
// Complex decomposition and gene filtering
// ============================================================================

fn complex_run(mode: ComplexFilterMode) -> mirnet::ExpansionOutcome {
    let store = fixtures::store();
    let config = fixtures::config();
    let options = ExpansionOptions::new()
        .gene_filter(GeneFilter::new(["GENEA"]))
        .complex_mode(mode);
    expand_network(&store, &config, ["HUB"], 1, &options).unwrap()
}

#[test]
fn complex_kept_when_any_subunit_matches() {
    let outcome = complex_run(ComplexFilterMode::Any);
    assert!(outcome.is_complete());
    let g = &outcome.graph;

    let complex = g.node("GENEA:GENEB#com").unwrap();
    assert_eq!(complex.shared_id, Some(SharedId(GENEA_GENEB)));
    assert_eq!(complex.symbol, None);
    assert_eq!(complex.members, vec!["GENEA#pro", "GENEB#pro"]);

    // GENEA was already a node; GENEB is a placeholder
    assert_eq!(g.node("GENEA#pro").unwrap().shared_id, Some(SharedId(GENEA)));
    assert_eq!(g.node("GENEB#pro").unwrap().shared_id, None);
    assert_eq!(g.subunits("GENEA:GENEB#com"), vec!["GENEA#pro", "GENEB#pro"]);

    let a = g.edge("GENEA#pro -- GENEA:GENEB#com").unwrap();
    let b = g.edge("GENEB#pro -- GENEA:GENEB#com").unwrap();
    assert_eq!(a.data.reaction, b.data.reaction);
    assert!(g.contains_edge("HUB#pro -D GENEA:GENEB#com [CORUM]"));
}

#[test]
fn complex_dropped_when_all_subunits_required() {
    let outcome = complex_run(ComplexFilterMode::All);
    assert!(outcome.is_complete());
    let g = &outcome.graph;

    assert!(!g.contains_node("GENEA:GENEB#com"));
    assert!(!g.contains_node("GENEB#pro"));
    assert!(g.contains_node("GENEA#pro"));
    assert!(g.contains_edge("HUB#pro -D GENEA#pro [CORUM]"));
    assert_eq!(outcome.report.rounds[0].candidates, 2);
    assert_eq!(outcome.report.rounds[0].materialized, 1);
}

#[test]
fn terminal_round_uses_all_mode() {
    let outcome = complex_run(ComplexFilterMode::Any);
    let rounds = &outcome.report.rounds;
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0].complex_mode, ComplexFilterMode::Any);
    assert!(rounds[1].terminal);
    assert_eq!(rounds[1].complex_mode, ComplexFilterMode::All);
    assert_eq!(rounds[1].nodes_added, 0);
}

// ============================================================================
// Configuration and dataset files
// ============================================================================

#[test]
fn files_load_into_an_equivalent_run() {
    let config_file = fixtures::temp_file(fixtures::CONFIG);
    let data_file = fixtures::temp_file(fixtures::DATASET);

    let config = NetworkConfig::from_path(config_file.path()).unwrap();
    let store = MemoryStore::from_path(data_file.path()).unwrap();
    assert_eq!(config, fixtures::config());

    let human: BTreeSet<u32> = [9606].into_iter().collect();
    let options = ExpansionOptions::new().species(human);
    let outcome = expand_network(&store, &config, ["TP53"], 1, &options).unwrap();
    assert_eq!(outcome.graph.node_count(), 2);
    assert_eq!(outcome.status, ExpansionStatus::Complete);
}
