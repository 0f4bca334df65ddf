//! Resolver properties over arbitrary candidate sets.

use std::collections::BTreeSet;

use mirnet::{AliasResolver, AliasRestriction, SharedId};
use proptest::prelude::*;

use crate::fixtures::{self, MDM2, TP53};

const KNOWN: &[&str] = &[
    "TP53", "P04637", "p53", "Trp53", "MDM2", "Q00987", "GENEA", "GENEB", "HUB",
];

/// A known alias in random casing, or a string matching nothing.
fn candidate() -> impl Strategy<Value = String> {
    prop_oneof![
        (0..KNOWN.len(), any::<u32>()).prop_map(|(i, mask)| {
            KNOWN[i]
                .chars()
                .enumerate()
                .map(|(j, c)| {
                    if mask & (1 << (j % 32)) != 0 {
                        c.to_ascii_uppercase()
                    } else {
                        c.to_ascii_lowercase()
                    }
                })
                .collect()
        }),
        "[x-z]{1,6}".prop_map(|s| format!("none-{}", s)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn resolve_is_idempotent(candidates in prop::collection::vec(candidate(), 0..12)) {
        let store = fixtures::store();
        let resolver = AliasResolver::new(&store).unwrap();
        let first = resolver.resolve(&candidates, &AliasRestriction::any(), None).unwrap();
        let second = resolver.resolve(&candidates, &AliasRestriction::any(), None).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_candidate_lands_in_exactly_one_bucket(
        candidates in prop::collection::vec(candidate(), 0..12)
    ) {
        let store = fixtures::store();
        let resolver = AliasResolver::new(&store).unwrap();
        let r = resolver.resolve(&candidates, &AliasRestriction::any(), None).unwrap();

        let distinct: BTreeSet<String> = candidates.iter().map(|c| c.to_lowercase()).collect();
        prop_assert_eq!(r.len(), distinct.len());
        for c in &distinct {
            let hits = [
                r.identified.keys().any(|k| k.to_lowercase() == *c),
                r.ambiguous.keys().any(|k| k.to_lowercase() == *c),
                r.orphans.iter().any(|k| k.to_lowercase() == *c),
            ];
            prop_assert_eq!(hits.iter().filter(|&&h| h).count(), 1, "candidate {}", c);
        }
    }

    #[test]
    fn inverted_restriction_classifies_the_same_way(
        candidates in prop::collection::vec(candidate(), 1..8)
    ) {
        let store = fixtures::store();
        let resolver = AliasResolver::new(&store).unwrap();
        let plain = resolver.resolve(&candidates, &AliasRestriction::any(), None).unwrap();
        let inverted = resolver
            .resolve(&candidates, &AliasRestriction::any().inverted(), None)
            .unwrap();

        prop_assert_eq!(&plain.orphans, &inverted.orphans);
        prop_assert_eq!(&plain.ambiguous, &inverted.ambiguous);
        let plain_ids: BTreeSet<SharedId> = plain.identified.values().copied().collect();
        let inverted_ids: BTreeSet<SharedId> = inverted.identified.values().copied().collect();
        prop_assert_eq!(plain_ids, inverted_ids);
        prop_assert!(inverted.identified.keys().all(|k| *k == k.to_lowercase()));
    }
}

// ============================================================================
// Funneling
// ============================================================================

#[test]
fn funneled_aliases_are_listed_once_each() {
    let store = fixtures::store();
    let resolver = AliasResolver::new(&store).unwrap();
    let r = resolver
        .resolve(
            ["TP53", "P04637", "tp53", "MDM2"],
            &AliasRestriction::any(),
            None,
        )
        .unwrap();

    assert_eq!(r.identified.get("TP53"), Some(&SharedId(TP53)));
    assert_eq!(r.identified.get("P04637"), Some(&SharedId(TP53)));
    assert_eq!(r.references[&SharedId(TP53)], vec!["TP53", "P04637"]);
    assert_eq!(r.references[&SharedId(MDM2)], vec!["MDM2"]);

    let funneled: Vec<SharedId> = r.funneled().map(|(id, _)| *id).collect();
    assert_eq!(funneled, vec![SharedId(TP53)]);
    assert_eq!(r.by_reference()[&SharedId(TP53)], "TP53 P04637");
}

#[test]
fn namespace_restriction_limits_funneling() {
    let store = fixtures::store();
    let resolver = AliasResolver::new(&store).unwrap();
    let r = resolver
        .resolve(
            ["TP53", "P04637"],
            &AliasRestriction::namespaces(["hgnc.symbol"]),
            None,
        )
        .unwrap();

    assert_eq!(r.identified.len(), 1);
    assert!(r.orphans.contains("P04637"));
    assert_eq!(r.funneled().count(), 0);
}
