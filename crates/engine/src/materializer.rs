//! Turns candidate shared ids into graph nodes.
//!
//! Candidates are annotated in one batch, filtered by gene symbol and species,
//! classified, and added to the graph under a stable tag. Newly added
//! complexes get one node per distinct subunit (a `<symbol>#pro` placeholder
//! when no node exists for the symbol yet) and a neutral complex-association
//! edge from each subunit, all sharing one pseudo-reaction id.

use std::collections::{BTreeMap, BTreeSet};

use mirnet_core::{
    Annotation, ComplexFilterMode, GeneFilter, IdClass, MoleculeClass, MoleculeType, NetResult,
    NetworkConfig, Polarity, SharedId, TaxonId,
};
use mirnet_store::RecordStore;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::graph::{EdgeData, EdgeKind, InteractionGraph, NodeData};

static MIRNA_SYMBOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^mir(let)?[0-9]+[a-z]?(-[0-9]+)?").expect("valid microRNA pattern")
});

static HOST_GENE_SYMBOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^mir(let)?[0-9]+[a-z]?(-[0-9]+)?hg").expect("valid host gene pattern")
});

/// Whether a symbol names a microRNA gene (and not its host gene).
pub fn is_mirna_symbol(symbol: &str) -> bool {
    let lower = symbol.to_lowercase();
    MIRNA_SYMBOL.is_match(&lower) && !HOST_GENE_SYMBOL.is_match(&lower)
}

/// Derive the node class of an annotated candidate.
pub fn classify(
    id: SharedId,
    types: &BTreeSet<MoleculeType>,
    annotation: &Annotation,
    unknown_entity: SharedId,
) -> MoleculeClass {
    let complex_typed =
        types.contains(&MoleculeType::Complex) || id.classify(unknown_entity) == IdClass::Complex;
    if complex_typed && annotation.is_multi_subunit() {
        MoleculeClass::Complex
    } else if types.contains(&MoleculeType::Mirna) || is_mirna_symbol(&annotation.symbol) {
        MoleculeClass::AntisenseRna
    } else {
        MoleculeClass::Protein
    }
}

/// Per-call filtering policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFilter<'a> {
    /// Admitted gene symbols; `None` admits everything.
    pub genes: Option<&'a GeneFilter>,
    /// How complexes are matched against `genes`.
    pub complex_mode: ComplexFilterMode,
    /// Admitted species; `None` admits everything.
    pub species: Option<&'a BTreeSet<TaxonId>>,
    /// Mark new nodes as seeds.
    pub seed: bool,
}

/// Outcome of one [`Materializer::materialize`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Materialized {
    /// Annotations of the candidates that passed every filter.
    pub annotations: BTreeMap<SharedId, Annotation>,
    /// Tags added to the graph, subunit placeholders included.
    pub added: Vec<String>,
}

/// Adds annotated nodes to a graph.
#[derive(Debug)]
pub struct Materializer<'c, S> {
    store: S,
    config: &'c NetworkConfig,
}

impl<'c, S: RecordStore> Materializer<'c, S> {
    /// Build a materializer over `store`.
    pub fn new(store: S, config: &'c NetworkConfig) -> Self {
        Self { store, config }
    }

    /// Annotate, filter, classify and add candidates at `shell`.
    pub fn materialize(
        &self,
        graph: &mut InteractionGraph,
        candidates: &BTreeSet<(SharedId, MoleculeType)>,
        shell: u32,
        filter: &NodeFilter<'_>,
    ) -> NetResult<Materialized> {
        let mut out = Materialized::default();
        if candidates.is_empty() {
            return Ok(out);
        }

        let mut types: BTreeMap<SharedId, BTreeSet<MoleculeType>> = BTreeMap::new();
        for &(id, t) in candidates {
            types.entry(id).or_default().insert(t);
        }

        let ids: BTreeSet<SharedId> = types.keys().copied().collect();
        let mut annotations: BTreeMap<SharedId, Annotation> = self
            .store
            .lookup_annotations(&ids)?
            .into_iter()
            .map(|a| (a.shared_id, a))
            .collect();
        let unknown = self.config.unknown_entity;
        if ids.contains(&unknown) {
            annotations.entry(unknown).or_insert_with(|| Annotation {
                shared_id: unknown,
                symbol: self.config.unknown_entity_symbol.clone(),
                species: None,
                description: String::new(),
            });
        }

        let mut unannotated = 0usize;
        let mut filtered = 0usize;
        for (id, types) in &types {
            let Some(annotation) = annotations.remove(id) else {
                unannotated += 1;
                continue;
            };
            if let Some(genes) = filter.genes {
                if !genes.admits(&annotation.symbol, filter.complex_mode) {
                    filtered += 1;
                    continue;
                }
            }
            if let Some(allowed) = filter.species {
                let admitted = match annotation.species {
                    Some(species) => allowed.contains(&species),
                    // the sentinel and complexes are not tied to one organism
                    None => id.classify(unknown) != IdClass::Molecule,
                };
                if !admitted {
                    filtered += 1;
                    continue;
                }
            }
            let class = classify(*id, types, &annotation, unknown);
            self.add_node(graph, &annotation, class, shell, filter.seed, &mut out.added)?;
            out.annotations.insert(*id, annotation);
        }

        debug!(
            target: "mirnet::materializer",
            shell,
            candidates = types.len(),
            unannotated,
            filtered,
            added = out.added.len(),
            "materialized candidates"
        );
        Ok(out)
    }

    fn add_node(
        &self,
        graph: &mut InteractionGraph,
        annotation: &Annotation,
        class: MoleculeClass,
        shell: u32,
        seed: bool,
        added: &mut Vec<String>,
    ) -> NetResult<()> {
        let tag = class.tag(&annotation.symbol);
        let mut data = NodeData::new(annotation.symbol.as_str(), class, shell);
        data.shared_id = Some(annotation.shared_id);
        data.seed = seed;
        data.species = annotation.species;
        data.description = annotation.description.clone();

        if class != MoleculeClass::Complex {
            if graph.add_node(&tag, data) {
                added.push(tag);
            }
            return Ok(());
        }

        let subunits = annotation.subunits();
        let distinct: BTreeSet<&str> = subunits.iter().copied().collect();
        if distinct.len() == 1 {
            data.homomultimer = subunits.len() as u32;
        }
        let members: Vec<(String, &str)> = distinct
            .iter()
            .map(|&s| {
                let member = graph
                    .tag_for_symbol(s)
                    .map(str::to_string)
                    .unwrap_or_else(|| MoleculeClass::Protein.tag(s));
                (member, s)
            })
            .collect();
        let mut member_tags: Vec<String> = members.iter().map(|(t, _)| t.clone()).collect();
        member_tags.sort();
        member_tags.dedup();
        data.members = member_tags;

        if !graph.add_node(&tag, data) {
            return Ok(());
        }
        added.push(tag.clone());

        let reaction = graph.next_reaction_id();
        for (member, symbol) in members {
            if graph.add_node(&member, NodeData::new(symbol, MoleculeClass::Protein, shell)) {
                added.push(member.clone());
            }
            let instance = format!("{} -- {}", member, tag);
            graph.add_edge(
                &member,
                &tag,
                &instance,
                EdgeData {
                    kind: EdgeKind::ComplexAssociation,
                    polarity: Polarity::Neutral,
                    reaction: reaction.clone(),
                    evidence: None,
                },
            )?;
        }
        Ok(())
    }
}
