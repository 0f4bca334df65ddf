//! Shell-by-shell network expansion.
//!
//! ```text
//! Seeding ──► Expanding(shell = 1) ──► ... ──► Finalizing ──► Done
//! ```
//!
//! Each round resolves the symbols of the frontier ("outer shell") to shared
//! ids, fetches interactions anchored on them, turns unvisited endpoints into
//! new nodes one shell further out, and connects everything with
//! deduplicated, polarity-classified edges. The last round (remaining depth
//! zero) only interconnects: it never adds nodes.
//!
//! The run stops after `depth + 1` rounds at most, or earlier when a round
//! adds no node.

use std::collections::{BTreeMap, BTreeSet};

use mirnet_core::{
    AliasRestriction, ComplexFilterMode, EdgeKey, GeneFilter, IdClass, InteractionRestriction,
    InteractionRow, MoleculeType, NetError, NetResult, NetworkConfig, ResolvedRestriction,
    SharedId, TaxonId,
};
use mirnet_store::RecordStore;
use tracing::{debug, info, warn};

use crate::fetcher::InteractionFetcher;
use crate::graph::{EdgeData, EdgeKind, InteractionGraph};
use crate::materializer::{Materialized, Materializer, NodeFilter};
use crate::resolver::AliasResolver;

/// Options for one expansion run.
///
/// Use the builder pattern to configure options:
///
/// ```ignore
/// use mirnet_engine::ExpansionOptions;
/// use mirnet_core::{ComplexFilterMode, GeneFilter};
///
/// let opts = ExpansionOptions::new()
///     .gene_filter(GeneFilter::new(["TP53", "MDM2"]))
///     .complex_mode(ComplexFilterMode::All);
/// ```
#[derive(Debug, Clone)]
pub struct ExpansionOptions {
    /// Table selection for interaction fetching.
    pub restriction: InteractionRestriction,
    /// Admitted gene symbols for nodes beyond the seeds.
    pub gene_filter: Option<GeneFilter>,
    /// Complex matching policy for expanding rounds.
    pub complex_mode: ComplexFilterMode,
    /// Admitted species.
    pub species: Option<BTreeSet<TaxonId>>,
    /// Network name.
    pub name: String,
}

impl ExpansionOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interaction restriction.
    pub fn restriction(mut self, restriction: InteractionRestriction) -> Self {
        self.restriction = restriction;
        self
    }

    /// Set the gene filter.
    pub fn gene_filter(mut self, filter: GeneFilter) -> Self {
        self.gene_filter = Some(filter);
        self
    }

    /// Set the complex matching policy.
    pub fn complex_mode(mut self, mode: ComplexFilterMode) -> Self {
        self.complex_mode = mode;
        self
    }

    /// Restrict to species.
    pub fn species(mut self, taxa: BTreeSet<TaxonId>) -> Self {
        self.species = Some(taxa);
        self
    }

    /// Set the network name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            restriction: InteractionRestriction::default(),
            gene_filter: None,
            complex_mode: ComplexFilterMode::Any,
            species: None,
            name: "mirnet".to_string(),
        }
    }
}

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionStatus {
    /// Depth exhausted or no more nodes to discover.
    Complete,
    /// No seed could be materialized.
    NoSeeds,
    /// A round found candidates but none survived materialization.
    Stalled {
        /// Shell being built.
        shell: u32,
        /// Candidates dropped.
        candidates: usize,
    },
}

/// Statistics of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStats {
    /// Shell index new nodes were assigned to.
    pub shell: u32,
    /// Whether this was the final, interconnect-only round.
    pub terminal: bool,
    /// Complex matching policy in effect.
    pub complex_mode: ComplexFilterMode,
    /// Outer-shell nodes resolved to an anchor id.
    pub anchors: usize,
    /// Interaction rows fetched.
    pub rows: usize,
    /// Distinct candidate ids.
    pub candidates: usize,
    /// Candidates that passed every filter.
    pub materialized: usize,
    /// Nodes added (subunit placeholders included).
    pub nodes_added: usize,
    /// Database edges added.
    pub edges_added: usize,
}

/// What happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Tags of the seed nodes.
    pub seeds: Vec<String>,
    /// Seed candidates without a match.
    pub orphan_seeds: BTreeSet<String>,
    /// Seed candidates matching several ids.
    pub ambiguous_seeds: BTreeMap<String, BTreeSet<SharedId>>,
    /// Per-round statistics, in order.
    pub rounds: Vec<RoundStats>,
}

/// Graph, status and report of a run. A stalled run keeps its partial graph.
#[derive(Debug, Clone)]
pub struct ExpansionOutcome {
    /// The network built so far.
    pub graph: InteractionGraph,
    /// Final state.
    pub status: ExpansionStatus,
    /// Seeding and per-round details.
    pub report: ExpansionReport,
}

impl ExpansionOutcome {
    /// Whether the run ended normally.
    pub fn is_complete(&self) -> bool {
        self.status == ExpansionStatus::Complete
    }

    /// The graph, or [`NetError::ExpansionStalled`] for a stalled run.
    pub fn into_result(self) -> NetResult<InteractionGraph> {
        match self.status {
            ExpansionStatus::Stalled { shell, candidates } => {
                Err(NetError::ExpansionStalled { shell, candidates })
            }
            _ => Ok(self.graph),
        }
    }
}

/// Grow a network from `seeds` out to `depth` shells.
///
/// Seeds are resolved in every namespace. Orphan and ambiguous seeds are
/// reported and skipped. Store failures abort the run.
pub fn expand_network<S, I, T>(
    store: &S,
    config: &NetworkConfig,
    seeds: I,
    depth: u32,
    options: &ExpansionOptions,
) -> NetResult<ExpansionOutcome>
where
    S: RecordStore + ?Sized,
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let seeds: Vec<String> = seeds
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if seeds.is_empty() {
        warn!(target: "mirnet::expansion", "no seed candidates");
        return Err(NetError::invalid_argument("no seed candidates"));
    }

    let restriction = options.restriction.resolve(config)?;
    let resolver = AliasResolver::new(store)?;
    let symbol_namespace: BTreeSet<String> = [config.symbol_namespace.clone()].into();
    resolver.namespace_ids(&symbol_namespace)?;

    info!(
        target: "mirnet::expansion",
        name = %options.name,
        seeds = seeds.len(),
        depth,
        "starting expansion"
    );

    let mut run = Run {
        config,
        options,
        restriction,
        resolver,
        fetcher: InteractionFetcher::new(store, config),
        materializer: Materializer::new(store, config),
        symbol_restriction: AliasRestriction {
            namespaces: Some(symbol_namespace),
            invert: true,
        },
        graph: InteractionGraph::new(options.name.as_str()),
        visited: BTreeSet::new(),
        seen_edges: BTreeSet::new(),
        report: ExpansionReport::default(),
    };

    let status = run.execute(&seeds, depth)?;
    info!(
        target: "mirnet::expansion",
        name = %options.name,
        ?status,
        nodes = run.graph.node_count(),
        edges = run.graph.edge_count(),
        shells = run.graph.shells(),
        "expansion finished"
    );
    Ok(ExpansionOutcome {
        graph: run.graph,
        status,
        report: run.report,
    })
}

/// Mutable state of one run.
struct Run<'a, S: ?Sized> {
    config: &'a NetworkConfig,
    options: &'a ExpansionOptions,
    restriction: ResolvedRestriction,
    resolver: AliasResolver<&'a S>,
    fetcher: InteractionFetcher<'a, &'a S>,
    materializer: Materializer<'a, &'a S>,
    symbol_restriction: AliasRestriction,
    graph: InteractionGraph,
    visited: BTreeSet<SharedId>,
    seen_edges: BTreeSet<EdgeKey>,
    report: ExpansionReport,
}

impl<'a, S: RecordStore + ?Sized> Run<'a, S> {
    fn execute(&mut self, seeds: &[String], depth: u32) -> NetResult<ExpansionStatus> {
        self.seed(seeds)?;
        if self.graph.node_count() == 0 {
            warn!(target: "mirnet::expansion", "none of the seeds could be materialized");
            return Ok(ExpansionStatus::NoSeeds);
        }

        let mut remaining = depth;
        loop {
            let terminal = remaining == 0;
            let stats = self.round(terminal)?;
            let stalled = !terminal && stats.candidates > 0 && stats.materialized == 0;
            let nodes_added = stats.nodes_added;
            let (shell, candidates) = (stats.shell, stats.candidates);
            self.report.rounds.push(stats);

            if stalled {
                warn!(target: "mirnet::expansion", shell, candidates, "expansion stalled");
                return Ok(ExpansionStatus::Stalled { shell, candidates });
            }
            if terminal || nodes_added == 0 {
                return Ok(ExpansionStatus::Complete);
            }
            remaining -= 1;
        }
    }

    fn seed(&mut self, seeds: &[String]) -> NetResult<()> {
        let species = self.options.species.as_ref();
        let resolution = self
            .resolver
            .resolve(seeds, &AliasRestriction::any(), species)?;
        let unknown = self.config.unknown_entity;
        let candidates: BTreeSet<(SharedId, MoleculeType)> = resolution
            .identified
            .values()
            .map(|&id| match id.classify(unknown) {
                IdClass::Complex => (id, MoleculeType::Complex),
                _ => (id, MoleculeType::Unknown),
            })
            .collect();

        let filter = NodeFilter {
            genes: None,
            complex_mode: self.options.complex_mode,
            species,
            seed: true,
        };
        self.materializer
            .materialize(&mut self.graph, &candidates, 0, &filter)?;

        self.report.seeds = self
            .graph
            .nodes()
            .filter(|(_, d)| d.seed)
            .map(|(t, _)| t.to_string())
            .collect();
        self.report.orphan_seeds = resolution.orphans;
        self.report.ambiguous_seeds = resolution.ambiguous;
        if !self.report.orphan_seeds.is_empty() || !self.report.ambiguous_seeds.is_empty() {
            info!(
                target: "mirnet::expansion",
                orphans = self.report.orphan_seeds.len(),
                ambiguous = self.report.ambiguous_seeds.len(),
                "skipped unresolvable seeds"
            );
        }
        Ok(())
    }

    fn round(&mut self, terminal: bool) -> NetResult<RoundStats> {
        let outer = self.graph.outer_shell();
        let anchors = self.anchors(&outer)?;

        let shell = if terminal {
            self.graph.shells()
        } else {
            self.graph.open_shell()
        };
        let complex_mode = if terminal {
            ComplexFilterMode::All
        } else {
            self.options.complex_mode
        };

        let rows = self.fetcher.fetch(&anchors, &self.restriction)?;
        let fetched = rows.len();
        self.visited.extend(anchors.keys().copied());
        let (candidates, retained) = self.partition(rows, terminal);

        let filter = NodeFilter {
            genes: self.options.gene_filter.as_ref(),
            complex_mode,
            species: self.options.species.as_ref(),
            seed: false,
        };
        let materialized =
            self.materializer
                .materialize(&mut self.graph, &candidates, shell, &filter)?;

        // A stalled round leaves the graph as it was before materializing.
        let stalled = !terminal && !candidates.is_empty() && materialized.annotations.is_empty();
        let mut edges_added = 0;
        if !stalled {
            edges_added = self.connect(&retained, &materialized, &anchors)?;
            self.graph.clear_frontier(outer.keys());
        }

        let stats = RoundStats {
            shell,
            terminal,
            complex_mode,
            anchors: anchors.len(),
            rows: fetched,
            candidates: candidates.len(),
            materialized: materialized.annotations.len(),
            nodes_added: materialized.added.len(),
            edges_added,
        };
        debug!(target: "mirnet::expansion", ?stats, "round finished");
        Ok(stats)
    }

    /// Resolve outer-shell symbols to anchor ids: shared id → node tag.
    fn anchors(&self, outer: &BTreeMap<String, String>) -> NetResult<BTreeMap<SharedId, String>> {
        let mut anchors = BTreeMap::new();
        if outer.is_empty() {
            return Ok(anchors);
        }
        let resolution = self.resolver.resolve(
            outer.values(),
            &self.symbol_restriction,
            self.options.species.as_ref(),
        )?;
        let mut identified = resolution.identified;
        identified.insert(
            self.config.unknown_entity_symbol.to_lowercase(),
            self.config.unknown_entity,
        );

        for (tag, symbol) in outer {
            let lower = symbol.to_lowercase();
            let id = identified.get(&lower).copied().or_else(|| {
                // An ambiguous symbol falls back to the node's own provenance.
                let own = self.graph.node(tag)?.shared_id?;
                resolution
                    .ambiguous
                    .iter()
                    .find(|(k, ids)| k.to_lowercase() == lower && ids.contains(&own))
                    .map(|_| own)
            });
            match id {
                Some(id) => {
                    anchors.entry(id).or_insert_with(|| tag.clone());
                }
                None => debug!(target: "mirnet::expansion", tag = %tag, "outer shell node not resolvable"),
            }
        }
        Ok(anchors)
    }

    /// Split rows into new candidates and edges worth connecting.
    fn partition(
        &mut self,
        rows: Vec<InteractionRow>,
        terminal: bool,
    ) -> (BTreeSet<(SharedId, MoleculeType)>, Vec<InteractionRow>) {
        let unknown = self.config.unknown_entity;
        let mut candidates = BTreeSet::new();
        let mut retained = Vec::new();
        for row in rows {
            let source_visited = self.visited.contains(&row.source);
            let target_visited = self.visited.contains(&row.target);
            if !(source_visited && target_visited) {
                let (id, declared) = if source_visited {
                    (row.target, row.target_type)
                } else {
                    (row.source, row.source_type)
                };
                if terminal {
                    if self.graph.tag_for_id(id).is_none() {
                        continue;
                    }
                } else {
                    let kind = match id.classify(unknown) {
                        IdClass::Complex => MoleculeType::Complex,
                        _ => declared,
                    };
                    candidates.insert((id, kind));
                }
            }
            if self.seen_edges.insert(row.edge_key()) {
                retained.push(row);
            }
        }
        (candidates, retained)
    }

    /// Add database edges for retained rows. Returns the number added.
    fn connect(
        &mut self,
        rows: &[InteractionRow],
        materialized: &Materialized,
        anchors: &BTreeMap<SharedId, String>,
    ) -> NetResult<usize> {
        let mut added = 0;
        for row in rows {
            let source = self.endpoint_tag(row.source, materialized, anchors);
            let target = self.endpoint_tag(row.target, materialized, anchors);
            let (Some(source), Some(target)) = (source, target) else {
                continue;
            };
            let database = &row.evidence.database;
            let polarity = self.config.polarity.classify(database);
            let instance = format!("{} {} {} [{}]", source, polarity.glyph(), target, database);
            if self.graph.contains_edge(&instance) {
                continue;
            }
            let data = EdgeData {
                kind: EdgeKind::Database,
                polarity,
                reaction: self.graph.next_reaction_id(),
                evidence: Some(row.evidence.clone()),
            };
            if self.graph.add_edge(&source, &target, &instance, data)? {
                added += 1;
            }
        }
        Ok(added)
    }

    fn endpoint_tag(
        &self,
        id: SharedId,
        materialized: &Materialized,
        anchors: &BTreeMap<SharedId, String>,
    ) -> Option<String> {
        if let Some(annotation) = materialized.annotations.get(&id) {
            if let Some(tag) = self.graph.tag_for_symbol(&annotation.symbol) {
                return Some(tag.to_string());
            }
        }
        anchors
            .get(&id)
            .cloned()
            .or_else(|| self.graph.tag_for_id(id).map(str::to_string))
    }
}
