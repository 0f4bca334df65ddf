//! In-memory record store backed by a serde-loadable dataset.
//!
//! # Design
//!
//! - Alias strings are indexed lower-cased, so lookups are case-insensitive
//!   while the stored casing is returned untouched.
//! - FxHashMap indexes for O(1) per-candidate lookups.
//! - Lookup counters live behind a `parking_lot::Mutex` so the trait can take
//!   `&self`.

use std::collections::BTreeSet;
use std::path::Path;

use mirnet_core::{
    Alias, AnchorColumns, Annotation, Namespace, NamespaceId, NetError, NetResult, RawInteraction,
    SharedId, TaxonId,
};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::RecordStore;

/// Names under which a taxon can be referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonNames {
    /// NCBI taxonomy id.
    pub taxon: TaxonId,
    /// Common and scientific names.
    pub names: Vec<String>,
}

/// Rows of one interaction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRows {
    /// Table name, matched case-insensitively.
    pub name: String,
    /// Rows as imported.
    pub rows: Vec<RawInteraction>,
}

/// Everything a [`MemoryStore`] serves, in its on-disk JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Registered namespaces.
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
    /// Alias rows.
    #[serde(default)]
    pub aliases: Vec<Alias>,
    /// Annotation rows.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Taxon name lookup.
    #[serde(default)]
    pub taxa: Vec<TaxonNames>,
    /// Interaction tables.
    #[serde(default)]
    pub tables: Vec<TableRows>,
}

impl Dataset {
    /// Parse a dataset from JSON text.
    pub fn from_json_str(s: &str) -> NetResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a JSON dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> NetResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            NetError::store_with_source(format!("cannot read dataset {}", path.display()), e)
        })?;
        Self::from_json_str(&text)
    }
}

/// Lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Alias lookups (by string and by id).
    pub alias_lookups: u64,
    /// Annotation lookups.
    pub annotation_lookups: u64,
    /// Interaction table lookups.
    pub interaction_lookups: u64,
    /// Total rows returned by interaction lookups.
    pub interaction_rows: u64,
}

/// In-memory [`RecordStore`].
#[derive(Debug)]
pub struct MemoryStore {
    namespaces: Vec<Namespace>,
    aliases: Vec<Alias>,
    by_alias: FxHashMap<String, Vec<usize>>,
    by_id: FxHashMap<SharedId, Vec<usize>>,
    annotations: FxHashMap<SharedId, Annotation>,
    taxa: FxHashMap<String, TaxonId>,
    tables: FxHashMap<String, Vec<RawInteraction>>,
    stats: Mutex<StoreStats>,
}

impl MemoryStore {
    /// Index a dataset.
    pub fn new(dataset: Dataset) -> Self {
        let mut by_alias: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut by_id: FxHashMap<SharedId, Vec<usize>> = FxHashMap::default();
        for (i, alias) in dataset.aliases.iter().enumerate() {
            by_alias.entry(alias.alias.to_lowercase()).or_default().push(i);
            by_id.entry(alias.shared_id).or_default().push(i);
        }

        let annotations = dataset
            .annotations
            .into_iter()
            .map(|a| (a.shared_id, a))
            .collect();

        let mut taxa = FxHashMap::default();
        for entry in &dataset.taxa {
            taxa.insert(entry.taxon.to_string(), entry.taxon);
            for name in &entry.names {
                taxa.insert(name.to_lowercase(), entry.taxon);
            }
        }

        let tables = dataset
            .tables
            .into_iter()
            .map(|t| (t.name.to_lowercase(), t.rows))
            .collect();

        Self {
            namespaces: dataset.namespaces,
            aliases: dataset.aliases,
            by_alias,
            by_id,
            annotations,
            taxa,
            tables,
            stats: Mutex::new(StoreStats::default()),
        }
    }

    /// Load and index a JSON dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> NetResult<Self> {
        Ok(Self::new(Dataset::from_path(path)?))
    }

    /// Snapshot of the lookup counters.
    pub fn stats(&self) -> StoreStats {
        *self.stats.lock()
    }

    /// Reset the lookup counters.
    pub fn reset_stats(&self) {
        *self.stats.lock() = StoreStats::default();
    }

    fn species_ok(&self, id: SharedId, species: Option<&BTreeSet<TaxonId>>) -> bool {
        match species {
            None => true,
            Some(allowed) => self
                .annotations
                .get(&id)
                .and_then(|a| a.species)
                .map_or(false, |t| allowed.contains(&t)),
        }
    }

    fn collect_aliases<'a>(
        &self,
        indices: impl Iterator<Item = &'a usize>,
        namespaces: Option<&BTreeSet<NamespaceId>>,
    ) -> Vec<usize> {
        let mut hits: Vec<usize> = indices
            .copied()
            .filter(|&i| namespaces.map_or(true, |ns| ns.contains(&self.aliases[i].namespace)))
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits
    }
}

impl RecordStore for MemoryStore {
    fn namespaces(&self) -> NetResult<Vec<Namespace>> {
        Ok(self.namespaces.clone())
    }

    fn lookup_aliases(
        &self,
        candidates: &BTreeSet<String>,
        namespaces: Option<&BTreeSet<NamespaceId>>,
        species: Option<&BTreeSet<TaxonId>>,
    ) -> NetResult<Vec<Alias>> {
        self.stats.lock().alias_lookups += 1;
        let indices = candidates
            .iter()
            .filter_map(|c| self.by_alias.get(c))
            .flatten();
        let hits = self.collect_aliases(indices, namespaces);
        Ok(hits
            .into_iter()
            .map(|i| &self.aliases[i])
            .filter(|a| self.species_ok(a.shared_id, species))
            .cloned()
            .collect())
    }

    fn lookup_aliases_of(
        &self,
        ids: &BTreeSet<SharedId>,
        namespaces: Option<&BTreeSet<NamespaceId>>,
    ) -> NetResult<Vec<Alias>> {
        self.stats.lock().alias_lookups += 1;
        let indices = ids.iter().filter_map(|id| self.by_id.get(id)).flatten();
        let hits = self.collect_aliases(indices, namespaces);
        Ok(hits.into_iter().map(|i| self.aliases[i].clone()).collect())
    }

    fn lookup_annotations(&self, ids: &BTreeSet<SharedId>) -> NetResult<Vec<Annotation>> {
        self.stats.lock().annotation_lookups += 1;
        Ok(ids
            .iter()
            .filter_map(|id| self.annotations.get(id))
            .cloned()
            .collect())
    }

    fn lookup_interactions(
        &self,
        table: &str,
        columns: AnchorColumns,
        anchors: &BTreeSet<SharedId>,
    ) -> NetResult<Vec<RawInteraction>> {
        let rows = self
            .tables
            .get(&table.to_lowercase())
            .ok_or_else(|| NetError::store(format!("no such interaction table '{}'", table)))?;

        let hit = |id: Option<SharedId>| id.map_or(false, |id| anchors.contains(&id));
        let selected: Vec<RawInteraction> = rows
            .iter()
            .filter(|r| match columns {
                AnchorColumns::Source => hit(r.source),
                AnchorColumns::Target => hit(r.target),
                AnchorColumns::Either => hit(r.source) || hit(r.target),
            })
            .cloned()
            .collect();

        let mut stats = self.stats.lock();
        stats.interaction_lookups += 1;
        stats.interaction_rows += selected.len() as u64;
        drop(stats);

        debug!(
            target: "mirnet::store",
            table,
            ?columns,
            anchors = anchors.len(),
            rows = selected.len(),
            "interaction lookup"
        );
        Ok(selected)
    }

    fn lookup_taxa(&self, names: &BTreeSet<String>) -> NetResult<BTreeSet<TaxonId>> {
        Ok(names
            .iter()
            .filter_map(|n| self.taxa.get(&n.trim().to_lowercase()))
            .copied()
            .collect())
    }
}
