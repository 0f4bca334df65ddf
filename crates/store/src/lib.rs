//! Record store contract and the in-memory reference adapter.
//!
//! The engine never talks to a database directly. It issues a handful of
//! batched lookups through [`RecordStore`]; an adapter translates them into
//! whatever the backing store understands.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;

pub use memory::{Dataset, MemoryStore, StoreStats, TableRows, TaxonNames};

use std::collections::BTreeSet;

use mirnet_core::{
    Alias, AnchorColumns, Annotation, Namespace, NamespaceId, NetResult, RawInteraction, SharedId,
    TaxonId,
};

/// Batched, read-only lookups the engine requires from the record store.
///
/// All calls are synchronous. Implementations take `&self`; any bookkeeping
/// they need goes behind interior mutability.
///
/// ## Error Handling
///
/// | Condition | Error |
/// |-----------|-------|
/// | Backend unavailable or query failed | `Store` |
/// | Unknown interaction table | `Store` |
///
/// Errors are fatal for the caller's run. The engine never retries.
pub trait RecordStore {
    /// Every registered namespace.
    fn namespaces(&self) -> NetResult<Vec<Namespace>>;

    /// Aliases whose lower-cased string is in `candidates`.
    ///
    /// `candidates` must already be lower-cased. `namespaces` restricts the
    /// namespace column; `species` keeps only entities annotated with one of
    /// the given taxa.
    fn lookup_aliases(
        &self,
        candidates: &BTreeSet<String>,
        namespaces: Option<&BTreeSet<NamespaceId>>,
        species: Option<&BTreeSet<TaxonId>>,
    ) -> NetResult<Vec<Alias>>;

    /// Every alias of the given shared ids, optionally within `namespaces`.
    fn lookup_aliases_of(
        &self,
        ids: &BTreeSet<SharedId>,
        namespaces: Option<&BTreeSet<NamespaceId>>,
    ) -> NetResult<Vec<Alias>>;

    /// Annotations of the given shared ids. Ids without annotation are absent.
    fn lookup_annotations(&self, ids: &BTreeSet<SharedId>) -> NetResult<Vec<Annotation>>;

    /// Rows of `table` whose `columns` intersect `anchors`.
    fn lookup_interactions(
        &self,
        table: &str,
        columns: AnchorColumns,
        anchors: &BTreeSet<SharedId>,
    ) -> NetResult<Vec<RawInteraction>>;

    /// Taxon ids matching species names or numeric taxon ids (case-insensitive).
    fn lookup_taxa(&self, names: &BTreeSet<String>) -> NetResult<BTreeSet<TaxonId>>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn namespaces(&self) -> NetResult<Vec<Namespace>> {
        (**self).namespaces()
    }

    fn lookup_aliases(
        &self,
        candidates: &BTreeSet<String>,
        namespaces: Option<&BTreeSet<NamespaceId>>,
        species: Option<&BTreeSet<TaxonId>>,
    ) -> NetResult<Vec<Alias>> {
        (**self).lookup_aliases(candidates, namespaces, species)
    }

    fn lookup_aliases_of(
        &self,
        ids: &BTreeSet<SharedId>,
        namespaces: Option<&BTreeSet<NamespaceId>>,
    ) -> NetResult<Vec<Alias>> {
        (**self).lookup_aliases_of(ids, namespaces)
    }

    fn lookup_annotations(&self, ids: &BTreeSet<SharedId>) -> NetResult<Vec<Annotation>> {
        (**self).lookup_annotations(ids)
    }

    fn lookup_interactions(
        &self,
        table: &str,
        columns: AnchorColumns,
        anchors: &BTreeSet<SharedId>,
    ) -> NetResult<Vec<RawInteraction>> {
        (**self).lookup_interactions(table, columns, anchors)
    }

    fn lookup_taxa(&self, names: &BTreeSet<String>) -> NetResult<BTreeSet<TaxonId>> {
        (**self).lookup_taxa(names)
    }
}
