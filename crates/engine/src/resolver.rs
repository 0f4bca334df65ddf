//! Alias resolution: accession strings → shared ids.
//!
//! Matching is case-insensitive. Every distinct candidate (compared
//! lower-cased) lands in exactly one of `identified`, `ambiguous` or
//! `orphans`. Many-to-one matches ("funneling") are recorded per shared id
//! and summarized in the log.

use std::collections::{BTreeMap, BTreeSet};

use mirnet_core::{
    AliasRestriction, Annotation, NamespaceId, NetError, NetResult, SharedId, TaxonId,
};
use mirnet_store::RecordStore;
use tracing::{debug, info, warn};

/// Classification of a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// Exactly one shared id.
    Identified(SharedId),
    /// More than one shared id.
    Ambiguous(&'a BTreeSet<SharedId>),
    /// No shared id under the restriction.
    Orphan,
    /// The string was not among the resolved candidates.
    NotRequested,
}

/// Result of one [`AliasResolver::resolve`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Uniquely resolved candidates. Keys are the stored alias casing, or the
    /// lower-cased lookup key for inverted restrictions.
    pub identified: BTreeMap<String, SharedId>,
    /// Candidates without any match, as supplied.
    pub orphans: BTreeSet<String>,
    /// Candidates matching several shared ids, as supplied.
    pub ambiguous: BTreeMap<String, BTreeSet<SharedId>>,
    /// Per shared id, the distinct matching alias strings in lookup order.
    pub references: BTreeMap<SharedId, Vec<String>>,
}

impl Resolution {
    /// Classify one candidate (case-insensitive).
    pub fn outcome(&self, candidate: &str) -> Outcome<'_> {
        let lower = candidate.to_lowercase();
        if let Some((_, id)) = self
            .identified
            .iter()
            .find(|(k, _)| k.to_lowercase() == lower)
        {
            return Outcome::Identified(*id);
        }
        if let Some((_, ids)) = self
            .ambiguous
            .iter()
            .find(|(k, _)| k.to_lowercase() == lower)
        {
            return Outcome::Ambiguous(ids);
        }
        if self.orphans.iter().any(|k| k.to_lowercase() == lower) {
            return Outcome::Orphan;
        }
        Outcome::NotRequested
    }

    /// Reference-keyed view: shared id → space-joined matching aliases.
    pub fn by_reference(&self) -> BTreeMap<SharedId, String> {
        self.references
            .iter()
            .map(|(id, aliases)| (*id, aliases.join(" ")))
            .collect()
    }

    /// Shared ids reached by more than one distinct alias.
    pub fn funneled(&self) -> impl Iterator<Item = (&SharedId, &Vec<String>)> {
        self.references.iter().filter(|(_, a)| a.len() > 1)
    }

    /// Number of classified candidates.
    pub fn len(&self) -> usize {
        self.identified.len() + self.orphans.len() + self.ambiguous.len()
    }

    /// Whether nothing was classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Aliases of a set of shared ids, grouped by namespace name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasListing {
    /// shared id → namespace name → aliases.
    pub aliases: BTreeMap<SharedId, BTreeMap<String, Vec<String>>>,
    /// Requested ids without any alias under the restriction.
    pub missing: BTreeSet<SharedId>,
}

/// Resolved candidates together with their annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotated {
    /// The underlying resolution.
    pub resolution: Resolution,
    /// Annotation per identified shared id.
    pub annotations: BTreeMap<SharedId, Annotation>,
}

/// Resolves accession strings against a [`RecordStore`].
///
/// The namespace registry is read once at construction.
#[derive(Debug)]
pub struct AliasResolver<S> {
    store: S,
    by_name: BTreeMap<String, NamespaceId>,
    names: BTreeMap<NamespaceId, String>,
}

impl<S: RecordStore> AliasResolver<S> {
    /// Load the namespace registry and build a resolver.
    pub fn new(store: S) -> NetResult<Self> {
        let namespaces = store.namespaces()?;
        let by_name = namespaces
            .iter()
            .map(|ns| (ns.name.to_lowercase(), ns.id))
            .collect();
        let names = namespaces.into_iter().map(|ns| (ns.id, ns.name)).collect();
        Ok(Self {
            store,
            by_name,
            names,
        })
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Translate namespace names into ids.
    pub fn namespace_ids(&self, names: &BTreeSet<String>) -> NetResult<BTreeSet<NamespaceId>> {
        if names.is_empty() {
            warn!(target: "mirnet::resolver", "empty namespace restriction");
            return Err(NetError::invalid_argument("namespace restriction is empty"));
        }
        names
            .iter()
            .map(|name| {
                self.by_name.get(&name.to_lowercase()).copied().ok_or_else(|| {
                    warn!(target: "mirnet::resolver", namespace = %name, "unknown namespace");
                    NetError::invalid_argument(format!("unknown namespace '{}'", name))
                })
            })
            .collect()
    }

    /// Resolve candidates to shared ids with one batched lookup.
    pub fn resolve<I, T>(
        &self,
        candidates: I,
        restrict: &AliasRestriction,
        species: Option<&BTreeSet<TaxonId>>,
    ) -> NetResult<Resolution>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let namespaces = match &restrict.namespaces {
            Some(names) => Some(self.namespace_ids(names)?),
            None => None,
        };
        if species.map_or(false, BTreeSet::is_empty) {
            warn!(target: "mirnet::resolver", "empty species restriction");
            return Err(NetError::invalid_argument("species restriction is empty"));
        }

        // lower-cased key → candidate as first supplied
        let mut requested: BTreeMap<String, String> = BTreeMap::new();
        for c in candidates {
            let c = c.as_ref();
            requested
                .entry(c.to_lowercase())
                .or_insert_with(|| c.to_string());
        }
        let mut result = Resolution::default();
        if requested.is_empty() {
            return Ok(result);
        }

        let keys: BTreeSet<String> = requested.keys().cloned().collect();
        let rows = self
            .store
            .lookup_aliases(&keys, namespaces.as_ref(), species)?;

        if rows.is_empty() {
            result.orphans = requested.into_values().collect();
            debug!(target: "mirnet::resolver", orphans = result.orphans.len(), "nothing matched");
            return Ok(result);
        }

        // lower-cased key → (matching ids, first stored casing)
        let mut matches: BTreeMap<String, (BTreeSet<SharedId>, String)> = BTreeMap::new();
        for row in &rows {
            let lower = row.alias.to_lowercase();
            let seen = result.references.entry(row.shared_id).or_default();
            if !seen.iter().any(|a| a.to_lowercase() == lower) {
                seen.push(row.alias.clone());
            }

            let entry = matches
                .entry(lower)
                .or_insert_with(|| (BTreeSet::new(), row.alias.clone()));
            entry.0.insert(row.shared_id);
        }

        for (lower, supplied) in requested {
            match matches.remove(&lower) {
                None => {
                    result.orphans.insert(supplied);
                }
                Some((ids, stored)) if ids.len() == 1 => {
                    let key = if restrict.invert { lower } else { stored };
                    if let Some(id) = ids.into_iter().next() {
                        result.identified.insert(key, id);
                    }
                }
                Some((ids, _)) => {
                    result.ambiguous.entry(supplied).or_default().extend(ids);
                }
            }
        }

        let funneled = result.funneled().count();
        if funneled > 0 {
            info!(
                target: "mirnet::resolver",
                funneled,
                reduced_by = rows.len() - result.references.len(),
                "identifier funneling"
            );
        }
        debug!(
            target: "mirnet::resolver",
            identified = result.identified.len(),
            ambiguous = result.ambiguous.len(),
            orphans = result.orphans.len(),
            "resolved candidates"
        );
        Ok(result)
    }

    /// Every alias of the given shared ids, grouped by namespace name.
    pub fn aliases(
        &self,
        references: &BTreeSet<SharedId>,
        namespaces: Option<&BTreeSet<String>>,
    ) -> NetResult<AliasListing> {
        let namespace_ids = match namespaces {
            Some(names) => Some(self.namespace_ids(names)?),
            None => None,
        };
        let rows = self
            .store
            .lookup_aliases_of(references, namespace_ids.as_ref())?;

        let mut listing = AliasListing::default();
        for row in rows {
            let namespace = self
                .names
                .get(&row.namespace)
                .cloned()
                .unwrap_or_else(|| row.namespace.to_string());
            listing
                .aliases
                .entry(row.shared_id)
                .or_default()
                .entry(namespace)
                .or_default()
                .push(row.alias);
        }
        listing.missing = references
            .iter()
            .filter(|id| !listing.aliases.contains_key(id))
            .copied()
            .collect();
        Ok(listing)
    }

    /// Resolve candidates in every namespace and annotate the identified ids.
    pub fn annotate<I, T>(
        &self,
        candidates: I,
        species: Option<&BTreeSet<TaxonId>>,
    ) -> NetResult<Annotated>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let resolution = self.resolve(candidates, &AliasRestriction::any(), species)?;
        let ids: BTreeSet<SharedId> = resolution.identified.values().copied().collect();
        let annotations = if ids.is_empty() {
            BTreeMap::new()
        } else {
            self.store
                .lookup_annotations(&ids)?
                .into_iter()
                .map(|a| (a.shared_id, a))
                .collect()
        };
        Ok(Annotated {
            resolution,
            annotations,
        })
    }

    /// Translate species names or taxon ids into a taxon restriction.
    pub fn species_restriction<I, T>(&self, names: I) -> NetResult<BTreeSet<TaxonId>>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let names: BTreeSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Err(NetError::invalid_argument("no species given"));
        }
        let taxa = self.store.lookup_taxa(&names)?;
        if taxa.is_empty() {
            warn!(target: "mirnet::resolver", species = ?names, "no matching taxon");
            return Err(NetError::invalid_argument(format!(
                "no taxon matches {}",
                names.into_iter().collect::<Vec<_>>().join(", ")
            )));
        }
        Ok(taxa)
    }
}
