//! Restriction structs passed per call to the resolver, the fetcher and the
//! materializer.
//!
//! Every field is an explicit optional set. `None` means "unrestricted";
//! `Some(empty)` means "nothing is allowed", which callers treat as an input
//! error where that makes no sense.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::NetworkConfig;
use crate::error::{NetError, NetResult};
use crate::types::{lowercase_set, MoleculeType};

// ============================================================================
// Alias restriction
// ============================================================================

/// Namespace restriction and key orientation for alias resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasRestriction {
    /// Namespace names to search; `None` searches all namespaces.
    pub namespaces: Option<BTreeSet<String>>,
    /// Key identified entries by the lower-cased lookup string instead of the
    /// stored alias casing.
    pub invert: bool,
}

impl AliasRestriction {
    /// Search every namespace, keyed by stored alias casing.
    pub fn any() -> Self {
        Self::default()
    }

    /// Search only the named namespaces.
    pub fn namespaces<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespaces: Some(names.into_iter().map(Into::into).collect()),
            invert: false,
        }
    }

    /// Switch to lower-cased lookup keys.
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }
}

// ============================================================================
// Gene filter
// ============================================================================

/// How complexes are matched against a gene filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexFilterMode {
    /// Every subunit must be admitted.
    All,
    /// At least one subunit must be admitted.
    #[default]
    Any,
}

impl fmt::Display for ComplexFilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexFilterMode::All => f.write_str("all"),
            ComplexFilterMode::Any => f.write_str("any"),
        }
    }
}

impl FromStr for ComplexFilterMode {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ComplexFilterMode::All),
            "any" => Ok(ComplexFilterMode::Any),
            other => Err(NetError::invalid_argument(format!(
                "complex filter mode must be 'all' or 'any', got '{}'",
                other
            ))),
        }
    }
}

/// Set of admitted gene symbols, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeneFilter {
    symbols: BTreeSet<String>,
}

impl GeneFilter {
    /// Build a filter from symbols in any casing.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            symbols: lowercase_set(symbols),
        }
    }

    /// Number of admitted symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether no symbol is admitted.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether a (possibly colon-joined) symbol passes the filter.
    pub fn admits(&self, symbol: &str, mode: ComplexFilterMode) -> bool {
        let mut parts = symbol.split(':').filter(|s| !s.is_empty()).peekable();
        if parts.peek().is_none() {
            return false;
        }
        let mut hit = |s: &str| self.symbols.contains(&s.to_lowercase());
        match mode {
            ComplexFilterMode::All => parts.all(&mut hit),
            ComplexFilterMode::Any => parts.any(&mut hit),
        }
    }
}

// ============================================================================
// Interaction restriction
// ============================================================================

/// Column role a hook molecule plays in an interaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The hook is in the source column.
    #[serde(rename = "src")]
    Src,
    /// The hook is in the target column.
    #[serde(rename = "tgt")]
    Tgt,
    /// Symmetric table, hook in either column.
    #[serde(rename = "two-way")]
    TwoWay,
}

impl Role {
    /// Every role.
    pub const ALL: [Role; 3] = [Role::Src, Role::Tgt, Role::TwoWay];
}

/// Filters applied when selecting interaction tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionRestriction {
    /// Molecule types the anchors are looked up as.
    pub hooks: Option<BTreeSet<MoleculeType>>,
    /// Admitted molecule types on the other end of directional tables.
    pub partners: Option<BTreeSet<MoleculeType>>,
    /// Names of admitted interaction definitions.
    pub interactions: Option<BTreeSet<String>>,
    /// Names of admitted databases.
    pub databases: Option<BTreeSet<String>>,
    /// Admitted roles.
    pub roles: Option<BTreeSet<Role>>,
}

impl InteractionRestriction {
    /// Restriction that admits everything the configuration offers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict hook types.
    pub fn hooks(mut self, hooks: impl IntoIterator<Item = MoleculeType>) -> Self {
        self.hooks = Some(hooks.into_iter().collect());
        self
    }

    /// Restrict partner types.
    pub fn partners(mut self, partners: impl IntoIterator<Item = MoleculeType>) -> Self {
        self.partners = Some(partners.into_iter().collect());
        self
    }

    /// Restrict interaction definitions by name.
    pub fn interactions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interactions = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict databases by name.
    pub fn databases<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.databases = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict roles.
    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = Some(roles.into_iter().collect());
        self
    }

    /// Validate against the configuration and fill in defaults.
    pub fn resolve(&self, config: &NetworkConfig) -> NetResult<ResolvedRestriction> {
        let all_types = config.molecule_types();

        let hooks = self.hooks.clone().unwrap_or_else(|| all_types.clone());
        let partners = self.partners.clone().unwrap_or(all_types);
        let roles = self
            .roles
            .clone()
            .unwrap_or_else(|| Role::ALL.into_iter().collect());

        let interactions = match &self.interactions {
            None if config.interactions.is_empty() => None,
            None => Some(config.interactions.values().cloned().collect()),
            Some(names) => {
                let mut defs = Vec::with_capacity(names.len());
                for name in names {
                    let def = config.interactions.get(name).ok_or_else(|| {
                        NetError::invalid_argument(format!(
                            "unknown interaction definition '{}'",
                            name
                        ))
                    })?;
                    defs.push(def.clone());
                }
                Some(defs)
            }
        };

        let databases = match (&self.databases, &config.query_databases) {
            (Some(names), _) => {
                for name in names {
                    if config.table(name).is_none() {
                        return Err(NetError::invalid_argument(format!(
                            "unknown database '{}'",
                            name
                        )));
                    }
                }
                lowercase_set(names)
            }
            (None, Some(defaults)) => lowercase_set(defaults),
            (None, None) => lowercase_set(config.tables.iter().map(|t| t.name.as_str())),
        };

        Ok(ResolvedRestriction {
            hooks,
            partners,
            interactions,
            databases,
            roles,
        })
    }
}

/// An [`InteractionRestriction`] with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRestriction {
    /// Hook molecule types.
    pub hooks: BTreeSet<MoleculeType>,
    /// Partner molecule types.
    pub partners: BTreeSet<MoleculeType>,
    /// Admitted interaction definitions; `None` admits every type pair.
    pub interactions: Option<Vec<crate::config::InteractionDef>>,
    /// Lower-cased database names.
    pub databases: BTreeSet<String>,
    /// Admitted roles.
    pub roles: BTreeSet<Role>,
}

impl ResolvedRestriction {
    /// Whether a (src, tgt) type pair is admitted. `src` is checked against
    /// the source types of all selected definitions and `tgt` against their
    /// target types, independently.
    pub fn admits_pair(&self, src: MoleculeType, tgt: MoleculeType) -> bool {
        match &self.interactions {
            None => true,
            Some(defs) => {
                defs.iter().any(|d| d.src.contains(&src))
                    && defs.iter().any(|d| d.tgt.contains(&tgt))
            }
        }
    }

    /// Whether a database is admitted.
    pub fn admits_database(&self, name: &str) -> bool {
        self.databases.contains(&name.to_lowercase())
    }
}
