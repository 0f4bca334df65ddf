//! Data model shared by the record store, the resolver and the expansion engine.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NetError;

/// Numeric id of an external identifier scheme.
pub type NamespaceId = u32;

/// NCBI taxonomy id.
pub type TaxonId = u32;

/// Canonical key for one biological entity across all of its aliases.
///
/// Complexes and the unknown-entity sentinel live in a reserved range at and
/// above a configured threshold, so the class of an id follows from its
/// magnitude alone (see [`SharedId::classify`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedId(pub u64);

impl SharedId {
    /// Classify this id relative to the unknown-entity threshold.
    pub fn classify(self, unknown_entity: SharedId) -> IdClass {
        match self.cmp(&unknown_entity) {
            std::cmp::Ordering::Less => IdClass::Molecule,
            std::cmp::Ordering::Equal => IdClass::UnknownEntity,
            std::cmp::Ordering::Greater => IdClass::Complex,
        }
    }
}

impl fmt::Display for SharedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SharedId {
    fn from(v: u64) -> Self {
        SharedId(v)
    }
}

/// Range class of a shared id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdClass {
    /// Ordinary gene, RNA or drug.
    Molecule,
    /// The sentinel that stands in for unmappable accessions.
    UnknownEntity,
    /// Synthetic multi-subunit assembly.
    Complex,
}

/// An external identifier scheme, registered once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Numeric id referenced by alias rows.
    pub id: NamespaceId,
    /// Machine name, e.g. `hgnc.symbol`.
    pub name: String,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
}

/// A namespace-qualified accession string referencing one shared id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// Entity the alias refers to.
    pub shared_id: SharedId,
    /// Namespace the alias belongs to.
    pub namespace: NamespaceId,
    /// The accession string, in its stored casing.
    pub alias: String,
}

/// Basic annotation of a shared id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotated entity.
    pub shared_id: SharedId,
    /// Display symbol; colon-joined subunit symbols for complexes.
    pub symbol: String,
    /// Owning species, if known.
    #[serde(default)]
    pub species: Option<TaxonId>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl Annotation {
    /// Subunit symbols of a colon-joined complex symbol (the symbol itself otherwise).
    pub fn subunits(&self) -> Vec<&str> {
        self.symbol.split(':').filter(|s| !s.is_empty()).collect()
    }

    /// Whether the symbol names more than one subunit.
    pub fn is_multi_subunit(&self) -> bool {
        self.subunits().len() > 1
    }
}

/// Molecule type as declared by interaction tables and seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoleculeType {
    /// Gene or gene product.
    Gene,
    /// Protein.
    Protein,
    /// Mature microRNA.
    Mirna,
    /// Other RNA species.
    Rna,
    /// Small-molecule drug.
    Drug,
    /// Multi-subunit complex.
    Complex,
    /// Type not known (untyped seeds).
    Unknown,
}

impl MoleculeType {
    /// Every molecule type, in declaration order.
    pub const ALL: [MoleculeType; 7] = [
        MoleculeType::Gene,
        MoleculeType::Protein,
        MoleculeType::Mirna,
        MoleculeType::Rna,
        MoleculeType::Drug,
        MoleculeType::Complex,
        MoleculeType::Unknown,
    ];

    /// Lower-case name as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoleculeType::Gene => "gene",
            MoleculeType::Protein => "protein",
            MoleculeType::Mirna => "mirna",
            MoleculeType::Rna => "rna",
            MoleculeType::Drug => "drug",
            MoleculeType::Complex => "complex",
            MoleculeType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoleculeType {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        MoleculeType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == lowered)
            .ok_or_else(|| NetError::invalid_argument(format!("unknown molecule type '{}'", s)))
    }
}

/// Class of a materialized graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoleculeClass {
    /// Generic protein or small-molecule entity.
    Protein,
    /// microRNA.
    AntisenseRna,
    /// Multi-subunit complex.
    Complex,
}

impl MoleculeClass {
    /// Suffix appended to the symbol to form a node tag.
    pub fn tag_suffix(&self) -> &'static str {
        match self {
            MoleculeClass::Protein => "#pro",
            MoleculeClass::AntisenseRna => "#mir",
            MoleculeClass::Complex => "#com",
        }
    }

    /// Build the node tag for a symbol of this class.
    pub fn tag(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.tag_suffix())
    }
}

/// Signed biological effect of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Polarity {
    /// Inhibiting (-1).
    Inhibitory,
    /// Neutral or purely informational (0).
    #[default]
    Neutral,
    /// Activating (+1).
    Activating,
}

impl Polarity {
    /// Numeric value in {-1, 0, +1}.
    pub fn value(&self) -> i8 {
        match self {
            Polarity::Inhibitory => -1,
            Polarity::Neutral => 0,
            Polarity::Activating => 1,
        }
    }

    /// Arrow glyph used in edge instance keys.
    pub fn glyph(&self) -> &'static str {
        match self {
            Polarity::Inhibitory => "-I",
            Polarity::Neutral => "-D",
            Polarity::Activating => "-o",
        }
    }
}

impl From<Polarity> for i8 {
    fn from(p: Polarity) -> Self {
        p.value()
    }
}

impl TryFrom<i8> for Polarity {
    type Error = String;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            -1 => Ok(Polarity::Inhibitory),
            0 => Ok(Polarity::Neutral),
            1 => Ok(Polarity::Activating),
            other => Err(format!("polarity must be -1, 0 or 1, got {}", other)),
        }
    }
}

/// Provenance of one interaction row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evidence {
    /// Originating database (table) name.
    pub database: String,
    /// Release tag of the database.
    #[serde(default)]
    pub release: String,
    /// Release date, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reldate: Option<String>,
    /// Comma-joined evidence identifiers (e.g. PubMed ids).
    #[serde(default)]
    pub evidence_ids: String,
    /// Untranslated source accession.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_alias: Option<String>,
    /// Untranslated target accession.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_alias: Option<String>,
}

impl Evidence {
    /// Individual evidence identifiers.
    pub fn evidence_list(&self) -> impl Iterator<Item = &str> {
        self.evidence_ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Which column(s) of an interaction table must intersect the anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorColumns {
    /// Match on the source column.
    Source,
    /// Match on the target column.
    Target,
    /// Match on either column (symmetric tables).
    Either,
}

/// An interaction row as returned by the record store, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInteraction {
    /// Translated source id.
    #[serde(default)]
    pub source: Option<SharedId>,
    /// Translated target id.
    #[serde(default)]
    pub target: Option<SharedId>,
    /// Source accession as imported.
    #[serde(default)]
    pub source_alias: Option<String>,
    /// Target accession as imported.
    #[serde(default)]
    pub target_alias: Option<String>,
    /// Comma-joined evidence identifiers.
    #[serde(default)]
    pub evidence_ids: Option<String>,
}

/// A validated interaction between two shared ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRow {
    /// Source entity.
    pub source: SharedId,
    /// Target entity.
    pub target: SharedId,
    /// Declared source type of the table.
    pub source_type: MoleculeType,
    /// Declared target type of the table.
    pub target_type: MoleculeType,
    /// Provenance.
    pub evidence: Evidence,
}

impl InteractionRow {
    /// Deduplication key: (source, target, database, evidence).
    pub fn edge_key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source,
            target: self.target,
            database: self.evidence.database.clone(),
            evidence_ids: self.evidence.evidence_ids.clone(),
        }
    }
}

/// Identity of a logical interaction across rounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    /// Source entity.
    pub source: SharedId,
    /// Target entity.
    pub target: SharedId,
    /// Originating database.
    pub database: String,
    /// Evidence list as stored.
    pub evidence_ids: String,
}

/// Lower-case every string of an iterator into a set.
pub fn lowercase_set<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_lowercase())
        .collect()
}
