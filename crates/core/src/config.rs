//! Static network configuration, read once at startup.
//!
//! The configuration names the interaction tables the record store offers,
//! their declared source/target molecule types, the interaction definitions
//! used to select tables, and the database -> polarity classification.
//!
//! ```toml
//! symbol_namespace = "hgnc.symbol"
//! query_databases = ["miRTarBase", "HPRD"]
//!
//! [[tables]]
//! name = "miRTarBase"
//! src = "mirna"
//! tgt = "protein"
//! release = "6.1"
//!
//! [interactions.regulation]
//! src = ["mirna"]
//! tgt = ["protein"]
//!
//! [polarity]
//! mirtarbase = -1
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetError, NetResult};
use crate::restrict::Role;
use crate::types::{MoleculeType, Polarity, SharedId};

/// Default threshold of the reserved complex/unknown-entity id range.
pub const DEFAULT_UNKNOWN_ENTITY: SharedId = SharedId(1_000_000_000);

fn default_unknown_entity() -> SharedId {
    DEFAULT_UNKNOWN_ENTITY
}

fn default_unknown_entity_symbol() -> String {
    "unmappable_identifier".to_string()
}

fn default_symbol_namespace() -> String {
    "hgnc.symbol".to_string()
}

/// One interaction table offered by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table (and database) name.
    pub name: String,
    /// Declared molecule type of the source column.
    pub src: MoleculeType,
    /// Declared molecule type of the target column.
    pub tgt: MoleculeType,
    /// Release tag copied into evidence.
    #[serde(default)]
    pub release: String,
    /// Release date copied into evidence.
    #[serde(default)]
    pub reldate: Option<String>,
}

impl TableConfig {
    /// Symmetric tables are queried in the two-way role.
    pub fn is_symmetric(&self) -> bool {
        self.src == self.tgt
    }
}

/// Source/target molecule types admitted by a named interaction definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionDef {
    /// Admitted source types.
    pub src: BTreeSet<MoleculeType>,
    /// Admitted target types.
    pub tgt: BTreeSet<MoleculeType>,
}

/// Database name -> polarity classification.
///
/// Keys are compared case-insensitively. Databases without an entry are
/// neutral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolarityTable(BTreeMap<String, Polarity>);

impl PolarityTable {
    /// Build a table from (database, polarity) pairs.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Polarity)>,
        S: AsRef<str>,
    {
        PolarityTable(
            entries
                .into_iter()
                .map(|(db, p)| (db.as_ref().to_lowercase(), p))
                .collect(),
        )
    }

    /// Polarity of edges originating from `database`.
    pub fn classify(&self, database: &str) -> Polarity {
        self.0
            .get(&database.to_lowercase())
            .copied()
            .unwrap_or(Polarity::Neutral)
    }

    fn normalize(&mut self) {
        let entries = std::mem::take(&mut self.0);
        self.0 = entries
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
    }
}

impl Default for PolarityTable {
    fn default() -> Self {
        PolarityTable::new([
            ("mirtarbase", Polarity::Inhibitory),
            ("mirtarbase6", Polarity::Inhibitory),
            ("tarbase", Polarity::Inhibitory),
            ("mirecords", Polarity::Inhibitory),
            ("regphos", Polarity::Activating),
        ])
    }
}

/// Complete static configuration of the expansion engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Threshold of the reserved id range; equal ids are the unknown entity.
    #[serde(default = "default_unknown_entity")]
    pub unknown_entity: SharedId,
    /// Symbol annotated on the unknown entity.
    #[serde(default = "default_unknown_entity_symbol")]
    pub unknown_entity_symbol: String,
    /// Namespace holding official symbols, used to re-resolve frontier nodes.
    #[serde(default = "default_symbol_namespace")]
    pub symbol_namespace: String,
    /// Databases queried when a restriction does not name any (None = all tables).
    #[serde(default)]
    pub query_databases: Option<BTreeSet<String>>,
    /// Interaction tables.
    #[serde(default)]
    pub tables: Vec<TableConfig>,
    /// Named interaction definitions.
    #[serde(default)]
    pub interactions: BTreeMap<String, InteractionDef>,
    /// Database -> polarity classification.
    #[serde(default)]
    pub polarity: PolarityTable,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            unknown_entity: DEFAULT_UNKNOWN_ENTITY,
            unknown_entity_symbol: default_unknown_entity_symbol(),
            symbol_namespace: default_symbol_namespace(),
            query_databases: None,
            tables: Vec::new(),
            interactions: BTreeMap::new(),
            polarity: PolarityTable::default(),
        }
    }
}

impl NetworkConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> NetResult<Self> {
        let mut config: NetworkConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> NetResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| NetError::Config {
            message: format!("cannot read {}: {}", path.display(), e),
            source: Some(Box::new(e)),
        })?;
        Self::from_toml_str(&text)
    }

    /// Check internal consistency and normalize lookup keys.
    pub fn validate(&mut self) -> NetResult<()> {
        let mut seen = BTreeSet::new();
        for table in &self.tables {
            if table.name.trim().is_empty() {
                return Err(NetError::config("table with empty name"));
            }
            if !seen.insert(table.name.to_lowercase()) {
                return Err(NetError::config(format!(
                    "duplicate table '{}'",
                    table.name
                )));
            }
        }
        for (name, def) in &self.interactions {
            if def.src.is_empty() || def.tgt.is_empty() {
                return Err(NetError::config(format!(
                    "interaction definition '{}' needs at least one src and one tgt type",
                    name
                )));
            }
        }
        if let Some(dbs) = &self.query_databases {
            for db in dbs {
                if self.table(db).is_none() {
                    return Err(NetError::config(format!(
                        "query database '{}' is not a configured table",
                        db
                    )));
                }
            }
        }
        if self.symbol_namespace.trim().is_empty() {
            return Err(NetError::config("symbol_namespace must not be empty"));
        }
        self.polarity.normalize();
        Ok(())
    }

    /// Look up a table by name (case-insensitive).
    pub fn table(&self, name: &str) -> Option<&TableConfig> {
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Molecule types mentioned by any table.
    pub fn molecule_types(&self) -> BTreeSet<MoleculeType> {
        self.tables.iter().flat_map(|t| [t.src, t.tgt]).collect()
    }

    /// Derive the molecule type -> role -> tables mapping.
    pub fn table_index(&self) -> TableIndex {
        let mut index: BTreeMap<MoleculeType, BTreeMap<Role, Vec<usize>>> = BTreeMap::new();
        for (i, table) in self.tables.iter().enumerate() {
            if table.is_symmetric() {
                index
                    .entry(table.src)
                    .or_default()
                    .entry(Role::TwoWay)
                    .or_default()
                    .push(i);
            } else {
                index
                    .entry(table.src)
                    .or_default()
                    .entry(Role::Src)
                    .or_default()
                    .push(i);
                index
                    .entry(table.tgt)
                    .or_default()
                    .entry(Role::Tgt)
                    .or_default()
                    .push(i);
            }
        }
        TableIndex { index }
    }
}

/// Molecule type -> role -> eligible table positions in [`NetworkConfig::tables`].
#[derive(Debug, Clone, Default)]
pub struct TableIndex {
    index: BTreeMap<MoleculeType, BTreeMap<Role, Vec<usize>>>,
}

impl TableIndex {
    /// Positions of the tables in which `hook` plays `role`.
    pub fn tables_for(&self, hook: MoleculeType, role: Role) -> &[usize] {
        self.index
            .get(&hook)
            .and_then(|roles| roles.get(&role))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
