//! Core types for mirnet
//!
//! This crate defines the shared vocabulary of the workspace:
//! - SharedId: canonical entity key, with reserved complex/unknown ranges
//! - Alias, Namespace, Annotation: identifier records
//! - InteractionRow, Evidence, EdgeKey: interaction records
//! - Restriction structs for resolution, fetching and filtering
//! - NetworkConfig: static table/interaction/polarity configuration
//! - NetError: error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod restrict;
pub mod types;

pub use config::{
    InteractionDef, NetworkConfig, PolarityTable, TableConfig, TableIndex, DEFAULT_UNKNOWN_ENTITY,
};
pub use error::{NetError, NetResult};
pub use restrict::{
    AliasRestriction, ComplexFilterMode, GeneFilter, InteractionRestriction, ResolvedRestriction,
    Role,
};
pub use types::{
    lowercase_set, Alias, AnchorColumns, Annotation, EdgeKey, Evidence, IdClass, InteractionRow,
    MoleculeClass, MoleculeType, Namespace, NamespaceId, Polarity, RawInteraction, SharedId,
    TaxonId,
};
