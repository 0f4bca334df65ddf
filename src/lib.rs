//! mirnet: identifier resolution and shell-by-shell interaction network
//! expansion.
//!
//! This facade re-exports the workspace crates:
//! - [`mirnet_core`]: identifiers, records, restrictions, configuration, errors
//! - [`mirnet_store`]: the record store contract and the in-memory adapter
//! - [`mirnet_engine`]: resolver, fetcher, materializer, graph and expansion driver
//!
//! ```ignore
//! use mirnet::{expand_network, ExpansionOptions, MemoryStore, NetworkConfig};
//!
//! let config = NetworkConfig::from_path("mirnet.toml")?;
//! let store = MemoryStore::from_path("dataset.json")?;
//! let outcome = expand_network(&store, &config, ["TP53"], 1, &ExpansionOptions::new())?;
//! println!("{}", outcome.graph.snapshot().to_json()?);
//! ```

pub use mirnet_core;
pub use mirnet_engine;
pub use mirnet_store;

pub use mirnet_core::{
    AliasRestriction, ComplexFilterMode, GeneFilter, InteractionRestriction, MoleculeClass,
    MoleculeType, NetError, NetResult, NetworkConfig, Polarity, SharedId,
};
pub use mirnet_engine::{
    expand_network, AliasResolver, ExpansionOptions, ExpansionOutcome, ExpansionReport,
    ExpansionStatus, GraphSnapshot, InteractionGraph, Resolution,
};
pub use mirnet_store::{Dataset, MemoryStore, RecordStore};
