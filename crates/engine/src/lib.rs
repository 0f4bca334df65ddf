//! Expansion engine for mirnet
//!
//! This crate turns seed identifiers into an interaction network:
//! - resolver: aliases to shared ids, with funneling and ambiguity tracking
//! - fetcher: table selection and interaction retrieval per anchor set
//! - materializer: node classification, filtering, complex decomposition
//! - graph: the append-only network and its exports
//! - expansion: the shell-by-shell driver

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod expansion;
pub mod fetcher;
pub mod graph;
pub mod materializer;
pub mod resolver;

#[cfg(test)]
mod fixtures;

pub use expansion::{
    expand_network, ExpansionOptions, ExpansionOutcome, ExpansionReport, ExpansionStatus,
    RoundStats,
};
pub use fetcher::{validate_row, InteractionFetcher};
pub use graph::{
    Direction, Edge, EdgeData, EdgeKind, GraphSnapshot, InteractionGraph, Neighbor, NodeData,
};
pub use materializer::{classify, is_mirna_symbol, Materialized, Materializer, NodeFilter};
pub use resolver::{AliasListing, AliasResolver, Annotated, Outcome, Resolution};
