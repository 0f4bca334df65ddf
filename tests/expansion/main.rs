//! Expansion Test Suite
//!
//! Cross-crate tests driving the public API against a JSON dataset loaded
//! into the in-memory store.
//!
//! ## Modules
//!
//! - **scenarios**: end-to-end networks with known shape
//! - **properties**: resolver idempotence, partition totality, funneling
//! - **termination**: round limits, deduplication, tag stability, failures
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test expansion
//! ```

mod fixtures;

mod properties;
mod scenarios;
mod termination;
