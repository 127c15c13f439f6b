//! In-memory keyed storage.
//!
//! # Responsibility
//! - Hold entities in memory keyed by integer identifier.
//! - Act as the unit of storage the paging layer draws pages from.
//!
//! # Invariants
//! - Keys are unique; a duplicate `add` never overwrites.
//! - Iteration order is ascending key order.

pub mod keyed_store;
