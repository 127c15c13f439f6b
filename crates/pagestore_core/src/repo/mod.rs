//! Repository contracts and implementations for city resources.
//!
//! # Responsibility
//! - Define use-case oriented data access for cities.
//! - Provide an in-memory implementation over `KeyedStore` and a SQLite
//!   implementation whose list query counts and slices in SQL.
//!
//! # Invariants
//! - Write paths call `City::validate()` before mutating anything.
//! - A duplicate city id is `StoreError::DuplicateKey` for every backend.
//! - Page items never carry points of interest.

pub mod city_repo;
