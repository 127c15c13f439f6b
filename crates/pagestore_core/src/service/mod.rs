//! Use-case services on top of repositories.
//!
//! # Responsibility
//! - Translate caller-facing list parameters into validated page requests.
//! - Map entities to transport DTOs.
//!
//! # Invariants
//! - Services never bypass repository validation.
//! - Page-size clamping happens here, never inside the paginator.

pub mod city_service;
