//! Resource entities and their transport representations.
//!
//! # Responsibility
//! - Define the stored entity shapes (`City`, `PointOfInterest`, members).
//! - Define the DTOs handed to transport layers and the entity-to-DTO mapping.
//!
//! # Invariants
//! - Entities own all their data, so structural copies never alias.
//! - Every entity implements `DeepCopy` explicitly, field by field.

pub mod city;
pub mod member;
