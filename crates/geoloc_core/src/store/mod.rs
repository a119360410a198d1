//! Durable location storage.
//!
//! # Responsibility
//! - Define the CRUD contract the facade depends on.
//! - Isolate SQLite details from query, stats and service code.
//!
//! # Invariants
//! - Store writes validate records before persistence.
//! - Store APIs return semantic errors (`NotFound`, `Validation`) next to
//!   storage transport errors.

pub mod location_store;
