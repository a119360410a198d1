//! Domain model for curated locations and query criteria.
//!
//! # Responsibility
//! - Define canonical data structures used by the store, engine and stats.
//! - Keep wire field names stable for tooling that reads them verbatim.
//!
//! # Invariants
//! - Every location is identified by a stable `LocationId`.
//! - Removal is a hard delete; there are no tombstones.

pub mod criteria;
pub mod location;
