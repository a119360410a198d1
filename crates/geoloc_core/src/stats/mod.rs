//! Aggregate statistics over location sequences.
//!
//! # Responsibility
//! - Bucket locations by rating tier and by recency of last update.
//! - Produce legend breakdowns renderers can draw directly.
//!
//! # Invariants
//! - Aggregation never fails on well-formed input; empty input is all zeros.
//! - Every aggregated location lands in exactly one bucket.

pub mod legend;
pub mod rating;
pub mod recency;
