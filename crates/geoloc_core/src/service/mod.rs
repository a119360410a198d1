//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store reads/writes, query engine and aggregators.
//! - Keep presentation layers decoupled from storage details.

pub mod location_service;
pub mod seed;
