//! Core engine for a curated collection of geo-tagged locations.
//! This crate is the single source of truth for location invariants.

pub mod clock;
pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod service;
pub mod stats;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use engine::filter_sort::apply;
pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::criteria::{FilterCriteria, SortCriteria, SortDirection, SortField};
pub use model::location::{
    Geo, Location, LocationDraft, LocationId, LocationPatch, LocationValidationError,
};
pub use service::location_service::{LocationService, LocationStats};
pub use service::seed::demo_locations;
pub use stats::legend::{legend, LegendSlice};
pub use stats::rating::{RatingBands, RatingStats};
pub use stats::recency::{RecencyPolicy, RecencyStats};
pub use store::location_store::{LocationStore, SqliteLocationStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
