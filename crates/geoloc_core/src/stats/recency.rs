//! Recency aggregation by time since last update.
//!
//! Each location is classified exactly once:
//! 1. `never` when `updated_at == created_at`;
//! 2. `today` when `now - updated_at < window`;
//! 3. `past` otherwise.
//!
//! `now` is an argument so one call is one consistent snapshot.

use crate::clock::DAY_MS;
use crate::config::ConfigError;
use crate::model::location::Location;
use serde::{Deserialize, Serialize};

/// Width of the `today` bucket. Defaults to 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecencyPolicy {
    pub window_ms: i64,
}

impl Default for RecencyPolicy {
    fn default() -> Self {
        Self { window_ms: DAY_MS }
    }
}

impl RecencyPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_ms <= 0 {
            return Err(ConfigError::InvalidRecencyWindow(self.window_ms));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyBucket {
    Today,
    Past,
    Never,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyStats {
    pub today: usize,
    pub past: usize,
    pub never: usize,
    pub total: usize,
}

impl RecencyStats {
    /// Bucket counts in display order, without `total`.
    pub fn buckets(&self) -> [(&'static str, usize); 3] {
        [
            ("today", self.today),
            ("past", self.past),
            ("never", self.never),
        ]
    }
}

/// Classifies one location against a fixed `now`.
///
/// A record whose `updated_at` precedes `created_at` breaks the model
/// contract: it trips a debug assertion and counts as `never` otherwise.
pub fn classify(location: &Location, now_ms: i64, policy: &RecencyPolicy) -> RecencyBucket {
    debug_assert!(
        location.updated_at >= location.created_at,
        "location {} has updated_at before created_at",
        location.id
    );
    if location.updated_at <= location.created_at {
        RecencyBucket::Never
    } else if now_ms.saturating_sub(location.updated_at) < policy.window_ms {
        RecencyBucket::Today
    } else {
        RecencyBucket::Past
    }
}

pub fn aggregate(locations: &[Location], now_ms: i64, policy: &RecencyPolicy) -> RecencyStats {
    let mut stats = RecencyStats::default();
    for location in locations {
        match classify(location, now_ms, policy) {
            RecencyBucket::Today => stats.today += 1,
            RecencyBucket::Past => stats.past += 1,
            RecencyBucket::Never => stats.never += 1,
        }
    }
    stats.total = stats.today + stats.past + stats.never;
    stats
}
