//! Rating tier aggregation.
//!
//! # Invariants
//! - Tiers partition `1..=5`: `low = 1..=low_max`,
//!   `medium = low_max+1..=medium_max`, `high = medium_max+1..=5`.
//! - `total` equals the number of aggregated locations.

use crate::config::ConfigError;
use crate::model::location::{Location, MAX_RATE, MIN_RATE};
use serde::{Deserialize, Serialize};

/// Configurable tier boundaries. Defaults to low=1-2, medium=3, high=4-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatingBands {
    /// Highest rate counted as `low`.
    pub low_max: u8,
    /// Highest rate counted as `medium`.
    pub medium_max: u8,
}

impl Default for RatingBands {
    fn default() -> Self {
        Self {
            low_max: 2,
            medium_max: 3,
        }
    }
}

impl RatingBands {
    pub fn new(low_max: u8, medium_max: u8) -> Result<Self, ConfigError> {
        let bands = Self {
            low_max,
            medium_max,
        };
        bands.validate()?;
        Ok(bands)
    }

    /// Every tier must own at least one rate value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.low_max < MIN_RATE || self.low_max >= self.medium_max || self.medium_max >= MAX_RATE
        {
            return Err(ConfigError::InvalidRatingBands {
                low_max: self.low_max,
                medium_max: self.medium_max,
            });
        }
        Ok(())
    }

    pub fn tier_of(&self, rate: u8) -> RatingTier {
        if rate <= self.low_max {
            RatingTier::Low
        } else if rate <= self.medium_max {
            RatingTier::Medium
        } else {
            RatingTier::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingStats {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub total: usize,
}

impl RatingStats {
    /// Bucket counts in display order, without `total`.
    pub fn buckets(&self) -> [(&'static str, usize); 3] {
        [
            ("low", self.low),
            ("medium", self.medium),
            ("high", self.high),
        ]
    }
}

/// Counts `locations` per rating tier in a single pass.
///
/// The caller decides which view (filtered or not) is aggregated.
pub fn aggregate(locations: &[Location], bands: &RatingBands) -> RatingStats {
    let mut stats = RatingStats::default();
    for location in locations {
        match bands.tier_of(location.rate) {
            RatingTier::Low => stats.low += 1,
            RatingTier::Medium => stats.medium += 1,
            RatingTier::High => stats.high += 1,
        }
        stats.total += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::{aggregate, RatingBands, RatingStats, RatingTier};
    use crate::model::location::{Geo, Location};
    use uuid::Uuid;

    fn rated(rate: u8) -> Location {
        Location {
            id: Uuid::new_v4(),
            name: format!("rated {rate}"),
            rate,
            geo: Geo::new(1.0, 2.0, "", 5),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn empty_sequence_yields_zero_stats() {
        assert_eq!(
            aggregate(&[], &RatingBands::default()),
            RatingStats::default()
        );
    }

    #[test]
    fn default_bands_split_low_medium_high() {
        let locations: Vec<_> = [1, 2, 3, 4, 5, 5].into_iter().map(rated).collect();
        let stats = aggregate(&locations, &RatingBands::default());
        assert_eq!(
            stats,
            RatingStats {
                low: 2,
                medium: 1,
                high: 3,
                total: 6
            }
        );
    }

    #[test]
    fn custom_bands_move_boundaries() {
        let bands = RatingBands::new(1, 3).expect("valid bands");
        assert_eq!(bands.tier_of(2), RatingTier::Medium);
        assert_eq!(bands.tier_of(4), RatingTier::High);
    }

    #[test]
    fn bands_reject_empty_tiers() {
        assert!(RatingBands::new(0, 3).is_err());
        assert!(RatingBands::new(3, 3).is_err());
        assert!(RatingBands::new(2, 5).is_err());
    }
}
