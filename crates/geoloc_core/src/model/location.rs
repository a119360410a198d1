//! Location domain model.
//!
//! # Responsibility
//! - Define the canonical geo-tagged record curated by the user.
//! - Validate record invariants before any persistence happens.
//!
//! # Invariants
//! - `id` is stable and never reused for another location.
//! - `name` is non-empty after trimming.
//! - `rate` is within `1..=5`.
//! - `created_at <= updated_at`; equality means "never updated".

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one location record.
pub type LocationId = Uuid;

pub const MIN_RATE: u8 = 1;
pub const MAX_RATE: u8 = 5;
pub const MAX_ZOOM: u32 = 22;

/// Validation failures for location drafts, patches and persisted rows.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationValidationError {
    EmptyName,
    RateOutOfRange(i64),
    InvalidLatitude(f64),
    InvalidLongitude(f64),
    InvalidZoom(u32),
    /// `updated_at` precedes `created_at`.
    TimestampOrder { created_at: i64, updated_at: i64 },
}

impl Display for LocationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "location name cannot be empty"),
            Self::RateOutOfRange(rate) => {
                write!(f, "rate ({rate}) must be within {MIN_RATE}..={MAX_RATE}")
            }
            Self::InvalidLatitude(lat) => write!(f, "latitude ({lat}) must be within -90..=90"),
            Self::InvalidLongitude(lng) => {
                write!(f, "longitude ({lng}) must be within -180..=180")
            }
            Self::InvalidZoom(zoom) => write!(f, "zoom ({zoom}) must be within 0..={MAX_ZOOM}"),
            Self::TimestampOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "updatedAt ({updated_at}) must be >= createdAt ({created_at})"
            ),
        }
    }
}

impl Error for LocationValidationError {}

/// Geographic anchor of a location, as produced by the map collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geo {
    pub lat: f64,
    pub lng: f64,
    /// Free-form address from geocoding; may be empty.
    #[serde(default)]
    pub address: String,
    pub zoom: u32,
}

impl Geo {
    pub fn new(lat: f64, lng: f64, address: impl Into<String>, zoom: u32) -> Self {
        Self {
            lat,
            lng,
            address: address.into(),
            zoom,
        }
    }

    pub fn validate(&self) -> Result<(), LocationValidationError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(LocationValidationError::InvalidLatitude(self.lat));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(LocationValidationError::InvalidLongitude(self.lng));
        }
        if self.zoom > MAX_ZOOM {
            return Err(LocationValidationError::InvalidZoom(self.zoom));
        }
        Ok(())
    }
}

/// Canonical stored location record.
///
/// Timestamps are Unix epoch milliseconds assigned by the store, never by
/// callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "LocationWire")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub rate: u8,
    pub geo: Geo,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Location {
    /// Checks every record invariant.
    pub fn validate(&self) -> Result<(), LocationValidationError> {
        validate_name(&self.name)?;
        validate_rate(i64::from(self.rate))?;
        self.geo.validate()?;
        if self.updated_at < self.created_at {
            return Err(LocationValidationError::TimestampOrder {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Returns whether this record was mutated after creation.
    pub fn was_updated(&self) -> bool {
        self.updated_at != self.created_at
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationWire {
    id: LocationId,
    name: String,
    rate: u8,
    geo: Geo,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<LocationWire> for Location {
    type Error = LocationValidationError;

    fn try_from(value: LocationWire) -> Result<Self, Self::Error> {
        let location = Location {
            id: value.id,
            name: value.name,
            rate: value.rate,
            geo: value.geo,
            created_at: value.created_at,
            updated_at: value.updated_at,
        };
        location.validate()?;
        Ok(location)
    }
}

/// Save input. `id = None` creates, `id = Some(..)` replaces the mutable
/// fields of an existing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDraft {
    #[serde(default)]
    pub id: Option<LocationId>,
    pub name: String,
    pub rate: u8,
    pub geo: Geo,
}

impl LocationDraft {
    pub fn new(name: impl Into<String>, rate: u8, geo: Geo) -> Self {
        Self {
            id: None,
            name: name.into(),
            rate,
            geo,
        }
    }

    /// Targets an existing record for full replacement on save.
    pub fn with_id(mut self, id: LocationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Normalizes the draft and checks field invariants.
    ///
    /// Returns the trimmed draft so callers persist exactly what was checked.
    pub fn validated(mut self) -> Result<Self, LocationValidationError> {
        self.name = self.name.trim().to_string();
        validate_name(&self.name)?;
        validate_rate(i64::from(self.rate))?;
        self.geo.validate()?;
        Ok(self)
    }

    /// Converts the mutable fields into a full-replacement patch.
    pub fn into_patch(self) -> LocationPatch {
        LocationPatch {
            name: Some(self.name),
            rate: Some(self.rate),
            geo: Some(self.geo),
        }
    }
}

/// Partial update merged into an existing record. `None` keeps the
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPatch {
    pub name: Option<String>,
    pub rate: Option<u8>,
    pub geo: Option<Geo>,
}

impl LocationPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.rate.is_none() && self.geo.is_none()
    }

    /// Produces the merged record without touching timestamps.
    ///
    /// # Errors
    /// - Returns a validation error when the merged record breaks an
    ///   invariant; `existing` is left untouched.
    pub fn apply_to(&self, existing: &Location) -> Result<Location, LocationValidationError> {
        let mut merged = existing.clone();
        if let Some(name) = &self.name {
            merged.name = name.trim().to_string();
        }
        if let Some(rate) = self.rate {
            merged.rate = rate;
        }
        if let Some(geo) = &self.geo {
            merged.geo = geo.clone();
        }
        validate_name(&merged.name)?;
        validate_rate(i64::from(merged.rate))?;
        merged.geo.validate()?;
        Ok(merged)
    }
}

fn validate_name(name: &str) -> Result<(), LocationValidationError> {
    if name.trim().is_empty() {
        return Err(LocationValidationError::EmptyName);
    }
    Ok(())
}

pub(crate) fn validate_rate(rate: i64) -> Result<(), LocationValidationError> {
    if !(i64::from(MIN_RATE)..=i64::from(MAX_RATE)).contains(&rate) {
        return Err(LocationValidationError::RateOutOfRange(rate));
    }
    Ok(())
}
