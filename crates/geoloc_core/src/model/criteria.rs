//! Filter and sort criteria consumed by `query`.
//!
//! # Invariants
//! - Stored `FilterCriteria` is always normalized: trimmed `txt` and
//!   `min_rate` within `0..=5`.
//! - Absent `SortCriteria` means store (insertion) order.

use crate::model::location::MAX_RATE;
use serde::{Deserialize, Serialize};

/// Text/min-rating predicate applied before display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive name substring; empty matches all.
    pub txt: String,
    /// Inclusive lower bound on `rate`; `0` means unbounded.
    pub min_rate: u8,
}

impl FilterCriteria {
    pub fn new(txt: impl Into<String>, min_rate: i64) -> Self {
        Self {
            txt: txt.into(),
            min_rate: clamp_min_rate(min_rate),
        }
        .normalized()
    }

    /// Builds criteria from raw bootstrap parameters.
    ///
    /// A missing or unparseable `min_rate` falls back to `0`.
    pub fn from_params(txt: Option<&str>, min_rate: Option<&str>) -> Self {
        let min_rate = min_rate
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(0);
        Self::new(txt.unwrap_or_default(), min_rate)
    }

    /// Returns the criteria as they will actually be applied.
    pub fn normalized(self) -> Self {
        Self {
            txt: self.txt.trim().to_string(),
            min_rate: self.min_rate.min(MAX_RATE),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.txt.is_empty() && self.min_rate == 0
    }
}

fn clamp_min_rate(value: i64) -> u8 {
    // Fits in u8 after the clamp.
    value.clamp(0, i64::from(MAX_RATE)) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Rate,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "rate" => Some(Self::Rate),
            "createdat" | "created_at" | "created" => Some(Self::CreatedAt),
            "updatedat" | "updated_at" | "updated" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Rate => "rate",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Field + direction used to order the displayed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriteria {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortCriteria {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Parses an external `field` name plus a descending flag.
    ///
    /// Returns `None` for unknown fields, which callers treat as "no sort".
    pub fn parse(field: &str, descending: bool) -> Option<Self> {
        let field = SortField::parse(field)?;
        Some(if descending {
            Self::descending(field)
        } else {
            Self::ascending(field)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterCriteria, SortCriteria, SortDirection, SortField};

    #[test]
    fn from_params_defaults_unparseable_min_rate_to_zero() {
        let filter = FilterCriteria::from_params(Some(" osa "), Some("abc"));
        assert_eq!(filter.txt, "osa");
        assert_eq!(filter.min_rate, 0);

        let filter = FilterCriteria::from_params(None, None);
        assert!(filter.is_unbounded());
    }

    #[test]
    fn min_rate_is_clamped() {
        assert_eq!(FilterCriteria::new("", 9).min_rate, 5);
        assert_eq!(FilterCriteria::new("", -3).min_rate, 0);
        assert_eq!(FilterCriteria::from_params(None, Some("4")).min_rate, 4);
    }

    #[test]
    fn sort_parse_accepts_known_fields_only() {
        let sort = SortCriteria::parse("updatedAt", true).expect("known field");
        assert_eq!(sort.field, SortField::UpdatedAt);
        assert_eq!(sort.direction, SortDirection::Descending);
        assert!(SortCriteria::parse("address", false).is_none());
    }
}
