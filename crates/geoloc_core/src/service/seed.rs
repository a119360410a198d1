//! Demo records used to populate an empty store at startup.

use crate::model::location::{Geo, LocationDraft};

pub fn demo_locations() -> Vec<LocationDraft> {
    vec![
        LocationDraft::new(
            "Ben Gurion Airport",
            2,
            Geo::new(32.0004465, 34.8706095, "Airport, Lod, Israel", 12),
        ),
        LocationDraft::new(
            "Dekel Beach",
            4,
            Geo::new(29.5393848, 34.9457792, "Dekel Beach, Eilat, Israel", 15),
        ),
        LocationDraft::new(
            "Dahab, Egypt",
            5,
            Geo::new(28.5096676, 34.5165187, "Dahab, South Sinai, Egypt", 11),
        ),
        LocationDraft::new(
            "Tokyo Tower",
            3,
            Geo::new(35.6585805, 139.7454329, "4 Chome-2-8 Shibakoen, Minato City, Tokyo", 16),
        ),
    ]
}
