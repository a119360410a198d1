//! Pure filter and sort transform over location sequences.
//!
//! # Invariants
//! - Output order is deterministic for identical inputs.
//! - Sorting is stable: equal keys keep their input order in both
//!   directions.
//! - No sort criteria means input order passes through unchanged.

use crate::model::criteria::{FilterCriteria, SortCriteria, SortDirection, SortField};
use crate::model::location::Location;
use std::cmp::Ordering;

/// Filters then sorts `locations`.
///
/// A location is kept iff `rate >= filter.min_rate` and, for non-empty
/// `filter.txt`, its lowercased name contains the lowercased `txt`. The
/// text is taken as given; normalizing it is the caller's concern.
pub fn apply(
    locations: Vec<Location>,
    filter: &FilterCriteria,
    sort: Option<&SortCriteria>,
) -> Vec<Location> {
    let mut kept = locations;
    if !filter.is_unbounded() {
        let needle = filter.txt.to_lowercase();
        kept.retain(|location| {
            location.rate >= filter.min_rate
                && (needle.is_empty() || location.name.to_lowercase().contains(&needle))
        });
    }

    if let Some(sort) = sort {
        // `sort_by` is a stable merge sort.
        kept.sort_by(|a, b| compare(a, b, sort));
    }

    kept
}

/// Orders two locations by the sort field, reversed for descending.
pub fn compare(a: &Location, b: &Location, sort: &SortCriteria) -> Ordering {
    let ordering = match sort.field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Rate => a.rate.cmp(&b.rate),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };

    match sort.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::apply;
    use crate::clock::HOUR_MS;
    use crate::model::criteria::{FilterCriteria, SortCriteria, SortField};
    use crate::model::location::{Geo, Location};
    use uuid::Uuid;

    const T: i64 = 1_700_000_000_000;

    fn location(name: &str, rate: u8, created_at: i64, updated_at: i64) -> Location {
        Location {
            id: Uuid::new_v4(),
            name: name.to_string(),
            rate,
            geo: Geo::new(0.0, 0.0, "", 10),
            created_at,
            updated_at,
        }
    }

    fn names(locations: &[Location]) -> Vec<&str> {
        locations.iter().map(|loc| loc.name.as_str()).collect()
    }

    #[test]
    fn filters_by_text_case_insensitively() {
        let list = vec![
            location("Tokyo", 5, T, T),
            location("Osaka", 2, T - 48 * HOUR_MS, T - HOUR_MS),
        ];
        let result = apply(list, &FilterCriteria::new("osa", 0), None);
        assert_eq!(names(&result), vec!["Osaka"]);
    }

    #[test]
    fn filters_by_min_rate() {
        let list = vec![
            location("Tokyo", 5, T, T),
            location("Osaka", 2, T - 48 * HOUR_MS, T - HOUR_MS),
        ];
        let result = apply(list, &FilterCriteria::new("", 3), None);
        assert_eq!(names(&result), vec!["Tokyo"]);
    }

    #[test]
    fn text_is_matched_literally() {
        let list = vec![location("a.c", 3, T, T), location("abc", 3, T, T)];
        let result = apply(list, &FilterCriteria::new(".", 0), None);
        assert_eq!(names(&result), vec!["a.c"]);
    }

    #[test]
    fn whitespace_in_text_is_part_of_the_needle() {
        let list = vec![location("New York", 3, T, T), location("Tokyo", 3, T, T)];

        let spaced = FilterCriteria {
            txt: " ".to_string(),
            min_rate: 0,
        };
        assert_eq!(names(&apply(list.clone(), &spaced, None)), vec!["New York"]);

        let trailing = FilterCriteria {
            txt: "tokyo ".to_string(),
            min_rate: 0,
        };
        assert!(apply(list, &trailing, None).is_empty());
    }

    #[test]
    fn case_folding_is_consistent_for_long_and_non_ascii_needles() {
        let long_name = "Ä".repeat(64);
        let list = vec![
            location("STRASSE am Ölberg", 3, T, T),
            location(&long_name, 3, T, T),
        ];

        let umlaut = apply(list.clone(), &FilterCriteria::new("ölberg", 0), None);
        assert_eq!(names(&umlaut), vec!["STRASSE am Ölberg"]);

        let long = apply(list, &FilterCriteria::new("ä".repeat(64), 0), None);
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].name, long_name);
    }

    #[test]
    fn no_sort_keeps_input_order() {
        let list = vec![
            location("b", 1, T, T),
            location("a", 5, T, T),
            location("c", 3, T, T),
        ];
        let result = apply(list, &FilterCriteria::default(), None);
        assert_eq!(names(&result), vec!["b", "a", "c"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys_in_both_directions() {
        let list = vec![
            location("first", 3, T, T),
            location("high", 5, T, T),
            location("second", 3, T, T),
            location("third", 3, T, T),
        ];

        let asc = apply(
            list.clone(),
            &FilterCriteria::default(),
            Some(&SortCriteria::ascending(SortField::Rate)),
        );
        assert_eq!(names(&asc), vec!["first", "second", "third", "high"]);

        let desc = apply(
            list,
            &FilterCriteria::default(),
            Some(&SortCriteria::descending(SortField::Rate)),
        );
        assert_eq!(names(&desc), vec!["high", "first", "second", "third"]);
    }

    #[test]
    fn sorts_by_name_ignoring_case() {
        let list = vec![
            location("tokyo", 1, T, T),
            location("Berlin", 1, T, T),
            location("amsterdam", 1, T, T),
        ];
        let result = apply(
            list,
            &FilterCriteria::default(),
            Some(&SortCriteria::ascending(SortField::Name)),
        );
        assert_eq!(names(&result), vec!["amsterdam", "Berlin", "tokyo"]);
    }

    #[test]
    fn sorts_by_updated_at_descending() {
        let list = vec![
            location("old", 1, T - 10, T - 5),
            location("new", 1, T - 10, T),
            location("mid", 1, T - 10, T - 2),
        ];
        let result = apply(
            list,
            &FilterCriteria::default(),
            Some(&SortCriteria::descending(SortField::UpdatedAt)),
        );
        assert_eq!(names(&result), vec!["new", "mid", "old"]);
    }
}
