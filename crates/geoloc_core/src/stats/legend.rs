//! Proportional breakdown of bucket counts for chart legends.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendSlice {
    pub label: &'static str,
    pub count: usize,
    /// Cumulative start, in whole percent.
    pub start_percent: u32,
    /// Cumulative end, in whole percent. The last slice ends at 100.
    pub end_percent: u32,
}

/// Builds cumulative percentage ranges over non-empty buckets.
///
/// `total` is authoritative for the percentages. Zero-count buckets are
/// skipped and an empty `total` yields no slices.
pub fn legend(buckets: &[(&'static str, usize)], total: usize) -> Vec<LegendSlice> {
    if total == 0 {
        return Vec::new();
    }

    let visible: Vec<(&'static str, usize)> = buckets
        .iter()
        .copied()
        .filter(|(_, count)| *count > 0)
        .collect();
    let mut slices = Vec::with_capacity(visible.len());
    let mut cursor = 0_u32;

    for (idx, &(label, count)) in visible.iter().enumerate() {
        let end = if idx + 1 == visible.len() {
            100
        } else {
            (cursor + percent_of(count, total)).min(100)
        };
        slices.push(LegendSlice {
            label,
            count,
            start_percent: cursor,
            end_percent: end,
        });
        cursor = end;
    }

    slices
}

fn percent_of(count: usize, total: usize) -> u32 {
    // Bounded by 100 for count <= total.
    ((count as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::legend;

    #[test]
    fn skips_zero_buckets_and_closes_at_hundred() {
        let slices = legend(&[("low", 1), ("medium", 0), ("high", 2)], 3);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "low");
        assert_eq!((slices[0].start_percent, slices[0].end_percent), (0, 33));
        assert_eq!(slices[1].label, "high");
        assert_eq!((slices[1].start_percent, slices[1].end_percent), (33, 100));
    }

    #[test]
    fn empty_total_has_no_slices() {
        assert!(legend(&[("today", 0), ("past", 0)], 0).is_empty());
    }
}
