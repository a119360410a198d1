//! Plain-text rendering of query results and stats.

use geoloc_core::clock::{DAY_MS, HOUR_MS};
use geoloc_core::{legend, Location, LocationId, LocationStats};

const MINUTE_MS: i64 = 60 * 1000;

/// Human-readable age of `timestamp_ms` relative to `now_ms`.
pub fn elapsed_label(timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed = now_ms.saturating_sub(timestamp_ms).max(0);
    if elapsed < MINUTE_MS {
        "just now".to_string()
    } else if elapsed < HOUR_MS {
        plural(elapsed / MINUTE_MS, "minute")
    } else if elapsed < DAY_MS {
        plural(elapsed / HOUR_MS, "hour")
    } else {
        plural(elapsed / DAY_MS, "day")
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

pub fn stars(rate: u8) -> String {
    "★".repeat(usize::from(rate))
}

pub fn location_line(location: &Location, selected: Option<LocationId>, now_ms: i64) -> String {
    let marker = if selected == Some(location.id) { '>' } else { ' ' };
    let mut line = format!(
        "{marker} {} {}  [{}]\n    Created: {}",
        location.name,
        stars(location.rate),
        location.id,
        elapsed_label(location.created_at, now_ms)
    );
    if location.was_updated() {
        line.push_str(&format!(
            " | Updated: {}",
            elapsed_label(location.updated_at, now_ms)
        ));
    }
    line
}

pub fn location_detail(location: &Location) -> String {
    format!(
        "{}\n  rate:    {} ({})\n  address: {}\n  geo:     {:.6}, {:.6} (zoom {})\n  id:      {}",
        location.name,
        stars(location.rate),
        location.rate,
        location.geo.address,
        location.geo.lat,
        location.geo.lng,
        location.geo.zoom,
        location.id
    )
}

pub fn stats_block(stats: &LocationStats) -> String {
    let mut out = String::new();
    out.push_str(&breakdown(
        "By rating",
        &stats.rating.buckets(),
        stats.rating.total,
    ));
    out.push('\n');
    out.push_str(&breakdown(
        "By last update",
        &stats.recency.buckets(),
        stats.recency.total,
    ));
    out
}

fn breakdown(title: &str, buckets: &[(&'static str, usize)], total: usize) -> String {
    let mut out = format!("{title} (total {total})\n");
    let slices = legend(buckets, total);
    if slices.is_empty() {
        out.push_str("  no locations\n");
    }
    for slice in slices {
        out.push_str(&format!(
            "  {:<7} {:>4}  {:>3}%-{:>3}%\n",
            slice.label, slice.count, slice.start_percent, slice.end_percent
        ));
    }
    out
}
