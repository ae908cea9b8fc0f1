// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for time-of-day routing logic and timestamp formatting.

use chrono::{DateTime, Local, SecondsFormat, Timelike, Utc};

/// Quiet hours: early morning (0-7), mid-morning lull (10-11),
/// mid-afternoon lull (15-16) and late evening (22-23).
///
/// During these windows the city is assumed quiet enough that the
/// fastest route is also an acceptable quiet route.
pub fn is_quiet_hour(hour: u32) -> bool {
    matches!(hour, 0..=7 | 10..=11 | 15..=16 | 22..=23)
}

/// Resolve the hour to use for routing: a manually requested hour wins,
/// otherwise the local wall clock.
pub fn effective_hour(requested: Option<u32>) -> u32 {
    match requested {
        Some(h) => h.min(23),
        None => Local::now().hour(),
    }
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_hours_full_table() {
        let quiet = [0, 1, 2, 3, 4, 5, 6, 7, 10, 11, 15, 16, 22, 23];
        for hour in 0..24 {
            assert_eq!(
                is_quiet_hour(hour),
                quiet.contains(&hour),
                "hour {} misclassified",
                hour
            );
        }
    }

    #[test]
    fn test_effective_hour_prefers_request() {
        assert_eq!(effective_hour(Some(13)), 13);
    }

    #[test]
    fn test_effective_hour_clamps() {
        assert_eq!(effective_hour(Some(99)), 23);
    }

    #[test]
    fn test_effective_hour_from_clock_in_range() {
        let hour = effective_hour(None);
        assert!(hour < 24);
    }
}
