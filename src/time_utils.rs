// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a UTC timestamp as "<Month> <Day>", e.g. "April 14".
pub fn format_month_day(date: DateTime<Utc>) -> String {
    date.format("%B %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_month_day_has_no_padding() {
        let date = Utc.with_ymd_and_hms(2024, 4, 4, 23, 59, 0).unwrap();
        assert_eq!(format_month_day(date), "April 4");
    }

    #[test]
    fn test_format_utc_rfc3339() {
        let date = Utc.with_ymd_and_hms(2024, 12, 31, 8, 5, 9).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2024-12-31T08:05:09Z");
    }
}
