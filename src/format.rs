// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Display formatting for durations, distances, paces and timestamps.
//!
//! These mirror what the dashboard shows, so the terminal report and the
//! website agree on how the same number reads. All functions are pure;
//! relative-time formatting takes `now` as an argument instead of reading
//! the clock.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};

use crate::constants::aggregation::PADDING_SENTINEL;

/// Human-readable duration: `"2hr 15m 45s"`, `"30m"`, `"45s"`.
///
/// Units that are zero are omitted, except that a zero (or negative)
/// duration reads `"0s"`.
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "0s".to_string();
    }

    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;

    let mut result = String::new();
    if h > 0 {
        result.push_str(&format!("{}hr ", h));
    }
    if m > 0 {
        result.push_str(&format!("{}m ", m));
    }
    if s > 0 || result.is_empty() {
        result.push_str(&format!("{}s", s));
    }

    result.trim_end().to_string()
}

/// Kilometers with two decimals: `"12.34 km"`. Negative input floors to
/// `"0.00 km"`.
pub fn format_distance(meters: f64) -> String {
    if meters < 0.0 {
        return "0.00 km".to_string();
    }
    format!("{:.2} km", meters / 1000.0)
}

/// Meters to kilometers rounded to two decimals, as a number.
pub fn distance_in_km(meters: f64) -> f64 {
    (meters / 1000.0 * 100.0).round() / 100.0
}

/// Pace as `"M:SS min/km"`. Negative input floors to `"0:00 min/km"`;
/// paces over an hour stay in minutes (`"61:00 min/km"`).
pub fn format_pace(seconds_per_km: f64) -> String {
    if seconds_per_km < 0.0 {
        return "0:00 min/km".to_string();
    }
    let minutes = (seconds_per_km / 60.0).floor() as i64;
    let seconds = (seconds_per_km % 60.0).floor() as i64;
    format!("{}:{:02} min/km", minutes, seconds)
}

/// Coarse "how long ago": `"3 days 5hr ago"`, `"2hr 30min ago"`,
/// `"5min ago"`, `"just now"`. Future instants read `"just now"`.
pub fn format_relative_time<T: TimeZone>(date: &DateTime<T>, now: &DateTime<T>) -> String {
    let diff_seconds = now.clone().signed_duration_since(date.clone()).num_seconds();
    let diff_minutes = diff_seconds / 60;
    let diff_hours = diff_minutes / 60;
    let diff_days = diff_hours / 24;

    if diff_days > 0 {
        let remaining_hours = diff_hours % 24;
        let plural = if diff_days > 1 { "s" } else { "" };
        format!("{} day{} {}hr ago", diff_days, plural, remaining_hours)
    } else if diff_hours > 0 {
        format!("{}hr {}min ago", diff_hours, diff_minutes % 60)
    } else if diff_minutes > 0 {
        format!("{}min ago", diff_minutes)
    } else {
        "just now".to_string()
    }
}

/// Workout heading like `"Friday at 6:55 PM"`, in whatever timezone the
/// caller already converted the instant to.
pub fn format_workout_datetime<T: TimeZone>(date: &DateTime<T>) -> String {
    let weekday = match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    };
    let (is_pm, hour) = date.hour12();
    let meridiem = if is_pm { "PM" } else { "AM" };
    format!("{} at {}:{:02} {}", weekday, hour, date.minute(), meridiem)
}

/// Intensity bucket for one heat-map cell.
///
/// `None` for the transparent padding sentinel, `Some(0)` for a day with no
/// activity, otherwise `Some(1..=4)`: the same four gradient segments the
/// dashboard uses, with its 1.2 weighting exponent biasing mid-range days
/// toward the darker end.
pub fn heat_level(n: f64, min: f64, max: f64) -> Option<u8> {
    if n == PADDING_SENTINEL {
        return None;
    }
    if n == 0.0 {
        return Some(0);
    }

    let span = max - min;
    let ratio = if span > 0.0 {
        ((n - min) / span).powf(1.2)
    } else {
        1.0
    };
    let segment = ((ratio / 0.25).floor() as i64).clamp(0, 3);
    Some(1 + segment as u8)
}
