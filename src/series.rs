// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Heat-map Series
//!
//! Turns the distance map into the ordered `[timestamp, meters]` series the
//! heat-map renders: one point per day at local midnight in the reference
//! timezone, ascending, padded backwards to the nearest Sunday so the first
//! rendered column is a full week.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::aggregator::DistanceMap;
use crate::constants::aggregation::PADDING_SENTINEL;

/// One heat-map cell, serialized as `[unix_millis, meters]`.
///
/// The value `-1.0` marks alignment padding the renderer draws transparent;
/// real distances are non-negative, so the sentinel is unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint(pub i64, pub f64);

impl SeriesPoint {
    pub fn timestamp_millis(&self) -> i64 {
        self.0
    }

    pub fn meters(&self) -> f64 {
        self.1
    }

    pub fn is_padding(&self) -> bool {
        self.1 == PADDING_SENTINEL
    }
}

/// Build the ordered series from the distance map.
///
/// Points come out ascending by timestamp. When the earliest day is not a
/// Sunday in the reference timezone, sentinel points for the preceding days
/// are prepended until the series starts on one; each padding step moves
/// exactly one calendar day back, so at most six are added.
pub fn heatmap_series(map: &DistanceMap, tz: Tz) -> Vec<SeriesPoint> {
    let first_day = match map.iter().next() {
        Some((day, _)) => *day,
        None => return Vec::new(),
    };

    let pad = i64::from(first_day.weekday().num_days_from_sunday());
    let mut series = Vec::with_capacity(map.len() + pad as usize);

    for offset in (1..=pad).rev() {
        let day = first_day - Duration::days(offset);
        series.push(SeriesPoint(
            local_midnight(day, tz).timestamp_millis(),
            PADDING_SENTINEL,
        ));
    }
    for (day, meters) in map.iter() {
        series.push(SeriesPoint(local_midnight(*day, tz).timestamp_millis(), *meters));
    }

    series
}

/// The instant a calendar day starts in `tz`.
///
/// Usually plain local midnight. On spring-forward days in zones that shift
/// at 00:00 (America/Sao_Paulo did until 2019) midnight does not exist, and
/// the day starts at the first instant that does.
pub fn local_midnight(day: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let midnight = day.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            for step in 1..=48 {
                let probe = midnight + Duration::minutes(30 * step);
                if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
                    return dt;
                }
            }
            // Unreachable for real tzdb data; interpret as UTC rather than panic
            tz.from_utc_datetime(&midnight)
        }
    }
}
