// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Distance Aggregation
//!
//! Folds a year of activities into per-day distance buckets keyed by
//! calendar date in the reference timezone. The fold is best-effort: once
//! the window is seeded, fetch failures degrade to a partial (possibly
//! all-zero) map instead of failing the run.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::aggregation::{LOOKBACK_SECONDS, WINDOW_DAYS};
use crate::errors::Result;
use crate::models::Activity;

/// Distance per calendar day, in meters, keyed in the reference timezone.
///
/// Serializes as a flat JSON object of `"YYYY-MM-DD": meters`, which is the
/// `distance-map.json` artifact. `BTreeMap` keeps the keys chronological in
/// the output, and `NaiveDate` guarantees the zero-padded key format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistanceMap {
    days: BTreeMap<NaiveDate, f64>,
}

impl DistanceMap {
    /// Seed the tracked window: `today` back through `today - 364`, every
    /// day present with `0.0` so the heat-map renders inactive days.
    pub fn for_window_ending(today: NaiveDate) -> Self {
        let mut days = BTreeMap::new();
        for offset in 0..WINDOW_DAYS {
            days.insert(today - Duration::days(offset), 0.0);
        }
        Self { days }
    }

    /// Seed the window ending on the current day in `tz`.
    pub fn for_trailing_year(tz: Tz) -> Self {
        Self::for_window_ending(Utc::now().with_timezone(&tz).date_naive())
    }

    /// Add `meters` to a day's bucket. Days outside the seeded window are
    /// inserted rather than dropped: the fetch filter is coarser than the
    /// window, and spillover keys have always been part of the artifact.
    pub fn record(&mut self, day: NaiveDate, meters: f64) {
        *self.days.entry(day).or_insert(0.0) += meters;
    }

    /// Bucket an activity under the reference-timezone calendar date of its
    /// (UTC) start instant.
    pub fn merge_activity(&mut self, activity: &Activity, tz: Tz) {
        let day = activity.start_date.with_timezone(&tz).date_naive();
        self.record(day, activity.distance);
    }

    pub fn get(&self, day: NaiveDate) -> Option<f64> {
        self.days.get(&day).copied()
    }

    /// Days in the map, including seeded zero days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Chronological iteration over `(day, meters)`.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &f64)> {
        self.days.iter()
    }

    /// Sum of all buckets in meters.
    pub fn total_meters(&self) -> f64 {
        self.days.values().sum()
    }

    /// Days with any recorded distance.
    pub fn active_days(&self) -> usize {
        self.days.values().filter(|meters| **meters > 0.0).count()
    }
}

/// Epoch-seconds cutoff handed to the provider: one year before `now`.
/// This is a coarse server-side filter; window membership is decided by the
/// seeded keys, not by this value.
pub fn lookback_start(now: DateTime<Utc>) -> i64 {
    now.timestamp() - LOOKBACK_SECONDS
}

/// Fold a stream of activity batches into the map.
///
/// A failed batch ends the fold with whatever was accumulated so far; the
/// distance artifact is best-effort once authentication has succeeded.
/// Returns the number of activities merged.
pub async fn accumulate_pages<S>(map: &mut DistanceMap, tz: Tz, pages: S) -> usize
where
    S: Stream<Item = Result<Vec<Activity>>>,
{
    tokio::pin!(pages);

    let mut merged = 0;
    while let Some(batch) = pages.next().await {
        match batch {
            Ok(activities) => {
                for activity in &activities {
                    map.merge_activity(activity, tz);
                }
                merged += activities.len();
                debug!(batch = activities.len(), merged, "merged activity batch");
            }
            Err(err) => {
                warn!(error = %err, "activity fetch failed part-way; keeping distances accumulated so far");
                break;
            }
        }
    }
    merged
}
