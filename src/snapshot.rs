// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Dashboard Snapshot Builder
//!
//! Turns a newest-first batch of activities into the `last-activities.json`
//! artifact: the latest activity per target sport, a capped recent list,
//! and aggregate statistics. Only public activities are considered; the
//! input order is trusted to be newest first, as the provider returns it.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::constants::snapshot::{RECENT_LIMIT, TARGET_TYPES};
use crate::constants::units::{METERS_PER_KILOMETER, SECONDS_PER_MINUTE};
use crate::models::{Activity, ActivityStats, DashboardSnapshot, TypeStats, Workout};

/// Build the snapshot from a newest-first activity batch.
///
/// Returns `None` when no public activities remain after filtering, in
/// which case nothing should be written (an empty snapshot would blank
/// the dashboard).
pub fn build(activities: Vec<Activity>, latest_workout: Option<Workout>) -> Option<DashboardSnapshot> {
    let public: Vec<Activity> = activities.into_iter().filter(Activity::is_public).collect();

    if public.is_empty() {
        return None;
    }
    info!(count = public.len(), "selected public activities for snapshot");

    let latest_by_type = latest_by_type(&public);
    let stats = activity_stats(&public);

    let mut recent_activities = public;
    recent_activities.truncate(RECENT_LIMIT);

    Some(DashboardSnapshot {
        latest_by_type,
        recent_activities,
        stats,
        latest_workout,
    })
}

/// Newest activity per target sport type, honoring both sport fields.
pub fn latest_by_type(activities: &[Activity]) -> BTreeMap<String, Activity> {
    let mut latest = BTreeMap::new();

    for target in TARGET_TYPES {
        match activities.iter().find(|act| act.matches_type(target)) {
            Some(act) => {
                debug!(sport = target, activity_id = act.id, name = %act.name, "latest activity for sport");
                latest.insert(target.to_string(), act.clone());
            }
            None => {
                debug!(sport = target, "no public activity of sport in batch");
            }
        }
    }

    latest
}

/// Aggregate totals over a set of activities, grouped by sport.
pub fn activity_stats(activities: &[Activity]) -> ActivityStats {
    let mut stats = ActivityStats::default();

    for activity in activities {
        stats.total_distance += activity.distance;
        stats.total_time += activity.moving_time;

        let entry = stats
            .by_type
            .entry(stats_key(activity).to_string())
            .or_insert_with(TypeStats::default);
        entry.count += 1;
        entry.distance += activity.distance;
        entry.time += activity.moving_time;
    }

    for type_stats in stats.by_type.values_mut() {
        type_stats.avg_pace = if type_stats.distance > 0.0 {
            // minutes per kilometer
            Some(
                type_stats.time as f64
                    / SECONDS_PER_MINUTE
                    / (type_stats.distance / METERS_PER_KILOMETER),
            )
        } else {
            None
        };
    }

    stats
}

/// Grouping key for statistics: the legacy sport name, falling back to the
/// newer field, then a catch-all bucket.
fn stats_key(activity: &Activity) -> &str {
    if !activity.activity_type.is_empty() {
        &activity.activity_type
    } else {
        activity.sport_type.as_deref().unwrap_or("Unknown")
    }
}
