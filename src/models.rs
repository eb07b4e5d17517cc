// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core data structures shared by the sync pipeline and the artifacts it
//! writes. The dashboard consumes these as plain JSON, so every field name
//! here is part of the artifact contract.
//!
//! ## Core Models
//!
//! - [`Activity`]: one activity, trimmed to the fields the dashboard shows
//! - [`DashboardSnapshot`]: the `last-activities.json` artifact
//! - [`ActivityStats`]: per-type totals derived from recent activities
//! - [`Workout`]: a gym workout from the optional Hevy integration

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single activity, trimmed to what the dashboard renders
///
/// Sport names are kept as the provider's strings (`"Run"`, `"Ride"`, ...)
/// because the dashboard keys its panels off them directly; mapping them
/// through an internal enum would change the artifact.
///
/// # Examples
///
/// ```rust
/// use paceboard::models::{Activity, ActivityMap};
/// use chrono::{TimeZone, Utc};
///
/// let activity = Activity {
///     id: 987654321,
///     activity_type: "Run".to_string(),
///     name: "Morning Run".to_string(),
///     start_date: Utc.with_ymd_and_hms(2025, 6, 1, 11, 30, 0).unwrap(),
///     start_date_local: Some("2025-06-01T07:30:00Z".to_string()),
///     distance: 5000.0,
///     moving_time: 1800,
///     elapsed_time: 1900,
///     total_elevation_gain: Some(42.0),
///     sport_type: Some("Run".to_string()),
///     kudos_count: Some(3),
///     average_speed: Some(2.78),
///     max_speed: Some(4.17),
///     visibility: Some("everyone".to_string()),
///     map: ActivityMap { summary_polyline: None },
/// };
/// assert!(activity.matches_type("Run"));
/// assert!(activity.is_public());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Provider's numeric activity id
    pub id: u64,
    /// Legacy sport name (`"Run"`, `"Ride"`, `"Swim"`, ...)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Human-readable title of the activity
    pub name: String,
    /// When the activity started (UTC instant)
    pub start_date: DateTime<Utc>,
    /// Provider's local wall-clock start, passed through verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_local: Option<String>,
    /// Distance covered in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: u64,
    /// Elapsed time in seconds
    pub elapsed_time: u64,
    /// Elevation gained in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_elevation_gain: Option<f64>,
    /// Newer, more specific sport name (`"TrailRun"`, `"GravelRide"`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<String>,
    /// Kudos received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kudos_count: Option<u32>,
    /// Average speed in meters per second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_speed: Option<f64>,
    /// Maximum speed in meters per second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    /// Privacy setting from the provider. Drives the snapshot filter but is
    /// never written into artifacts.
    #[serde(default, skip_serializing)]
    pub visibility: Option<String>,
    /// Route geometry (polyline only; the dashboard draws a small trace)
    #[serde(default)]
    pub map: ActivityMap,
}

impl Activity {
    /// True when either the legacy or the newer sport field matches `target`.
    /// The two fields disagree for specialized sports (a trail run has
    /// `type: "Run"` but `sport_type: "TrailRun"`), so the dashboard checks
    /// both when picking its "latest run / ride / swim" cards.
    pub fn matches_type(&self, target: &str) -> bool {
        self.activity_type == target || self.sport_type.as_deref() == Some(target)
    }

    /// Only activities shared with everyone make it onto the dashboard.
    pub fn is_public(&self) -> bool {
        self.visibility.as_deref() == Some(crate::constants::snapshot::PUBLIC_VISIBILITY)
    }
}

/// Route geometry attached to an activity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityMap {
    /// Encoded polyline of the route, when the activity has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_polyline: Option<String>,
}

/// The `last-activities.json` artifact
///
/// Built from the newest public activities plus, when configured, the most
/// recent gym workout. Field names are exactly what the dashboard reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Newest public activity per target sport type
    pub latest_by_type: BTreeMap<String, Activity>,
    /// Newest public activities, capped for the dashboard list
    pub recent_activities: Vec<Activity>,
    /// Totals over the activities in this snapshot
    pub stats: ActivityStats,
    /// Latest gym workout, when the Hevy integration is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_workout: Option<Workout>,
}

/// Totals across a set of activities, grouped by sport type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityStats {
    /// Total distance covered in meters
    pub total_distance: f64,
    /// Total moving time in seconds
    pub total_time: u64,
    /// Per-sport breakdown, keyed by the legacy sport name
    pub by_type: BTreeMap<String, TypeStats>,
}

/// Totals for one sport type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeStats {
    /// Number of activities
    pub count: u64,
    /// Distance covered in meters
    pub distance: f64,
    /// Moving time in seconds
    pub time: u64,
    /// Average pace in minutes per kilometer; `None` when no distance was
    /// covered (weight training and the like)
    pub avg_pace: Option<f64>,
}

/// A gym workout from the Hevy API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    /// Hevy workout id
    pub workout_id: String,
    /// Owning user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Template the workout was started from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_template_id: Option<String>,
    /// Workout title
    pub name: String,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When the workout started (UTC instant)
    pub started_at: DateTime<Utc>,
    /// When the workout ended (UTC instant)
    pub ended_at: DateTime<Utc>,
    /// Record creation timestamp, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Record update timestamp, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Exercises performed, in workout order
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// One exercise within a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Hevy exercise id
    pub exercise_id: String,
    /// Position within the workout
    #[serde(default)]
    pub exercise_order: u32,
    /// Exercise catalogue entry this refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_type_id: Option<String>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Sets performed, in order
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

/// One set within an exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// Hevy set id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_id: Option<String>,
    /// Position within the exercise
    #[serde(default)]
    pub set_order: u32,
    /// Weight lifted in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Repetitions performed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Distance covered in kilometers (cardio sets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Duration in seconds (timed sets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    /// Rated perceived exertion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Test data for creating sample activities
    fn create_sample_activity() -> Activity {
        Activity {
            id: 987654321,
            activity_type: "Run".to_string(),
            name: "Morning Run".to_string(),
            start_date: Utc.with_ymd_and_hms(2025, 6, 1, 11, 30, 0).unwrap(),
            start_date_local: Some("2025-06-01T07:30:00Z".to_string()),
            distance: 5000.0,
            moving_time: 1800, // 30 minutes
            elapsed_time: 1900,
            total_elevation_gain: Some(42.0),
            sport_type: Some("Run".to_string()),
            kudos_count: Some(3),
            average_speed: Some(2.78), // ~10 km/h
            max_speed: Some(4.17),
            visibility: Some("everyone".to_string()),
            map: ActivityMap {
                summary_polyline: Some("abc123".to_string()),
            },
        }
    }

    #[test]
    fn test_activity_serialization_field_names() {
        let activity = create_sample_activity();

        let json = serde_json::to_value(&activity).expect("Failed to serialize activity");
        // The legacy sport field must serialize as "type", not "activity_type"
        assert_eq!(json["type"], "Run");
        assert!(json.get("activity_type").is_none());
        assert_eq!(json["map"]["summary_polyline"], "abc123");
        assert_eq!(json["distance"], 5000.0);
        // Visibility drives filtering but stays out of the artifact
        assert!(json.get("visibility").is_none());
    }

    #[test]
    fn test_activity_round_trip() {
        let activity = create_sample_activity();

        let json = serde_json::to_string(&activity).expect("Failed to serialize activity");
        let back: Activity = serde_json::from_str(&json).expect("Failed to deserialize activity");
        assert_eq!(back.id, activity.id);
        assert_eq!(back.activity_type, "Run");
        assert_eq!(back.start_date, activity.start_date);
    }

    #[test]
    fn test_activity_without_optional_fields() {
        // Strava omits map data and speeds for some manual uploads
        let json = r#"{
            "id": 1,
            "type": "Workout",
            "name": "Stretching",
            "start_date": "2025-06-01T11:30:00Z",
            "distance": 0.0,
            "moving_time": 600,
            "elapsed_time": 600
        }"#;

        let activity: Activity = serde_json::from_str(json).expect("Failed to parse minimal activity");
        assert_eq!(activity.kudos_count, None);
        assert_eq!(activity.map.summary_polyline, None);
        assert_eq!(activity.sport_type, None);
    }

    #[test]
    fn test_matches_type_checks_both_sport_fields() {
        let mut activity = create_sample_activity();
        activity.activity_type = "Run".to_string();
        activity.sport_type = Some("TrailRun".to_string());

        assert!(activity.matches_type("Run"));
        assert!(activity.matches_type("TrailRun"));
        assert!(!activity.matches_type("Ride"));
    }

    #[test]
    fn test_snapshot_serializes_expected_keys() {
        let snapshot = DashboardSnapshot {
            latest_by_type: BTreeMap::from([("Run".to_string(), create_sample_activity())]),
            recent_activities: vec![create_sample_activity()],
            stats: ActivityStats::default(),
            latest_workout: None,
        };

        let json = serde_json::to_value(&snapshot).expect("Failed to serialize snapshot");
        assert!(json.get("latest_by_type").is_some());
        assert!(json.get("recent_activities").is_some());
        assert!(json.get("stats").is_some());
        // Absent workout must not appear as an explicit null
        assert!(json.get("latest_workout").is_none());
    }

    #[test]
    fn test_workout_parses_hevy_payload() {
        let json = r#"{
            "workout_id": "abc-123",
            "user_id": "u-1",
            "workout_template_id": null,
            "name": "Push Day",
            "notes": null,
            "started_at": "2025-06-01T22:55:00Z",
            "ended_at": "2025-06-01T23:40:00Z",
            "created_at": "2025-06-02T00:01:00Z",
            "updated_at": "2025-06-02T00:01:00Z",
            "exercises": [
                {
                    "exercise_id": "e-1",
                    "exercise_order": 0,
                    "exercise_type_id": "bench-press",
                    "notes": null,
                    "sets": [
                        {"set_id": "s-1", "set_order": 0, "weight_kg": 60.0, "reps": 8,
                         "distance_km": null, "duration_seconds": null, "rpe": 7.5}
                    ]
                }
            ]
        }"#;

        let workout: Workout = serde_json::from_str(json).expect("Failed to parse workout");
        assert_eq!(workout.name, "Push Day");
        assert_eq!(workout.exercises.len(), 1);
        assert_eq!(workout.exercises[0].sets[0].weight_kg, Some(60.0));
        assert_eq!(workout.exercises[0].sets[0].rpe, Some(7.5));
    }
}
