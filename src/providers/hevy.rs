// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Hevy API client for the optional "latest gym workout" card.
//!
//! Hevy authenticates with a static API key instead of an OAuth flow, and
//! everything here is decoration: the pipeline treats any failure as
//! "no workout this time" rather than a reason to stop.

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::HevyConfig;
use crate::errors::{Error, Result};
use crate::models::Workout;

pub struct HevyClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl HevyClient {
    pub fn new(config: &HevyConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Fetch the most recent workout, or `None` when the account has none.
    pub async fn latest_workout(&self) -> Result<Option<Workout>> {
        let response = self
            .client
            .get(format!("{}/v1/workouts/latest", self.api_base))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::HevyApi(format!("status {}: {}", status, body)));
        }

        let payload: LatestWorkoutPayload = response.json().await?;
        let workout = payload.into_workout();
        if let Some(workout) = &workout {
            debug!(workout = %workout.name, "fetched latest Hevy workout");
        }
        Ok(workout)
    }
}

/// The latest-workout endpoint answers with either a bare workout object or
/// a one-element collection, depending on API version.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LatestWorkoutPayload {
    Single(Workout),
    Collection { workouts: Vec<Workout> },
}

impl LatestWorkoutPayload {
    fn into_workout(self) -> Option<Workout> {
        match self {
            Self::Single(workout) => Some(workout),
            Self::Collection { workouts } => workouts.into_iter().next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKOUT_JSON: &str = r#"{
        "workout_id": "w-1",
        "name": "Leg Day",
        "started_at": "2025-06-01T22:00:00Z",
        "ended_at": "2025-06-01T23:00:00Z",
        "exercises": []
    }"#;

    #[test]
    fn test_payload_parses_bare_workout() {
        let payload: LatestWorkoutPayload = serde_json::from_str(WORKOUT_JSON).unwrap();
        let workout = payload.into_workout().expect("workout expected");
        assert_eq!(workout.name, "Leg Day");
    }

    #[test]
    fn test_payload_parses_collection() {
        let body = format!(r#"{{"workouts": [{}]}}"#, WORKOUT_JSON);
        let payload: LatestWorkoutPayload = serde_json::from_str(&body).unwrap();
        let workout = payload.into_workout().expect("workout expected");
        assert_eq!(workout.workout_id, "w-1");
    }

    #[test]
    fn test_empty_collection_is_none() {
        let payload: LatestWorkoutPayload = serde_json::from_str(r#"{"workouts": []}"#).unwrap();
        assert!(payload.into_workout().is_none());
    }
}
