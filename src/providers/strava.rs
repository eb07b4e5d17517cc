// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Strava API client: token refresh, paginated activity listing, and the
//! latest-activities fetch behind the dashboard snapshot.
//!
//! Base URLs are injectable so integration tests can point the client at a
//! local mock server; production callers get the real endpoints from the
//! configuration defaults.

use std::fmt;

use async_stream::try_stream;
use chrono::{DateTime, Utc};
use futures_util::Stream;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::StravaConfig;
use crate::constants::aggregation::PER_PAGE;
use crate::errors::{Error, Result};
use crate::models::{Activity, ActivityMap};
use crate::oauth::{self, BearerToken};

pub struct StravaClient {
    client: Client,
    api_base: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    bearer: Option<BearerToken>,
}

impl StravaClient {
    pub fn new(config: &StravaConfig) -> Self {
        Self {
            client: Client::new(),
            api_base: config.api_base.clone(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            bearer: None,
        }
    }

    /// Trade the configured refresh token for a bearer token. Must succeed
    /// before any listing call; failure here is fatal for the whole run.
    pub async fn authenticate(&mut self) -> Result<()> {
        let bearer = oauth::refresh_access_token(
            &self.client,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
            &self.refresh_token,
        )
        .await?;

        self.bearer = Some(bearer);
        info!("Strava access token refreshed");
        Ok(())
    }

    fn bearer(&self) -> Result<&BearerToken> {
        self.bearer.as_ref().ok_or(Error::NotAuthenticated)
    }

    /// Fetch one listing page. The payload is either an activity array or a
    /// refusal object (rate limit and friends); Strava signals the latter
    /// by shape, so the body decides, not the status code.
    async fn list_activities_page(&self, after: i64, page: u32) -> Result<ListingPage> {
        let bearer = self.bearer()?;

        let page_body = self
            .client
            .get(format!("{}/athlete/activities", self.api_base))
            .header(AUTHORIZATION, bearer.authorization_value())
            .query(&[
                ("after", after.to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(page_body)
    }

    /// All activities newer than `after`, as a lazy stream of page batches.
    ///
    /// Pages are fetched sequentially starting at 1. The stream ends on the
    /// first empty page (end of data) or on a refusal payload (logged, with
    /// everything already yielded still standing); transport errors are
    /// yielded once and end the stream.
    pub fn activity_pages(&self, after: i64) -> impl Stream<Item = Result<Vec<Activity>>> + '_ {
        try_stream! {
            for page in 1u32.. {
                match self.list_activities_page(after, page).await? {
                    ListingPage::Activities(batch) => {
                        if batch.is_empty() {
                            debug!(page, "empty page, pagination complete");
                            break;
                        }
                        debug!(page, count = batch.len(), "fetched activity page");
                        let activities: Vec<Activity> =
                            batch.into_iter().map(Activity::from).collect();
                        yield activities;
                    }
                    ListingPage::Refusal(refusal) => {
                        if refusal.is_rate_limit() {
                            warn!("Strava rate limit exceeded; stopping pagination");
                        } else {
                            warn!(detail = %refusal, "non-list payload from Strava; stopping pagination");
                        }
                        break;
                    }
                }
            }
        }
    }

    /// The newest `count` activities (one page, no `after` filter), for the
    /// dashboard snapshot. Unlike pagination, a refusal here is an error;
    /// the caller decides whether the snapshot is worth skipping.
    pub async fn latest_activities(&self, count: u32) -> Result<Vec<Activity>> {
        let bearer = self.bearer()?;

        let page_body: ListingPage = self
            .client
            .get(format!("{}/athlete/activities", self.api_base))
            .header(AUTHORIZATION, bearer.authorization_value())
            .query(&[("per_page", count.to_string()), ("page", "1".to_string())])
            .send()
            .await?
            .json()
            .await?;

        match page_body {
            ListingPage::Activities(batch) => {
                Ok(batch.into_iter().map(Activity::from).collect())
            }
            ListingPage::Refusal(refusal) => Err(Error::StravaApi(refusal.to_string())),
        }
    }
}

/// An activity-listing response body: the expected array, or whatever
/// object Strava sends instead when it refuses the request.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListingPage {
    Activities(Vec<StravaActivity>),
    Refusal(ApiRefusal),
}

/// Non-array listing payload, e.g. `{"message": "Rate Limit Exceeded", ...}`.
#[derive(Debug, Deserialize)]
pub struct ApiRefusal {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

impl ApiRefusal {
    pub fn is_rate_limit(&self) -> bool {
        self.message.as_deref() == Some("Rate Limit Exceeded")
    }
}

impl fmt::Display for ApiRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}", message),
            None => write!(f, "unexpected non-list payload"),
        }
    }
}

/// Activity as Strava sends it, with only the fields this pipeline reads.
/// `distance` and the timestamps are required on purpose: a malformed
/// record fails its whole page, which the fold treats as a partial fetch.
#[derive(Debug, Deserialize)]
pub struct StravaActivity {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub start_date_local: Option<String>,
    pub distance: f64,
    pub moving_time: u64,
    pub elapsed_time: u64,
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    #[serde(default)]
    pub sport_type: Option<String>,
    #[serde(default)]
    pub kudos_count: Option<u32>,
    #[serde(default)]
    pub average_speed: Option<f64>,
    #[serde(default)]
    pub max_speed: Option<f64>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub map: Option<StravaMap>,
}

#[derive(Debug, Deserialize)]
pub struct StravaMap {
    #[serde(default)]
    pub summary_polyline: Option<String>,
}

impl From<StravaActivity> for Activity {
    fn from(strava: StravaActivity) -> Self {
        Activity {
            id: strava.id,
            activity_type: strava.activity_type,
            name: strava.name,
            start_date: strava.start_date,
            start_date_local: strava.start_date_local,
            distance: strava.distance,
            moving_time: strava.moving_time,
            elapsed_time: strava.elapsed_time,
            total_elevation_gain: strava.total_elevation_gain,
            sport_type: strava.sport_type,
            kudos_count: strava.kudos_count,
            average_speed: strava.average_speed,
            max_speed: strava.max_speed,
            visibility: strava.visibility,
            map: ActivityMap {
                summary_polyline: strava.map.and_then(|m| m.summary_polyline),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_json(count: usize) -> String {
        let activities: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{
                        "id": {},
                        "type": "Run",
                        "name": "Run {}",
                        "start_date": "2025-06-01T11:30:00Z",
                        "distance": 5000.0,
                        "moving_time": 1800,
                        "elapsed_time": 1900,
                        "visibility": "everyone",
                        "map": {{"summary_polyline": "poly{}"}}
                    }}"#,
                    i, i, i
                )
            })
            .collect();
        format!("[{}]", activities.join(","))
    }

    #[test]
    fn test_listing_page_parses_activity_array() {
        let page: ListingPage = serde_json::from_str(&listing_json(2)).unwrap();
        match page {
            ListingPage::Activities(batch) => {
                assert_eq!(batch.len(), 2);
                assert_eq!(batch[0].activity_type, "Run");
            }
            ListingPage::Refusal(_) => panic!("expected activities"),
        }
    }

    #[test]
    fn test_listing_page_parses_empty_array() {
        let page: ListingPage = serde_json::from_str("[]").unwrap();
        assert!(matches!(page, ListingPage::Activities(batch) if batch.is_empty()));
    }

    #[test]
    fn test_listing_page_parses_rate_limit_refusal() {
        let body = r#"{"message": "Rate Limit Exceeded", "errors": [{"resource": "Application"}]}"#;
        let page: ListingPage = serde_json::from_str(body).unwrap();
        match page {
            ListingPage::Refusal(refusal) => {
                assert!(refusal.is_rate_limit());
                assert_eq!(refusal.to_string(), "Rate Limit Exceeded");
            }
            ListingPage::Activities(_) => panic!("expected refusal"),
        }
    }

    #[test]
    fn test_listing_page_treats_any_object_as_refusal() {
        let page: ListingPage = serde_json::from_str("{}").unwrap();
        match page {
            ListingPage::Refusal(refusal) => {
                assert!(!refusal.is_rate_limit());
                assert_eq!(refusal.to_string(), "unexpected non-list payload");
            }
            ListingPage::Activities(_) => panic!("expected refusal"),
        }
    }

    #[test]
    fn test_malformed_activity_fails_the_page() {
        // No distance: the record is rejected rather than silently zeroed
        let body = r#"[{"id": 1, "type": "Run", "name": "x",
                        "start_date": "2025-06-01T11:30:00Z",
                        "moving_time": 1, "elapsed_time": 1}]"#;
        assert!(serde_json::from_str::<ListingPage>(body).is_err());
    }

    #[test]
    fn test_wire_to_canonical_conversion() {
        let page: ListingPage = serde_json::from_str(&listing_json(1)).unwrap();
        let strava = match page {
            ListingPage::Activities(mut batch) => batch.remove(0),
            ListingPage::Refusal(_) => panic!("expected activities"),
        };

        let activity = Activity::from(strava);
        assert_eq!(activity.id, 0);
        assert_eq!(activity.activity_type, "Run");
        assert_eq!(activity.map.summary_polyline.as_deref(), Some("poly0"));
        assert!(activity.is_public());
    }

    #[test]
    fn test_missing_map_converts_to_empty_polyline() {
        let body = r#"{"id": 7, "type": "Ride", "name": "Trainer",
                       "start_date": "2025-06-01T11:30:00Z", "distance": 0.0,
                       "moving_time": 3600, "elapsed_time": 3600}"#;
        let strava: StravaActivity = serde_json::from_str(body).unwrap();
        let activity = Activity::from(strava);
        assert_eq!(activity.map.summary_polyline, None);
        assert!(!activity.is_public());
    }
}
