// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Application constants and environment-based configuration values.
//! This module provides both hardcoded constants and environment variable configuration.

use std::env;

/// API endpoints and URLs
pub mod endpoints {
    /// Strava API
    pub const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";
    pub const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

    /// Hevy API
    pub const HEVY_API_BASE: &str = "https://api.hevyapp.com";
}

/// Aggregation window and series parameters
pub mod aggregation {
    /// Days in the tracked window (today back to today - 364)
    pub const WINDOW_DAYS: i64 = 365;

    /// Server-side coarse filter: activities older than this are not fetched
    pub const LOOKBACK_SECONDS: i64 = WINDOW_DAYS * 24 * 60 * 60;

    /// Activities requested per page
    pub const PER_PAGE: u32 = 200;

    /// Series value the renderer treats as transparent. Real distances are
    /// non-negative, so the sentinel never collides with data.
    pub const PADDING_SENTINEL: f64 = -1.0;

    /// Timezone all day buckets are keyed in unless configured otherwise
    pub const DEFAULT_TIMEZONE: &str = "America/New_York";
}

/// Dashboard snapshot parameters
pub mod snapshot {
    /// Sport types the dashboard shows a "latest" card for
    pub const TARGET_TYPES: [&str; 3] = ["Run", "Ride", "Swim"];

    /// Activities fetched for the snapshot (one page, newest first)
    pub const LATEST_FETCH_COUNT: u32 = 50;

    /// Activities kept in the recent list
    pub const RECENT_LIMIT: usize = 30;

    /// Visibility value an activity must carry to appear on the dashboard
    pub const PUBLIC_VISIBILITY: &str = "everyone";
}

/// Artifact locations
pub mod output {
    /// Default directory artifacts are written under
    pub const DEFAULT_OUTPUT_DIR: &str = "public";

    /// Distance-per-day map consumed by the heat-map
    pub const DISTANCE_MAP_FILE: &str = "distance-map.json";

    /// Latest/recent activity snapshot consumed by the dashboard panels
    pub const SNAPSHOT_FILE: &str = "last-activities.json";
}

/// Environment-based configuration
pub mod env_config {
    use super::env;

    /// Get Strava client ID from environment
    pub fn strava_client_id() -> Option<String> {
        env::var("STRAVA_CLIENT_ID").ok()
    }

    /// Get Strava client secret from environment
    pub fn strava_client_secret() -> Option<String> {
        env::var("STRAVA_CLIENT_SECRET").ok()
    }

    /// Get Strava refresh token from environment
    pub fn strava_refresh_token() -> Option<String> {
        env::var("STRAVA_REFRESH_TOKEN").ok()
    }

    /// Get Strava API base URL from environment or default
    pub fn strava_api_base() -> String {
        env::var("STRAVA_API_BASE")
            .unwrap_or_else(|_| super::endpoints::STRAVA_API_BASE.to_string())
    }

    /// Get Strava token URL from environment or default
    pub fn strava_token_url() -> String {
        env::var("STRAVA_TOKEN_URL")
            .unwrap_or_else(|_| super::endpoints::STRAVA_TOKEN_URL.to_string())
    }

    /// Get Hevy API key from environment
    pub fn hevy_api_key() -> Option<String> {
        env::var("HEVY_API_KEY").ok()
    }

    /// Get Hevy API base URL from environment or default
    pub fn hevy_api_base() -> String {
        env::var("HEVY_API_BASE").unwrap_or_else(|_| super::endpoints::HEVY_API_BASE.to_string())
    }

    /// Get reference timezone name from environment or default
    pub fn timezone() -> String {
        env::var("PACEBOARD_TIMEZONE")
            .unwrap_or_else(|_| super::aggregation::DEFAULT_TIMEZONE.to_string())
    }

    /// Get artifact output directory from environment or default
    pub fn output_dir() -> String {
        env::var("PACEBOARD_OUTPUT_DIR")
            .unwrap_or_else(|_| super::output::DEFAULT_OUTPUT_DIR.to_string())
    }

    /// Get log level from environment or default
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    }
}

/// Unit conversions used by stats and display formatting
pub mod units {
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
    pub const METERS_PER_KILOMETER: f64 = 1000.0;
}
