// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types shared across the pipeline.
//!
//! Configuration and authentication problems are fatal: the sync run stops
//! before anything is written. Everything that happens after a successful
//! token exchange is best-effort, so most fetch-side failures are logged by
//! the caller and degrade to partial output instead of surfacing here.

/// Errors produced by the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// The token endpoint answered without an `access_token`. Carries the
    /// raw response body so the operator can see what the provider said
    /// (invalid client, revoked refresh token, ...).
    #[error("Token exchange rejected: {body}")]
    Authentication { body: String },

    #[error("Client not authenticated; call authenticate() first")]
    NotAuthenticated,

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("Hevy API error: {0}")]
    HevyApi(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;
