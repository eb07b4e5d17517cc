// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Paceboard
//!
//! Sync engine for a personal fitness dashboard. Pulls a year of activities
//! from Strava (plus, optionally, the latest gym workout from Hevy) and
//! writes the static JSON artifacts the dashboard site serves: a
//! distance-per-day map feeding the activity heat-map, and a snapshot of
//! the latest and most recent activities.
//!
//! ## Features
//!
//! - **Year-long distance aggregation**: one bucket per calendar day in a
//!   configurable reference timezone, DST handled correctly
//! - **Heat-map series**: day buckets flattened to `[timestamp, meters]`
//!   pairs, padded back to a Sunday so weeks align in the grid
//! - **Dashboard snapshot**: latest run / ride / swim, a capped recent
//!   list, and per-sport statistics
//! - **Quiet artifacts**: JSON files are only rewritten when their content
//!   actually changed, keeping version-control diffs clean
//! - **Best-effort syncing**: after authentication, provider hiccups
//!   degrade to partial output instead of failing the run
//!
//! ## Quick Start
//!
//! 1. Export `STRAVA_CLIENT_ID`, `STRAVA_CLIENT_SECRET`, and
//!    `STRAVA_REFRESH_TOKEN` (or write a `config.toml`)
//! 2. Run `paceboard-sync` to produce the artifacts under `public/`
//! 3. Run `paceboard-report` to inspect them from the terminal
//!
//! ## Architecture
//!
//! - **Providers**: concrete Strava and Hevy API clients
//! - **Aggregator**: the 365-day distance map and its page fold
//! - **Series**: heat-map flattening and Sunday padding
//! - **Snapshot**: latest/recent activity selection and statistics
//! - **Artifact**: change-detecting JSON writer
//! - **Pipeline**: the end-to-end sync flow the binaries drive
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use paceboard::config::Config;
//! use paceboard::pipeline::{self, SyncOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration (file or environment)
//!     let config = Config::load(None)?;
//!
//!     // Run one sync: aggregate, then write both artifacts
//!     let outcome = pipeline::run(&config, &SyncOptions::default()).await?;
//!
//!     println!(
//!         "merged {} activities across {} active days",
//!         outcome.activities_merged, outcome.active_days
//!     );
//!     Ok(())
//! }
//! ```

/// Distance-per-day aggregation over the trailing year
pub mod aggregator;

/// Change-detecting JSON artifact writer
pub mod artifact;

/// Configuration management and validation
pub mod config;

/// Application constants and environment configuration values
pub mod constants;

/// Error types shared across the pipeline
pub mod errors;

/// Display formatting for durations, distances, paces, and heat levels
pub mod format;

/// Structured logging configuration
pub mod logging;

/// Common data models for activities, snapshots, and workouts
pub mod models;

/// OAuth token refresh for the activity provider
pub mod oauth;

/// The end-to-end sync flow the binaries drive
pub mod pipeline;

/// Upstream API clients
pub mod providers;

/// Heat-map series construction from the distance map
pub mod series;

/// Dashboard snapshot builder
pub mod snapshot;
