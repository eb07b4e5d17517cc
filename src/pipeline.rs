// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Sync Pipeline
//!
//! The end-to-end flow behind `paceboard-sync`: authenticate, aggregate a
//! year of distances, write the distance map, then build and write the
//! dashboard snapshot.
//!
//! The failure contract is asymmetric on purpose. Configuration and
//! authentication problems abort the run before anything is written.
//! After that, the distance-map artifact is the primary output (its write
//! failing is an error), while the whole snapshot step is best-effort:
//! any fetch or write problem there is logged and leaves the previous
//! snapshot artifact in place.

use chrono::Utc;
use tracing::{debug, warn};

use crate::aggregator::{self, DistanceMap};
use crate::artifact;
use crate::config::{Config, HevyConfig};
use crate::constants::snapshot::LATEST_FETCH_COUNT;
use crate::errors::Result;
use crate::logging::AppLogger;
use crate::models::Workout;
use crate::providers::{HevyClient, StravaClient};
use crate::snapshot;

/// Flags carried from the command line into the pipeline.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Write artifacts even when their content is unchanged.
    pub force: bool,
    /// Skip the snapshot step entirely (distance map only).
    pub skip_snapshot: bool,
}

/// What a sync run produced, for the caller's summary output.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Activities merged into the distance map.
    pub activities_merged: usize,
    /// Days in the map with a non-zero distance.
    pub active_days: usize,
    /// Whether the distance-map artifact changed on disk.
    pub distance_map_written: bool,
    /// Whether the snapshot artifact changed on disk.
    pub snapshot_written: bool,
}

/// Run one full sync against the configured providers.
pub async fn run(config: &Config, options: &SyncOptions) -> Result<SyncOutcome> {
    let tz = config.reference_timezone()?;
    AppLogger::log_sync_started(&config.aggregation.timezone, &config.output.dir);

    let mut strava = StravaClient::new(&config.strava);
    strava.authenticate().await?;

    let mut map = DistanceMap::for_trailing_year(tz);
    let after = aggregator::lookback_start(Utc::now());
    let pages = strava.activity_pages(after);
    let activities_merged = aggregator::accumulate_pages(&mut map, tz, pages).await;

    let distance_map_path = config.distance_map_path();
    let distance_map_written = artifact::write_if_changed(&distance_map_path, &map, options.force)?;
    AppLogger::log_artifact_result("distance-map", &distance_map_path, distance_map_written);

    let snapshot_written = if options.skip_snapshot {
        debug!("snapshot step disabled, skipping");
        false
    } else {
        write_snapshot(config, &strava, options.force).await
    };

    let outcome = SyncOutcome {
        activities_merged,
        active_days: map.active_days(),
        distance_map_written,
        snapshot_written,
    };
    AppLogger::log_run_completed(
        outcome.activities_merged,
        outcome.active_days,
        outcome.snapshot_written,
    );

    Ok(outcome)
}

/// Fetch, build, and write the dashboard snapshot. Never fails the run:
/// every problem degrades to keeping whatever artifact is already there.
async fn write_snapshot(config: &Config, strava: &StravaClient, force: bool) -> bool {
    let activities = match strava.latest_activities(LATEST_FETCH_COUNT).await {
        Ok(batch) if batch.is_empty() => {
            warn!("no activities returned for snapshot, keeping existing artifact");
            return false;
        }
        Ok(batch) => batch,
        Err(err) => {
            warn!(error = %err, "snapshot fetch failed, keeping existing artifact");
            return false;
        }
    };

    let latest_workout = match &config.hevy {
        Some(hevy_config) => fetch_latest_workout(hevy_config).await,
        None => None,
    };

    let Some(snapshot) = snapshot::build(activities, latest_workout) else {
        warn!("no public activities in snapshot fetch, keeping existing artifact");
        return false;
    };

    let snapshot_path = config.snapshot_path();
    match artifact::write_if_changed(&snapshot_path, &snapshot, force) {
        Ok(wrote) => {
            AppLogger::log_artifact_result("snapshot", &snapshot_path, wrote);
            wrote
        }
        Err(err) => {
            warn!(error = %err, "snapshot write failed, keeping existing artifact");
            false
        }
    }
}

/// Latest gym workout, when the integration is configured. Errors degrade
/// to omitting the field from the snapshot.
async fn fetch_latest_workout(config: &HevyConfig) -> Option<Workout> {
    let client = HevyClient::new(config);
    match client.latest_workout().await {
        Ok(Some(workout)) => Some(workout),
        Ok(None) => {
            debug!("Hevy returned no workouts");
            None
        }
        Err(err) => {
            warn!(error = %err, "Hevy fetch failed, omitting latest workout");
            None
        }
    }
}
