// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Sync Binary
//!
//! Runs one sync: refreshes the Strava token, aggregates a year of
//! distances, and writes the dashboard's JSON artifacts. Intended to run
//! unattended from cron or CI; exits non-zero only on configuration or
//! authentication failures.

use anyhow::Result;
use clap::Parser;
use paceboard::config::Config;
use paceboard::logging;
use paceboard::pipeline::{self, SyncOptions};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "paceboard-sync")]
#[command(about = "Sync Strava activity data into the dashboard's JSON artifacts")]
pub struct Args {
    /// Configuration file path (falls back to the platform config dir,
    /// then to environment variables)
    #[arg(short, long)]
    config: Option<String>,

    /// Output directory for artifacts (overrides configuration)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Reference timezone for day bucketing (overrides configuration)
    #[arg(short, long)]
    timezone: Option<String>,

    /// Write artifacts even when their content is unchanged
    #[arg(long, default_value = "false")]
    force: bool,

    /// Skip the dashboard snapshot step (distance map only)
    #[arg(long, default_value = "false")]
    skip_snapshot: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let args = Args::parse();

    let mut config = Config::load(args.config)?;
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    if let Some(timezone) = args.timezone {
        config.aggregation.timezone = timezone;
        config.validate()?;
    }

    let options = SyncOptions {
        force: args.force,
        skip_snapshot: args.skip_snapshot,
    };

    let outcome = pipeline::run(&config, &options).await?;

    info!(
        "Sync complete: {} activities merged across {} active days",
        outcome.activities_merged, outcome.active_days
    );
    info!(
        "Distance map: {}",
        if outcome.distance_map_written {
            "updated"
        } else {
            "unchanged"
        }
    );
    info!(
        "Snapshot: {}",
        if args.skip_snapshot {
            "skipped"
        } else if outcome.snapshot_written {
            "updated"
        } else {
            "unchanged"
        }
    );

    Ok(())
}
