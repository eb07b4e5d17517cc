// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Report Binary
//!
//! Renders the synced artifacts in the terminal: the trailing-year
//! heat-map as a weeks-by-weekdays glyph grid, window totals, per-sport
//! statistics, and the latest activity per sport. Read-only; run
//! `paceboard-sync` first to produce the artifacts.

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use clap::Parser;
use paceboard::aggregator::DistanceMap;
use paceboard::artifact;
use paceboard::constants::aggregation::DEFAULT_TIMEZONE;
use paceboard::constants::output::{DEFAULT_OUTPUT_DIR, DISTANCE_MAP_FILE, SNAPSHOT_FILE};
use paceboard::constants::snapshot::TARGET_TYPES;
use paceboard::constants::units::SECONDS_PER_MINUTE;
use paceboard::format::{
    format_distance, format_duration, format_pace, format_relative_time,
    format_workout_datetime, heat_level,
};
use paceboard::logging::{LogFormat, LoggingConfig};
use paceboard::models::DashboardSnapshot;
use paceboard::series::{heatmap_series, SeriesPoint};
use std::path::PathBuf;

/// Intensity glyphs, least to most; index matches the heat level.
const HEAT_GLYPHS: [char; 5] = ['·', '░', '▒', '▓', '█'];

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Parser)]
#[command(name = "paceboard-report")]
#[command(about = "Render the synced dashboard artifacts in the terminal")]
pub struct Args {
    /// Directory holding the artifacts
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Timezone the heat-map grid is laid out in
    #[arg(short, long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,
}

fn main() -> Result<()> {
    // Keep stdout for the report itself; only warnings go to the log.
    LoggingConfig {
        level: "warn".to_string(),
        format: LogFormat::Compact,
        include_location: false,
    }
    .init()?;

    let args = Args::parse();

    let tz: Tz = args
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("Unknown timezone {}: {e}", args.timezone))?;

    let map_path = args.output_dir.join(DISTANCE_MAP_FILE);
    let map: DistanceMap = artifact::read_json(&map_path).with_context(|| {
        format!(
            "No distance map at {}; run paceboard-sync first",
            map_path.display()
        )
    })?;

    println!("Activity heat-map (trailing year, {})", args.timezone);
    println!();
    print_heatmap(&heatmap_series(&map, tz));
    println!();
    println!(
        "Window: {} across {} active days",
        format_distance(map.total_meters()),
        map.active_days()
    );

    let snapshot_path = args.output_dir.join(SNAPSHOT_FILE);
    match artifact::read_json::<DashboardSnapshot>(&snapshot_path) {
        Ok(snapshot) => print_snapshot(&snapshot, tz),
        Err(_) => println!("\nNo snapshot artifact at {}", snapshot_path.display()),
    }

    Ok(())
}

/// Lay the series out as weekday rows by week columns. The series starts
/// on a Sunday by construction, so index arithmetic is all it takes.
fn print_heatmap(series: &[SeriesPoint]) {
    if series.is_empty() {
        println!("  (no distance data)");
        return;
    }

    let values: Vec<f64> = series
        .iter()
        .filter(|p| !p.is_padding())
        .map(SeriesPoint::meters)
        .collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let weeks = series.len().div_ceil(7);
    for (row, label) in WEEKDAY_LABELS.iter().enumerate() {
        let mut line = String::with_capacity(weeks);
        for week in 0..weeks {
            let glyph = match series.get(week * 7 + row) {
                Some(point) => heat_glyph(heat_level(point.meters(), min, max)),
                None => ' ',
            };
            line.push(glyph);
        }
        println!("  {label} {line}");
    }
    println!();
    println!(
        "  less {} {} {} {} {} more",
        HEAT_GLYPHS[0], HEAT_GLYPHS[1], HEAT_GLYPHS[2], HEAT_GLYPHS[3], HEAT_GLYPHS[4]
    );
}

fn heat_glyph(level: Option<u8>) -> char {
    match level {
        // Padding before the window starts renders blank
        None => ' ',
        Some(level) => HEAT_GLYPHS[usize::from(level).min(HEAT_GLYPHS.len() - 1)],
    }
}

fn print_snapshot(snapshot: &DashboardSnapshot, tz: Tz) {
    println!("\nBy sport (recent public activities):");
    for (sport, stats) in &snapshot.stats.by_type {
        let pace = match stats.avg_pace {
            Some(minutes_per_km) => format_pace(minutes_per_km * SECONDS_PER_MINUTE),
            None => "-".to_string(),
        };
        println!(
            "  {:<12} {:>3} activities  {:>12}  {:>14}  {}",
            sport,
            stats.count,
            format_distance(stats.distance),
            format_duration(stats.time as i64),
            pace
        );
    }

    let now = Utc::now();
    println!("\nLatest:");
    for sport in TARGET_TYPES {
        match snapshot.latest_by_type.get(sport) {
            Some(activity) => println!(
                "  {:<6} {:<32} {}",
                sport,
                activity.name,
                format_relative_time(&activity.start_date, &now)
            ),
            None => println!("  {sport:<6} (none in snapshot)"),
        }
    }

    if let Some(workout) = &snapshot.latest_workout {
        println!(
            "\nLast workout: {} ({} exercises), {}",
            workout.name,
            workout.exercises.len(),
            format_workout_datetime(&workout.started_at.with_timezone(&tz))
        );
    }
}
