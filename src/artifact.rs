// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Artifact Writer
//!
//! Writes the JSON artifacts the dashboard serves. Artifacts are committed
//! to version control, so writes are skipped when the content is unchanged:
//! this keeps mtimes stable and diffs quiet when a sync run finds nothing
//! new.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::Result;

/// Serialize `value` to `path` as pretty-printed JSON, unless the file
/// already holds the same value. Returns whether a write happened.
///
/// `force` bypasses the comparison and always writes. A present but
/// unreadable or non-JSON file counts as changed and is overwritten.
pub fn write_if_changed<T: Serialize>(path: &Path, value: &T, force: bool) -> Result<bool> {
    let new_value = serde_json::to_value(value)?;

    if !force {
        if let Some(existing) = read_existing(path) {
            if existing == new_value {
                debug!(path = %path.display(), "artifact unchanged, skipping write");
                return Ok(false);
            }
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut content = serde_json::to_string_pretty(&new_value)?;
    content.push('\n');
    fs::write(path, content)?;
    info!(path = %path.display(), "artifact written");

    Ok(true)
}

/// Current content of `path` as a JSON value, or `None` when the file is
/// missing or not valid JSON.
fn read_existing(path: &Path) -> Option<serde_json::Value> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Read and deserialize a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
