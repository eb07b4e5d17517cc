// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the sync pipeline.
//!
//! Configuration comes from a TOML file when one exists, otherwise from the
//! process environment (with `.env` support for local runs). Credentials are
//! validated before the pipeline starts so a misconfigured run fails before
//! any network call or file write.

use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{endpoints, env_config, output};
use crate::errors::{Error, Result};

/// Top-level configuration for a sync run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Strava API credentials and endpoints.
    pub strava: StravaConfig,
    /// Hevy API credentials. Optional: when absent the snapshot simply
    /// omits the latest-workout section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hevy: Option<HevyConfig>,
    /// Day-bucketing parameters.
    #[serde(default)]
    pub aggregation: AggregationConfig,
    /// Artifact locations.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Strava OAuth credentials plus endpoint overrides for tests.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StravaConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_strava_api_base")]
    pub api_base: String,
    #[serde(default = "default_strava_token_url")]
    pub token_url: String,
}

/// Hevy API key plus endpoint override for tests.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HevyConfig {
    pub api_key: String,
    #[serde(default = "default_hevy_api_base")]
    pub api_base: String,
}

/// Parameters controlling how activities are bucketed into days.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AggregationConfig {
    /// IANA timezone name used to convert activity start times into
    /// calendar days. All day buckets are keyed in this zone.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Where the JSON artifacts land.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_strava_api_base() -> String {
    endpoints::STRAVA_API_BASE.to_string()
}

fn default_strava_token_url() -> String {
    endpoints::STRAVA_TOKEN_URL.to_string()
}

fn default_hevy_api_base() -> String {
    endpoints::HEVY_API_BASE.to_string()
}

fn default_timezone() -> String {
    crate::constants::aggregation::DEFAULT_TIMEZONE.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(output::DEFAULT_OUTPUT_DIR)
}

fn default_config_path() -> String {
    dirs::config_dir()
        .map(|p| p.join("paceboard/config.toml"))
        .unwrap_or_else(|| "config.toml".into())
        .to_string_lossy()
        .to_string()
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Load configuration from `path` (or the platform config dir when
    /// `None`), falling back to environment variables when no file exists.
    /// The returned config has already passed [`Config::validate`].
    pub fn load(path: Option<String>) -> Result<Self> {
        let config_path = path.unwrap_or_else(default_config_path);

        let config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| Error::InvalidConfig {
                field: "config file",
                reason: e.to_string(),
            })?
        } else {
            dotenv::dotenv().ok();
            Self::from_env()?
        };

        config.validate()?;
        Ok(config)
    }

    /// Build configuration purely from environment variables.
    fn from_env() -> Result<Self> {
        let strava = StravaConfig {
            client_id: env_config::strava_client_id()
                .ok_or(Error::MissingConfig("STRAVA_CLIENT_ID"))?,
            client_secret: env_config::strava_client_secret()
                .ok_or(Error::MissingConfig("STRAVA_CLIENT_SECRET"))?,
            refresh_token: env_config::strava_refresh_token()
                .ok_or(Error::MissingConfig("STRAVA_REFRESH_TOKEN"))?,
            api_base: env_config::strava_api_base(),
            token_url: env_config::strava_token_url(),
        };

        let hevy = env_config::hevy_api_key().map(|api_key| HevyConfig {
            api_key,
            api_base: env_config::hevy_api_base(),
        });

        Ok(Self {
            strava,
            hevy,
            aggregation: AggregationConfig {
                timezone: env_config::timezone(),
            },
            output: OutputConfig {
                dir: PathBuf::from(env_config::output_dir()),
            },
        })
    }

    /// Check that every run-critical value is present and well-formed.
    pub fn validate(&self) -> Result<()> {
        if self.strava.client_id.is_empty() {
            return Err(Error::MissingConfig("strava.client_id"));
        }
        if self.strava.client_secret.is_empty() {
            return Err(Error::MissingConfig("strava.client_secret"));
        }
        if self.strava.refresh_token.is_empty() {
            return Err(Error::MissingConfig("strava.refresh_token"));
        }

        let urls: [(&'static str, &str); 2] = [
            ("strava.api_base", &self.strava.api_base),
            ("strava.token_url", &self.strava.token_url),
        ];
        for (field, value) in urls {
            Url::parse(value).map_err(|e| Error::InvalidConfig {
                field,
                reason: e.to_string(),
            })?;
        }

        if let Some(hevy) = &self.hevy {
            if hevy.api_key.is_empty() {
                return Err(Error::MissingConfig("hevy.api_key"));
            }
            Url::parse(&hevy.api_base).map_err(|e| Error::InvalidConfig {
                field: "hevy.api_base",
                reason: e.to_string(),
            })?;
        }

        self.reference_timezone()?;

        Ok(())
    }

    /// Parse the configured timezone name into a [`Tz`].
    pub fn reference_timezone(&self) -> Result<Tz> {
        self.aggregation
            .timezone
            .parse::<Tz>()
            .map_err(|e| Error::InvalidConfig {
                field: "aggregation.timezone",
                reason: e.to_string(),
            })
    }

    /// Path of the distance-per-day artifact.
    pub fn distance_map_path(&self) -> PathBuf {
        self.output.dir.join(output::DISTANCE_MAP_FILE)
    }

    /// Path of the dashboard snapshot artifact.
    pub fn snapshot_path(&self) -> PathBuf {
        self.output.dir.join(output::SNAPSHOT_FILE)
    }

    #[allow(dead_code)]
    pub fn save(&self, path: Option<String>) -> Result<()> {
        let config_path = path.unwrap_or_else(default_config_path);

        let parent = Path::new(&config_path)
            .parent()
            .ok_or(Error::InvalidConfig {
                field: "config file",
                reason: "path has no parent directory".to_string(),
            })?;
        fs::create_dir_all(parent)?;

        let content = toml::to_string_pretty(self).map_err(|e| Error::InvalidConfig {
            field: "config file",
            reason: e.to_string(),
        })?;
        fs::write(&config_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Env-var tests mutate process-global state; serialize them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper function to create a sample config
    fn create_sample_config() -> Config {
        Config {
            strava: StravaConfig {
                client_id: "12345".to_string(),
                client_secret: "test_client_secret".to_string(),
                refresh_token: "test_refresh_token".to_string(),
                api_base: default_strava_api_base(),
                token_url: default_strava_token_url(),
            },
            hevy: Some(HevyConfig {
                api_key: "test_hevy_key".to_string(),
                api_base: default_hevy_api_base(),
            }),
            aggregation: AggregationConfig::default(),
            output: OutputConfig::default(),
        }
    }

    /// Helper function to create a temporary config file
    fn create_temp_config_file(content: &str) -> (TempDir, String) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).expect("Failed to write temp config");
        (temp_dir, config_path.to_string_lossy().to_string())
    }

    #[test]
    fn test_config_load_from_file() {
        let config_content = r#"
[strava]
client_id = "file_client_id"
client_secret = "file_client_secret"
refresh_token = "file_refresh_token"
api_base = "http://localhost:9000/api/v3"
token_url = "http://localhost:9000/oauth/token"

[hevy]
api_key = "file_hevy_key"

[aggregation]
timezone = "Europe/Paris"

[output]
dir = "site/data"
"#;

        let (_temp_dir, config_path) = create_temp_config_file(config_content);

        let config = Config::load(Some(config_path)).expect("Failed to load config");

        assert_eq!(config.strava.client_id, "file_client_id");
        assert_eq!(config.strava.api_base, "http://localhost:9000/api/v3");
        assert_eq!(config.strava.token_url, "http://localhost:9000/oauth/token");
        assert_eq!(
            config.hevy.as_ref().map(|h| h.api_key.as_str()),
            Some("file_hevy_key")
        );
        assert_eq!(
            config.hevy.as_ref().map(|h| h.api_base.as_str()),
            Some(endpoints::HEVY_API_BASE)
        );
        assert_eq!(config.aggregation.timezone, "Europe/Paris");
        assert_eq!(config.output.dir, PathBuf::from("site/data"));
    }

    #[test]
    fn test_config_load_minimal_file_uses_defaults() {
        let config_content = r#"
[strava]
client_id = "min_client_id"
client_secret = "min_client_secret"
refresh_token = "min_refresh_token"
"#;

        let (_temp_dir, config_path) = create_temp_config_file(config_content);

        let config = Config::load(Some(config_path)).expect("Failed to load config");

        assert_eq!(config.strava.api_base, endpoints::STRAVA_API_BASE);
        assert_eq!(config.strava.token_url, endpoints::STRAVA_TOKEN_URL);
        assert!(config.hevy.is_none());
        assert_eq!(
            config.aggregation.timezone,
            crate::constants::aggregation::DEFAULT_TIMEZONE
        );
        assert_eq!(config.output.dir, PathBuf::from(output::DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let invalid_toml = "this is not valid toml [[[";
        let (_temp_dir, config_path) = create_temp_config_file(invalid_toml);

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let message = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(
            message.contains("Invalid configuration for config file"),
            "unexpected error: {message}"
        );
    }

    #[test]
    fn test_config_rejects_unknown_timezone() {
        let config_content = r#"
[strava]
client_id = "a"
client_secret = "b"
refresh_token = "c"

[aggregation]
timezone = "Mars/Olympus_Mons"
"#;

        let (_temp_dir, config_path) = create_temp_config_file(config_content);

        let result = Config::load(Some(config_path));
        assert!(matches!(
            result,
            Err(Error::InvalidConfig {
                field: "aggregation.timezone",
                ..
            })
        ));
    }

    #[test]
    fn test_config_rejects_blank_credentials() {
        let config_content = r#"
[strava]
client_id = ""
client_secret = "b"
refresh_token = "c"
"#;

        let (_temp_dir, config_path) = create_temp_config_file(config_content);

        let result = Config::load(Some(config_path));
        assert!(matches!(
            result,
            Err(Error::MissingConfig("strava.client_id"))
        ));
    }

    #[test]
    fn test_config_rejects_bad_api_base() {
        let mut config = create_sample_config();
        config.strava.api_base = "not a url".to_string();

        let result = config.validate();
        assert!(matches!(
            result,
            Err(Error::InvalidConfig {
                field: "strava.api_base",
                ..
            })
        ));
    }

    #[test]
    fn test_config_rejects_blank_hevy_key() {
        let mut config = create_sample_config();
        config.hevy = Some(HevyConfig {
            api_key: String::new(),
            api_base: default_hevy_api_base(),
        });

        let result = config.validate();
        assert!(matches!(result, Err(Error::MissingConfig("hevy.api_key"))));
    }

    #[test]
    fn test_reference_timezone_parses() {
        let config = create_sample_config();
        let tz = config
            .reference_timezone()
            .expect("Failed to parse default timezone");
        assert_eq!(tz, chrono_tz::America::New_York);
    }

    #[test]
    fn test_artifact_paths() {
        let mut config = create_sample_config();
        config.output.dir = PathBuf::from("public");

        assert_eq!(
            config.distance_map_path(),
            PathBuf::from("public/distance-map.json")
        );
        assert_eq!(
            config.snapshot_path(),
            PathBuf::from("public/last-activities.json")
        );
    }

    #[test]
    fn test_config_save_and_reload() {
        let config = create_sample_config();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let config_path_str = config_path.to_string_lossy().to_string();

        config
            .save(Some(config_path_str.clone()))
            .expect("Failed to save config");
        assert!(config_path.exists());

        let loaded = Config::load(Some(config_path_str)).expect("Failed to load saved config");
        assert_eq!(loaded.strava.client_id, config.strava.client_id);
        assert_eq!(loaded.aggregation.timezone, config.aggregation.timezone);
        assert_eq!(
            loaded.hevy.map(|h| h.api_key),
            config.hevy.map(|h| h.api_key)
        );
    }

    #[test]
    fn test_config_load_from_env_vars() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");

        let original: Vec<(&str, Option<String>)> = [
            "STRAVA_CLIENT_ID",
            "STRAVA_CLIENT_SECRET",
            "STRAVA_REFRESH_TOKEN",
            "HEVY_API_KEY",
        ]
        .into_iter()
        .map(|key| (key, std::env::var(key).ok()))
        .collect();

        std::env::set_var("STRAVA_CLIENT_ID", "env_client_id");
        std::env::set_var("STRAVA_CLIENT_SECRET", "env_client_secret");
        std::env::set_var("STRAVA_REFRESH_TOKEN", "env_refresh_token");
        std::env::remove_var("HEVY_API_KEY");

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nonexistent_config.toml");
        let result = Config::load(Some(missing.to_string_lossy().to_string()));

        for (key, value) in original {
            match value {
                Some(val) => std::env::set_var(key, val),
                None => std::env::remove_var(key),
            }
        }

        let config = result.expect("Failed to load config from env");
        assert_eq!(config.strava.client_id, "env_client_id");
        assert_eq!(config.strava.client_secret, "env_client_secret");
        assert_eq!(config.strava.refresh_token, "env_refresh_token");
        assert!(config.hevy.is_none());
    }

    #[test]
    fn test_config_load_missing_env_vars() {
        let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");

        let original = std::env::var("STRAVA_CLIENT_ID").ok();
        std::env::remove_var("STRAVA_CLIENT_ID");

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nonexistent_config.toml");
        let result = Config::load(Some(missing.to_string_lossy().to_string()));

        if let Some(val) = original {
            std::env::set_var("STRAVA_CLIENT_ID", val);
        }

        assert!(matches!(result, Err(Error::MissingConfig(_))));
    }
}
