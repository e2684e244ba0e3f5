//! Application configuration loaded from environment variables.

use crate::models::RankOrder;
use std::env;

/// Largest page size the Strava activity list endpoint accepts.
pub const MAX_STRAVA_PAGE_SIZE: u32 = 200;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON snapshot holding races, athletes, teams and activities
    pub data_path: String,
    /// Which end of the point scale ranks first
    pub rank_order: RankOrder,
    /// Strava API base URL
    pub strava_api_url: String,
    /// Import Strava activities for linked athletes before ranking
    pub strava_import: bool,
    /// Activities requested per Strava list page
    pub strava_page_size: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            data_path: "data/snapshot.json".to_string(),
            rank_order: RankOrder::Descending,
            strava_api_url: "https://www.strava.com/api/v3".to_string(),
            strava_import: false,
            strava_page_size: 100,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let rank_order = match env::var("RANK_ORDER") {
            Ok(raw) => raw
                .parse::<RankOrder>()
                .map_err(|e: String| ConfigError::Invalid("RANK_ORDER", e))?,
            Err(_) => defaults.rank_order,
        };

        let strava_page_size = match env::var("STRAVA_PAGE_SIZE") {
            Ok(raw) => {
                let size: u32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("STRAVA_PAGE_SIZE", raw.clone()))?;
                if size == 0 || size > MAX_STRAVA_PAGE_SIZE {
                    return Err(ConfigError::Invalid("STRAVA_PAGE_SIZE", raw));
                }
                size
            }
            Err(_) => defaults.strava_page_size,
        };

        Ok(Self {
            data_path: env::var("DATA_PATH").unwrap_or(defaults.data_path),
            rank_order,
            strava_api_url: env::var("STRAVA_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.strava_api_url),
            strava_import: env::var("STRAVA_IMPORT")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
            strava_page_size,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations don't race with each other.
    #[test]
    fn test_config_from_env() {
        env::set_var("DATA_PATH", "/tmp/race.json");
        env::set_var("RANK_ORDER", "asc");
        env::set_var("STRAVA_API_URL", "http://localhost:9999/api/v3/");
        env::set_var("STRAVA_PAGE_SIZE", "50");
        env::set_var("STRAVA_IMPORT", "true");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.data_path, "/tmp/race.json");
        assert_eq!(config.rank_order, RankOrder::Ascending);
        assert_eq!(config.strava_api_url, "http://localhost:9999/api/v3");
        assert_eq!(config.strava_page_size, 50);
        assert!(config.strava_import);

        env::set_var("STRAVA_PAGE_SIZE", "500");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("STRAVA_PAGE_SIZE", _))
        ));

        env::set_var("STRAVA_PAGE_SIZE", "50");
        env::set_var("RANK_ORDER", "upside-down");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("RANK_ORDER", _))
        ));

        for key in [
            "DATA_PATH",
            "RANK_ORDER",
            "STRAVA_API_URL",
            "STRAVA_PAGE_SIZE",
            "STRAVA_IMPORT",
        ] {
            env::remove_var(key);
        }
    }
}
