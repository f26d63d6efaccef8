//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::db::keys;
use crate::models::Location;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Directory holding persisted sessions
    pub data_dir: PathBuf,
    /// Key under which the whole workout list is persisted
    pub storage_key: String,
    /// Position reported by the geolocation provider, if any
    pub home_position: Option<Location>,
    /// Initial map zoom level
    pub map_zoom: u8,
    /// How long to wait for the geolocation provider
    pub geolocation_timeout: Duration,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            storage_key: keys::WORKOUTS.to_string(),
            home_position: Some(Location::new(39.0, -12.0)),
            map_zoom: 13,
            geolocation_timeout: Duration::from_secs(10),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_var("PORT", 8080)?,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            storage_key: env::var("STORAGE_KEY").unwrap_or_else(|_| keys::WORKOUTS.to_string()),
            home_position: home_position()?,
            map_zoom: parse_var("MAP_ZOOM", 13)?,
            geolocation_timeout: Duration::from_secs(parse_var("GEOLOCATION_TIMEOUT_SECS", 10)?),
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(name, e.to_string())),
        Err(_) => Ok(default),
    }
}

/// HOME_LATITUDE and HOME_LONGITUDE must be set together.
fn home_position() -> Result<Option<Location>, ConfigError> {
    let lat = env::var("HOME_LATITUDE").ok();
    let lng = env::var("HOME_LONGITUDE").ok();

    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::Missing("HOME_LONGITUDE")),
        (None, Some(_)) => Err(ConfigError::Missing("HOME_LATITUDE")),
        (Some(lat), Some(lng)) => {
            let lat: f64 = lat
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("HOME_LATITUDE", lat.clone()))?;
            let lng: f64 = lng
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("HOME_LONGITUDE", lng.clone()))?;
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ConfigError::Invalid("HOME_LATITUDE", "out of range".into()));
            }
            if !(-180.0..=180.0).contains(&lng) {
                return Err(ConfigError::Invalid("HOME_LONGITUDE", "out of range".into()));
            }
            Ok(Some(Location::new(lat, lng)))
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
