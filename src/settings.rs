//! Server settings from environment variables (a `.env` file is loaded by the binary).

use crate::error::ConfigError;
use crate::geocode::DEFAULT_GEOCODE_TIMEOUT;
use crate::model::Location;
use regex::Regex;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PLACE_IMAGE: &str =
    "https://rsr.akvo.org/media/db/project/305/update/2276/ProjectUpdate_2276_photo_2012-12-03_10.37.58.jpg";
pub const DEFAULT_USER_IMAGE: &str = "https://www.gravatar.com/avatar/?d=mp&s=256";

/// Empire State Building; returned for every address when no geocoding key is set.
pub const FALLBACK_LOCATION: Location = Location {
    lat: 40.7484405,
    lng: -73.9878584,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::UnknownStorage(s.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub database_url: String,
    pub db_max_connections: u32,
    /// PostgreSQL schema holding `users` and `places`.
    pub db_schema: String,
    /// When `None`, places are geocoded to `geocode_fallback`.
    pub google_api_key: Option<String>,
    pub geocode_fallback: Location,
    pub geocode_timeout: Duration,
    pub default_place_image: String,
    pub default_user_image: String,
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = parse_or(&get, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 5000)))?;
        let storage = match get("STORAGE") {
            Some(s) => s.parse()?,
            None => StorageBackend::Postgres,
        };
        let db_schema = get("DB_SCHEMA").unwrap_or_else(|| "public".into());
        if !is_identifier(&db_schema) {
            return Err(ConfigError::InvalidSchema(db_schema));
        }
        let geocode_fallback = Location {
            lat: parse_or(&get, "GEOCODE_FALLBACK_LAT", FALLBACK_LOCATION.lat)?,
            lng: parse_or(&get, "GEOCODE_FALLBACK_LNG", FALLBACK_LOCATION.lng)?,
        };
        let geocode_timeout =
            Duration::from_secs(parse_or(&get, "GEOCODE_TIMEOUT_SECS", DEFAULT_GEOCODE_TIMEOUT.as_secs())?);

        Ok(ServerConfig {
            bind_addr,
            storage,
            database_url: get("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/places".into()),
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5)?,
            db_schema,
            google_api_key: get("GOOGLE_API_KEY"),
            geocode_fallback,
            geocode_timeout,
            default_place_image: get("DEFAULT_PLACE_IMAGE").unwrap_or_else(|| DEFAULT_PLACE_IMAGE.into()),
            default_user_image: get("DEFAULT_USER_IMAGE").unwrap_or_else(|| DEFAULT_USER_IMAGE.into()),
            body_limit_bytes: parse_or(&get, "BODY_LIMIT_BYTES", 1024 * 1024)?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn is_identifier(s: &str) -> bool {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$")
        .map(|re| re.is_match(s))
        .unwrap_or(false)
}
