use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use planwise_core::timezone::validate_timezone;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "planwise.toml";
pub const DEFAULT_DATABASE_PATH: &str = "planwise.db";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Acting user when `--user` is not given
    #[serde(default)]
    pub user: Option<String>,
    /// IANA zone used to place due dates on the calendar
    #[serde(default = "detect_system_timezone")]
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            user: None,
            timezone: detect_system_timezone(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("PLANWISE_"))
    }

    /// The configured zone, or UTC when the configured name is not a valid zone.
    pub fn tz(&self) -> Tz {
        validate_timezone(&self.timezone).unwrap_or_else(|e| {
            tracing::warn!(timezone = %self.timezone, error = %e, "falling back to UTC");
            Tz::UTC
        })
    }
}

fn default_database_path() -> String {
    DEFAULT_DATABASE_PATH.to_string()
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(local_tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&local_tz).is_ok() {
            return local_tz;
        }
    }

    "UTC".to_string()
}
