use serde::Deserialize;
use std::env;

use chrono::{FixedOffset, NaiveDate, Utc};

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub reporting: ReportingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

/// Business-date resolution settings.
///
/// The reporting calendar runs in a fixed UTC offset (default +9, the
/// deployment's office timezone) so "today" — and therefore the current
/// week/month and the edit window — does not drift with the server's
/// timezone.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    pub utc_offset_hours: i32,
}

impl ReportingConfig {
    /// Today's calendar date in the configured business timezone.
    ///
    /// An out-of-range offset falls back to UTC rather than failing the
    /// request that needed a date.
    pub fn business_today(&self) -> NaiveDate {
        match FixedOffset::east_opt(self.utc_offset_hours * 3600) {
            Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
            None => Utc::now().date_naive(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("TALLY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("TALLY_PORT", 3000),
                api_keys: env::var("TALLY_API_KEYS")
                    .map(|keys| keys.split(',').map(|s| s.trim().to_string()).collect())
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:tally.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            reporting: ReportingConfig {
                utc_offset_hours: parse_env_or("REPORT_UTC_OFFSET_HOURS", 9),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
