use chrono::FixedOffset;
use models::academic_year::utc_offset;
use std::net::SocketAddr;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;
const DEFAULT_STAFF_ROLES: &str = "course_manager,system_admin";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("BIND_ADDRESS '{0}' is not a valid socket address")]
    InvalidBindAddress(String),
    #[error("UTC_OFFSET_HOURS '{0}' must be a whole number of hours between -23 and 23")]
    InvalidUtcOffset(String),
    #[error("STAFF_ROLES must name at least one role")]
    NoStaffRoles,
}

/// Server settings read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub bind_address: SocketAddr,
    /// Offset used when showing registration times to users
    pub utc_offset: FixedOffset,
    /// Token groups or roles allowed to run staff-only operations
    pub staff_roles: Vec<String>,
}

impl Config {
    /// Reads the configuration from process environment variables.
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(bind_address))?;

        let utc_offset = match lookup("UTC_OFFSET_HOURS") {
            Some(hours) => hours
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(utc_offset)
                .ok_or(ConfigError::InvalidUtcOffset(hours))?,
            None => utc_offset(DEFAULT_UTC_OFFSET_HOURS)
                .ok_or_else(|| ConfigError::InvalidUtcOffset(DEFAULT_UTC_OFFSET_HOURS.to_string()))?,
        };

        let staff_roles: Vec<String> = lookup("STAFF_ROLES")
            .unwrap_or_else(|| DEFAULT_STAFF_ROLES.to_string())
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect();
        if staff_roles.is_empty() {
            return Err(ConfigError::NoStaffRoles);
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            bind_address,
            utc_offset,
            staff_roles,
        })
    }
}
