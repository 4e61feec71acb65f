use dotenv::dotenv;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

use crate::services::session::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE_TIMEOUT};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Settings for the booking form service, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub booking_api_endpoint: String,
    pub booking_api_timeout: Duration,
    pub host: IpAddr,
    pub port: u16,
    pub request_timeout: Duration,
    pub confirmation_path_prefix: String,
    pub max_sessions: usize,
    pub session_idle_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            booking_api_endpoint: "https://api.example.com".to_string(),
            booking_api_timeout: Duration::from_secs(8),
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            request_timeout: Duration::from_secs(10),
            confirmation_path_prefix: "/booking/confirmation".to_string(),
            max_sessions: DEFAULT_MAX_SESSIONS,
            session_idle_timeout: DEFAULT_SESSION_IDLE_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using `lookup` for each variable; missing variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let booking_api_endpoint = lookup("BOOKING_API_ENDPOINT")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.booking_api_endpoint);

        let booking_api_timeout = match lookup("BOOKING_API_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_seconds("BOOKING_API_TIMEOUT_SECS", &value)?),
            None => defaults.booking_api_timeout,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_seconds("REQUEST_TIMEOUT_SECS", &value)?),
            None => defaults.request_timeout,
        };

        // The HTTP timeout must outlast the bookings API call it wraps
        if request_timeout <= booking_api_timeout {
            return Err(ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_SECS",
                expected: "longer than BOOKING_API_TIMEOUT_SECS",
                value: request_timeout.as_secs().to_string(),
            });
        }

        let host = match lookup("SERVER_HOST") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_HOST",
                expected: "an IP address",
                value,
            })?,
            None => defaults.host,
        };

        let port = match lookup("SERVER_PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_PORT",
                expected: "a port number",
                value,
            })?,
            None => defaults.port,
        };

        let confirmation_path_prefix = lookup("CONFIRMATION_PATH_PREFIX")
            .map(|value| value.trim_end_matches('/').to_string())
            .unwrap_or(defaults.confirmation_path_prefix);

        let max_sessions = match lookup("MAX_SESSIONS") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(max) if max > 0 => max,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "MAX_SESSIONS",
                        expected: "a positive number",
                        value,
                    })
                }
            },
            None => defaults.max_sessions,
        };

        let session_idle_timeout = match lookup("SESSION_IDLE_TIMEOUT_SECS") {
            Some(value) => {
                Duration::from_secs(parse_seconds("SESSION_IDLE_TIMEOUT_SECS", &value)?)
            }
            None => defaults.session_idle_timeout,
        };

        Ok(Self {
            booking_api_endpoint,
            booking_api_timeout,
            host,
            port,
            request_timeout,
            confirmation_path_prefix,
            max_sessions,
            session_idle_timeout,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_seconds(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "a positive number of seconds",
            value: value.to_string(),
        }),
    }
}
