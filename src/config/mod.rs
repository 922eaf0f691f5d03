use crate::eligibility::{EligibilityPolicy, DEFAULT_RETURN_WINDOW_DAYS};
use crate::errors::ConfigError;

const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_addr: String,
    pub policy: EligibilityPolicy,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.into());

        let return_window_days = match lookup("RETURN_WINDOW_DAYS") {
            None => DEFAULT_RETURN_WINDOW_DAYS,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map(i64::from)
                .map_err(|_| ConfigError::Invalid {
                    key: "RETURN_WINDOW_DAYS",
                    value: raw.clone(),
                })?,
        };

        Ok(Self {
            server_addr,
            policy: EligibilityPolicy { return_window_days },
        })
    }
}
