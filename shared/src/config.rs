//! Configuration management for Lambda functions.

use std::env;
use validator::Validate;

use crate::{Error, Result};

const DEFAULT_REGION: &str = "eu-west-1";
const DEFAULT_USERS_TABLE: &str = "WebLaunchUsers";
const DEFAULT_APPOINTMENTS_TABLE: &str = "WebLaunchSchedulerAppointmentTable";
const DEFAULT_ENVIRONMENT: &str = "prod";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Validate)]
pub struct Config {
    /// AWS region
    #[validate(length(min = 1))]
    pub aws_region: String,
    /// Table holding user records, including business profiles
    #[validate(length(min = 1))]
    pub users_table_name: String,
    /// Table holding scheduled appointments
    #[validate(length(min = 1))]
    pub appointments_table_name: String,
    /// Deployment stage, used for logging only
    #[validate(length(min = 1))]
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset and empty variables both fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            aws_region: var("AWS_REGION", DEFAULT_REGION),
            users_table_name: var("USERS_TABLE_NAME", DEFAULT_USERS_TABLE),
            appointments_table_name: var("TABLE_NAME", DEFAULT_APPOINTMENTS_TABLE),
            environment: var("ENVIRONMENT", DEFAULT_ENVIRONMENT),
        };

        config
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.users_table_name, "WebLaunchUsers");
        assert_eq!(config.appointments_table_name, "WebLaunchSchedulerAppointmentTable");
        assert_eq!(config.environment, "prod");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("AWS_REGION", "us-east-1"),
            ("USERS_TABLE_NAME", "DevUsers"),
            ("TABLE_NAME", "DevAppointments"),
            ("ENVIRONMENT", "dev"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.users_table_name, "DevUsers");
        assert_eq!(config.appointments_table_name, "DevAppointments");
        assert_eq!(config.environment, "dev");
    }

    #[test]
    fn test_blank_value_falls_back() {
        let config = Config::from_lookup(|key| {
            (key == "TABLE_NAME").then(|| "   ".to_string())
        })
        .unwrap();
        assert_eq!(config.appointments_table_name, "WebLaunchSchedulerAppointmentTable");
    }
}
