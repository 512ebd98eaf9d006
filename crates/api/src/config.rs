//! Process configuration read from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `DATABASE_URL` | unset: in-memory store |
//! | `JWT_SECRET` | insecure dev value |
//! | `JWT_ISSUER` | `bistro` |
//! | `JWT_AUDIENCE` | `bistro-api` |
//! | `JWT_EXPIRY_MINUTES` | `60` |
//! | `SEED_SAMPLE_DATA` | `false` |
//! | `LOG_FORMAT` | `json` |

use std::net::SocketAddr;

use thiserror::Error;

use bistro_auth::JwtSettings;
use bistro_observability::LogFormat;

const DEV_JWT_SECRET: &str = "bistro-dev-secret-change-me";

/// One year. Larger lifetimes overflow token timestamps.
const MAX_JWT_EXPIRY_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub jwt: JwtSettings,
    /// True when `JWT_SECRET` was absent and the dev secret is in use.
    pub jwt_secret_defaulted: bool,
    pub seed_sample_data: bool,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = parse(&var, "BIND_ADDR", "socket address")?
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

        let secret = var("JWT_SECRET");
        let jwt_secret_defaulted = secret.is_none();
        let expiry_minutes: i64 = parse(&var, "JWT_EXPIRY_MINUTES", "number of minutes (1..=525600)")?.unwrap_or(60);
        if !(1..=MAX_JWT_EXPIRY_MINUTES).contains(&expiry_minutes) {
            return Err(ConfigError::Invalid {
                var: "JWT_EXPIRY_MINUTES",
                expected: "number of minutes (1..=525600)",
                value: expiry_minutes.to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            database_url: var("DATABASE_URL"),
            jwt: JwtSettings {
                issuer: var("JWT_ISSUER").unwrap_or_else(|| "bistro".to_string()),
                audience: var("JWT_AUDIENCE").unwrap_or_else(|| "bistro-api".to_string()),
                signing_key: secret.unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
                expiry_minutes,
            },
            jwt_secret_defaulted,
            seed_sample_data: parse_bool(&var, "SEED_SAMPLE_DATA")?.unwrap_or(false),
            log_format: parse(&var, "LOG_FORMAT", "log format (json|pretty)")?.unwrap_or_default(),
        })
    }
}

fn parse<T: core::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    var(name)
        .map(|value| {
            value.parse().map_err(|_| ConfigError::Invalid {
                var: name,
                expected,
                value,
            })
        })
        .transpose()
}

fn parse_bool(var: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<Option<bool>, ConfigError> {
    var(name)
        .map(|value| match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                var: name,
                expected: "boolean",
                value,
            }),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(s.database_url, None);
        assert_eq!(s.jwt.issuer, "bistro");
        assert_eq!(s.jwt.audience, "bistro-api");
        assert_eq!(s.jwt.expiry_minutes, 60);
        assert!(s.jwt_secret_defaulted);
        assert!(!s.seed_sample_data);
        assert_eq!(s.log_format, LogFormat::Json);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let s = settings(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("DATABASE_URL", "postgres://localhost/bistro"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRY_MINUTES", "15"),
            ("SEED_SAMPLE_DATA", "true"),
            ("LOG_FORMAT", "pretty"),
        ])
        .unwrap();

        assert_eq!(s.bind_addr.port(), 3000);
        assert_eq!(s.database_url.as_deref(), Some("postgres://localhost/bistro"));
        assert_eq!(s.jwt.signing_key, "s3cret");
        assert!(!s.jwt_secret_defaulted);
        assert_eq!(s.jwt.expiry_minutes, 15);
        assert!(s.seed_sample_data);
        assert_eq!(s.log_format, LogFormat::Pretty);
    }

    #[test]
    fn empty_values_count_as_unset() {
        let s = settings(&[("DATABASE_URL", "  "), ("JWT_SECRET", "")]).unwrap();
        assert_eq!(s.database_url, None);
        assert!(s.jwt_secret_defaulted);
    }

    #[test]
    fn invalid_values_are_reported_with_the_variable_name() {
        let err = settings(&[("JWT_EXPIRY_MINUTES", "soon")]).unwrap_err();
        assert!(err.to_string().contains("JWT_EXPIRY_MINUTES"));

        assert!(settings(&[("JWT_EXPIRY_MINUTES", "0")]).is_err());
        assert!(settings(&[("SEED_SAMPLE_DATA", "maybe")]).is_err());
        assert!(settings(&[("BIND_ADDR", "localhost")]).is_err());
        assert!(settings(&[("LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn token_lifetime_is_capped_at_one_year() {
        let s = settings(&[("JWT_EXPIRY_MINUTES", "525600")]).unwrap();
        assert_eq!(s.jwt.expiry_minutes, MAX_JWT_EXPIRY_MINUTES);

        let err = settings(&[("JWT_EXPIRY_MINUTES", "525601")]).unwrap_err();
        assert!(err.to_string().contains("JWT_EXPIRY_MINUTES"));
        assert!(settings(&[("JWT_EXPIRY_MINUTES", "1000000000000000")]).is_err());
    }
}
