//! Server Configuration
//!
//! Read once at startup from the process environment (after `.env`).
//! Missing or malformed required values stop the process before it binds.

use auth::AuthConfig;
use auth::application::config::{DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL, MIN_TOKEN_SECRET_LEN};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let secret_b64 =
            get("AUTH_TOKEN_SECRET").ok_or(ConfigError::Missing("AUTH_TOKEN_SECRET"))?;
        let token_secret =
            platform::crypto::from_base64(&secret_b64).map_err(|e| ConfigError::Invalid {
                name: "AUTH_TOKEN_SECRET",
                reason: format!("not valid base64 ({e})"),
            })?;
        if token_secret.len() < MIN_TOKEN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "AUTH_TOKEN_SECRET",
                reason: format!(
                    "decodes to {} bytes, at least {MIN_TOKEN_SECRET_LEN} required",
                    token_secret.len()
                ),
            });
        }

        let token_ttl = match get("AUTH_TOKEN_TTL_SECS") {
            None => DEFAULT_TOKEN_TTL,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if (1..=MAX_TOKEN_TTL.as_secs()).contains(&secs) => {
                    Duration::from_secs(secs)
                }
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "AUTH_TOKEN_TTL_SECS",
                        reason: format!(
                            "expected 1..={} seconds, got {raw:?}",
                            MAX_TOKEN_TTL.as_secs()
                        ),
                    });
                }
            },
        };

        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
        let database_max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            get("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_DATABASE_MAX_CONNECTIONS,
        )?;

        let frontend_origins = get("FRONTEND_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut auth = AuthConfig::new(token_secret, token_ttl);
        if let Some(pepper) = get("AUTH_PASSWORD_PEPPER") {
            auth = auth.with_pepper(pepper.into_bytes());
        }

        Ok(Self {
            database_url,
            database_max_connections,
            port,
            frontend_origins,
            auth,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            reason: format!("cannot parse {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // 32 bytes of 0x07
    const SECRET: &str = "BwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwc=";

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| env.get(name).cloned())
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgres://localhost/app"),
            ("AUTH_TOKEN_SECRET", SECRET),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = load(&required()).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/app");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.frontend_origins.is_empty());
        assert_eq!(config.auth.token_secret, vec![7u8; 32]);
        assert_eq!(config.auth.token_ttl, Duration::from_secs(3600));
        assert!(config.auth.pepper().is_none());
    }

    #[test]
    fn test_missing_required() {
        assert!(matches!(
            load(&[("AUTH_TOKEN_SECRET", SECRET)]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
        assert!(matches!(
            load(&[("DATABASE_URL", "postgres://localhost/app")]),
            Err(ConfigError::Missing("AUTH_TOKEN_SECRET"))
        ));
        assert!(matches!(
            load(&[("DATABASE_URL", ""), ("AUTH_TOKEN_SECRET", SECRET)]),
            Err(ConfigError::Missing("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_short_or_invalid_secret() {
        let mut vars = required();
        vars[1] = ("AUTH_TOKEN_SECRET", "c2hvcnQ=");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "AUTH_TOKEN_SECRET", .. })
        ));

        vars[1] = ("AUTH_TOKEN_SECRET", "not base64 at all!");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "AUTH_TOKEN_SECRET", .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let mut vars = required();
        vars.extend([
            ("AUTH_TOKEN_TTL_SECS", "120"),
            ("PORT", "8080"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
            ("FRONTEND_ORIGINS", "http://localhost:5173, https://app.example.com,"),
            ("AUTH_PASSWORD_PEPPER", "pepper"),
        ]);

        let config = load(&vars).unwrap();
        assert_eq!(config.auth.token_ttl, Duration::from_secs(120));
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_max_connections, 20);
        assert_eq!(
            config.frontend_origins,
            vec!["http://localhost:5173", "https://app.example.com"]
        );
        assert_eq!(config.auth.pepper(), Some(&b"pepper"[..]));
    }

    #[test]
    fn test_ttl_upper_bound_is_inclusive() {
        let mut vars = required();
        vars.push(("AUTH_TOKEN_TTL_SECS", "2592000"));
        let config = load(&vars).unwrap();
        assert_eq!(config.auth.token_ttl, MAX_TOKEN_TTL);
    }

    #[test]
    fn test_invalid_numbers() {
        for (name, value) in [
            ("AUTH_TOKEN_TTL_SECS", "0"),
            ("AUTH_TOKEN_TTL_SECS", "-5"),
            ("AUTH_TOKEN_TTL_SECS", "soon"),
            ("AUTH_TOKEN_TTL_SECS", "2592001"),
            ("AUTH_TOKEN_TTL_SECS", "18446744073709551615"),
            ("PORT", "70000"),
        ] {
            let mut vars = required();
            vars.push((name, value));
            assert!(
                matches!(load(&vars), Err(ConfigError::Invalid { name: n, .. }) if n == name),
                "{name}={value} accepted"
            );
        }
    }
}
