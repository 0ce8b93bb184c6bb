// Configuration de l'application, lue une seule fois au démarrage.
// Les composants reçoivent ce qu'il leur faut (secret JWT, URL de la BD)
// au lieu de lire l'environnement eux-mêmes.

use std::env;
use std::str::FromStr;

use chrono::{TimeDelta, Utc};
use thiserror::Error;

const DEFAULT_JWT_SECRET: &str = "change_this_secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {key}={value} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    /// Durée de validité d'un token (jours)
    pub token_ttl_days: i64,
    /// Nombre d'itérations PBKDF2 pour les nouveaux hashs
    pub password_iterations: u32,
    pub seed_sample_books: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: "sqlite://library.db?mode=rwc".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_days: 7,
            password_iterations: 260_000,
            seed_sample_books: true,
        }
    }
}

impl AppConfig {
    /// Construit la configuration depuis les variables d'environnement
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Variante testable : `lookup` remplace `std::env::var`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set, using default (INSECURE)");
                defaults.jwt_secret
            }
        };

        let seed_sample_books = match lookup("SEED_SAMPLE_BOOKS") {
            Some(raw) => parse_bool("SEED_SAMPLE_BOOKS", &raw)?,
            None => defaults.seed_sample_books,
        };

        let config = Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", lookup("PORT"), defaults.port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            jwt_secret,
            token_ttl_days: parse_or("TOKEN_TTL_DAYS", lookup("TOKEN_TTL_DAYS"), defaults.token_ttl_days)?,
            password_iterations: parse_or(
                "PASSWORD_ITERATIONS",
                lookup("PASSWORD_ITERATIONS"),
                defaults.password_iterations,
            )?,
            seed_sample_books,
        };

        if config.token_ttl_days <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_DAYS",
                value: config.token_ttl_days.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        // Une durée hors des bornes de chrono ferait paniquer TokenService::new
        let ttl_in_range = TimeDelta::try_days(config.token_ttl_days)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .is_some();
        if !ttl_in_range {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_DAYS",
                value: config.token_ttl_days.to_string(),
                reason: "out of range".to_string(),
            });
        }
        if config.password_iterations == 0 {
            return Err(ConfigError::Invalid {
                key: "PASSWORD_ITERATIONS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(config)
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.token_ttl_days, 7);
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
        assert!(config.seed_sample_books);
    }

    #[test]
    fn test_values_from_env() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://localhost/library"),
            ("PASSWORD_ITERATIONS", "1000"),
            ("SEED_SAMPLE_BOOKS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.database_url, "postgres://localhost/library");
        assert_eq!(config.password_iterations, 1000);
        assert!(!config.seed_sample_books);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "PORT", .. })));
    }

    #[test]
    fn test_non_positive_ttl_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("TOKEN_TTL_DAYS", "0")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "TOKEN_TTL_DAYS", .. })));
    }

    #[test]
    fn test_huge_ttl_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("TOKEN_TTL_DAYS", "9223372036854775807")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "TOKEN_TTL_DAYS", .. })));

        let result = AppConfig::from_lookup(lookup_from(&[("TOKEN_TTL_DAYS", "100000000")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key: "TOKEN_TTL_DAYS", .. })));

        let config = AppConfig::from_lookup(lookup_from(&[("TOKEN_TTL_DAYS", "3650")])).unwrap();
        assert_eq!(config.token_ttl_days, 3650);
    }
}
