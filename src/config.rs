use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub pool_size: u32,
    pub page_size: i64,
    pub data_dir: PathBuf,
}

impl Config {
    /// Reads `.env` (if any) then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            info!("No .env file loaded: {e}");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            port: try_load(&lookup, "FOODGRAM_PORT", 8000)?,
            pool_size: try_load(&lookup, "FOODGRAM_POOL_SIZE", 10)?,
            page_size: try_load(&lookup, "FOODGRAM_PAGE_SIZE", 6)?,
            data_dir: try_load(&lookup, "FOODGRAM_DATA_DIR", PathBuf::from("data"))?,
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    let Some(value) = lookup(key) else {
        info!("{key} not set, using default: {default:?}");
        return Ok(default);
    };

    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/foodgram")]))
            .unwrap();

        assert_eq!(config.database_url, "postgres://db/foodgram");
        assert_eq!(config.port, 8000);
        assert_eq!(config.pool_size, 10);
        assert_eq!(config.page_size, 6);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/foodgram"),
            ("FOODGRAM_PORT", " 9000 "),
            ("FOODGRAM_PAGE_SIZE", "20"),
            ("FOODGRAM_DATA_DIR", "/srv/seed"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.data_dir, PathBuf::from("/srv/seed"));
    }

    #[test]
    fn unparsable_value_is_an_error() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/foodgram"),
            ("FOODGRAM_PORT", "eighty"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "FOODGRAM_PORT", .. }));
    }
}
