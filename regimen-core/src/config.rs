//! Settings read from the environment.
//!
//! | Variable             | Default               |
//! |----------------------|-----------------------|
//! | `DATABASE_URL`       | `sqlite://regimen.db` |
//! | `REGIMEN_LOG`        | `info`                |
//! | `REGIMEN_EMPTY_SETS` | `halt` (or `skip`)    |

use std::env;

use log::LevelFilter;

use crate::cascade::{CascadeOptions, EmptySetPolicy};
use crate::error::{Error, Result};
use crate::logging::parse_level;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://regimen.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub log_level: LevelFilter,
    pub cascade: CascadeOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_level: LevelFilter::Info,
            cascade: CascadeOptions::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for
    /// missing keys. Present but unparseable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            config.database_url = url;
        }
        if let Some(level) = lookup("REGIMEN_LOG") {
            config.log_level = parse_level(&level)
                .ok_or_else(|| Error::Config(format!("unknown log level '{}'", level)))?;
        }
        if let Some(policy) = lookup("REGIMEN_EMPTY_SETS") {
            config.cascade.empty_sets = EmptySetPolicy::parse(&policy).ok_or_else(|| {
                Error::Config(format!(
                    "REGIMEN_EMPTY_SETS must be 'halt' or 'skip', got '{}'",
                    policy
                ))
            })?;
        }

        Ok(config)
    }
}
