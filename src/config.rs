use crate::{default_struct, locale::Locale};
use std::{env, time::Duration};
use thiserror::Error;

pub const POOL_MIN_CONNECTIONS: u32 = 1;
pub const POOL_MAX_CONNECTIONS: u32 = 5;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Waiting for a free pooled connection is effectively unbounded; only the
/// initial connect is time-limited.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is missing")]
    Missing(&'static str),
    #[error("{key} is not a valid number: {value:?}")]
    Number { key: &'static str, value: String },
    #[error("unknown locale {0:?} (expected \"ru\" or \"en\")")]
    Locale(String),
}

default_struct! {
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String = "localhost",
    pub port: u16 = 3306u16,
    pub user: String = "root",
    pub password: String,
    pub database: String = "minecraft",
}
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// Guild to register commands in; zero registers them globally.
    pub guild_id: u64,
    pub db: DbConfig,
    pub locale: Locale,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let guild_id = match lookup("GUILD_ID") {
            Some(raw) => parse_number("GUILD_ID", raw)?,
            None => 0,
        };

        let defaults = DbConfig::default();
        let db = DbConfig {
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port: match lookup("DB_PORT") {
                Some(raw) => parse_number("DB_PORT", raw)?,
                None => defaults.port,
            },
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            database: lookup("DB_NAME").unwrap_or(defaults.database),
        };

        let locale = match lookup("BOT_LOCALE") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Locale(raw))?,
            None => Locale::default(),
        };

        Ok(Self {
            token,
            guild_id,
            db,
            locale,
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Number { key, value: raw })
}
