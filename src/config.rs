use anyhow::{Context, Result};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    pub init_sql_path: String,
    pub jwt_signing_key: String,
    pub max_page_size: u32,
}

impl Config {
    /// Reads the process environment, after any `.env` file has been loaded.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            port: parse_or(&lookup, "PORT", 3000)?,
            db_path: lookup("SQLITE_DBPATH").unwrap_or_else(|| "questions.sqlite".into()),
            init_sql_path: lookup("DATABASE_INIT_SQL").unwrap_or_else(|| "database_init.sql".into()),
            jwt_signing_key: lookup("JWT_SIGNING_KEY").unwrap_or_else(|| "secret".into()),
            max_page_size: parse_or(&lookup, "MAX_PAGE_SIZE", 1000)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value.trim().parse().with_context(|| format!("invalid value for {}: {:?}", key, value)),
        None => Ok(default),
    }
}
