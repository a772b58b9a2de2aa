//! Runtime settings read from the environment.

use thiserror::Error;

use crate::domain::value_objects::Money;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DELIVERY_FEE: u64 = 3_000;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub max_connections: u32,
    /// Amount a free-delivery coupon takes off an order.
    pub delivery_fee: Money,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let delivery_fee = Money::new(parse_or(&lookup, "DELIVERY_FEE", DEFAULT_DELIVERY_FEE)?);
        if max_connections == 0 {
            return Err(ConfigError::Invalid { key: "DATABASE_MAX_CONNECTIONS", value: "0".into() });
        }
        Ok(Self { database_url, max_connections, delivery_fee })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
