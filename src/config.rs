use std::str::FromStr;

use crate::error::Error;
use crate::impls::captcha::turnstile::SITEVERIFY_URL;

/// Cloudflare's always-pass test secret.
pub const DEV_TURNSTILE_SECRET: &str = "1x0000000000000000000000000000000AA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(Error::ConfigError(format!("unknown STORE {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: String,
    pub port: u16,
    pub upload_path: String,
    pub auth_secret: String,
    pub turnstile_secret: String,
    pub turnstile_verify_url: String,
    pub bootstrap: Option<Bootstrap>,
}

fn parse<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T, Error> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| Error::ConfigError(format!("invalid {}: {}", key, v))),
    }
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, Error>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let database_url = get("DATABASE_URL");
        let store = match get("STORE") {
            Some(s) => s.parse()?,
            None if database_url.is_some() => StoreKind::Postgres,
            None => StoreKind::Memory,
        };
        if store == StoreKind::Postgres && database_url.is_none() {
            return Err(Error::ConfigError("DATABASE_URL is required for the postgres store".into()));
        }
        let auth_secret = get("AUTH_SECRET").ok_or_else(|| Error::ConfigError("AUTH_SECRET is not set".into()))?;
        let turnstile_secret = get("TURNSTILE_SECRET").unwrap_or_else(|| {
            log::warn!("TURNSTILE_SECRET is not set, using the always-pass test secret");
            DEV_TURNSTILE_SECRET.to_owned()
        });
        let bootstrap = match (get("BOOTSTRAP_USERNAME"), get("BOOTSTRAP_PASSWORD")) {
            (Some(username), Some(password)) => Some(Bootstrap { username, password }),
            (None, None) => None,
            _ => return Err(Error::ConfigError("BOOTSTRAP_USERNAME and BOOTSTRAP_PASSWORD go together".into())),
        };
        Ok(Config {
            store,
            database_url,
            max_connections: parse("MAX_CONNECTIONS", get("MAX_CONNECTIONS"), 5)?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse("PORT", get("PORT"), 8000)?,
            upload_path: get("UPLOAD_PATH").unwrap_or_else(|| "uploads".into()),
            auth_secret,
            turnstile_secret,
            turnstile_verify_url: get("TURNSTILE_VERIFY_URL").unwrap_or_else(|| SITEVERIFY_URL.into()),
            bootstrap,
        })
    }
}
