use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub admin_password: String,
    pub admin_session_timeout_secs: u64,
    pub contact_rate_limit: u32,
    pub public_rate_limit: u32,
    pub message_server_url: Option<String>,
    pub message_server_password: Option<String>,
    pub site_url: Url,
    pub static_dir: String,
    pub cookie_secure: bool,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8000"),
            database_url: get_env_or("DATABASE_URL", "sqlite://portfolio.db"),
            admin_password: get_env("ADMIN_PASSWORD")?,
            admin_session_timeout_secs: get_env_parse_or("ADMIN_SESSION_TIMEOUT_SECS", 3600)?,
            contact_rate_limit: get_env_parse_or("CONTACT_RATE_LIMIT", 5)?,
            public_rate_limit: get_env_parse_or("PUBLIC_RATE_LIMIT", 200)?,
            message_server_url: get_env_opt("MESSAGE_SERVER_URL"),
            message_server_password: get_env_opt("MESSAGE_SERVER_PASSWORD"),
            site_url: parse_site_url(&get_env_or("SITE_URL", "http://localhost:8000"))?,
            static_dir: get_env_or("STATIC_DIR", "static"),
            cookie_secure: get_env_parse_or("COOKIE_SECURE", false)?,
        })
    }
}

pub fn parse_site_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::Config(format!("Invalid value for SITE_URL: {}", e)))
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn get_env_or(name: &str, default: &str) -> String {
    get_env_opt(name).unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_url_must_be_absolute() {
        assert!(parse_site_url("https://example.com/").is_ok());
        assert!(matches!(parse_site_url("example.com"), Err(Error::Config(_))));
    }
}
