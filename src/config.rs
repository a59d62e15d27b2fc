use anyhow::Context;
use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;

const DEFAULT_MYSQL_PORT: u16 = 3306;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub schema: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub app_host: String,
    pub app_port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| lookup(key).with_context(|| format!("{} is not set", key));

        let url = lookup("DATABASE_URL").filter(|v| !v.is_empty());
        let database = match url {
            Some(url) => DatabaseConfig {
                url: Some(url),
                username: String::new(),
                password: String::new(),
                host: String::new(),
                port: DEFAULT_MYSQL_PORT,
                schema: String::new(),
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            },
            None => {
                let (host, port) = split_host_port(&require("MYSQL_USERS_HOST")?)?;
                DatabaseConfig {
                    url: None,
                    username: require("MYSQL_USERS_USERNAME")?,
                    password: lookup("MYSQL_USERS_PASSWORD").unwrap_or_default(),
                    host,
                    port,
                    schema: require("MYSQL_USERS_SCHEMA")?,
                    max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
                }
            }
        };

        Ok(Self {
            database,
            app_host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            app_port: parse_or(&lookup, "APP_PORT", 8080)?,
        })
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<MySqlConnectOptions> {
        let opts = match &self.url {
            Some(url) => url
                .parse::<MySqlConnectOptions>()
                .context("parse DATABASE_URL")?,
            None => MySqlConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.username)
                .password(&self.password)
                .database(&self.schema),
        };
        Ok(opts.charset("utf8mb4"))
    }
}

/// Accepts `host`, `host:port`, `[v6]` and `[v6]:port`. A bare IPv6 literal
/// such as `::1` keeps the default port.
fn split_host_port(raw: &str) -> anyhow::Result<(String, u16)> {
    let parse_port = |port: &str| {
        port.parse::<u16>()
            .with_context(|| format!("invalid port in MYSQL_USERS_HOST: {}", raw))
    };

    if let Some(rest) = raw.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .with_context(|| format!("unclosed bracket in MYSQL_USERS_HOST: {}", raw))?;
        let port = match tail.strip_prefix(':') {
            Some(port) => parse_port(port)?,
            None if tail.is_empty() => DEFAULT_MYSQL_PORT,
            None => anyhow::bail!("unexpected text after ']' in MYSQL_USERS_HOST: {}", raw),
        };
        return Ok((host.to_string(), port));
    }

    match raw.split_once(':') {
        Some((host, port)) if !port.contains(':') => Ok((host.to_string(), parse_port(port)?)),
        _ => Ok((raw.to_string(), DEFAULT_MYSQL_PORT)),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(v) => v
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {}", key, v)),
        None => Ok(default),
    }
}
