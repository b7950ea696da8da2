use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use dotenvy::dotenv;
use tracing::info;

use crate::auth::lock::LockTimeoutPolicy;
use crate::error::CustomError;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub endpoint_path: String,
    pub database_url: String,
    pub sheet_name: String,
    pub lock_timeout: Duration,
    pub lock_timeout_policy: LockTimeoutPolicy,
    pub endpoint_url: String,
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn load() -> Result<Self, CustomError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CustomError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let var = |key: &str, default: &str| -> Result<String, CustomError> {
            match lookup(key) {
                Ok(value) => Ok(value),
                Err(env::VarError::NotPresent) => {
                    info!("{key} not set, using default: {default}");
                    Ok(default.to_string())
                }
                Err(e) => Err(CustomError::EnvError(key.to_string(), e)),
            }
        };

        let endpoint_path = var("ENDPOINT_PATH", "/exec")?;
        if !endpoint_path.starts_with('/') {
            return Err(CustomError::InvalidConfig(
                "ENDPOINT_PATH".to_string(),
                "must start with '/'".to_string(),
            ));
        }

        let sheet_name = var("SHEET_NAME", "accounts")?;
        if sheet_name.is_empty()
            || !sheet_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(CustomError::InvalidConfig(
                "SHEET_NAME".to_string(),
                "only ASCII letters, digits and '_' are allowed".to_string(),
            ));
        }

        let lock_timeout_ms: u64 = parse("LOCK_TIMEOUT_MS", var("LOCK_TIMEOUT_MS", "10000")?)?;

        Ok(Config {
            bind_addr: parse("SERVER_ADDR", var("SERVER_ADDR", "127.0.0.1:7879")?)?,
            endpoint_path,
            database_url: var("DATABASE_URL", "sqlite:accounts.db?mode=rwc")?,
            sheet_name,
            lock_timeout: Duration::from_millis(lock_timeout_ms),
            lock_timeout_policy: parse(
                "LOCK_TIMEOUT_POLICY",
                var("LOCK_TIMEOUT_POLICY", "proceed")?,
            )?,
            endpoint_url: var("AUTH_ENDPOINT_URL", "http://127.0.0.1:7879/exec")?,
        })
    }
}

fn parse<T>(key: &str, value: String) -> Result<T, CustomError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| CustomError::InvalidConfig(key.to_string(), e.to_string()))
}
