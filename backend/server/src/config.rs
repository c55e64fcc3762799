use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use tracing::{info, warn};

use crate::error::AppError;

pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            bind_addr: try_load("BIND_ADDR", "0.0.0.0")?,
            port: try_load("PORT", "5000")?,
            db_path: try_load("DB_PATH", "/app/app.db")?,
            static_dir: try_load("STATIC_DIR", "static")?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AppError::Config(format!("{key}: {e}"))
        })
}
