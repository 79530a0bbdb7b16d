//! Service configuration loaded from the environment (and `.env`).

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::auth::password::{MAX_COST, MIN_COST};

const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub auth_db_path: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match var("PORT") {
            Some(v) => v.trim().parse().context("Invalid PORT")?,
            None => 8080,
        };

        let auth_db_path = resolve_data_path(var("AUTH_DB_PATH"), "mediavault_auth.db");

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                bail!("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes")
            }
            Some(secret) => secret,
            None => {
                warn!("⚠️  JWT_SECRET not set - using development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let jwt_ttl_hours = match var("JWT_TTL_HOURS") {
            Some(v) => v.trim().parse::<i64>().context("Invalid JWT_TTL_HOURS")?,
            None => 24,
        };
        if jwt_ttl_hours <= 0 {
            bail!("JWT_TTL_HOURS must be positive, got {jwt_ttl_hours}");
        }

        let bcrypt_cost = match var("BCRYPT_COST") {
            Some(v) => v.trim().parse::<u32>().context("Invalid BCRYPT_COST")?,
            None => bcrypt::DEFAULT_COST,
        };
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be within {MIN_COST}..={MAX_COST}, got {bcrypt_cost}");
        }

        Ok(Self {
            bind_addr,
            port,
            auth_db_path,
            jwt_secret,
            jwt_ttl_hours,
            bcrypt_cost,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn default_data_path(default_filename: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(default_filename)
        .to_string_lossy()
        .to_string()
}

fn resolve_data_path(env_value: Option<String>, default_filename: &str) -> String {
    let Some(raw) = env_value else {
        return default_data_path(default_filename);
    };

    let p = PathBuf::from(raw);
    if p.is_absolute() {
        return p.to_string_lossy().to_string();
    }

    // Relative paths are relative to the crate root, not the caller's cwd.
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join(p)
        .to_string_lossy()
        .to_string()
}

/// Load `.env` from the working directory (and parents) and from the crate root
pub fn load_env() {
    let _ = dotenv::dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
