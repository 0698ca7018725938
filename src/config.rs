//! Server configuration from the environment

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DB_FILE: &str = "stickynotes.db";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// One year
const MAX_TOKEN_TTL_HOURS: i64 = 8760;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(jwt_secret) = var("JWT_SECRET") else {
            bail!("JWT_SECRET must be set to sign session tokens");
        };
        if jwt_secret.len() < 32 {
            warn!("⚠️  JWT_SECRET is shorter than 32 bytes, use a longer secret in production");
        }

        let token_ttl_hours = match var("TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|h| (1..=MAX_TOKEN_TTL_HOURS).contains(h))
                .with_context(|| {
                    format!("Invalid TOKEN_TTL_HOURS (expected 1-{MAX_TOKEN_TTL_HOURS}): {raw}")
                })?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };

        let bcrypt_cost = match var("BCRYPT_COST") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|c| (4..=31).contains(c))
                .with_context(|| format!("Invalid BCRYPT_COST (expected 4-31): {raw}"))?,
            None => bcrypt::DEFAULT_COST,
        };

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| {
            info!("BIND_ADDR not set, using default: {DEFAULT_BIND_ADDR}");
            DEFAULT_BIND_ADDR.to_string()
        });

        Ok(Self {
            bind_addr,
            database_path: resolve_data_path(var("DATABASE_PATH"), DEFAULT_DB_FILE),
            jwt_secret,
            token_ttl_hours,
            bcrypt_cost,
        })
    }
}

fn resolve_data_path(env_value: Option<String>, default_filename: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = env_value.unwrap_or_else(|| default_filename.to_string());

    if raw == ":memory:" {
        return raw;
    }

    let p = PathBuf::from(raw);
    if p.is_absolute() {
        return p.to_string_lossy().to_string();
    }

    // Treat relative paths as relative to the crate, not the caller's cwd.
    base.join(p).to_string_lossy().to_string()
}

pub fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate's own .env (common when running with --manifest-path from elsewhere)
    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("JWT_SECRET", "   ")]).is_err());
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("JWT_SECRET", "s")]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.database_path.ends_with(DEFAULT_DB_FILE));
        assert!(Path::new(&config.database_path).is_absolute());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("JWT_SECRET", "s"),
            ("BIND_ADDR", "127.0.0.1:8000"),
            ("TOKEN_TTL_HOURS", "8"),
            ("BCRYPT_COST", "10"),
            ("DATABASE_PATH", "/tmp/notes.db"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.token_ttl_hours, 8);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.database_path, "/tmp/notes.db");
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(config_from(&[("JWT_SECRET", "s"), ("TOKEN_TTL_HOURS", "0")]).is_err());
        assert!(config_from(&[("JWT_SECRET", "s"), ("TOKEN_TTL_HOURS", "soon")]).is_err());
        assert!(config_from(&[("JWT_SECRET", "s"), ("TOKEN_TTL_HOURS", "8761")]).is_err());
        assert!(config_from(&[("JWT_SECRET", "s"), ("TOKEN_TTL_HOURS", "3000000000")]).is_err());
        assert!(config_from(&[("JWT_SECRET", "s"), ("TOKEN_TTL_HOURS", "3000000000000")]).is_err());
        assert_eq!(
            config_from(&[("JWT_SECRET", "s"), ("TOKEN_TTL_HOURS", "8760")])
                .unwrap()
                .token_ttl_hours,
            8760
        );
        assert!(config_from(&[("JWT_SECRET", "s"), ("BCRYPT_COST", "2")]).is_err());
    }

    #[test]
    fn test_memory_database_path_kept() {
        let config = config_from(&[("JWT_SECRET", "s"), ("DATABASE_PATH", ":memory:")]).unwrap();
        assert_eq!(config.database_path, ":memory:");
    }
}
