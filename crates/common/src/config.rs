use anyhow::{Result, anyhow};
use std::env;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_SIGNER_NAME: &str = "Ketua LPK";

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: String,
    pub public_base_url: String,
    pub admin: AdminCredentials,
    pub default_signer_name: String,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env early so process env reads pick it up.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = non_empty(&lookup, "DATABASE_URL")
            .ok_or_else(|| anyhow!("DATABASE_URL is required"))?;

        let listen_addr =
            non_empty(&lookup, "LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

        let public_base_url = normalize_base_url(
            &non_empty(&lookup, "PUBLIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string()),
        )?;

        let email = non_empty(&lookup, "ADMIN_EMAIL")
            .ok_or_else(|| anyhow!("ADMIN_EMAIL is required"))?;
        let password = non_empty(&lookup, "ADMIN_PASSWORD")
            .ok_or_else(|| anyhow!("ADMIN_PASSWORD is required"))?;

        let default_signer_name = non_empty(&lookup, "DEFAULT_SIGNER_NAME")
            .unwrap_or_else(|| DEFAULT_SIGNER_NAME.to_string());

        let db_max_connections = env_u32(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        if db_max_connections == 0 {
            return Err(anyhow!("DB_MAX_CONNECTIONS must be at least 1"));
        }

        Ok(Self {
            database_url,
            listen_addr,
            public_base_url,
            admin: AdminCredentials { email, password },
            default_signer_name,
            db_max_connections,
        })
    }
}

/// 规范化公开访问地址：必须为 http(s)，去掉末尾的 `/`
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| anyhow!("PUBLIC_BASE_URL must start with http:// or https://"))?;
    if rest.is_empty() {
        return Err(anyhow!("PUBLIC_BASE_URL has no host"));
    }
    Ok(trimmed.to_string())
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u32<F>(lookup: &F, key: &str, default: u32) -> Result<u32>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| anyhow!("{} must be a positive integer, got {}", key, raw)),
        None => Ok(default),
    }
}
