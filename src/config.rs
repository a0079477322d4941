use std::env;
use std::time::Duration;

use anyhow::{Result, anyhow};

pub const DEFAULT_API_HOST: &str = "api-football-v1.p.rapidapi.com";
const DEFAULT_LEAGUE_ID: u32 = 61;
const DEFAULT_SEASON: u32 = 2025;
const DEFAULT_FIXTURES_NEXT: u32 = 10;
// Free plan: one page of player stats per club.
const DEFAULT_SQUAD_MAX_PAGES: u32 = 1;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_host: String,
    pub league_id: u32,
    pub season: u32,
    pub fixtures_next: u32,
    pub squad_max_pages: u32,
    pub cache_ttl: Duration,
}

impl AppConfig {
    /// Read configuration from the environment. A missing API key is fatal.
    pub fn from_env() -> Result<Self> {
        let api_key = opt_env("API_FOOTBALL_KEY").ok_or_else(|| {
            anyhow!("API_FOOTBALL_KEY is not set (add it to .env or .env.local)")
        })?;
        Ok(Self::with_key(api_key))
    }

    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().trim().to_string(),
            api_host: opt_env("API_FOOTBALL_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_string()),
            league_id: env_u32("APP_LEAGUE_ID", DEFAULT_LEAGUE_ID),
            season: env_u32("APP_SEASON", DEFAULT_SEASON),
            fixtures_next: env_u32("APP_FIXTURES_NEXT", DEFAULT_FIXTURES_NEXT).max(1),
            squad_max_pages: env_u32("APP_SQUAD_MAX_PAGES", DEFAULT_SQUAD_MAX_PAGES).max(1),
            cache_ttl: Duration::from_secs(
                opt_env("APP_CACHE_TTL_SECS")
                    .and_then(|val| val.trim().parse::<u64>().ok())
                    .unwrap_or(DEFAULT_CACHE_TTL_SECS),
            ),
        }
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|val| {
        if val.trim().is_empty() {
            None
        } else {
            Some(val)
        }
    })
}

fn env_u32(key: &str, default: u32) -> u32 {
    opt_env(key)
        .and_then(|val| val.trim().parse::<u32>().ok())
        .filter(|v| *v != 0)
        .unwrap_or(default)
}
