use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use shared::DEFAULT_TARGET_PERCENTAGE;

const DEFAULT_DATABASE_URL: &str = "sqlite:attendance.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_REGION: &str = "VIC";

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    /// Holiday region used by summaries and as the default for new holidays
    pub default_region: String,
    /// Target given to users created without one
    pub default_target_percentage: f64,
}

impl AppConfig {
    /// Load from process environment variables. Call `dotenvy::dotenv()`
    /// first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_addr = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("Invalid BIND_ADDR: {}", bind_addr))?;

        let target = get("DEFAULT_TARGET_PERCENTAGE", &DEFAULT_TARGET_PERCENTAGE.to_string());
        let default_target_percentage: f64 = target
            .parse()
            .with_context(|| format!("Invalid DEFAULT_TARGET_PERCENTAGE: {}", target))?;
        if !(0.0..=100.0).contains(&default_target_percentage) {
            bail!("DEFAULT_TARGET_PERCENTAGE must be between 0 and 100, got {}", target);
        }

        let cors_origins = get("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url: get("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr,
            cors_origins,
            default_region: get("DEFAULT_REGION", DEFAULT_REGION).to_uppercase(),
            default_target_percentage,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origins: DEFAULT_CORS_ORIGINS.split(',').map(str::to_string).collect(),
            default_region: DEFAULT_REGION.to_string(),
            default_target_percentage: DEFAULT_TARGET_PERCENTAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173", "http://localhost:3000"]
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("CORS_ORIGINS", "https://office.example.com, "),
            ("DEFAULT_REGION", "nsw"),
            ("DEFAULT_TARGET_PERCENTAGE", "60"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.cors_origins, vec!["https://office.example.com"]);
        assert_eq!(config.default_region, "NSW");
        assert_eq!(config.default_target_percentage, 60.0);
    }

    #[test]
    fn test_invalid_numbers_fail() {
        assert!(config_from(&[("DEFAULT_TARGET_PERCENTAGE", "lots")]).is_err());
        assert!(config_from(&[("DEFAULT_TARGET_PERCENTAGE", "150")]).is_err());
        assert!(config_from(&[("BIND_ADDR", "localhost")]).is_err());
    }
}
