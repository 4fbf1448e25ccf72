//! Configuration management for the dashboard worker

use std::str::FromStr;

use crate::error::{DashboardError, Result};
use worker::Env;

const DEFAULT_API_URL: &str = "https://api.tastytrade.com";
const DEFAULT_REMEMBER_TOKEN_KEY: &str = "tastytradeRememberToken";
const DEFAULT_KV_BINDING: &str = "STATE";

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Environment (production, staging, development)
    pub environment: String,

    /// Log level
    pub log_level: String,

    /// tastytrade REST API base URL, without trailing slash
    pub api_base_url: String,

    /// KV key holding the remember-token
    pub remember_token_key: String,

    /// KV namespace binding name
    pub kv_binding: String,

    /// User-Agent sent on every brokerage call
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "production".to_string(),
            log_level: "info".to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            remember_token_key: DEFAULT_REMEMBER_TOKEN_KEY.to_string(),
            kv_binding: DEFAULT_KV_BINDING.to_string(),
            user_agent: format!("leverage-dashboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Load configuration from Cloudflare environment variables
    pub fn from_env(env: &Env) -> Result<Self> {
        Self::from_lookup(|name| env.var(name).ok().map(|v| v.to_string()))
    }

    /// Build configuration from any variable source, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            api_base_url: lookup("TASTYTRADE_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            remember_token_key: lookup("REMEMBER_TOKEN_KEY")
                .unwrap_or(defaults.remember_token_key),
            kv_binding: lookup("KV_BINDING").unwrap_or(defaults.kv_binding),
            user_agent: lookup("USER_AGENT").unwrap_or(defaults.user_agent),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(DashboardError::Config(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }
        if self.remember_token_key.trim().is_empty() {
            return Err(DashboardError::Config("remember_token_key must not be empty".into()));
        }
        if self.kv_binding.trim().is_empty() {
            return Err(DashboardError::Config("kv_binding must not be empty".into()));
        }
        self.level_filter()?;
        Ok(())
    }

    /// Parsed log level
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        log::LevelFilter::from_str(&self.log_level).map_err(|_| {
            DashboardError::Config(format!("unknown log level {:?}", self.log_level))
        })
    }
}
