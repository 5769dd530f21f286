//! Environment configuration, `MDM_`-prefixed.

use std::time::Duration;

pub struct Config {
    /// Management server base URL
    pub api_url: String,
    /// API credential, sent as the basic-auth password
    pub api_key: String,
    /// Total timeout per outbound request
    pub timeout: Duration,
    /// Additional attempts after a failed outbound request
    pub retries: u32,
    /// Listen address for the webhook service
    pub addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let api_url = require("MDM_API_URL")?;
        let api_key = require("MDM_API_KEY")?;
        let timeout_secs: u64 = parse_or("MDM_TIMEOUT_SECS", 30)?;
        let retries: u32 = parse_or("MDM_RETRIES", 2)?;
        let addr = std::env::var("MDM_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        Ok(Self {
            api_url,
            api_key,
            timeout: Duration::from_secs(timeout_secs),
            retries,
            addr,
        })
    }
}

fn require(name: &str) -> Result<String, String> {
    std::env::var(name).map_err(|_| format!("{name} must be set"))
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| format!("{name} is not a valid number: {value}")),
        Err(_) => Ok(default),
    }
}
