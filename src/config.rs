use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;

pub const DEFAULT_WEATHERSTACK_BASE_URL: &str = "http://api.weatherstack.com/current";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub weatherstack_api_key: String,
    pub weatherstack_base_url: String,
    pub cors_allowed_origin: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. `from_env` is the
    /// process-environment case.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number, got {:?}", raw))?,
            None => 8000,
        };

        Ok(Config {
            weatherstack_api_key: lookup("WEATHERSTACK_API_KEY")
                .ok_or_else(|| anyhow::anyhow!("WEATHERSTACK_API_KEY not set"))?,
            weatherstack_base_url: lookup("WEATHERSTACK_BASE_URL")
                .unwrap_or_else(|| DEFAULT_WEATHERSTACK_BASE_URL.to_string()),
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}
