use super::types::WeatherstackErrorBody;
use crate::config::Config;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherstackError {
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Provider returned a non-JSON body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Provider error payload without info: {0}")]
    MalformedError(String),
}

impl From<reqwest::Error> for WeatherstackError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the access key, keep it out of messages.
        WeatherstackError::Unavailable(err.without_url().to_string())
    }
}

/// Client for the WeatherStack current-conditions endpoint.
pub struct WeatherstackClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherstackClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("WeatherLookupServer/1.0")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.weatherstack_base_url.clone(),
            api_key: config.weatherstack_api_key.clone(),
        })
    }

    /// Fetches current conditions for `location` and returns the payload
    /// untouched. Exactly one request is made.
    pub async fn current(&self, location: &str) -> Result<Value, WeatherstackError> {
        tracing::debug!("Requesting current weather for {:?}", location);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("access_key", self.api_key.as_str()), ("query", location)])
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body)?;

        if let Some(error) = payload.get("error") {
            let parsed: WeatherstackErrorBody = serde_json::from_value(error.clone())
                .map_err(|_| WeatherstackError::MalformedError(error.to_string()))?;
            tracing::debug!(
                "WeatherStack rejected query (code={:?}, type={:?})",
                parsed.code,
                parsed.kind
            );
            return Err(WeatherstackError::Rejected(parsed.info));
        }

        Ok(payload)
    }
}
