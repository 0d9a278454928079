use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::WeatherConfig;
use crate::error::UpstreamError;

/// Current conditions at the requested coordinates. Built fresh per request,
/// never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub condition: String,
    pub wind_speed: f64,
    pub humidity: i64,
    pub precipitation: f64,
}

#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Fetch current conditions. Callers validate the coordinate ranges
    /// before calling.
    async fn current(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, UpstreamError>;
}

// weatherapi.com current.json payload, reduced to the fields we keep.
#[derive(Debug, Deserialize)]
struct ApiPayload {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temp_c: f64,
    condition: ConditionBlock,
    wind_kph: f64,
    humidity: i64,
    #[serde(default)]
    precip_mm: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    text: String,
}

pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(cfg: &WeatherConfig, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl WeatherApi for WeatherClient {
    async fn current(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, UpstreamError> {
        let url = format!("{}/current.json", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", &format!("{lat},{lon}")),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::new("weather", e))?
            .error_for_status()
            .map_err(|e| UpstreamError::new("weather", e))?;

        let payload: ApiPayload = response
            .json()
            .await
            .map_err(|e| UpstreamError::new("weather", e))?;

        debug!(%lat, %lon, condition = %payload.current.condition.text, "weather fetched");
        Ok(WeatherSnapshot {
            temperature: payload.current.temp_c,
            condition: payload.current.condition.text,
            wind_speed: payload.current.wind_kph,
            humidity: payload.current.humidity,
            precipitation: payload.current.precip_mm,
        })
    }
}
