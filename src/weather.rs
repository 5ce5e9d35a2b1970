use std::time::Duration;

use reqwest::header::ACCEPT;
use tracing::debug;

use crate::error::AppError;
use crate::types::WeatherReport;
use crate::weather_types::OwmResponse;

pub const OPENWEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin passthrough to the OpenWeatherMap current-weather endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url: base_url.into(), api_key })
    }

    pub async fn current(&self, lat: f64, lon: f64) -> Result<WeatherReport, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("weather API key is not configured".into()))?;

        let res = self
            .client
            .get(&self.base_url)
            .header(ACCEPT, "application/json")
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::Upstream(format!("weather request failed: {}", e.without_url()))
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| {
                AppError::Upstream(format!("weather response unreadable: {}", e.without_url()))
            })?;
        debug!("weather API answered {status} for ({lat}, {lon})");

        let parsed: OwmResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::Upstream(format!("weather API returned {status} with an invalid body: {e}"))
        })?;
        parsed.into_report()
    }
}
