use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{WeatherError, WeatherQueryResult};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.tomorrow.io";

/// Tomorrow.io realtime endpoint.
#[derive(Debug, Clone)]
pub struct TomorrowProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl TomorrowProvider {
    pub fn with_base_url(
        api_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_realtime(&self, city: &str) -> Result<WeatherQueryResult, WeatherError> {
        let url = format!("{}/v4/weather/realtime", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("location", city),
                ("apikey", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = res.status();
        debug!(%status, "realtime response received");

        if !status.is_success() {
            let message = status.canonical_reason().unwrap_or("Unknown Error").to_string();
            return Err(WeatherError::Api { status: status.as_u16(), message });
        }

        let body = res.bytes().await.map_err(|e| WeatherError::Network(e.to_string()))?;

        if body.is_empty() {
            return Err(WeatherError::Api { status: 0, message: "No Data Found".to_string() });
        }

        let parsed: TmResponse = serde_json::from_slice(&body)?;

        Ok(parsed.into())
    }
}

#[derive(Debug, Default, Deserialize)]
struct TmValues {
    temperature: Option<f64>,
    humidity: Option<f64>,
    #[serde(rename = "weatherCode")]
    weather_code: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct TmData {
    time: Option<String>,
    #[serde(default)]
    values: TmValues,
}

#[derive(Debug, Default, Deserialize)]
struct TmLocation {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmResponse {
    data: Option<TmData>,
    location: Option<TmLocation>,
}

impl From<TmResponse> for WeatherQueryResult {
    fn from(res: TmResponse) -> Self {
        let data = res.data.unwrap_or_default();
        let location = res.location.unwrap_or_default();

        WeatherQueryResult {
            temperature_celsius: data.values.temperature,
            observed_at: data.time,
            location_label: location.name,
            humidity: data.values.humidity,
            weather_code: data.values.weather_code,
            location_type: location.kind,
        }
    }
}

#[async_trait]
impl WeatherProvider for TomorrowProvider {
    async fn fetch_reading(&self, city: &str) -> Result<WeatherQueryResult, WeatherError> {
        self.fetch_realtime(city).await
    }
}
