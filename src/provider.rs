//! Open-Meteo forecast API client
//!
//! All provider responses are parsed into strongly-typed structs right at
//! this boundary; missing fields and mismatched series lengths surface as
//! `MalformedResponse` instead of failing later in the tools.
//! Uses a long-lived reqwest::Client for connection pooling.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

use crate::error::WeatherServiceError;
use crate::Result;

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

/// Current conditions reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    /// Celsius.
    pub temperature: f64,
    /// km/h.
    #[serde(rename = "windspeed")]
    pub wind_speed: f64,
    pub time: String,
}

/// Parallel hourly series. The four vectors are equal in length, one entry
/// per forecast hour; length is validated when the response is parsed.
#[derive(Debug, Clone)]
pub struct HourlyForecast {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub wind_speed_10m: Vec<f64>,
    pub relative_humidity_2m: Vec<f64>,
}

/// Upstream weather data source.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_conditions(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions>;
    async fn hourly_forecast(&self, latitude: f64, longitude: f64) -> Result<HourlyForecast>;
}

/// Reusable Open-Meteo client (connection-pooled)
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Honors `WEATHER_API_BASE_URL` when set, defaults to the public API.
    pub fn from_env() -> Self {
        match std::env::var("WEATHER_API_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(url),
            _ => Self::new(),
        }
    }

    async fn fetch(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Weather provider request failed: {}", e);
            WeatherServiceError::ProviderUnavailable(format!("request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Weather provider error response: {} {}", status, error_text);
            return Err(WeatherServiceError::ProviderUnavailable(format!(
                "provider returned {}: {}",
                status, error_text
            )));
        }

        response.json::<serde_json::Value>().await.map_err(|e| {
            error!("Failed to parse provider response: {}", e);
            WeatherServiceError::MalformedResponse(format!("invalid JSON body: {}", e))
        })
    }
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn current_conditions(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current_weather=true",
            self.base_url, latitude, longitude
        );

        info!(latitude, longitude, "Fetching current conditions");

        let body = self.fetch(&url).await?;
        current_from_body(body)
    }

    async fn hourly_forecast(&self, latitude: f64, longitude: f64) -> Result<HourlyForecast> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&hourly=temperature_2m,wind_speed_10m,relative_humidity_2m",
            self.base_url, latitude, longitude
        );

        info!(latitude, longitude, "Fetching hourly forecast");

        let body = self.fetch(&url).await?;
        hourly_from_body(body)
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherEnvelope {
    current_weather: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct HourlyEnvelope {
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Option<Vec<String>>,
    temperature_2m: Option<Vec<f64>>,
    wind_speed_10m: Option<Vec<f64>>,
    relative_humidity_2m: Option<Vec<f64>>,
}

fn current_from_body(body: serde_json::Value) -> Result<CurrentConditions> {
    let envelope: CurrentWeatherEnvelope = serde_json::from_value(body)
        .map_err(|e| WeatherServiceError::MalformedResponse(format!("current weather: {}", e)))?;

    envelope.current_weather.ok_or_else(|| {
        WeatherServiceError::MalformedResponse("missing 'current_weather' block".to_string())
    })
}

fn hourly_from_body(body: serde_json::Value) -> Result<HourlyForecast> {
    let envelope: HourlyEnvelope = serde_json::from_value(body)
        .map_err(|e| WeatherServiceError::MalformedResponse(format!("hourly forecast: {}", e)))?;

    let block = envelope.hourly.ok_or_else(|| {
        WeatherServiceError::MalformedResponse("missing 'hourly' block".to_string())
    })?;

    let missing = |field: &str| {
        WeatherServiceError::MalformedResponse(format!("missing hourly series '{}'", field))
    };

    let time = block.time.ok_or_else(|| missing("time"))?;
    let temperature_2m = block.temperature_2m.ok_or_else(|| missing("temperature_2m"))?;
    let wind_speed_10m = block.wind_speed_10m.ok_or_else(|| missing("wind_speed_10m"))?;
    let relative_humidity_2m = block
        .relative_humidity_2m
        .ok_or_else(|| missing("relative_humidity_2m"))?;

    let len = time.len();
    if temperature_2m.len() != len
        || wind_speed_10m.len() != len
        || relative_humidity_2m.len() != len
    {
        return Err(WeatherServiceError::MalformedResponse(format!(
            "hourly series lengths diverge: time={}, temperature_2m={}, wind_speed_10m={}, relative_humidity_2m={}",
            len,
            temperature_2m.len(),
            wind_speed_10m.len(),
            relative_humidity_2m.len()
        )));
    }

    Ok(HourlyForecast {
        time,
        temperature_2m,
        wind_speed_10m,
        relative_humidity_2m,
    })
}
