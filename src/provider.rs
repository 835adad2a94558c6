//! OpenWeatherMap client and the raw response shapes it decodes.
//!
//! The raw structs mirror the provider's JSON contract; everything the
//! display layer needs is typed here, the rest of each payload is
//! ignored on deserialization.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::ProviderError;
use crate::models::Units;

/// Upstream weather data source.
///
/// Fronted by a trait so request handling can run against a stub in
/// tests.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for a city name (provider-resolved,
    /// case-insensitive).
    async fn current_by_city(&self, city: &str, units: Units)
    -> Result<RawCurrent, ProviderError>;

    /// 5-day forecast in 3-hour intervals for a city name.
    async fn forecast_by_city(&self, city: &str, units: Units)
    -> Result<RawForecast, ProviderError>;

    /// Air pollution snapshots for a coordinate pair.
    async fn air_quality_by_coords(&self, lat: f64, lon: f64)
    -> Result<RawAirQuality, ProviderError>;
}

/// Reusable HTTP client for the OpenWeatherMap REST API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    /// Build a client with the configured credential and a timeout on
    /// every request.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        })
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ProviderError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.http.get(&url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status { status });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_by_city(
        &self,
        city: &str,
        units: Units,
    ) -> Result<RawCurrent, ProviderError> {
        self.get_json(
            "weather",
            &[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", units.as_query()),
            ],
        )
        .await
    }

    async fn forecast_by_city(
        &self,
        city: &str,
        units: Units,
    ) -> Result<RawForecast, ProviderError> {
        self.get_json(
            "forecast",
            &[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", units.as_query()),
            ],
        )
        .await
    }

    async fn air_quality_by_coords(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<RawAirQuality, ProviderError> {
        let lat = lat.to_string();
        let lon = lon.to_string();
        self.get_json(
            "air_pollution",
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
            ],
        )
        .await
    }
}

/// Raw current-weather payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrent {
    pub name: String,
    pub sys: RawSys,
    pub main: RawMain,
    pub weather: Vec<RawCondition>,
    pub wind: RawWind,
    /// Meters; the provider omits the field at some stations.
    #[serde(default)]
    pub visibility: Option<f64>,
    pub coord: RawCoord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSys {
    pub country: String,
    /// Unix timestamps.
    pub sunrise: i64,
    pub sunset: i64,
}

/// Temperature block shared by current conditions and forecast entries.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u32,
    pub pressure: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCoord {
    pub lat: f64,
    pub lon: f64,
}

/// Raw 5-day/3-hour forecast payload (up to 40 entries).
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    pub list: Vec<RawForecastEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastEntry {
    /// Unix timestamp of the 3-hour slot.
    pub dt: i64,
    pub main: RawMain,
    pub weather: Vec<RawCondition>,
    pub wind: RawWind,
}

/// Raw air-pollution payload; only the first snapshot is used.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAirQuality {
    pub list: Vec<RawAirSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAirSnapshot {
    pub main: RawAqi,
    pub components: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAqi {
    pub aqi: i64,
}
