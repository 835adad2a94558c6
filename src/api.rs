//! HTTP surface: routing, the per-city dashboard assembly, and the
//! favorites aggregation.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    config::AppConfig,
    models::{AirQuality, CurrentConditions, DailyEntry, HourlyEntry, Units},
    provider::WeatherProvider,
    transform,
};

const INDEX_PAGE: &str = include_str!("../assets/index.html");

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Deserialize)]
struct WeatherParams {
    city: Option<String>,
    units: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FavoritesParams {
    cities: Option<String>,
    units: Option<String>,
}

/// Combined response for one `/weather` request. `current` is always
/// present on success; the other sections degrade to null when their
/// upstream fetch fails independently.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub current: CurrentConditions,
    pub forecast: Option<Vec<DailyEntry>>,
    pub hourly: Option<Vec<HourlyEntry>>,
    pub air_quality: Option<AirQuality>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/weather", get(weather))
        .route("/favorites", get(favorites))
        .with_state(state)
}

/// Assemble the dashboard for one city.
///
/// The current-weather fetch is the gate: if it fails there is nothing
/// to anchor the page on and the whole operation yields None. Forecast
/// and air quality (which needs the coordinates from the first call)
/// fail independently into null sections.
pub async fn assemble_dashboard(
    provider: &dyn WeatherProvider,
    city: &str,
    units: Units,
) -> Option<Dashboard> {
    let raw_current = match provider.current_by_city(city, units).await {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(%city, %error, "current weather fetch failed");
            return None;
        }
    };

    let raw_forecast = match provider.forecast_by_city(city, units).await {
        Ok(raw) => Some(raw),
        Err(error) => {
            tracing::warn!(%city, %error, "forecast fetch failed");
            None
        }
    };

    let (lat, lon) = (raw_current.coord.lat, raw_current.coord.lon);
    let raw_air = match provider.air_quality_by_coords(lat, lon).await {
        Ok(raw) => Some(raw),
        Err(error) => {
            tracing::warn!(%city, %error, "air quality fetch failed");
            None
        }
    };

    let current = transform::current_conditions(Some(&raw_current), units)?;

    Some(Dashboard {
        current,
        forecast: transform::daily_forecast(raw_forecast.as_ref(), units),
        hourly: transform::hourly_forecast(raw_forecast.as_ref(), units),
        air_quality: transform::air_quality(raw_air.as_ref()),
    })
}

/// Fetch current conditions for each city in a comma-separated list.
///
/// Names are trimmed, empty tokens skipped, and failed cities dropped
/// without surfacing an error; survivors keep input order.
pub async fn favorite_cities(
    provider: &dyn WeatherProvider,
    cities: &str,
    units: Units,
) -> Vec<CurrentConditions> {
    let mut favorites = Vec::new();

    for name in cities.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        match provider.current_by_city(name, units).await {
            Ok(raw) => {
                if let Some(current) = transform::current_conditions(Some(&raw), units) {
                    favorites.push(current);
                }
            }
            Err(error) => {
                tracing::debug!(city = name, %error, "skipping favorite city");
            }
        }
    }

    favorites
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(INDEX_PAGE.replace("{{default_city}}", &state.config.default_city))
}

async fn weather(State(state): State<AppState>, Query(params): Query<WeatherParams>) -> Response {
    let units = Units::from_param(params.units.as_deref());
    let city = params
        .city
        .unwrap_or_else(|| state.config.default_city.clone());

    match assemble_dashboard(state.provider.as_ref(), &city, units).await {
        Some(dashboard) => Json(dashboard).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Could not fetch weather data" })),
        )
            .into_response(),
    }
}

async fn favorites(
    State(state): State<AppState>,
    Query(params): Query<FavoritesParams>,
) -> Json<serde_json::Value> {
    let units = Units::from_param(params.units.as_deref());
    let cities = params.cities.unwrap_or_default();

    let favorites = favorite_cities(state.provider.as_ref(), &cities, units).await;
    Json(json!({ "favorites": favorites }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::error::ProviderError;
    use crate::provider::{
        RawAirQuality, RawAirSnapshot, RawAqi, RawCondition, RawCoord, RawCurrent, RawForecast,
        RawForecastEntry, RawMain, RawSys, RawWind,
    };

    fn raw_main() -> RawMain {
        RawMain {
            temp: 21.5,
            feels_like: 23.0,
            temp_min: 19.8,
            temp_max: 24.2,
            humidity: 65,
            pressure: 1012,
        }
    }

    fn raw_current(city: &str) -> RawCurrent {
        RawCurrent {
            name: city.to_string(),
            sys: RawSys {
                country: "BD".to_string(),
                sunrise: 1_756_251_600,
                sunset: 1_756_297_200,
            },
            main: raw_main(),
            weather: vec![RawCondition {
                description: "light rain".to_string(),
                icon: "10d".to_string(),
            }],
            wind: RawWind { speed: 3.6 },
            visibility: Some(8000.0),
            coord: RawCoord {
                lat: 23.7104,
                lon: 90.4074,
            },
        }
    }

    fn raw_forecast() -> RawForecast {
        let list = (0..40)
            .map(|i| RawForecastEntry {
                dt: 1_756_251_600 + i * 3 * 3600,
                main: raw_main(),
                weather: vec![RawCondition {
                    description: "few clouds".to_string(),
                    icon: "02d".to_string(),
                }],
                wind: RawWind { speed: 2.0 },
            })
            .collect();
        RawForecast { list }
    }

    fn raw_air() -> RawAirQuality {
        let mut components = HashMap::new();
        components.insert("pm2_5".to_string(), 15.1);
        RawAirQuality {
            list: vec![RawAirSnapshot {
                main: RawAqi { aqi: 2 },
                components,
            }],
        }
    }

    fn not_found() -> ProviderError {
        ProviderError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
        }
    }

    /// Stub provider: fails configured cities/sections, records every
    /// city name it is asked about.
    #[derive(Default)]
    struct StubProvider {
        fail_cities: Vec<String>,
        fail_forecast: bool,
        fail_air: bool,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current_by_city(
            &self,
            city: &str,
            _units: Units,
        ) -> Result<RawCurrent, ProviderError> {
            self.requested.lock().unwrap().push(city.to_string());
            if self.fail_cities.iter().any(|c| c == city) {
                return Err(not_found());
            }
            Ok(raw_current(city))
        }

        async fn forecast_by_city(
            &self,
            _city: &str,
            _units: Units,
        ) -> Result<RawForecast, ProviderError> {
            if self.fail_forecast {
                return Err(not_found());
            }
            Ok(raw_forecast())
        }

        async fn air_quality_by_coords(
            &self,
            _lat: f64,
            _lon: f64,
        ) -> Result<RawAirQuality, ProviderError> {
            if self.fail_air {
                return Err(not_found());
            }
            Ok(raw_air())
        }
    }

    fn test_state(provider: StubProvider) -> AppState {
        AppState {
            provider: Arc::new(provider),
            config: Arc::new(AppConfig {
                api_key: "test_api_key_123".to_string(),
                base_url: "https://api.openweathermap.org/data/2.5".to_string(),
                timeout_secs: 5,
                port: 5000,
                default_city: "Dhaka".to_string(),
            }),
        }
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn weather_returns_combined_dashboard() {
        let state = test_state(StubProvider::default());
        let (status, body) = get_json(state, "/weather?city=Dhaka&units=metric").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current"]["city"], "Dhaka");
        assert_eq!(body["current"]["temperature"], 22);
        assert_eq!(body["current"]["visibility"], 8.0);
        assert_eq!(body["current"]["unit_symbol"], "°C");
        assert_eq!(body["forecast"].as_array().unwrap().len(), 5);
        assert_eq!(body["hourly"].as_array().unwrap().len(), 4);
        assert_eq!(body["air_quality"]["aqi"], 2);
        assert_eq!(body["air_quality"]["description"], "Fair");
    }

    #[tokio::test]
    async fn weather_unknown_city_is_404_with_fixed_payload() {
        let state = test_state(StubProvider {
            fail_cities: vec!["UnknownXYZ123".to_string()],
            ..StubProvider::default()
        });
        let (status, body) = get_json(state, "/weather?city=UnknownXYZ123").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Could not fetch weather data" }));
    }

    #[tokio::test]
    async fn weather_tolerates_forecast_and_air_failures() {
        let state = test_state(StubProvider {
            fail_forecast: true,
            fail_air: true,
            ..StubProvider::default()
        });
        let (status, body) = get_json(state, "/weather?city=Dhaka").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current"]["city"], "Dhaka");
        assert!(body["forecast"].is_null());
        assert!(body["hourly"].is_null());
        assert!(body["air_quality"].is_null());
    }

    #[tokio::test]
    async fn weather_defaults_city_and_units() {
        let state = test_state(StubProvider::default());
        let (status, body) = get_json(state, "/weather").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current"]["city"], "Dhaka");
        assert_eq!(body["current"]["unit_symbol"], "°C");
    }

    #[tokio::test]
    async fn weather_imperial_units_pick_fahrenheit_symbol() {
        let state = test_state(StubProvider::default());
        let (_, body) = get_json(state, "/weather?city=Dhaka&units=imperial").await;

        assert_eq!(body["current"]["unit_symbol"], "°F");
    }

    #[tokio::test]
    async fn favorites_empty_input_is_empty_list() {
        let state = test_state(StubProvider::default());
        let (status, body) = get_json(state, "/favorites?cities=").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "favorites": [] }));

        let state = test_state(StubProvider::default());
        let (status, body) = get_json(state, "/favorites").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "favorites": [] }));
    }

    #[tokio::test]
    async fn favorites_trims_names_and_drops_failures() {
        let provider = StubProvider {
            fail_cities: vec!["London".to_string()],
            ..StubProvider::default()
        };
        let state = test_state(provider);
        let (status, body) =
            get_json(state, "/favorites?cities=Dhaka,%20London%20,%20").await;

        assert_eq!(status, StatusCode::OK);
        let favorites = body["favorites"].as_array().unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0]["city"], "Dhaka");
    }

    #[tokio::test]
    async fn favorites_requests_trimmed_names_in_order() {
        let provider = StubProvider::default();
        let collected =
            favorite_cities(&provider, " Dhaka , London ,, Tokyo ", Units::Metric).await;

        let requested = provider.requested.lock().unwrap().clone();
        assert_eq!(requested, vec!["Dhaka", "London", "Tokyo"]);

        let names: Vec<&str> = collected.iter().map(|c| c.city.as_str()).collect();
        assert_eq!(names, vec!["Dhaka", "London", "Tokyo"]);
    }

    #[tokio::test]
    async fn index_page_carries_default_city() {
        let state = test_state(StubProvider::default());
        let response = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("Dhaka"));
        assert!(!page.contains("{{default_city}}"));
    }
}
