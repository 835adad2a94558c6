//! Skycast - server-side weather dashboard proxy.
//!
//! Fetches current conditions, a 5-day/3-hour forecast, and air quality
//! from OpenWeatherMap, reshapes the responses into display-ready JSON,
//! and serves them to the dashboard front-end over a small HTTP surface.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod transform;
pub mod web;

// Re-export core types for public API
pub use config::AppConfig;
pub use error::ProviderError;
pub use models::{AirQuality, CurrentConditions, DailyEntry, HourlyEntry, Units};
pub use provider::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
