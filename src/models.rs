//! Display-ready records served to the front-end.
//!
//! Field names are the wire contract the dashboard JavaScript reads;
//! they must stay in sync with the front-end, not with the upstream
//! provider's naming.

use std::collections::HashMap;

use serde::Serialize;

/// Unit system requested by the client, forwarded to the upstream
/// provider and used to pick the display symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Parse the `units` query parameter. Anything other than
    /// `imperial` (including a missing parameter) falls back to metric.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("imperial") => Units::Imperial,
            _ => Units::Metric,
        }
    }

    /// Value forwarded to the upstream provider's `units` parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Temperature symbol shown next to every rounded temperature.
    pub fn symbol(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }
}

/// Current conditions for one city.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentConditions {
    pub city: String,
    pub country: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub temp_min: i64,
    pub temp_max: i64,
    pub description: String,
    pub humidity: u32,
    pub pressure: u32,
    pub wind_speed: f64,
    /// Kilometers, derived from the provider's meters. 0 when the
    /// provider omits visibility.
    pub visibility: f64,
    /// "HH:MM" in the server's local timezone.
    pub sunrise: String,
    /// "HH:MM" in the server's local timezone.
    pub sunset: String,
    pub lat: f64,
    pub lon: f64,
    pub unit_symbol: &'static str,
}

/// One day of the daily forecast strip.
#[derive(Debug, Clone, Serialize)]
pub struct DailyEntry {
    /// Weekday name, e.g. "Tuesday".
    pub date: String,
    /// Short date, e.g. "Aug 27".
    pub date_short: String,
    pub temperature: i64,
    pub temp_min: i64,
    pub temp_max: i64,
    pub description: String,
    pub humidity: u32,
    /// Provider icon code, passed through for the front-end.
    pub icon: String,
    pub unit_symbol: &'static str,
}

/// One 3-hour slot of the hourly strip.
#[derive(Debug, Clone, Serialize)]
pub struct HourlyEntry {
    /// 24-hour "HH:MM".
    pub time: String,
    /// 12-hour "hh AM/PM".
    pub hour: String,
    pub temperature: i64,
    pub description: String,
    pub icon: String,
    pub unit_symbol: &'static str,
    pub wind_speed: f64,
    pub humidity: u32,
}

/// Air quality summary for the current coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct AirQuality {
    /// Provider AQI category, 1 (best) to 5 (worst).
    pub aqi: i64,
    pub description: &'static str,
    /// Pollutant concentrations, passed through unchanged.
    pub components: HashMap<String, f64>,
}
