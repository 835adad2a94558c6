//! Pure transformations from raw provider payloads to display records.
//!
//! Every function is `Option` in, `Option` out: a missing raw input
//! (upstream fetch failed) yields an absent display record, never a
//! partially populated one.

use chrono::{DateTime, Local};

use crate::models::{AirQuality, CurrentConditions, DailyEntry, HourlyEntry, Units};
use crate::provider::{RawAirQuality, RawCurrent, RawForecast, RawForecastEntry};

/// Daily entries are taken at every 8th 3-hour slot (8 x 3h = 24h).
const DAILY_STRIDE: usize = 8;
/// At most 7 days on the daily strip.
const DAILY_LIMIT: usize = 7;
/// First 4 slots cover the next 12 hours.
const HOURLY_LIMIT: usize = 4;

/// Nearest-integer rounding with halves away from zero, applied to
/// every displayed temperature so 21.5 rounds the same way everywhere.
fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

/// Capitalize the first letter of each whitespace-separated word,
/// lowercasing the rest ("light rain" -> "Light Rain").
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a unix timestamp in the server's local timezone. None only
/// for timestamps outside chrono's representable range.
fn local_time(timestamp: i64, format: &str) -> Option<String> {
    let local = DateTime::from_timestamp(timestamp, 0)?.with_timezone(&Local);
    Some(local.format(format).to_string())
}

/// Reshape raw current conditions for display.
pub fn current_conditions(raw: Option<&RawCurrent>, units: Units) -> Option<CurrentConditions> {
    let raw = raw?;
    let condition = raw.weather.first()?;

    Some(CurrentConditions {
        city: raw.name.clone(),
        country: raw.sys.country.clone(),
        temperature: round_whole(raw.main.temp),
        feels_like: round_whole(raw.main.feels_like),
        temp_min: round_whole(raw.main.temp_min),
        temp_max: round_whole(raw.main.temp_max),
        description: title_case(&condition.description),
        humidity: raw.main.humidity,
        pressure: raw.main.pressure,
        wind_speed: raw.wind.speed,
        visibility: raw.visibility.unwrap_or(0.0) / 1000.0,
        sunrise: local_time(raw.sys.sunrise, "%H:%M")?,
        sunset: local_time(raw.sys.sunset, "%H:%M")?,
        lat: raw.coord.lat,
        lon: raw.coord.lon,
        unit_symbol: units.symbol(),
    })
}

/// One entry per day, selected by stride over the 3-hour list.
///
/// The stride assumes exact 3-hour granularity and aligns days to the
/// first entry's timestamp rather than to midnight; kept as-is because
/// the dashboard strip only needs "one snapshot per day".
pub fn daily_forecast(raw: Option<&RawForecast>, units: Units) -> Option<Vec<DailyEntry>> {
    let raw = raw?;
    let entries = raw
        .list
        .iter()
        .step_by(DAILY_STRIDE)
        .take(DAILY_LIMIT)
        .filter_map(|entry| daily_entry(entry, units))
        .collect();
    Some(entries)
}

fn daily_entry(entry: &RawForecastEntry, units: Units) -> Option<DailyEntry> {
    let condition = entry.weather.first()?;

    Some(DailyEntry {
        date: local_time(entry.dt, "%A")?,
        date_short: local_time(entry.dt, "%b %d")?,
        temperature: round_whole(entry.main.temp),
        temp_min: round_whole(entry.main.temp_min),
        temp_max: round_whole(entry.main.temp_max),
        description: title_case(&condition.description),
        humidity: entry.main.humidity,
        icon: condition.icon.clone(),
        unit_symbol: units.symbol(),
    })
}

/// The next 12 hours: first `min(4, len)` slots in original order.
pub fn hourly_forecast(raw: Option<&RawForecast>, units: Units) -> Option<Vec<HourlyEntry>> {
    let raw = raw?;
    let entries = raw
        .list
        .iter()
        .take(HOURLY_LIMIT)
        .filter_map(|entry| hourly_entry(entry, units))
        .collect();
    Some(entries)
}

fn hourly_entry(entry: &RawForecastEntry, units: Units) -> Option<HourlyEntry> {
    let condition = entry.weather.first()?;

    Some(HourlyEntry {
        time: local_time(entry.dt, "%H:%M")?,
        hour: local_time(entry.dt, "%I %p")?,
        temperature: round_whole(entry.main.temp),
        description: title_case(&condition.description),
        icon: condition.icon.clone(),
        unit_symbol: units.symbol(),
        wind_speed: entry.wind.speed,
        humidity: entry.main.humidity,
    })
}

/// AQI category and pollutant components from the first snapshot.
pub fn air_quality(raw: Option<&RawAirQuality>) -> Option<AirQuality> {
    let snapshot = raw?.list.first()?;

    Some(AirQuality {
        aqi: snapshot.main.aqi,
        description: aqi_description(snapshot.main.aqi),
        components: snapshot.components.clone(),
    })
}

fn aqi_description(aqi: i64) -> &'static str {
    match aqi {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "Unknown",
    }
}
