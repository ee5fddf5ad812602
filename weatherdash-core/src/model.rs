use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Format WeatherAPI uses for `localtime` and hourly `time` fields.
pub const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// What the user asked for: a free-text place or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Place(String),
    Coordinates(Coordinates),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationQuery {
    /// Value for the provider's `q` parameter.
    pub fn as_query_param(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::Place(name) => f.write_str(name),
            LocationQuery::Coordinates(c) => write!(f, "{},{}", c.latitude, c.longitude),
        }
    }
}

impl FromStr for LocationQuery {
    type Err = anyhow::Error;

    /// `"12.97,77.59"` becomes coordinates, anything else non-blank a place.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(anyhow::anyhow!("Location must not be empty"));
        }

        if let Some(coords) = parse_coordinates(trimmed) {
            return Ok(LocationQuery::Coordinates(coords));
        }

        Ok(LocationQuery::Place(trimmed.to_string()))
    }
}

impl From<Coordinates> for LocationQuery {
    fn from(value: Coordinates) -> Self {
        LocationQuery::Coordinates(value)
    }
}

/// Parse `"lat,lon"`. Returns `None` unless both halves are numbers within
/// the valid degree ranges.
pub fn parse_coordinates(s: &str) -> Option<Coordinates> {
    let (lat, lon) = s.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }

    Some(Coordinates { latitude, longitude })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Local wall-clock time at the location, as reported by the provider.
    pub local_time: Option<String>,
}

impl Location {
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates { latitude: self.latitude, longitude: self.longitude }
    }

    /// Hour of day (0-23) at the location, if the provider sent a parseable
    /// local time.
    pub fn local_hour(&self) -> Option<u32> {
        let raw = self.local_time.as_deref()?;
        NaiveDateTime::parse_from_str(raw, PROVIDER_TIME_FORMAT).ok().map(|t| t.hour())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Icon reference as supplied by the provider (protocol-relative URL).
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub visibility_km: f64,
    pub uv_index: f64,
    pub condition: Condition,
    pub is_day: bool,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astronomy {
    pub sunrise: String,
    pub sunset: String,
    pub moon_phase: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourReading {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub chance_of_rain_pct: u8,
    pub condition: Condition,
    pub is_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub avg_temp_c: f64,
    pub condition: Condition,
    pub chance_of_rain_pct: u8,
    pub chance_of_snow_pct: u8,
    pub avg_humidity_pct: f64,
    pub uv_index: f64,
    pub astronomy: Astronomy,
    pub hours: Vec<HourReading>,
}

/// Complete current + forecast payload for one location.
///
/// Always built in one piece by a provider; the dashboard swaps whole
/// snapshots and never patches one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    /// Chronological, first entry is today.
    pub forecast: Vec<ForecastDay>,
}

impl WeatherSnapshot {
    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.first()
    }

    pub fn next_day(&self) -> Option<&ForecastDay> {
        self.forecast.get(1)
    }
}
