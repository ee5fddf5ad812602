use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;

use crate::{
    config::{Config, DEFAULT_BASE_URL, DEFAULT_FORECAST_DAYS},
    error::WeatherError,
    model::{
        Astronomy, Condition, CurrentConditions, ForecastDay, HourReading, Location,
        LocationQuery, PROVIDER_TIME_FORMAT, WeatherSnapshot,
    },
};

use super::WeatherProvider;

/// WeatherAPI.com forecast client.
///
/// One GET per fetch, no retries. Every failure is reported as
/// [`WeatherError::FetchFailed`].
#[derive(Clone)]
pub struct WeatherApiClient {
    api_key: Option<String>,
    base_url: String,
    forecast_days: u8,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            http: Client::new(),
        }
    }

    /// Build a client from config. The API key is resolved from the
    /// environment first.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_key: config.resolved_api_key(),
            base_url: config.base_url().to_string(),
            forecast_days: config.forecast_days(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/forecast.json", self.base_url.trim_end_matches('/'))
    }

    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<WeatherSnapshot> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No WeatherAPI key configured.\n\
                 Hint: set WEATHERAPI_KEY or run `weatherdash configure`."
            )
        })?;

        let q = query.as_query_param();
        let days = self.forecast_days.to_string();

        tracing::debug!(location = %q, days = %days, "requesting forecast");

        let res = self
            .http
            .get(self.endpoint())
            .query(&[
                ("key", api_key),
                ("q", q.as_str()),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com (forecast)")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read WeatherAPI forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "WeatherAPI forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_forecast(&body)
    }
}

impl fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("forecast_days", &self.forecast_days)
            .finish()
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
        match self.fetch_forecast(query).await {
            Ok(snapshot) => {
                tracing::debug!(
                    location = %snapshot.location.display_name(),
                    days = snapshot.forecast.len(),
                    "forecast received"
                );
                Ok(snapshot)
            }
            Err(err) => {
                tracing::warn!(location = %query, error = %format!("{err:#}"), "forecast fetch failed");
                Err(WeatherError::fetch_failed(err))
            }
        }
    }
}

/// Parse a `forecast.json` body into a snapshot.
pub fn parse_forecast(body: &str) -> Result<WeatherSnapshot> {
    let parsed: WaForecastResponse =
        serde_json::from_str(body).context("Failed to parse WeatherAPI forecast JSON")?;

    parsed.into_snapshot()
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: String,
    country: String,
    lat: f64,
    lon: f64,
    localtime: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    last_updated_epoch: i64,
    temp_c: f64,
    is_day: u8,
    condition: WaCondition,
    wind_kph: f64,
    wind_dir: String,
    pressure_mb: f64,
    humidity: u8,
    feelslike_c: f64,
    vis_km: f64,
    uv: f64,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    avgtemp_c: f64,
    avghumidity: f64,
    daily_chance_of_rain: u8,
    #[serde(default)]
    daily_chance_of_snow: u8,
    condition: WaCondition,
    #[serde(default)]
    uv: f64,
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    sunrise: String,
    sunset: String,
    moon_phase: String,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    temp_c: f64,
    is_day: u8,
    condition: WaCondition,
    wind_kph: f64,
    wind_dir: String,
    humidity: u8,
    feelslike_c: f64,
    chance_of_rain: u8,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
    astro: WaAstro,
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

impl From<WaCondition> for Condition {
    fn from(value: WaCondition) -> Self {
        Condition { text: value.text.trim().to_string(), icon: value.icon }
    }
}

impl WaForecastResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot> {
        let location = Location {
            name: self.location.name,
            region: self.location.region,
            country: self.location.country,
            latitude: self.location.lat,
            longitude: self.location.lon,
            local_time: self.location.localtime,
        };

        let last_updated = DateTime::from_timestamp(self.current.last_updated_epoch, 0)
            .ok_or_else(|| anyhow!("WeatherAPI last_updated_epoch out of range"))?;

        let current = CurrentConditions {
            temperature_c: self.current.temp_c,
            feels_like_c: self.current.feelslike_c,
            humidity_pct: self.current.humidity,
            wind_kph: self.current.wind_kph,
            wind_dir: self.current.wind_dir,
            pressure_mb: self.current.pressure_mb,
            visibility_km: self.current.vis_km,
            uv_index: self.current.uv,
            condition: self.current.condition.into(),
            is_day: self.current.is_day != 0,
            last_updated,
        };

        let forecast = self
            .forecast
            .forecastday
            .into_iter()
            .map(WaForecastDay::into_day)
            .collect::<Result<Vec<_>>>()?;

        if forecast.is_empty() {
            return Err(anyhow!("WeatherAPI response contained no forecastday data"));
        }

        Ok(WeatherSnapshot { location, current, forecast })
    }
}

impl WaForecastDay {
    fn into_day(self) -> Result<ForecastDay> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .with_context(|| format!("Invalid forecast date '{}'", self.date))?;

        let hours = self
            .hour
            .into_iter()
            .map(|h| -> Result<HourReading> {
                let time = NaiveDateTime::parse_from_str(&h.time, PROVIDER_TIME_FORMAT)
                    .with_context(|| format!("Invalid hourly time '{}'", h.time))?;

                Ok(HourReading {
                    time,
                    temperature_c: h.temp_c,
                    feels_like_c: h.feelslike_c,
                    humidity_pct: h.humidity,
                    wind_kph: h.wind_kph,
                    wind_dir: h.wind_dir,
                    chance_of_rain_pct: h.chance_of_rain,
                    condition: h.condition.into(),
                    is_day: h.is_day != 0,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ForecastDay {
            date,
            min_temp_c: self.day.mintemp_c,
            max_temp_c: self.day.maxtemp_c,
            avg_temp_c: self.day.avgtemp_c,
            condition: self.day.condition.into(),
            chance_of_rain_pct: self.day.daily_chance_of_rain,
            chance_of_snow_pct: self.day.daily_chance_of_snow,
            avg_humidity_pct: self.day.avghumidity,
            uv_index: self.day.uv,
            astronomy: Astronomy {
                sunrise: self.astro.sunrise,
                sunset: self.astro.sunset,
                moon_phase: self.astro.moon_phase,
            },
            hours,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
