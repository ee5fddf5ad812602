//! Builders for hand-made snapshots in unit tests.

use chrono::{DateTime, NaiveDate};

use crate::model::{
    Astronomy, Condition, CurrentConditions, ForecastDay, HourReading, Location, WeatherSnapshot,
};

pub fn condition(text: &str) -> Condition {
    Condition { text: text.into(), icon: "//cdn.weatherapi.com/weather/64x64/day/113.png".into() }
}

pub fn current(temperature_c: f64, wind_kph: f64, uv_index: f64) -> CurrentConditions {
    CurrentConditions {
        temperature_c,
        feels_like_c: temperature_c,
        humidity_pct: 50,
        wind_kph,
        wind_dir: "W".into(),
        pressure_mb: 1012.0,
        visibility_km: 10.0,
        uv_index,
        condition: condition("Partly cloudy"),
        is_day: true,
        last_updated: DateTime::from_timestamp(1_717_232_400, 0).unwrap(),
    }
}

pub fn forecast_day(chance_of_rain_pct: u8) -> ForecastDay {
    forecast_day_on(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(), chance_of_rain_pct)
}

pub fn forecast_day_on(date: NaiveDate, chance_of_rain_pct: u8) -> ForecastDay {
    let hours = (0..24)
        .map(|h| HourReading {
            time: date.and_hms_opt(h, 0, 0).unwrap(),
            temperature_c: 10.0 + h as f64 / 2.0,
            feels_like_c: 9.0 + h as f64 / 2.0,
            humidity_pct: 60 + (h % 10) as u8,
            wind_kph: 8.0,
            wind_dir: "SW".into(),
            chance_of_rain_pct,
            condition: condition("Cloudy"),
            is_day: (6..20).contains(&h),
        })
        .collect();

    ForecastDay {
        date,
        min_temp_c: 10.0,
        max_temp_c: 21.5,
        avg_temp_c: 15.2,
        condition: condition("Patchy rain possible"),
        chance_of_rain_pct,
        chance_of_snow_pct: 0,
        avg_humidity_pct: 64.0,
        uv_index: 4.0,
        astronomy: Astronomy {
            sunrise: "04:43 AM".into(),
            sunset: "09:11 PM".into(),
            moon_phase: "Waning Crescent".into(),
        },
        hours,
    }
}

pub fn snapshot(
    text: &str,
    temperature_c: f64,
    wind_kph: f64,
    uv_index: f64,
    rain_by_day: &[u8],
) -> WeatherSnapshot {
    let mut current = current(temperature_c, wind_kph, uv_index);
    current.condition = condition(text);

    let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let forecast = rain_by_day
        .iter()
        .zip(start.iter_days())
        .map(|(rain, date)| forecast_day_on(date, *rain))
        .collect();

    WeatherSnapshot {
        location: Location {
            name: "London".into(),
            region: "City of London, Greater London".into(),
            country: "United Kingdom".into(),
            latitude: 51.52,
            longitude: -0.11,
            local_time: Some("2024-06-01 12:00".into()),
        },
        current,
        forecast,
    }
}
