//! Threshold-based advisories computed from a snapshot.
//!
//! These are derived hints, not an official warnings feed. Anything beyond
//! the fixed thresholds comes from an [`AlertSource`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{CurrentConditions, ForecastDay, WeatherSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Wind,
    HighTemperature,
    LowTemperature,
    Uv,
    Rain,
    Storm,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

/// Inclusive trigger values for the built-in rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub wind_kph: f64,
    pub high_temp_c: f64,
    pub low_temp_c: f64,
    pub uv_index: f64,
    pub rain_chance_pct: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            wind_kph: 30.0,
            high_temp_c: 30.0,
            low_temp_c: 5.0,
            uv_index: 7.0,
            rain_chance_pct: 60,
        }
    }
}

/// Evaluate the built-in rules. Output order is fixed: wind, high
/// temperature, low temperature, UV, next-day rain.
pub fn evaluate(
    current: &CurrentConditions,
    next_day: Option<&ForecastDay>,
    thresholds: &Thresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if current.wind_kph >= thresholds.wind_kph {
        alerts.push(Alert {
            kind: AlertKind::Wind,
            severity: Severity::Warning,
            title: "High Wind Alert".into(),
            description: format!(
                "Strong winds of {} km/h. Secure loose objects outdoors.",
                current.wind_kph.round() as i64
            ),
        });
    }

    if current.temperature_c >= thresholds.high_temp_c {
        alerts.push(Alert {
            kind: AlertKind::HighTemperature,
            severity: Severity::Warning,
            title: "High Temperature Alert".into(),
            description: format!(
                "Current temperature is {}°C. Stay hydrated and avoid prolonged sun exposure.",
                current.temperature_c.round() as i64
            ),
        });
    }

    if current.temperature_c <= thresholds.low_temp_c {
        alerts.push(Alert {
            kind: AlertKind::LowTemperature,
            severity: Severity::Info,
            title: "Low Temperature Alert".into(),
            description: format!(
                "Current temperature is {}°C. Bundle up and stay warm.",
                current.temperature_c.round() as i64
            ),
        });
    }

    if current.uv_index >= thresholds.uv_index {
        alerts.push(Alert {
            kind: AlertKind::Uv,
            severity: Severity::Warning,
            title: "High UV Index".into(),
            description: format!(
                "UV Index of {}. Use sunscreen and protective clothing when outdoors.",
                current.uv_index
            ),
        });
    }

    if let Some(day) = next_day.filter(|d| d.chance_of_rain_pct >= thresholds.rain_chance_pct) {
        alerts.push(Alert {
            kind: AlertKind::Rain,
            severity: Severity::Info,
            title: "Rain Tomorrow".into(),
            description: format!(
                "{}% chance of rain tomorrow. Consider bringing an umbrella.",
                day.chance_of_rain_pct
            ),
        });
    }

    alerts
}

/// Supplementary advisories appended after the threshold rules.
pub trait AlertSource: Send + Sync {
    fn advisories(&self, snapshot: &WeatherSnapshot) -> Vec<Alert>;
}

/// Contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdvisories;

impl AlertSource for NoAdvisories {
    fn advisories(&self, _snapshot: &WeatherSnapshot) -> Vec<Alert> {
        Vec::new()
    }
}

/// Always contributes the same list.
#[derive(Debug, Clone, Default)]
pub struct StaticAdvisories(pub Vec<Alert>);

impl AlertSource for StaticAdvisories {
    fn advisories(&self, _snapshot: &WeatherSnapshot) -> Vec<Alert> {
        self.0.clone()
    }
}

/// Demo "Thunderstorm Watch" stand-in for a real alerts feed. Emits the watch
/// whenever `trigger` says so.
pub struct StormWatch {
    trigger: Box<dyn Fn(&WeatherSnapshot) -> bool + Send + Sync>,
}

impl StormWatch {
    pub fn new(trigger: impl Fn(&WeatherSnapshot) -> bool + Send + Sync + 'static) -> Self {
        Self { trigger: Box::new(trigger) }
    }

    pub fn always() -> Self {
        Self::new(|_| true)
    }

    pub fn alert() -> Alert {
        Alert {
            kind: AlertKind::Storm,
            severity: Severity::Error,
            title: "Thunderstorm Watch".into(),
            description: "Potential for thunderstorms in the next 24-48 hours. Stay informed and \
                          prepare for possible strong winds and lightning."
                .into(),
        }
    }
}

impl fmt::Debug for StormWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StormWatch").finish_non_exhaustive()
    }
}

impl AlertSource for StormWatch {
    fn advisories(&self, snapshot: &WeatherSnapshot) -> Vec<Alert> {
        if (self.trigger)(snapshot) { vec![Self::alert()] } else { Vec::new() }
    }
}

/// Threshold rules plus a supplementary source.
pub struct AlertEvaluator {
    thresholds: Thresholds,
    source: Box<dyn AlertSource>,
}

impl AlertEvaluator {
    pub fn new(thresholds: Thresholds, source: impl AlertSource + 'static) -> Self {
        Self { thresholds, source: Box::new(source) }
    }

    pub fn evaluate(&self, snapshot: &WeatherSnapshot) -> Vec<Alert> {
        let mut alerts = evaluate(&snapshot.current, snapshot.next_day(), &self.thresholds);
        alerts.extend(self.source.advisories(snapshot));
        alerts
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(Thresholds::default(), NoAdvisories)
    }
}

impl fmt::Debug for AlertEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertEvaluator").field("thresholds", &self.thresholds).finish()
    }
}
