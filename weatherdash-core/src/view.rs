//! What the panels get to see.
//!
//! Panels consume a [`ViewModel`] plus [`Presentation`] data derived from the
//! snapshot. Charting and map widgets are capabilities ([`ChartSurface`],
//! [`MapSurface`]) fed with plain data; nothing here knows how they draw.

use std::sync::Arc;

use chrono::Timelike;
use serde::Serialize;

use crate::{
    alerts::{Alert, AlertEvaluator},
    classify::{self, ConditionCategory, Gradient},
    controller::AppState,
    model::{Coordinates, HourReading, WeatherSnapshot},
};

/// The single input contract of the view layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub snapshot: Option<Arc<WeatherSnapshot>>,
    pub error: Option<String>,
    pub loading: bool,
}

impl From<&AppState> for ViewModel {
    fn from(state: &AppState) -> Self {
        ViewModel {
            snapshot: state.snapshot().cloned(),
            error: state.error().map(str::to_string),
            loading: state.is_loading(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: &'static str,
    pub unit: &'static str,
    pub points: Vec<ChartPoint>,
}

impl Series {
    fn from_hours(
        label: &'static str,
        unit: &'static str,
        hours: &[HourReading],
        value: impl Fn(&HourReading) -> f64,
    ) -> Self {
        let points = hours
            .iter()
            .map(|h| ChartPoint { x: f64::from(h.time.hour()), y: value(h) })
            .collect();

        Series { label, unit, points }
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }
}

/// Map centred on a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

impl MapView {
    /// Half-width of the embedded bounding box, in degrees.
    pub const SPAN_DEG: f64 = 0.1;

    pub fn new(center: Coordinates) -> Self {
        Self { center, zoom: 12 }
    }

    /// OpenStreetMap embed link with a marker at the centre.
    pub fn embed_url(&self) -> String {
        let Coordinates { latitude: lat, longitude: lon } = self.center;
        format!(
            "https://www.openstreetmap.org/export/embed.html?bbox={}%2C{}%2C{}%2C{}&layer=mapnik&marker={}%2C{}",
            lon - Self::SPAN_DEG,
            lat - Self::SPAN_DEG,
            lon + Self::SPAN_DEG,
            lat + Self::SPAN_DEG,
            lat,
            lon,
        )
    }

    /// Plain map link at this view's zoom.
    pub fn link(&self) -> String {
        let Coordinates { latitude: lat, longitude: lon } = self.center;
        format!("https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={}/{lat}/{lon}", self.zoom)
    }
}

/// Draws line charts from ordered numeric points.
pub trait ChartSurface {
    fn line_chart(&mut self, title: &str, series: &[Series]) -> anyhow::Result<()>;
}

/// Shows a map for a coordinate and zoom level.
pub trait MapSurface {
    fn map_view(&mut self, view: &MapView) -> anyhow::Result<()>;
}

/// Background for what the dashboard currently shows. Until a snapshot is
/// loaded this is the fixed idle gradient.
pub fn background_for_view(snapshot: Option<&WeatherSnapshot>, fallback_hour: u32) -> Gradient {
    let Some(snapshot) = snapshot else {
        return classify::IDLE;
    };
    let hour = snapshot.location.local_hour().unwrap_or(fallback_hour);
    classify::background_for(classify::classify(&snapshot.current.condition.text), hour)
}

/// Everything derived from one snapshot for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presentation {
    pub category: ConditionCategory,
    pub background: Gradient,
    pub alerts: Vec<Alert>,
    pub temperature: Vec<Series>,
    pub humidity: Series,
    pub map: MapView,
}

impl Presentation {
    /// `hour` is the local hour of day used for the background.
    pub fn derive(snapshot: &WeatherSnapshot, evaluator: &AlertEvaluator, hour: u32) -> Self {
        let category = classify::classify(&snapshot.current.condition.text);
        let hours = snapshot.today().map(|d| d.hours.as_slice()).unwrap_or_default();

        Presentation {
            category,
            background: classify::background_for(category, hour),
            alerts: evaluator.evaluate(snapshot),
            temperature: vec![
                Series::from_hours("Temperature", "°C", hours, |h| h.temperature_c),
                Series::from_hours("Feels like", "°C", hours, |h| h.feels_like_c),
            ],
            humidity: Series::from_hours("Humidity", "%", hours, |h| f64::from(h.humidity_pct)),
            map: MapView::new(snapshot.location.coordinates()),
        }
    }

    /// Same as [`Presentation::derive`], using the location's own clock and
    /// falling back to `fallback_hour` when the provider sent none.
    pub fn for_snapshot(
        snapshot: &WeatherSnapshot,
        evaluator: &AlertEvaluator,
        fallback_hour: u32,
    ) -> Self {
        let hour = snapshot.location.local_hour().unwrap_or(fallback_hour);
        Self::derive(snapshot, evaluator, hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::AlertKind;
    use crate::testutil::snapshot;

    #[test]
    fn view_model_mirrors_state() {
        let idle = ViewModel::from(&AppState::Idle);
        assert_eq!(idle, ViewModel::default());

        let failed = ViewModel::from(&AppState::Failed("boom".into()));
        assert_eq!(failed.error.as_deref(), Some("boom"));
        assert!(failed.snapshot.is_none());
        assert!(!failed.loading);

        let snap = Arc::new(snapshot("Sunny", 20.0, 5.0, 2.0, &[0]));
        let loaded = ViewModel::from(&AppState::Loaded(snap.clone()));
        assert_eq!(loaded.snapshot, Some(snap));
        assert!(loaded.error.is_none());
    }

    #[test]
    fn derives_category_background_and_alerts() {
        let snap = snapshot("Moderate rain", 3.0, 40.0, 1.0, &[0, 90]);
        let p = Presentation::derive(&snap, &AlertEvaluator::default(), 12);

        assert_eq!(p.category, ConditionCategory::Rainy);
        assert_eq!(p.background, classify::RAIN);
        let kinds: Vec<_> = p.alerts.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AlertKind::Wind, AlertKind::LowTemperature, AlertKind::Rain]);
    }

    #[test]
    fn uses_location_hour_when_available() {
        let mut snap = snapshot("Clear", 20.0, 5.0, 2.0, &[0]);
        snap.location.local_time = Some("2024-06-01 22:10".into());
        let p = Presentation::for_snapshot(&snap, &AlertEvaluator::default(), 12);
        assert_eq!(p.background, classify::NIGHT);

        snap.location.local_time = None;
        let p = Presentation::for_snapshot(&snap, &AlertEvaluator::default(), 12);
        assert_eq!(p.background, classify::DAYLIGHT);
    }

    #[test]
    fn idle_background_without_snapshot() {
        assert_eq!(background_for_view(None, 12), classify::IDLE);
        assert_eq!(background_for_view(None, 23), classify::IDLE);

        let mut snap = snapshot("Partly cloudy", 20.0, 5.0, 2.0, &[0]);
        snap.location.local_time = None;
        let p = Presentation::for_snapshot(&snap, &AlertEvaluator::default(), 22);
        assert_eq!(background_for_view(Some(&snap), 22), classify::OVERCAST_NIGHT);
        assert_eq!(background_for_view(Some(&snap), 22), p.background);
    }

    #[test]
    fn map_link_points_at_center() {
        let view = MapView::new(Coordinates { latitude: 10.0, longitude: 20.0 });
        assert_eq!(view.link(), "https://www.openstreetmap.org/?mlat=10&mlon=20#map=12/10/20");
    }

    #[test]
    fn chart_series_follow_todays_hours() {
        let snap = snapshot("Clear", 20.0, 5.0, 2.0, &[0, 0]);
        let p = Presentation::derive(&snap, &AlertEvaluator::default(), 12);

        assert_eq!(p.temperature.len(), 2);
        assert_eq!(p.temperature[0].points.len(), 24);
        assert_eq!(p.temperature[0].points[4], ChartPoint { x: 4.0, y: 12.0 });
        assert_eq!(p.temperature[1].points[4].y, 11.0);
        assert_eq!(p.humidity.points[3].y, 63.0);
    }

    #[test]
    fn empty_forecast_gives_empty_series() {
        let snap = snapshot("Clear", 20.0, 5.0, 2.0, &[]);
        let p = Presentation::derive(&snap, &AlertEvaluator::default(), 12);
        assert!(p.humidity.points.is_empty());
    }

    #[test]
    fn map_embed_url_has_bbox_and_marker() {
        let view = MapView::new(Coordinates { latitude: 10.0, longitude: 20.0 });
        let url = view.embed_url();

        assert!(url.ends_with("&layer=mapnik&marker=10%2C20"));

        let bbox: Vec<f64> = url
            .split("bbox=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap()
            .split("%2C")
            .map(|v| v.parse().unwrap())
            .collect();
        let expected = [19.9, 9.9, 20.1, 10.1];
        for (got, want) in bbox.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
        assert_eq!(bbox.len(), 4);
    }
}
