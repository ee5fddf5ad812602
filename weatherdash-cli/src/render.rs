//! Text panels for the dashboard.

use std::io::Write;

use anyhow::Result;
use weatherdash_core::{
    Alert, CurrentConditions, ForecastDay, Location, Presentation, ViewModel, WeatherSnapshot,
    background_for_view,
    view::{ChartSurface, MapSurface, MapView, Series},
};

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Chart and map capabilities drawn as plain text.
pub struct TerminalSurface<'w, W: Write> {
    out: &'w mut W,
}

impl<'w, W: Write> TerminalSurface<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self { out }
    }
}

impl<W: Write> ChartSurface for TerminalSurface<'_, W> {
    fn line_chart(&mut self, title: &str, series: &[Series]) -> Result<()> {
        writeln!(self.out, "  {title}")?;

        // One shared scale so series in the same chart compare visually.
        let (lo, hi) = series
            .iter()
            .flat_map(Series::values)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if !lo.is_finite() {
            writeln!(self.out, "    (no hourly data)")?;
            return Ok(());
        }

        for s in series {
            writeln!(
                self.out,
                "    {:<12} {}  {:.0}..{:.0}{}",
                s.label,
                sparkline(s.values(), lo, hi),
                lo,
                hi,
                s.unit
            )?;
        }
        Ok(())
    }
}

impl<W: Write> MapSurface for TerminalSurface<'_, W> {
    fn map_view(&mut self, view: &MapView) -> Result<()> {
        writeln!(
            self.out,
            "  {:.4}, {:.4} (zoom {})",
            view.center.latitude, view.center.longitude, view.zoom
        )?;
        writeln!(self.out, "  {}", view.embed_url())?;
        writeln!(self.out, "  {}", view.link())?;
        Ok(())
    }
}

/// Scale values into block characters between `lo` and `hi`.
pub fn sparkline(values: impl Iterator<Item = f64>, lo: f64, hi: f64) -> String {
    let span = hi - lo;
    values
        .map(|v| {
            if span <= f64::EPSILON {
                return SPARK[SPARK.len() / 2];
            }
            let idx = ((v - lo) / span * (SPARK.len() - 1) as f64).round() as usize;
            SPARK[idx.min(SPARK.len() - 1)]
        })
        .collect()
}

/// Render the whole dashboard for one state.
///
/// `fallback_hour` picks the background when the location reports no local
/// time.
pub fn render<W: Write>(
    out: &mut W,
    view: &ViewModel,
    presentation: Option<&Presentation>,
    fallback_hour: u32,
) -> Result<()> {
    let (Some(snapshot), Some(presentation)) = (view.snapshot.as_deref(), presentation) else {
        return status(out, view, fallback_hour);
    };

    header(out, &snapshot.location, presentation)?;
    current_panel(out, &snapshot.current)?;
    alerts_panel(out, &presentation.alerts)?;
    forecast_panel(out, &snapshot.forecast)?;
    hourly_panel(out, snapshot, presentation)?;
    map_panel(out, &presentation.map)?;
    Ok(())
}

fn status<W: Write>(out: &mut W, view: &ViewModel, fallback_hour: u32) -> Result<()> {
    if view.loading {
        writeln!(out, "Loading weather data...")?;
    } else if let Some(error) = &view.error {
        writeln!(out, "! {error}")?;
    } else {
        writeln!(out, "Search for a city to see the weather.")?;
    }
    let background = background_for_view(view.snapshot.as_deref(), fallback_hour);
    writeln!(out, "Theme: {}", background.name)?;
    Ok(())
}

fn section<W: Write>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))?;
    Ok(())
}

fn header<W: Write>(out: &mut W, location: &Location, presentation: &Presentation) -> Result<()> {
    writeln!(out, "Weather: {}", location.display_name())?;
    if !location.region.is_empty() {
        writeln!(out, "{}", location.region)?;
    }
    if let Some(local_time) = &location.local_time {
        writeln!(out, "Local time {local_time}")?;
    }
    writeln!(
        out,
        "Theme: {} ({})",
        presentation.category, presentation.background.name
    )?;
    Ok(())
}

pub fn current_panel<W: Write>(out: &mut W, current: &CurrentConditions) -> Result<()> {
    section(out, "Current conditions")?;
    writeln!(
        out,
        "  {:.0}°C  {}  (feels like {:.0}°C)",
        current.temperature_c.round(),
        current.condition.text,
        current.feels_like_c.round()
    )?;
    writeln!(out, "  Humidity    {}%", current.humidity_pct)?;
    writeln!(out, "  Wind        {} km/h, {}", current.wind_kph, current.wind_dir)?;
    writeln!(out, "  Pressure    {} hPa", current.pressure_mb)?;
    writeln!(out, "  Visibility  {} km", current.visibility_km)?;
    writeln!(out, "  UV index    {}", current.uv_index)?;
    writeln!(
        out,
        "  Updated     {}{}",
        current.last_updated.format("%Y-%m-%d %H:%M UTC"),
        if current.is_day { "" } else { " (night)" }
    )?;
    Ok(())
}

pub fn alerts_panel<W: Write>(out: &mut W, alerts: &[Alert]) -> Result<()> {
    section(out, "Weather alerts & notifications")?;
    if alerts.is_empty() {
        writeln!(out, "  No active alerts.")?;
    }
    for alert in alerts {
        writeln!(out, "  [{}] {}", alert.severity.as_str().to_uppercase(), alert.title)?;
        writeln!(out, "      {}", alert.description)?;
    }
    Ok(())
}

pub fn forecast_panel<W: Write>(out: &mut W, forecast: &[ForecastDay]) -> Result<()> {
    section(out, &format!("{}-day forecast", forecast.len()))?;
    for day in forecast {
        writeln!(
            out,
            "  {}  {:>3.0}°/{:<3.0}°  {:<28} rain {:>3}%  humidity {:.0}%",
            day.date.format("%a %d %b"),
            day.max_temp_c.round(),
            day.min_temp_c.round(),
            day.condition.text,
            day.chance_of_rain_pct,
            day.avg_humidity_pct
        )?;
        writeln!(
            out,
            "              sunrise {}  sunset {}  moon {}",
            day.astronomy.sunrise, day.astronomy.sunset, day.astronomy.moon_phase
        )?;
    }
    Ok(())
}

fn hourly_panel<W: Write>(
    out: &mut W,
    snapshot: &WeatherSnapshot,
    presentation: &Presentation,
) -> Result<()> {
    section(out, "Hourly")?;
    {
        let mut surface = TerminalSurface::new(out);
        surface.line_chart("Temperature (°C)", &presentation.temperature)?;
        surface.line_chart("Humidity (%)", std::slice::from_ref(&presentation.humidity))?;
    }

    let Some(today) = snapshot.today() else {
        return Ok(());
    };
    writeln!(out)?;
    // Every other hour keeps the strip readable.
    for hour in today.hours.iter().step_by(2) {
        writeln!(
            out,
            "  {}  {:>3.0}°  {:>5.1} km/h  {:>3}% rain  {}",
            hour.time.format("%H:%M"),
            hour.temperature_c.round(),
            hour.wind_kph,
            hour.chance_of_rain_pct,
            hour.condition.text
        )?;
    }
    Ok(())
}

fn map_panel<W: Write>(out: &mut W, map: &MapView) -> Result<()> {
    section(out, "Map")?;
    TerminalSurface::new(out).map_view(map)
}
