//! Core library for the `weatherdash` terminal dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client behind the `WeatherProvider` trait
//! - Condition classification and threshold advisories
//! - The dashboard controller and the data contract its views consume
//!
//! It is used by the `weatherdash` binary, but has no terminal dependencies of
//! its own.

pub mod alerts;
pub mod classify;
pub mod config;
pub mod controller;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod view;

#[cfg(test)]
mod testutil;

pub use alerts::{Alert, AlertEvaluator, AlertSource, Severity, Thresholds};
pub use classify::{ConditionCategory, Gradient, background_for, classify};
pub use config::Config;
pub use controller::{AppController, AppState, Outcome};
pub use error::WeatherError;
pub use model::{
    Coordinates, CurrentConditions, ForecastDay, HourReading, Location, LocationQuery,
    WeatherSnapshot,
};
pub use provider::{WeatherProvider, provider_from_config};
pub use view::{Presentation, ViewModel, background_for_view};
