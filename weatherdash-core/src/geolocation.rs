use async_trait::async_trait;

use crate::{Config, WeatherError, model::Coordinates};

/// Platform position lookup behind "use my location".
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Fails with [`WeatherError::GeolocationDenied`] when refused or unsupported.
    async fn locate(&self) -> Result<Coordinates, WeatherError>;
}

/// Always answers with the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl Geolocator for FixedPosition {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        Ok(self.0)
    }
}

/// No position capability at all.
#[derive(Debug, Clone)]
pub struct Unavailable {
    reason: String,
}

impl Unavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl Geolocator for Unavailable {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        Err(WeatherError::GeolocationDenied(self.reason.clone()))
    }
}

/// Position from the `home` config entry, or [`Unavailable`] when unset.
pub fn from_config(config: &Config) -> Box<dyn Geolocator> {
    match config.home_coordinates() {
        Some(coords) => Box::new(FixedPosition(coords)),
        None => Box::new(Unavailable::new("no `home` coordinates in config")),
    }
}
