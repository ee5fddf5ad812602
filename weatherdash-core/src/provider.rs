use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{
    Config, LocationQuery, WeatherError, WeatherSnapshot,
    provider::weatherapi::WeatherApiClient,
};

pub mod weatherapi;

/// Source of complete weather snapshots.
///
/// Implementations must return either a fully populated snapshot or
/// `FetchFailed`; never a partial result.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError>;
}

/// Construct the WeatherAPI provider from config.
///
/// A missing API key is not an error here; it surfaces as `FetchFailed` on the
/// first fetch so the dashboard can still start and show the banner.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    if config.resolved_api_key().is_none() {
        tracing::warn!(
            "No WeatherAPI key configured. Hint: set WEATHERAPI_KEY or run `weatherdash configure`."
        );
    }

    Ok(Arc::new(WeatherApiClient::from_config(config)?))
}
