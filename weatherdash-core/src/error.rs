use thiserror::Error;

/// Errors that reach the dashboard controller.
///
/// Both variants are recoverable: the controller turns them into a message
/// for the user and keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// Network, HTTP status, credential or parse failure while fetching a
    /// snapshot. `detail` is for logs only and never shown to the user.
    #[error("failed to fetch weather data")]
    FetchFailed { detail: String },

    /// The platform refused, or cannot provide, the current position.
    #[error("location unavailable: {0}")]
    GeolocationDenied(String),
}

impl WeatherError {
    /// Collapse an `anyhow` chain into a `FetchFailed`, keeping the full
    /// context chain as the detail.
    pub fn fetch_failed(err: anyhow::Error) -> Self {
        WeatherError::FetchFailed { detail: format!("{err:#}") }
    }
}
