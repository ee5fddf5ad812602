//! Dashboard state and fetch orchestration.
//!
//! The controller owns exactly one state slot. Every transition replaces the
//! whole [`AppState`] value; observers get change notifications through a
//! `tokio::sync::watch` channel.
//!
//! Overlapping fetches are allowed. Each fetch carries a [`RequestId`] and a
//! response is only applied while the state is still `Loading` for that id,
//! so a slow, older response can never overwrite a newer search.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;

use crate::{
    LocationQuery, WeatherError, WeatherSnapshot, geolocation::Geolocator,
    provider::WeatherProvider, view::ViewModel,
};

pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch weather data. Please check the city name and try again.";

pub const GEOLOCATION_MESSAGE: &str =
    "Unable to determine your location. Please enter a city name manually.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Idle,
    Loading { request: RequestId, query: LocationQuery },
    Loaded(Arc<WeatherSnapshot>),
    Failed(String),
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AppState::Loading { .. })
    }

    pub fn snapshot(&self) -> Option<&Arc<WeatherSnapshot>> {
        match self {
            AppState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AppState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Handle for one issued fetch, returned by [`AppController::begin`].
#[derive(Debug, Clone)]
#[must_use]
pub struct Ticket {
    pub id: RequestId,
    pub query: LocationQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The result replaced the state.
    Applied,
    /// A newer request (or a failure) replaced the state first; result dropped.
    Superseded,
}

/// User-facing text for a recoverable error. The underlying cause is only
/// logged.
pub fn user_message(err: &WeatherError) -> &'static str {
    match err {
        WeatherError::FetchFailed { .. } => FETCH_FAILED_MESSAGE,
        WeatherError::GeolocationDenied(_) => GEOLOCATION_MESSAGE,
    }
}

pub struct AppController {
    provider: Arc<dyn WeatherProvider>,
    default_location: LocationQuery,
    last_request: AtomicU64,
    state: watch::Sender<AppState>,
}

impl AppController {
    pub fn new(provider: Arc<dyn WeatherProvider>, default_location: LocationQuery) -> Self {
        let (state, _) = watch::channel(AppState::Idle);

        Self { provider, default_location, last_request: AtomicU64::new(0), state }
    }

    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> ViewModel {
        ViewModel::from(&*self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }

    pub fn default_location(&self) -> &LocationQuery {
        &self.default_location
    }

    /// Initial load for the configured default location.
    pub async fn mount(&self) -> Outcome {
        self.search(self.default_location.clone()).await
    }

    /// Fetch `query` and apply the result unless a newer request superseded it.
    pub async fn search(&self, query: LocationQuery) -> Outcome {
        let ticket = self.begin(query);
        tracing::info!(request = ticket.id.get(), location = %ticket.query, "fetching weather");

        let result = self.provider.fetch(&ticket.query).await;
        self.complete(&ticket, result)
    }

    /// Search-box entry point. Blank input is ignored and returns `None`.
    pub async fn submit(&self, input: &str) -> Option<Outcome> {
        let query: LocationQuery = input.parse().ok()?;
        Some(self.search(query).await)
    }

    /// "Use my location": look up the position, then search for it.
    pub async fn locate(&self, geolocator: &dyn Geolocator) -> Outcome {
        match geolocator.locate().await {
            Ok(coords) => self.search(coords.into()).await,
            Err(err) => {
                tracing::warn!(error = %err, "geolocation unavailable");
                self.state.send_replace(AppState::Failed(user_message(&err).to_string()));
                Outcome::Applied
            }
        }
    }

    /// Enter `Loading` for `query`, dropping whatever was shown before.
    pub fn begin(&self, query: LocationQuery) -> Ticket {
        let mut issued = RequestId(0);

        self.state.send_modify(|state| {
            issued = RequestId(self.last_request.fetch_add(1, Ordering::Relaxed) + 1);
            *state = AppState::Loading { request: issued, query: query.clone() };
        });

        Ticket { id: issued, query }
    }

    /// Apply the result of `ticket`'s fetch if it is still the one in flight.
    pub fn complete(
        &self,
        ticket: &Ticket,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> Outcome {
        let next = match result {
            Ok(snapshot) => AppState::Loaded(Arc::new(snapshot)),
            Err(err) => {
                if let WeatherError::FetchFailed { detail } = &err {
                    tracing::warn!(request = ticket.id.get(), %detail, "weather fetch failed");
                }
                AppState::Failed(user_message(&err).to_string())
            }
        };

        let applied = self.state.send_if_modified(|state| {
            let current = matches!(
                state,
                AppState::Loading { request, .. } if *request == ticket.id
            );
            if current {
                *state = next;
            }
            current
        });

        if applied {
            Outcome::Applied
        } else {
            tracing::debug!(request = ticket.id.get(), "dropping stale weather response");
            Outcome::Superseded
        }
    }
}

impl std::fmt::Debug for AppController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppController")
            .field("provider", &self.provider)
            .field("default_location", &self.default_location)
            .field("state", &*self.state.borrow())
            .finish()
    }
}
