//! Orchestrates fetch, persist and publish for the city list.
//!
//! The engine owns the observable [`EngineState`] and is its only writer. Every
//! state change goes through one `watch::Sender::send_modify` call, so
//! observers never see a half-applied update.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, instrument, warn};

use crate::{
    FailureTracker, Reachability, RecordStore, SortOption, WeatherError, WeatherProvider,
    WeatherReading, sort::sort_readings,
};

/// Cities fetched when the local store is empty.
pub const DEFAULT_CITIES: [&str; 5] = ["Berlin", "Dallas", "London", "Paris", "Shimla"];

const NO_INTERNET: &str = "No internet connection.";
const OFFLINE_LOAD_FAILED: &str = "Failed to load offline data.";

/// Snapshot published to observers after each operation step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    /// Current readings, ordered by `sort_option`.
    pub readings: Vec<WeatherReading>,
    pub is_loading: bool,
    pub last_error: Option<WeatherError>,
    pub sort_option: SortOption,
}

#[derive(Debug)]
pub struct WeatherSyncEngine {
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn RecordStore>,
    reachability: Arc<dyn Reachability>,
    default_cities: Vec<String>,
    state: watch::Sender<EngineState>,
}

impl WeatherSyncEngine {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        store: Arc<dyn RecordStore>,
        reachability: Arc<dyn Reachability>,
    ) -> Self {
        let (state, _) = watch::channel(EngineState::default());

        Self {
            provider,
            store,
            reachability,
            default_cities: DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
            state,
        }
    }

    /// Replace the seed list used by [`load_initial`](Self::load_initial).
    pub fn with_default_cities(mut self, cities: Vec<String>) -> Self {
        self.default_cities = cities;
        self
    }

    pub fn with_sort_option(self, option: SortOption) -> Self {
        self.state.send_modify(|s| s.sort_option = option);
        self
    }

    pub fn default_cities(&self) -> &[String] {
        &self.default_cities
    }

    /// Receiver notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn state(&self) -> EngineState {
        self.state.borrow().clone()
    }

    /// Show what is stored locally, or seed the store from the default cities
    /// when it is empty.
    #[instrument(skip(self))]
    pub async fn load_initial(&self) {
        match self.store.fetch_all().await {
            Ok(rows) if rows.is_empty() => {
                info!("local store is empty, fetching default cities");
                let cities = self.default_cities.clone();
                self.refresh_batch(&cities).await;
            }
            Ok(rows) => {
                debug!(count = rows.len(), "loaded readings from local store");
                self.state.send_modify(|s| {
                    s.readings = rows;
                    sort_readings(&mut s.readings, s.sort_option);
                });
            }
            Err(err) => {
                warn!(error = %err, "failed to read local store");
                self.state.send_modify(|s| {
                    s.last_error = Some(WeatherError::FetchFailed(OFFLINE_LOAD_FAILED.to_string()));
                });
            }
        }
    }

    /// Fetch every city concurrently and persist each success.
    ///
    /// Individual failures never abort the batch; they are reported together
    /// in `last_error` once every task has finished.
    #[instrument(skip(self, cities), fields(count = cities.len()))]
    pub async fn refresh_batch(&self, cities: &[String]) {
        if cities.is_empty() {
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.last_error = None;
        });

        if !self.reachability.is_connected() {
            warn!("network unreachable, skipping batch refresh");
            self.state.send_modify(|s| {
                s.last_error = Some(WeatherError::Network(NO_INTERNET.to_string()));
                s.is_loading = false;
            });
            return;
        }

        let failures = Arc::new(FailureTracker::new());

        let handles: Vec<(String, JoinHandle<()>)> = cities
            .iter()
            .map(|city| {
                let provider = Arc::clone(&self.provider);
                let store = Arc::clone(&self.store);
                let failures = Arc::clone(&failures);
                let task_city = city.clone();

                let handle = tokio::spawn(async move {
                    sync_city(provider.as_ref(), store.as_ref(), &task_city, &failures).await;
                });
                (city.clone(), handle)
            })
            .collect();

        for (city, handle) in handles {
            if let Err(err) = handle.await {
                warn!(%city, error = %err, "city task did not complete");
                failures.record(city);
            }
        }

        let failed = failures.drain();
        let mut error = (!failed.is_empty()).then(|| {
            WeatherError::Network(format!("Failed to fetch weather for: {}", failed.join(", ")))
        });

        info!(requested = cities.len(), failed = failed.len(), "batch refresh finished");

        let rows = match self.store.fetch_all().await {
            Ok(rows) => Some(rows),
            Err(err) => {
                warn!(error = %err, "failed to re-read local store after batch");
                error.get_or_insert(WeatherError::FetchFailed(OFFLINE_LOAD_FAILED.to_string()));
                None
            }
        };

        self.state.send_modify(|s| {
            if let Some(rows) = rows {
                s.readings = rows;
                sort_readings(&mut s.readings, s.sort_option);
            }
            s.last_error = error;
            s.is_loading = false;
        });
    }

    /// Fetch one city, persist it and republish the whole stored list.
    #[instrument(skip(self))]
    pub async fn refresh_single(&self, city: &str) {
        if city.is_empty() {
            return;
        }

        if !self.reachability.is_connected() {
            warn!("network unreachable, skipping refresh");
            self.state.send_modify(|s| {
                s.last_error = Some(WeatherError::Network(NO_INTERNET.to_string()));
            });
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.last_error = None;
        });

        let outcome = self.fetch_and_reload(city).await;
        if let Err(err) = &outcome {
            warn!(error = %err, "single refresh failed");
        }

        self.state.send_modify(|s| {
            match outcome {
                Ok(rows) => {
                    s.readings = rows;
                    sort_readings(&mut s.readings, s.sort_option);
                }
                Err(_) => {
                    s.last_error = Some(WeatherError::FetchFailed(format!(
                        "Failed to refresh weather data for {city}. Please try again."
                    )));
                }
            }
            s.is_loading = false;
        });
    }

    /// Store the option and re-sort the published list. No I/O.
    pub fn set_sort_option(&self, option: SortOption) {
        self.state.send_modify(|s| {
            s.sort_option = option;
            sort_readings(&mut s.readings, option);
        });
    }

    async fn fetch_and_reload(&self, city: &str) -> Result<Vec<WeatherReading>, WeatherError> {
        let result = self.provider.fetch_reading(city).await?;
        self.store.upsert(&result).await?;
        self.store.fetch_all().await
    }
}

async fn sync_city(
    provider: &dyn WeatherProvider,
    store: &dyn RecordStore,
    city: &str,
    failures: &FailureTracker,
) {
    let outcome = match provider.fetch_reading(city).await {
        Ok(result) => store.upsert(&result).await.map(|_| ()),
        Err(err) => Err(err),
    };

    if let Err(err) = outcome {
        warn!(%city, error = %err, "failed to sync city");
        failures.record(city);
    }
}
