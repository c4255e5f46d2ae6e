//! Core library for the `weather-sync` client.
//!
//! This crate defines:
//! - The sync engine: concurrent per-city fetch, local upsert, observable state
//! - Collaborator traits (provider, record store, reachability) and their
//!   default implementations
//! - Shared domain models, errors and configuration
//!
//! It is used by `weather-sync-cli`, but the engine can be driven by any
//! presentation layer that observes [`EngineState`].

pub mod config;
pub mod engine;
pub mod error;
pub mod failures;
pub mod model;
pub mod provider;
pub mod reachability;
pub mod sort;
pub mod store;

pub use config::Config;
pub use engine::{DEFAULT_CITIES, EngineState, WeatherSyncEngine};
pub use error::WeatherError;
pub use failures::FailureTracker;
pub use model::{WeatherQueryResult, WeatherReading};
pub use provider::{WeatherProvider, provider_from_config, tomorrow::TomorrowProvider};
pub use reachability::{Reachability, ReachabilityFlag};
pub use sort::SortOption;
pub use store::{MemoryRecordStore, RecordStore, SqliteRecordStore};
