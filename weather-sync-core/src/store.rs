use async_trait::async_trait;
use std::fmt::Debug;

use crate::{WeatherError, WeatherQueryResult, WeatherReading};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// Local persistence holding one reading per city label.
///
/// Upserts are serialized by the implementation; concurrent upserts for the
/// same label resolve as last commit wins.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    /// Every persisted reading, in no particular order.
    async fn fetch_all(&self) -> Result<Vec<WeatherReading>, WeatherError>;

    /// Insert or update the row whose label equals `result`'s location label.
    ///
    /// An existing row keeps its `id`; a new row gets a fresh one.
    async fn upsert(&self, result: &WeatherQueryResult) -> Result<WeatherReading, WeatherError>;

    /// Exact, case-sensitive label lookup.
    async fn fetch_by_label(&self, label: &str) -> Result<Option<WeatherReading>, WeatherError>;
}

pub(crate) fn new_reading_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
