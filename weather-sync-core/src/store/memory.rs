use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::{RecordStore, new_reading_id};
use crate::{WeatherError, WeatherQueryResult, WeatherReading};

/// Non-persistent store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    rows: Mutex<Vec<WeatherReading>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `rows`, as if loaded from disk.
    pub fn with_rows(rows: Vec<WeatherReading>) -> Self {
        Self { rows: Mutex::new(rows) }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn fetch_all(&self) -> Result<Vec<WeatherReading>, WeatherError> {
        Ok(self.rows.lock().clone())
    }

    async fn upsert(&self, result: &WeatherQueryResult) -> Result<WeatherReading, WeatherError> {
        let label = result.label();
        let mut rows = self.rows.lock();

        let reading = match rows.iter_mut().find(|r| r.city_label == label) {
            Some(existing) => {
                existing.city_label = label.to_string();
                existing.temperature_celsius = result.temperature_or_default();
                existing.observed_at = result.observed_at_or_default().to_string();
                existing.last_updated = Some(Utc::now());
                existing.clone()
            }
            None => {
                let reading = WeatherReading {
                    id: new_reading_id(),
                    city_label: label.to_string(),
                    temperature_celsius: result.temperature_or_default(),
                    observed_at: result.observed_at_or_default().to_string(),
                    last_updated: Some(Utc::now()),
                };
                rows.push(reading.clone());
                reading
            }
        };

        Ok(reading)
    }

    async fn fetch_by_label(&self, label: &str) -> Result<Option<WeatherReading>, WeatherError> {
        Ok(self.rows.lock().iter().find(|r| r.city_label == label).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(label: &str, temp: f64) -> WeatherQueryResult {
        WeatherQueryResult {
            temperature_celsius: Some(temp),
            observed_at: Some("2024-11-16T12:00:00Z".into()),
            location_label: Some(label.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn upsert_twice_keeps_one_row_and_id() {
        let store = MemoryRecordStore::new();

        let first = store.upsert(&result("Berlin, Germany", 5.0)).await.unwrap();
        let second = store.upsert(&result("Berlin, Germany", 7.0)).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(first.id, second.id);
        assert_eq!(second.temperature_celsius, 7.0);
    }

    #[tokio::test]
    async fn labels_are_case_sensitive() {
        let store = MemoryRecordStore::new();
        store.upsert(&result("Berlin, Germany", 5.0)).await.unwrap();
        store.upsert(&result("berlin, germany", 6.0)).await.unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.fetch_by_label("BERLIN, GERMANY").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_fields_are_defaulted() {
        let store = MemoryRecordStore::new();
        let reading = store.upsert(&WeatherQueryResult::default()).await.unwrap();

        assert_eq!(reading.city_label, "");
        assert_eq!(reading.temperature_celsius, 0.0);
        assert_eq!(reading.observed_at, "");
        assert!(reading.last_updated.is_some());
    }
}
