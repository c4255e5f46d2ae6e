//! SQLite-backed record store.

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::{fs, path::Path, sync::Arc};
use tracing::debug;

use super::{RecordStore, new_reading_id};
use crate::{WeatherError, WeatherQueryResult, WeatherReading};

/// One connection behind a mutex; every statement runs on the blocking pool.
///
/// Holding the mutex for the whole transaction is what serializes upserts.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        Self::from_connection(conn)
    }

    /// Create an in-memory store (for testing).
    #[cfg(test)]
    pub fn in_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS weather_info (
                id TEXT PRIMARY KEY,
                city_name TEXT NOT NULL UNIQUE,
                temperature REAL NOT NULL,
                time TEXT NOT NULL,
                last_updated TEXT
            );
            "#,
        )
        .context("Failed to initialize weather_info schema")?;

        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    async fn run<T, F>(&self, op: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock();
            op(&mut conn)
        })
        .await
        .map_err(|e| format!("store task failed: {e}"))?
        .map_err(|e| e.to_string())
    }

    fn row_to_reading(row: &rusqlite::Row) -> rusqlite::Result<WeatherReading> {
        let last_updated: Option<String> = row.get(4)?;

        Ok(WeatherReading {
            id: row.get(0)?,
            city_label: row.get(1)?,
            temperature_celsius: row.get(2)?,
            observed_at: row.get(3)?,
            last_updated: last_updated
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        })
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn fetch_all(&self) -> Result<Vec<WeatherReading>, WeatherError> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, city_name, temperature, time, last_updated FROM weather_info",
            )?;
            let rows = stmt.query_map([], Self::row_to_reading)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(WeatherError::FetchFailed)
    }

    async fn upsert(&self, result: &WeatherQueryResult) -> Result<WeatherReading, WeatherError> {
        let label = result.label().to_string();
        let temperature = result.temperature_or_default();
        let observed_at = result.observed_at_or_default().to_string();

        let reading = self
            .run(move |conn| {
                let now = Utc::now();
                let tx = conn.transaction()?;

                let existing: Option<String> = tx
                    .query_row(
                        "SELECT id FROM weather_info WHERE city_name = ?1",
                        params![label],
                        |row| row.get(0),
                    )
                    .optional()?;

                let id = match existing {
                    Some(id) => {
                        tx.execute(
                            "UPDATE weather_info
                             SET city_name = ?1, temperature = ?2, time = ?3, last_updated = ?4
                             WHERE id = ?5",
                            params![label, temperature, observed_at, now.to_rfc3339(), id],
                        )?;
                        id
                    }
                    None => {
                        let id = new_reading_id();
                        tx.execute(
                            "INSERT INTO weather_info (id, city_name, temperature, time, last_updated)
                             VALUES (?1, ?2, ?3, ?4, ?5)",
                            params![id, label, temperature, observed_at, now.to_rfc3339()],
                        )?;
                        id
                    }
                };

                tx.commit()?;

                Ok(WeatherReading {
                    id,
                    city_label: label,
                    temperature_celsius: temperature,
                    observed_at,
                    last_updated: Some(now),
                })
            })
            .await
            .map_err(WeatherError::SaveFailed)?;

        debug!(label = %reading.city_label, id = %reading.id, "reading upserted");
        Ok(reading)
    }

    async fn fetch_by_label(&self, label: &str) -> Result<Option<WeatherReading>, WeatherError> {
        let label = label.to_string();

        self.run(move |conn| {
            conn.query_row(
                "SELECT id, city_name, temperature, time, last_updated
                 FROM weather_info WHERE city_name = ?1",
                params![label],
                Self::row_to_reading,
            )
            .optional()
        })
        .await
        .map_err(WeatherError::FetchFailed)
    }
}
