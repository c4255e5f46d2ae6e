use std::{sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use weather_sync_core::{
    Config, MemoryRecordStore, ReachabilityFlag, RecordStore, SortOption, SqliteRecordStore,
    WeatherSyncEngine, provider_from_config, reachability,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-sync", version, about = "Offline-first weather for a list of cities")]
pub struct Cli {
    /// Keep readings in memory only; nothing is read from or written to disk.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Sort order: "name" or "temperature". Defaults to the configured order.
    #[arg(long, global = true)]
    pub sort: Option<SortOption>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider API key.
    Configure,

    /// Show stored readings, fetching the default cities if nothing is stored.
    Show,

    /// Fetch several cities concurrently (the configured defaults if none given).
    Refresh {
        /// City names, e.g. "Berlin" "Paris".
        cities: Vec<String>,
    },

    /// Fetch a single city and show the updated list.
    Update {
        /// City name or stored label, e.g. "Berlin, Germany".
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        let engine = match self.command {
            Command::Configure => return configure(config),
            _ => self.build_engine(&config).await?,
        };

        match self.command {
            Command::Configure => {}
            Command::Show => engine.load_initial().await,
            Command::Refresh { cities } => {
                let cities =
                    if cities.is_empty() { engine.default_cities().to_vec() } else { cities };
                engine.refresh_batch(&cities).await;
            }
            Command::Update { city } => engine.refresh_single(&city).await,
        }

        let state = engine.state();
        print!("{}", output::render_readings(&state.readings, chrono::Utc::now()));
        if let Some(err) = &state.last_error {
            eprintln!("{}", output::render_error(err));
        }

        Ok(())
    }

    async fn build_engine(&self, config: &Config) -> anyhow::Result<WeatherSyncEngine> {
        let provider = provider_from_config(config)?;

        let store: Arc<dyn RecordStore> = if self.ephemeral {
            Arc::new(MemoryRecordStore::new())
        } else {
            let path = config.database_path()?;
            debug!(path = %path.display(), "opening local store");
            Arc::new(SqliteRecordStore::open(&path)?)
        };

        let timeout = Duration::from_secs(config.request_timeout_secs);
        let connected = match reachability::host_and_port(config.base_url()) {
            Some((host, port)) => reachability::probe(&host, port, timeout).await,
            None => false,
        };

        let engine = WeatherSyncEngine::new(
            Arc::new(provider),
            store,
            Arc::new(ReachabilityFlag::new(connected)),
        )
        .with_default_cities(config.default_cities.clone())
        .with_sort_option(self.sort.unwrap_or(config.sort));

        Ok(engine)
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = inquire::Password::new("Tomorrow.io API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}
