use crate::{Config, WeatherError, WeatherQueryResult, provider::tomorrow::TomorrowProvider};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod tomorrow;

/// Source of current weather for a single city.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_reading(&self, city: &str) -> Result<WeatherQueryResult, WeatherError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<TomorrowProvider> {
    let api_key = config.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: run `weather-sync configure` and enter your API key."
        )
    })?;

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let provider = TomorrowProvider::with_base_url(api_key.to_owned(), config.base_url(), timeout)?;

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("Hint: run `weather-sync configure`"));
    }

    #[test]
    fn provider_from_config_rejects_empty_key() {
        let cfg = Config { api_key: Some(String::new()), ..Config::default() };
        assert!(provider_from_config(&cfg).is_err());
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
