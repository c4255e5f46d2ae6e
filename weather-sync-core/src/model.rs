use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest persisted reading for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Stable identifier assigned on first insert.
    pub id: String,
    /// `"<city>, <region/country>"` as returned by the provider. Upsert key.
    pub city_label: String,
    pub temperature_celsius: f64,
    /// Provider observation time (ISO-8601), empty when the provider omitted it.
    pub observed_at: String,
    /// When the row was last written locally.
    pub last_updated: Option<DateTime<Utc>>,
}

impl WeatherReading {
    pub fn city(&self) -> &str {
        city_of(&self.city_label)
    }

    pub fn country(&self) -> &str {
        country_of(&self.city_label)
    }
}

/// Flattened provider answer for a single city. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherQueryResult {
    pub temperature_celsius: Option<f64>,
    pub observed_at: Option<String>,
    pub location_label: Option<String>,
    pub humidity: Option<f64>,
    pub weather_code: Option<i64>,
    pub location_type: Option<String>,
}

impl WeatherQueryResult {
    /// Label used as the store key; empty when the provider sent no location.
    pub fn label(&self) -> &str {
        self.location_label.as_deref().unwrap_or("")
    }

    pub fn temperature_or_default(&self) -> f64 {
        self.temperature_celsius.unwrap_or(0.0)
    }

    pub fn observed_at_or_default(&self) -> &str {
        self.observed_at.as_deref().unwrap_or("")
    }
}

/// City part of a label: text before the first comma, trimmed.
pub fn city_of(label: &str) -> &str {
    label.split_once(',').map(|(city, _)| city.trim()).unwrap_or("")
}

/// Country part of a label: text after the last comma, trimmed.
pub fn country_of(label: &str) -> &str {
    label.rsplit_once(',').map(|(_, country)| country.trim()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parts_use_first_and_last_separator() {
        let label = "Dallas, Texas, United States";
        assert_eq!(city_of(label), "Dallas");
        assert_eq!(country_of(label), "United States");
    }

    #[test]
    fn label_without_separator_yields_empty_parts() {
        assert_eq!(city_of("Shimla"), "");
        assert_eq!(country_of("Shimla"), "");
    }

    #[test]
    fn query_result_defaults() {
        let result = WeatherQueryResult::default();
        assert_eq!(result.label(), "");
        assert_eq!(result.temperature_or_default(), 0.0);
        assert_eq!(result.observed_at_or_default(), "");
    }

    #[test]
    fn reading_accessors() {
        let reading = WeatherReading {
            id: "1".into(),
            city_label: " Paris , France ".into(),
            temperature_celsius: 10.0,
            observed_at: String::new(),
            last_updated: None,
        };
        assert_eq!(reading.city(), "Paris");
        assert_eq!(reading.country(), "France");
    }
}
