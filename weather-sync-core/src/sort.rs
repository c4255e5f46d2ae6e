use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::WeatherReading;

/// Ordering applied to the published reading list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOption {
    #[default]
    #[serde(rename = "name")]
    ByName,
    #[serde(rename = "temperature")]
    ByTemperature,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::ByName => "name",
            SortOption::ByTemperature => "temperature",
        }
    }

    pub const fn all() -> &'static [SortOption] {
        &[SortOption::ByName, SortOption::ByTemperature]
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "name" => Ok(SortOption::ByName),
            "temperature" | "temp" => Ok(SortOption::ByTemperature),
            _ => Err(anyhow::anyhow!(
                "Unknown sort option '{value}'. Supported options: name, temperature."
            )),
        }
    }
}

/// Stable in-place sort; equal keys keep their relative order.
pub fn sort_readings(readings: &mut [WeatherReading], option: SortOption) {
    match option {
        SortOption::ByName => readings.sort_by(|a, b| a.city().cmp(b.city())),
        SortOption::ByTemperature => {
            readings.sort_by(|a, b| a.temperature_celsius.total_cmp(&b.temperature_celsius))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(label: &str, temp: f64) -> WeatherReading {
        WeatherReading {
            id: label.to_string(),
            city_label: label.to_string(),
            temperature_celsius: temp,
            observed_at: String::new(),
            last_updated: None,
        }
    }

    fn cities(readings: &[WeatherReading]) -> Vec<&str> {
        readings.iter().map(|r| r.city()).collect()
    }

    #[test]
    fn by_temperature_ascending() {
        let mut list = vec![reading("Paris, France", 10.0), reading("Berlin, Germany", 5.0)];
        sort_readings(&mut list, SortOption::ByTemperature);
        assert_eq!(cities(&list), vec!["Berlin", "Paris"]);
    }

    #[test]
    fn by_name_ignores_temperature() {
        let mut list = vec![reading("Paris, France", 1.0), reading("Berlin, Germany", 30.0)];
        sort_readings(&mut list, SortOption::ByName);
        assert_eq!(cities(&list), vec!["Berlin", "Paris"]);
    }

    #[test]
    fn by_name_compares_city_portion_only() {
        let mut list = vec![reading("London, Zimbabwe", 0.0), reading("London, Canada", 0.0)];
        sort_readings(&mut list, SortOption::ByName);
        assert_eq!(list[0].city_label, "London, Zimbabwe");
    }

    #[test]
    fn equal_keys_keep_relative_order_across_resorts() {
        let mut list = vec![
            reading("Dallas, United States", 7.0),
            reading("Shimla, India", 7.0),
            reading("Berlin, Germany", 2.0),
        ];
        sort_readings(&mut list, SortOption::ByTemperature);
        assert_eq!(cities(&list), vec!["Berlin", "Dallas", "Shimla"]);

        sort_readings(&mut list, SortOption::ByName);
        sort_readings(&mut list, SortOption::ByTemperature);
        assert_eq!(cities(&list), vec!["Berlin", "Dallas", "Shimla"]);
    }

    #[test]
    fn sort_option_str_roundtrip() {
        for option in SortOption::all() {
            let parsed: SortOption = option.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*option, parsed);
        }
    }

    #[test]
    fn unknown_sort_option_error() {
        let err = "humidity".parse::<SortOption>().unwrap_err();
        assert!(err.to_string().contains("Unknown sort option"));
    }
}
