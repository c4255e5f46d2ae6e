use chrono::{DateTime, Utc};
use std::fmt::Write;
use weather_sync_core::{WeatherError, WeatherReading};

/// One line per reading, in the order given.
pub fn render_readings(readings: &[WeatherReading], now: DateTime<Utc>) -> String {
    if readings.is_empty() {
        return "No weather readings stored yet.\n".to_string();
    }

    let mut out = String::new();
    for reading in readings {
        let city = match reading.city() {
            "" => reading.city_label.as_str(),
            city => city,
        };

        let _ = write!(
            out,
            "{:>6.1}°C  {:<18} {:<22}",
            reading.temperature_celsius,
            city,
            reading.country()
        );
        if !reading.observed_at.is_empty() {
            let _ = write!(out, " observed {}", reading.observed_at);
        }
        if let Some(updated) = reading.last_updated {
            let _ = write!(out, " ({})", age(now, updated));
        }
        out.push('\n');
    }
    out
}

pub fn render_error(err: &WeatherError) -> String {
    format!("error: {}", err.user_message())
}

fn age(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes().max(0);
    match minutes {
        0 => "just now".to_string(),
        1..=59 => format!("{minutes}m ago"),
        60..=1439 => format!("{}h ago", minutes / 60),
        _ => format!("{}d ago", minutes / 1440),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reading(label: &str, temp: f64, updated: Option<DateTime<Utc>>) -> WeatherReading {
        WeatherReading {
            id: "id".into(),
            city_label: label.into(),
            temperature_celsius: temp,
            observed_at: "2024-11-16T12:00:00Z".into(),
            last_updated: updated,
        }
    }

    #[test]
    fn empty_list_has_placeholder() {
        assert_eq!(render_readings(&[], Utc::now()), "No weather readings stored yet.\n");
    }

    #[test]
    fn rows_show_city_country_and_age() {
        let now = Utc::now();
        let out = render_readings(
            &[reading("Berlin, Germany", 5.25, Some(now - Duration::minutes(90)))],
            now,
        );

        assert!(out.contains("5.2°C") || out.contains("5.3°C"));
        assert!(out.contains("Berlin"));
        assert!(out.contains("Germany"));
        assert!(out.contains("observed 2024-11-16T12:00:00Z"));
        assert!(out.contains("(1h ago)"));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn label_without_separator_is_shown_whole() {
        let out = render_readings(&[reading("Shimla", 12.0, None)], Utc::now());
        assert!(out.contains("Shimla"));
        assert!(!out.contains("ago"));
    }

    #[test]
    fn error_uses_user_message() {
        let err = WeatherError::Network("No internet connection.".into());
        assert_eq!(render_error(&err), "error: No internet connection.");
    }

    #[test]
    fn age_buckets() {
        let now = Utc::now();
        assert_eq!(age(now, now), "just now");
        assert_eq!(age(now, now - Duration::minutes(5)), "5m ago");
        assert_eq!(age(now, now - Duration::days(3)), "3d ago");
    }
}
