//! Error taxonomy shared by the provider, the record store and the engine.

use thiserror::Error;

/// Every failure the sync pipeline can surface.
///
/// The enum is `Clone + PartialEq` because the engine keeps the most recent
/// error in its observable state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// Transport failure or no network available.
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-2xx status (or an empty body, status 0).
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Payload did not have the expected JSON shape.
    #[error("Invalid weather data received: {0}")]
    Decoding(String),

    /// Local store read failure, or a user-facing refresh failure.
    #[error("Failed to fetch weather: {0}")]
    FetchFailed(String),

    /// Local store write failure.
    #[error("Failed to save weather: {0}")]
    SaveFailed(String),
}

impl WeatherError {
    /// Message without the category prefix, for display next to a list.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(msg)
            | Self::Decoding(msg)
            | Self::FetchFailed(msg)
            | Self::SaveFailed(msg) => msg.clone(),
            Self::Api { status, message } => format!("{message} ({status})"),
        }
    }

    /// Whether the failure came from the network side rather than local storage.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api { .. } | Self::Decoding(_))
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decoding(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let err = WeatherError::Network("No internet connection.".into());
        assert_eq!(err.to_string(), "Network error: No internet connection.");

        let err = WeatherError::Api { status: 404, message: "Not Found".into() };
        assert_eq!(err.to_string(), "API error 404: Not Found");
    }

    #[test]
    fn user_message_strips_prefix() {
        let err = WeatherError::FetchFailed("Failed to load offline data.".into());
        assert_eq!(err.user_message(), "Failed to load offline data.");
    }

    #[test]
    fn remote_classification() {
        assert!(WeatherError::Decoding("x".into()).is_remote());
        assert!(!WeatherError::SaveFailed("x".into()).is_remote());
    }

    #[test]
    fn json_errors_become_decoding_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(WeatherError::from(err), WeatherError::Decoding(_)));
    }
}
