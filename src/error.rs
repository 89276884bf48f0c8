//! Unified error handling for the skimmer-hotspots library.
//!
//! The clustering and scoring algorithms never fail for well-formed input.
//! Errors only surface at the boundary: report validation, configuration,
//! and the JSON entry points.

use thiserror::Error;

/// Unified error type for boundary operations.
#[derive(Debug, Error)]
pub enum HotspotError {
    /// Report is missing its identifier
    #[error("Report has an empty id")]
    MissingId,

    /// Report has non-finite or out-of-range coordinates
    #[error("Report '{report_id}' has invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        report_id: String,
        latitude: f64,
        longitude: f64,
    },

    /// Confidence score outside [0, 1]
    #[error("Report '{report_id}' has confidence {value}, expected a value in [0, 1]")]
    InvalidConfidence { report_id: String, value: f64 },

    /// Timestamp is not ISO-8601 / RFC 3339
    #[error("Invalid timestamp '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },

    /// Timestamp too far in the past or future
    #[error("Report '{report_id}' timestamp {timestamp} is outside the accepted range")]
    TimestampOutOfRange {
        report_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Malformed JSON at the serialization boundary
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for skimmer-hotspots operations.
pub type Result<T> = std::result::Result<T, HotspotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HotspotError::InvalidCoordinates {
            report_id: "r-1".to_string(),
            latitude: 91.0,
            longitude: 0.0,
        };
        assert!(err.to_string().contains("r-1"));
        assert!(err.to_string().contains("91"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: HotspotError = parse.unwrap_err().into();
        assert!(matches!(err, HotspotError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }
}
