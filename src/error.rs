// Meeting Context - Error Types
// Configuration, extraction and provider failures surfaced by the detection engine
//
// Malformed calendar input is never an error here: it scores 0.0 and is skipped.

use thiserror::Error;

/// Errors raised by the meeting detection engine
#[derive(Debug, Error)]
pub enum DetectionError {
    /// Rejected rule set; the previously active rules stay in effect
    #[error("invalid meeting detection rules: {0}")]
    InvalidRules(String),

    /// A meeting context was requested for an event that did not clear the threshold
    #[error("event {event_id} scored {confidence:.3}, below threshold {threshold:.3}")]
    BelowThreshold {
        event_id: String,
        confidence: f32,
        threshold: f32,
    },

    /// Unexpected fault while extracting context for a single event
    #[error("context extraction failed for event {event_id}: {reason}")]
    Extraction { event_id: String, reason: String },

    /// Calendar provider could not deliver events
    #[error("calendar source error: {0}")]
    Source(String),

    /// Rules file or environment could not be loaded
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for DetectionError {
    fn from(err: std::io::Error) -> Self {
        DetectionError::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for DetectionError {
    fn from(err: serde_yaml::Error) -> Self {
        DetectionError::Config(err.to_string())
    }
}

pub type DetectionResult<T> = Result<T, DetectionError>;
