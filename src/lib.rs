// Meeting Context - Main Library
// Detects meetings among calendar events and extracts structured meeting context

pub mod agenda_extractor;
pub mod calendar;
pub mod confidence_scorer;
pub mod detection_rules;
pub mod detection_stats;
pub mod env_config;
pub mod error;
pub mod location_resolver;
pub mod meeting_context;
pub mod meeting_detector;
pub mod participant_resolver;
pub mod patterns;
pub mod policy_engine;
pub mod type_classifier;

pub use calendar::{CalendarEvent, CalendarSource, EventAttendee, StaticCalendarSource};
pub use confidence_scorer::ConfidenceBreakdown;
pub use detection_rules::{MeetingDetectionRules, RuleSet, ScoringWeights};
pub use detection_stats::{BatchOutcome, DetectionStatsStore, MeetingDetectionStats};
pub use env_config::EnvConfig;
pub use error::{DetectionError, DetectionResult};
pub use meeting_context::{MeetingContext, MeetingType};
pub use meeting_detector::{ContextExtractor, MeetingDetector, RuleBasedExtractor};
pub use patterns::{PatternDefinitions, PatternLibrary};

/// Install the env_logger backend (default filter `info`); safe to call repeatedly
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Detector configured from .env files and `MEETING_*` environment variables
pub fn detector_from_env() -> DetectionResult<MeetingDetector> {
    let rules = EnvConfig::load().rules()?;
    MeetingDetector::with_rules(rules)
}
