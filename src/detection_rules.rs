// Meeting Context - Detection Rules
// Injected configuration for the detection engine, plus its compiled form
//
// Rules are validated and compiled once per `configure_meeting_rules` call; a
// detection run only ever sees one immutable `RuleSet`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::{DetectionError, DetectionResult};
use crate::patterns::{KeywordSet, PatternLibrary};

/// Serialize a `chrono::Duration` as whole minutes (rules files are hand-edited)
mod duration_minutes {
    use chrono::Duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_minutes())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let minutes = i64::deserialize(deserializer)?;
        Duration::try_minutes(minutes)
            .ok_or_else(|| D::Error::custom(format!("{} minutes is out of range", minutes)))
    }
}

/// Weights applied to the five confidence sub-scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub title: f32,
    pub duration: f32,
    pub attendees: f32,
    pub description: f32,
    pub virtual_indicators: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title: 0.40,
            duration: 0.20,
            attendees: 0.25,
            description: 0.10,
            virtual_indicators: 0.05,
        }
    }
}

impl ScoringWeights {
    fn as_array(&self) -> [(&'static str, f32); 5] {
        [
            ("title", self.title),
            ("duration", self.duration),
            ("attendees", self.attendees),
            ("description", self.description),
            ("virtual_indicators", self.virtual_indicators),
        ]
    }

    pub fn total(&self) -> f32 {
        self.as_array().iter().map(|(_, w)| w).sum()
    }
}

/// Meeting detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingDetectionRules {
    /// Title keywords that indicate a meeting
    pub meeting_keywords: Vec<String>,
    /// Title keywords that indicate a non-meeting block
    pub exclude_keywords: Vec<String>,
    /// Events scoring below this are not meetings (0.0 - 1.0)
    pub minimum_confidence_threshold: f32,
    #[serde(with = "duration_minutes")]
    pub minimum_meeting_duration: Duration,
    #[serde(with = "duration_minutes")]
    pub maximum_meeting_duration: Duration,
    pub require_attendees: bool,
    pub minimum_attendee_count: usize,
    pub detect_virtual_meetings: bool,
    pub scoring_weights: ScoringWeights,
    /// Confidence at which a meeting is always auto-recorded
    pub auto_record_confidence: f32,
    /// Delay before the summary is distributed
    #[serde(with = "duration_minutes")]
    pub summary_delay: Duration,
    /// All-day entries are treated as non-meetings
    pub skip_all_day_events: bool,
    pub max_agenda_items: usize,
}

impl Default for MeetingDetectionRules {
    fn default() -> Self {
        Self {
            meeting_keywords: [
                "meeting",
                "sync",
                "standup",
                "stand-up",
                "call",
                "review",
                "planning",
                "retro",
                "retrospective",
                "1:1",
                "one-on-one",
                "interview",
                "demo",
                "presentation",
                "workshop",
                "brainstorm",
                "training",
                "kickoff",
                "check-in",
                "huddle",
                "discussion",
                "catch up",
                "catch-up",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            exclude_keywords: [
                "lunch",
                "vacation",
                "holiday",
                "out of office",
                "ooo",
                "pto",
                "birthday",
                "focus time",
                "busy",
                "blocked",
                "commute",
                "dentist",
                "gym",
                "personal",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            minimum_confidence_threshold: 0.5,
            minimum_meeting_duration: Duration::minutes(5),
            maximum_meeting_duration: Duration::hours(8),
            require_attendees: true,
            minimum_attendee_count: 2,
            detect_virtual_meetings: true,
            scoring_weights: ScoringWeights::default(),
            auto_record_confidence: 0.9,
            summary_delay: Duration::minutes(15),
            skip_all_day_events: true,
            max_agenda_items: 20,
        }
    }
}

fn check_unit_interval(name: &str, value: f32) -> DetectionResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(DetectionError::InvalidRules(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

impl MeetingDetectionRules {
    /// Reject rule sets the engine cannot honour
    pub fn validate(&self) -> DetectionResult<()> {
        check_unit_interval("minimum_confidence_threshold", self.minimum_confidence_threshold)?;
        check_unit_interval("auto_record_confidence", self.auto_record_confidence)?;

        if self.minimum_meeting_duration < Duration::zero() {
            return Err(DetectionError::InvalidRules(
                "minimum_meeting_duration must not be negative".to_string(),
            ));
        }
        if self.minimum_meeting_duration > self.maximum_meeting_duration {
            return Err(DetectionError::InvalidRules(format!(
                "minimum_meeting_duration ({} min) exceeds maximum_meeting_duration ({} min)",
                self.minimum_meeting_duration.num_minutes(),
                self.maximum_meeting_duration.num_minutes()
            )));
        }
        if self.summary_delay < Duration::zero() {
            return Err(DetectionError::InvalidRules(
                "summary_delay must not be negative".to_string(),
            ));
        }
        if self.max_agenda_items == 0 {
            return Err(DetectionError::InvalidRules(
                "max_agenda_items must be at least 1".to_string(),
            ));
        }

        for (name, weight) in self.scoring_weights.as_array() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DetectionError::InvalidRules(format!(
                    "scoring weight '{}' must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        if self.scoring_weights.total() <= 0.0 {
            return Err(DetectionError::InvalidRules(
                "scoring weights must not all be zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse and validate a YAML rules document; omitted fields keep their defaults
    pub fn from_yaml_str(yaml: &str) -> DetectionResult<Self> {
        let rules: Self = serde_yaml::from_str(yaml)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load rules from a YAML file
    pub fn load_from_path(path: impl AsRef<Path>) -> DetectionResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DetectionError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&contents)
    }
}

/// Validated rules with their keyword lists compiled
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: MeetingDetectionRules,
    meeting_keywords: KeywordSet,
    exclude_keywords: KeywordSet,
    patterns: Arc<PatternLibrary>,
}

impl RuleSet {
    pub fn compile(
        rules: MeetingDetectionRules,
        patterns: Arc<PatternLibrary>,
    ) -> DetectionResult<Self> {
        rules.validate()?;

        let meeting_keywords =
            KeywordSet::from_strings("meeting_keywords", rules.meeting_keywords.clone())?;
        let exclude_keywords =
            KeywordSet::from_strings("exclude_keywords", rules.exclude_keywords.clone())?;

        Ok(Self {
            rules,
            meeting_keywords,
            exclude_keywords,
            patterns,
        })
    }

    pub fn rules(&self) -> &MeetingDetectionRules {
        &self.rules
    }

    pub fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    pub fn meeting_keywords(&self) -> &KeywordSet {
        &self.meeting_keywords
    }

    pub fn exclude_keywords(&self) -> &KeywordSet {
        &self.exclude_keywords
    }

    pub fn threshold(&self) -> f32 {
        self.rules.minimum_confidence_threshold
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::compile(
            MeetingDetectionRules::default(),
            Arc::new(PatternLibrary::default()),
        )
        .expect("default detection rules should compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_rules() {
        let rules = MeetingDetectionRules::default();
        assert_eq!(rules.minimum_confidence_threshold, 0.5);
        assert_eq!(rules.minimum_meeting_duration, Duration::minutes(5));
        assert_eq!(rules.summary_delay, Duration::minutes(15));
        assert!((rules.scoring_weights.total() - 1.0).abs() < 1e-6);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_min_above_max_rejected() {
        let rules = MeetingDetectionRules {
            minimum_meeting_duration: Duration::hours(3),
            maximum_meeting_duration: Duration::hours(1),
            ..MeetingDetectionRules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(DetectionError::InvalidRules(_))
        ));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let rules = MeetingDetectionRules {
            minimum_confidence_threshold: 1.5,
            ..MeetingDetectionRules::default()
        };
        assert!(rules.validate().is_err());

        let rules = MeetingDetectionRules {
            minimum_confidence_threshold: f32::NAN,
            ..MeetingDetectionRules::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut rules = MeetingDetectionRules::default();
        rules.scoring_weights.duration = -0.1;
        assert!(rules.validate().is_err());

        let mut rules = MeetingDetectionRules::default();
        rules.scoring_weights = ScoringWeights {
            title: 0.0,
            duration: 0.0,
            attendees: 0.0,
            description: 0.0,
            virtual_indicators: 0.0,
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let rules = MeetingDetectionRules::from_yaml_str(
            "minimum_confidence_threshold: 0.7\nmaximum_meeting_duration: 240\n",
        )
        .unwrap();
        assert_eq!(rules.minimum_confidence_threshold, 0.7);
        assert_eq!(rules.maximum_meeting_duration, Duration::hours(4));
        assert_eq!(rules.minimum_attendee_count, 2);
        assert!(rules.meeting_keywords.contains(&"standup".to_string()));
    }

    #[test]
    fn test_invalid_yaml_rules_rejected() {
        let result = MeetingDetectionRules::from_yaml_str(
            "minimum_meeting_duration: 90\nmaximum_meeting_duration: 30\n",
        );
        assert!(matches!(result, Err(DetectionError::InvalidRules(_))));
    }

    #[test]
    fn test_out_of_range_minutes_rejected() {
        let result =
            MeetingDetectionRules::from_yaml_str("maximum_meeting_duration: 9223372036854775807\n");
        assert!(matches!(result, Err(DetectionError::Config(_))));

        let result = MeetingDetectionRules::from_yaml_str("summary_delay: -9223372036854775808\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "require_attendees: false").unwrap();
        writeln!(file, "exclude_keywords: [lunch]").unwrap();

        let rules = MeetingDetectionRules::load_from_path(file.path()).unwrap();
        assert!(!rules.require_attendees);
        assert_eq!(rules.exclude_keywords, vec!["lunch".to_string()]);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = MeetingDetectionRules::load_from_path("/nonexistent/rules.yaml");
        assert!(matches!(result, Err(DetectionError::Config(_))));
    }

    #[test]
    fn test_rule_set_compiles_keywords() {
        let rule_set = RuleSet::default();
        assert!(rule_set.meeting_keywords().is_match("Weekly Standup"));
        assert!(rule_set.exclude_keywords().is_match("Lunch with Alex"));
        assert_eq!(rule_set.threshold(), 0.5);
    }
}
