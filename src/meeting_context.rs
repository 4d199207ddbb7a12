// Meeting Context - Output Model
// Structured context for a calendar event that was detected as a meeting
//
// A context references its event by id only, so it serializes as a flat
// structure even when the caller stores the event alongside it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{DetectionError, DetectionResult};

/// Serialize a `chrono::Duration` as whole seconds, or `{ secs, nanos }` when it
/// carries a sub-second part
pub(crate) mod duration_seconds {
    use chrono::Duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Seconds(i64),
        Exact { secs: i64, nanos: i32 },
    }

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let secs = value.num_seconds();
        let nanos = value.subsec_nanos();
        if nanos == 0 {
            Repr::Seconds(secs).serialize(serializer)
        } else {
            Repr::Exact { secs, nanos }.serialize(serializer)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let (secs, nanos) = match Repr::deserialize(deserializer)? {
            Repr::Seconds(secs) => (secs, 0),
            Repr::Exact { secs, nanos } => (secs, nanos),
        };
        if nanos.unsigned_abs() >= 1_000_000_000 {
            return Err(D::Error::custom(format!("nanos {} out of range", nanos)));
        }

        Duration::try_seconds(secs)
            .and_then(|whole| whole.checked_add(&Duration::nanoseconds(i64::from(nanos))))
            .ok_or_else(|| D::Error::custom(format!("duration of {} seconds is out of range", secs)))
    }
}

/// Meeting category, decided by the ordered type rule chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeetingType {
    OneOnOne,
    Standup,
    Interview,
    Presentation,
    Training,
    Brainstorming,
    Retrospective,
    Planning,
    Review,
    TeamMeeting,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::OneOnOne => "oneOnOne",
            MeetingType::Standup => "standup",
            MeetingType::Interview => "interview",
            MeetingType::Presentation => "presentation",
            MeetingType::Training => "training",
            MeetingType::Brainstorming => "brainstorming",
            MeetingType::Retrospective => "retrospective",
            MeetingType::Planning => "planning",
            MeetingType::Review => "review",
            MeetingType::TeamMeeting => "teamMeeting",
        }
    }
}

/// Role a participant plays in the meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Organizer,
    Presenter,
    Attendee,
    Optional,
    Resource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingParticipant {
    pub name: String,
    /// Empty when the provider gave no address
    pub email: String,
    pub role: ParticipantRole,
    pub is_optional: bool,
    pub has_accepted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingPriority {
    Low,
    Normal,
    High,
    Urgent,
}

/// Conferencing platform recognised from a join link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingPlatform {
    Zoom,
    Meet,
    Teams,
    Webex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualMeetingInfo {
    pub platform: MeetingPlatform,
    pub meeting_id: String,
    pub join_url: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Virtual,
    Conference,
    Office,
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingLocation {
    pub name: String,
    pub location_type: LocationType,
    pub building: Option<String>,
    pub room: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioQuality {
    Low,
    Medium,
    High,
}

/// Defaults handed to the recording subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingPreferences {
    pub auto_start: bool,
    pub auto_stop: bool,
    pub record_audio: bool,
    pub record_video: bool,
    pub audio_quality: AudioQuality,
    pub enhance_audio: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
}

/// Defaults handed to the summary-distribution subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDistribution {
    pub recipients: Vec<String>,
    pub include_transcript: bool,
    pub include_action_items: bool,
    pub delivery_method: DeliveryMethod,
    #[serde(with = "duration_seconds")]
    pub delay_after_meeting: Duration,
}

/// Extraction result for one qualifying calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingContext {
    /// Id of the source `CalendarEvent`
    pub event_id: String,
    pub meeting_type: MeetingType,
    pub participants: Vec<MeetingParticipant>,
    pub agenda_items: Vec<String>,
    pub tags: BTreeSet<String>,
    #[serde(with = "duration_seconds")]
    pub expected_duration: Duration,
    pub priority: MeetingPriority,
    pub should_auto_record: bool,
    pub virtual_meeting_info: Option<VirtualMeetingInfo>,
    pub location: Option<MeetingLocation>,
    pub recording_preferences: Option<RecordingPreferences>,
    pub summary_distribution: Option<SummaryDistribution>,
    pub preparation_notes: Option<String>,
    pub previous_meeting_ids: Vec<String>,
    /// Always within [0, 1] and at or above the threshold in force at extraction
    pub detection_confidence: f32,
    pub extracted_at: DateTime<Utc>,
}

/// Everything except the confidence; combined by `MeetingContext::new`
#[derive(Debug, Clone)]
pub struct ContextParts {
    pub event_id: String,
    pub meeting_type: MeetingType,
    pub participants: Vec<MeetingParticipant>,
    pub agenda_items: Vec<String>,
    pub tags: BTreeSet<String>,
    pub expected_duration: Duration,
    pub priority: MeetingPriority,
    pub should_auto_record: bool,
    pub virtual_meeting_info: Option<VirtualMeetingInfo>,
    pub location: Option<MeetingLocation>,
    pub recording_preferences: Option<RecordingPreferences>,
    pub summary_distribution: Option<SummaryDistribution>,
    pub preparation_notes: Option<String>,
    pub previous_meeting_ids: Vec<String>,
}

impl MeetingContext {
    /// Build a context, enforcing the confidence range and threshold contract
    pub fn new(parts: ContextParts, confidence: f32, threshold: f32) -> DetectionResult<Self> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(DetectionError::Extraction {
                event_id: parts.event_id,
                reason: format!("confidence {} outside [0, 1]", confidence),
            });
        }
        if confidence < threshold {
            return Err(DetectionError::BelowThreshold {
                event_id: parts.event_id,
                confidence,
                threshold,
            });
        }

        Ok(Self {
            event_id: parts.event_id,
            meeting_type: parts.meeting_type,
            participants: parts.participants,
            agenda_items: parts.agenda_items,
            tags: parts.tags,
            expected_duration: parts.expected_duration,
            priority: parts.priority,
            should_auto_record: parts.should_auto_record,
            virtual_meeting_info: parts.virtual_meeting_info,
            location: parts.location,
            recording_preferences: parts.recording_preferences,
            summary_distribution: parts.summary_distribution,
            preparation_notes: parts.preparation_notes,
            previous_meeting_ids: parts.previous_meeting_ids,
            detection_confidence: confidence,
            extracted_at: Utc::now(),
        })
    }

    /// Participants that are not rooms or equipment
    pub fn people(&self) -> impl Iterator<Item = &MeetingParticipant> {
        self.participants
            .iter()
            .filter(|p| p.role != ParticipantRole::Resource)
    }

    pub fn organizer(&self) -> Option<&MeetingParticipant> {
        self.participants
            .iter()
            .find(|p| p.role == ParticipantRole::Organizer)
    }
}
