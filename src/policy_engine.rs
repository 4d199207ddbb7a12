// Meeting Context - Policy Engine
// Priority, auto-record decision, recording preferences and summary distribution

use chrono::Duration;

use crate::calendar::CalendarEvent;
use crate::detection_rules::MeetingDetectionRules;
use crate::meeting_context::{
    AudioQuality, DeliveryMethod, MeetingParticipant, MeetingPriority, MeetingType,
    ParticipantRole, RecordingPreferences, SummaryDistribution,
};
use crate::patterns::PatternLibrary;

const LARGE_MEETING_ATTENDEES: usize = 20;

/// Meeting types that are recorded regardless of confidence
const RECORDED_TYPES: [MeetingType; 4] = [
    MeetingType::Interview,
    MeetingType::Presentation,
    MeetingType::Training,
    MeetingType::Review,
];

fn long_meeting() -> Duration {
    Duration::hours(2)
}

fn short_meeting() -> Duration {
    Duration::minutes(15)
}

/// Priority from urgency keywords, audience size and length
pub fn determine_priority(event: &CalendarEvent, patterns: &PatternLibrary) -> MeetingPriority {
    let text = event.searchable_text();
    let duration = event.duration();

    if patterns.urgent.is_match(&text) {
        MeetingPriority::Urgent
    } else if patterns.high_priority.is_match(&text)
        || event.attendee_count() > LARGE_MEETING_ATTENDEES
        || duration >= long_meeting()
    {
        MeetingPriority::High
    } else if patterns.low_priority.is_match(&text) || duration <= short_meeting() {
        MeetingPriority::Low
    } else {
        MeetingPriority::Normal
    }
}

pub fn should_auto_record(
    confidence: f32,
    meeting_type: MeetingType,
    text: &str,
    rules: &MeetingDetectionRules,
    patterns: &PatternLibrary,
) -> bool {
    confidence >= rules.auto_record_confidence
        || RECORDED_TYPES.contains(&meeting_type)
        || patterns.recording.is_match(text)
        || patterns.notes.is_match(text)
}

/// Present only when the event mentions recording or transcripts
pub fn recording_preferences(text: &str, patterns: &PatternLibrary) -> Option<RecordingPreferences> {
    if !patterns.recording.is_match(text) {
        return None;
    }

    Some(RecordingPreferences {
        auto_start: patterns.auto_record.is_match(text),
        auto_stop: true,
        record_audio: true,
        record_video: patterns.video.is_match(text),
        audio_quality: AudioQuality::High,
        enhance_audio: true,
    })
}

/// Present only when the event asks for notes, a summary or follow-ups
pub fn summary_distribution(
    text: &str,
    participants: &[MeetingParticipant],
    rules: &MeetingDetectionRules,
    patterns: &PatternLibrary,
) -> Option<SummaryDistribution> {
    if !patterns.summary.is_match(text) {
        return None;
    }

    let recipients = participants
        .iter()
        .filter(|p| p.role != ParticipantRole::Resource && !p.email.is_empty())
        .map(|p| p.email.clone())
        .collect();

    Some(SummaryDistribution {
        recipients,
        include_transcript: !patterns.no_transcript.is_match(text),
        include_action_items: true,
        delivery_method: DeliveryMethod::Email,
        delay_after_meeting: rules.summary_delay,
    })
}
