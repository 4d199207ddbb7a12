// Meeting Context - Participant Resolver
// Maps raw calendar attendees to role-tagged meeting participants
//
// Role checks run in a fixed order: organizer, presenter, optional, resource,
// attendee.

use crate::calendar::{AttendeeType, CalendarEvent, EventAttendee, ResponseStatus};
use crate::meeting_context::{MeetingParticipant, ParticipantRole};
use crate::patterns::{PatternLibrary, PRESENTER_INTRO};

const UNKNOWN_PARTICIPANT: &str = "Unknown Participant";

/// Extract a display name from an email address
/// e.g. "casey.potenzone@company.com" → "Casey Potenzone"
pub fn extract_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);

    let parts: Vec<&str> = local
        .split(|c: char| c == '.' || c == '_' || c == '-')
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        return email.to_string();
    }

    parts
        .iter()
        .map(|p| {
            let mut chars = p.chars();
            match chars.next() {
                Some(first) => {
                    let upper: String = first.to_uppercase().collect();
                    format!("{}{}", upper, chars.as_str().to_lowercase())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Provider name when present, otherwise synthesized from the email
pub fn display_name(attendee: &EventAttendee) -> String {
    if let Some(name) = attendee.name.as_deref().map(str::trim) {
        if !name.is_empty() {
            return name.to_string();
        }
    }

    match attendee.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => extract_name_from_email(email),
        _ => UNKNOWN_PARTICIPANT.to_string(),
    }
}

/// Whole-word, case-insensitive containment; both sides must already be lower-cased
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }

    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.map_or(false, char::is_alphanumeric) && !after.map_or(false, char::is_alphanumeric)
    })
}

fn is_presenter(name: &str, event: &CalendarEvent, patterns: &PatternLibrary) -> bool {
    let name_lower = name.to_lowercase();
    let first_name = match name_lower.split_whitespace().next() {
        Some(first) if first.chars().count() >= 2 => first,
        _ => return false,
    };

    let presentation_context = patterns.presenter_cues.is_match(&event.title)
        || patterns.presenter_cues.is_match(event.description_text());
    if presentation_context && contains_word(&event.title.to_lowercase(), first_name) {
        return true;
    }

    PRESENTER_INTRO
        .captures_iter(event.description_text())
        .filter_map(|caps| caps.get(1))
        .any(|m| contains_word(&m.as_str().to_lowercase(), first_name))
}

fn is_resource(attendee: &EventAttendee, name: &str, patterns: &PatternLibrary) -> bool {
    attendee.attendee_type == AttendeeType::Resource
        || patterns.resource.is_match(name)
        || attendee
            .email
            .as_deref()
            .map_or(false, |email| patterns.resource.is_match(email))
}

/// Resolve the role of one attendee
pub fn resolve_role(
    attendee: &EventAttendee,
    name: &str,
    event: &CalendarEvent,
    patterns: &PatternLibrary,
) -> ParticipantRole {
    if attendee.is_organizer {
        ParticipantRole::Organizer
    } else if is_presenter(name, event, patterns) {
        ParticipantRole::Presenter
    } else if attendee.attendee_type == AttendeeType::Optional {
        ParticipantRole::Optional
    } else if is_resource(attendee, name, patterns) {
        ParticipantRole::Resource
    } else {
        ParticipantRole::Attendee
    }
}

pub fn resolve_participant(
    attendee: &EventAttendee,
    event: &CalendarEvent,
    patterns: &PatternLibrary,
) -> MeetingParticipant {
    let name = display_name(attendee);
    let role = resolve_role(attendee, &name, event, patterns);

    MeetingParticipant {
        email: attendee
            .email
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        role,
        is_optional: attendee.attendee_type == AttendeeType::Optional,
        has_accepted: attendee.response_status == ResponseStatus::Accepted,
        name,
    }
}

/// Resolve every attendee of the event, preserving provider order
pub fn resolve_participants(event: &CalendarEvent, patterns: &PatternLibrary) -> Vec<MeetingParticipant> {
    event
        .attendees
        .iter()
        .map(|attendee| resolve_participant(attendee, event, patterns))
        .collect()
}
