// Meeting Context - Calendar Input Model
// Raw calendar events as delivered by provider adapters (Google, Outlook, Apple, device)
//
// Provider fetching and OAuth live outside this crate; adapters only need to
// implement `CalendarSource`.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Attendee response to the invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    Accepted,
    Declined,
    Tentative,
    #[default]
    NeedsAction,
}

/// Attendee kind as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeType {
    #[default]
    Required,
    Optional,
    Resource,
}

/// Invitee on a calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventAttendee {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_organizer: bool,
    #[serde(default)]
    pub response_status: ResponseStatus,
    #[serde(default)]
    pub attendee_type: AttendeeType,
}

impl EventAttendee {
    pub fn new(name: Option<&str>, email: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn organizer(mut self) -> Self {
        self.is_organizer = true;
        self.response_status = ResponseStatus::Accepted;
        self
    }

    pub fn with_status(mut self, status: ResponseStatus) -> Self {
        self.response_status = status;
        self
    }

    pub fn with_type(mut self, attendee_type: AttendeeType) -> Self {
        self.attendee_type = attendee_type;
        self
    }
}

/// Calendar event record, immutable for the duration of a detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Provider-assigned identifier
    pub id: String,
    pub title: String,
    /// Event notes/description
    #[serde(default)]
    pub description: Option<String>,
    /// Location (physical or URL)
    #[serde(default)]
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub attendees: Vec<EventAttendee>,
    #[serde(default)]
    pub is_all_day: bool,
}

impl CalendarEvent {
    pub fn new(id: &str, title: &str, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            location: None,
            start_time,
            end_time,
            attendees: Vec::new(),
            is_all_day: false,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_attendees(mut self, attendees: Vec<EventAttendee>) -> Self {
        self.attendees = attendees;
        self
    }

    pub fn all_day(mut self) -> Self {
        self.is_all_day = true;
        self
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn attendee_count(&self) -> usize {
        self.attendees.len()
    }

    /// Description text, empty when absent
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Location text, empty when absent
    pub fn location_text(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }

    /// Lower-cased title and description joined by a newline
    pub fn searchable_text(&self) -> String {
        format!("{}\n{}", self.title, self.description_text()).to_lowercase()
    }

    /// Missing identity or an inverted time window
    pub fn is_malformed(&self) -> bool {
        self.id.trim().is_empty() || self.end_time < self.start_time
    }
}

/// Provider adapter boundary
pub trait CalendarSource: Send + Sync {
    /// Fetch the ordered sequence of events to inspect
    fn fetch_events(&self) -> Result<Vec<CalendarEvent>, String>;
}

/// In-memory source, used for replaying exported calendars
#[derive(Default)]
pub struct StaticCalendarSource {
    events: RwLock<Vec<CalendarEvent>>,
}

impl StaticCalendarSource {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// Replace the stored events
    pub fn set_events(&self, events: Vec<CalendarEvent>) {
        *self.events.write() = events;
    }
}

impl CalendarSource for StaticCalendarSource {
    fn fetch_events(&self) -> Result<Vec<CalendarEvent>, String> {
        Ok(self.events.read().clone())
    }
}
