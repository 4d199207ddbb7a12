// Meeting Context - Type Classifier
// Ordered rule chain mapping event text to a single MeetingType
//
// Keyword sets overlap (a "planning standup" is both), so precedence is the
// position in TYPE_RULES. The first matching rule wins.

use crate::calendar::CalendarEvent;
use crate::meeting_context::MeetingType;
use crate::patterns::PatternLibrary;

/// Text and counts a type rule may look at
#[derive(Debug, Clone)]
pub struct ClassificationInput {
    /// Lower-cased title and description
    pub text: String,
    pub attendee_count: usize,
}

impl ClassificationInput {
    pub fn from_event(event: &CalendarEvent) -> Self {
        Self {
            text: event.searchable_text(),
            attendee_count: event.attendee_count(),
        }
    }
}

type Predicate = fn(&PatternLibrary, &ClassificationInput) -> bool;

/// One `(predicate, result)` link of the chain
pub struct TypeRule {
    pub meeting_type: MeetingType,
    pub description: &'static str,
    predicate: Predicate,
}

impl TypeRule {
    pub fn matches(&self, patterns: &PatternLibrary, input: &ClassificationInput) -> bool {
        (self.predicate)(patterns, input)
    }
}

fn is_one_on_one(patterns: &PatternLibrary, input: &ClassificationInput) -> bool {
    patterns.one_on_one.is_match(&input.text)
        || (input.attendee_count == 2 && !input.text.contains("team"))
}

static TYPE_RULES: [TypeRule; 9] = [
    TypeRule {
        meeting_type: MeetingType::OneOnOne,
        description: "one-on-one phrase, or exactly two attendees without \"team\"",
        predicate: is_one_on_one,
    },
    TypeRule {
        meeting_type: MeetingType::Standup,
        description: "standup keywords",
        predicate: |p, i| p.standup.is_match(&i.text),
    },
    TypeRule {
        meeting_type: MeetingType::Interview,
        description: "interview keywords",
        predicate: |p, i| p.interview.is_match(&i.text),
    },
    TypeRule {
        meeting_type: MeetingType::Presentation,
        description: "presentation/demo keywords",
        predicate: |p, i| p.presentation.is_match(&i.text),
    },
    TypeRule {
        meeting_type: MeetingType::Training,
        description: "training/workshop keywords",
        predicate: |p, i| p.training.is_match(&i.text),
    },
    TypeRule {
        meeting_type: MeetingType::Brainstorming,
        description: "brainstorming keywords",
        predicate: |p, i| p.brainstorming.is_match(&i.text),
    },
    TypeRule {
        meeting_type: MeetingType::Retrospective,
        description: "retrospective keywords",
        predicate: |p, i| p.retrospective.is_match(&i.text),
    },
    TypeRule {
        meeting_type: MeetingType::Planning,
        description: "planning keywords",
        predicate: |p, i| p.planning.is_match(&i.text),
    },
    TypeRule {
        meeting_type: MeetingType::Review,
        description: "review keywords",
        predicate: |p, i| p.review.is_match(&i.text),
    },
];

/// Type assigned when no rule matches
pub const DEFAULT_MEETING_TYPE: MeetingType = MeetingType::TeamMeeting;

/// The chain in evaluation order
pub fn type_rules() -> &'static [TypeRule] {
    &TYPE_RULES
}

pub fn classify_input(input: &ClassificationInput, patterns: &PatternLibrary) -> MeetingType {
    TYPE_RULES
        .iter()
        .find(|rule| rule.matches(patterns, input))
        .map(|rule| rule.meeting_type)
        .unwrap_or(DEFAULT_MEETING_TYPE)
}

pub fn classify_event(event: &CalendarEvent, patterns: &PatternLibrary) -> MeetingType {
    classify_input(&ClassificationInput::from_event(event), patterns)
}
