// Meeting Context - Confidence Scorer
// Combines five independent signals into one meeting-likelihood score
//
// Signals: title keywords, duration, attendee count, description keywords,
// virtual-meeting indicators. Each sub-score is additive then clamped to [0, 1];
// the weighted sum is clamped again.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEvent;
use crate::detection_rules::RuleSet;
use crate::patterns;

const COMMON_MEETING_MINUTES: [i64; 4] = [15, 30, 60, 90];

/// Per-signal scores behind a confidence value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfidenceBreakdown {
    pub title: f32,
    pub duration: f32,
    pub attendees: f32,
    pub description: f32,
    pub virtual_indicators: f32,
    /// Weighted, clamped total
    pub total: f32,
    /// Set when the event was rejected before scoring
    pub rejection: Option<String>,
}

impl ConfidenceBreakdown {
    fn rejected(reason: &str) -> Self {
        Self {
            rejection: Some(reason.to_string()),
            ..Self::default()
        }
    }
}

/// Score a calendar event against the active rules
pub fn score_event(event: &CalendarEvent, rule_set: &RuleSet) -> ConfidenceBreakdown {
    if event.is_malformed() {
        return ConfidenceBreakdown::rejected("malformed event");
    }
    if event.is_all_day && rule_set.rules().skip_all_day_events {
        return ConfidenceBreakdown::rejected("all-day event");
    }

    let weights = &rule_set.rules().scoring_weights;

    let title = title_score(&event.title, rule_set);
    let duration = duration_score(event, rule_set);
    let attendees = attendee_score(event.attendee_count(), rule_set);
    let description = description_score(event.description_text(), rule_set);
    let virtual_indicators = virtual_indicator_score(event, rule_set);

    let total = (title * weights.title
        + duration * weights.duration
        + attendees * weights.attendees
        + description * weights.description
        + virtual_indicators * weights.virtual_indicators)
        .clamp(0.0, 1.0);

    ConfidenceBreakdown {
        title,
        duration,
        attendees,
        description,
        virtual_indicators,
        total,
        rejection: None,
    }
}

fn title_score(title: &str, rule_set: &RuleSet) -> f32 {
    let patterns = rule_set.patterns();
    let mut score = 0.0_f32;

    if rule_set.exclude_keywords().is_match(title) {
        score -= 0.5;
    } else if rule_set.meeting_keywords().is_match(title) {
        score += 0.3;
    }
    if patterns.strong_title.is_match(title) {
        score += 0.4;
    }
    if patterns.group_title.is_match(title) {
        score += 0.2;
    }
    if patterns.one_on_one.is_match(title) {
        score += 0.3;
    }

    score.clamp(0.0, 1.0)
}

fn duration_score(event: &CalendarEvent, rule_set: &RuleSet) -> f32 {
    let rules = rule_set.rules();
    let duration = event.duration();

    if duration < rules.minimum_meeting_duration {
        return 0.1;
    }
    if duration > rules.maximum_meeting_duration {
        return 0.3;
    }

    let whole_minutes = duration.num_seconds() % 60 == 0;
    if whole_minutes && COMMON_MEETING_MINUTES.contains(&duration.num_minutes()) {
        return 0.8;
    }

    if duration.num_minutes() <= 120 {
        0.6
    } else {
        0.4
    }
}

fn attendee_score(count: usize, rule_set: &RuleSet) -> f32 {
    let rules = rule_set.rules();

    if !rules.require_attendees {
        return 0.5;
    }
    if count < rules.minimum_attendee_count {
        return 0.2;
    }

    match count {
        0 | 1 => 0.4,
        2 => 0.8,
        3..=8 => 0.9,
        9..=20 => 0.7,
        _ => 0.5,
    }
}

fn description_score(description: &str, rule_set: &RuleSet) -> f32 {
    if description.trim().is_empty() {
        return 0.5;
    }

    let patterns = rule_set.patterns();
    let mut score = 0.0_f32;

    if patterns.description_topics.is_match(description) {
        score += 0.3;
    }
    if patterns.description_actions.is_match(description) {
        score += 0.2;
    }
    if patterns.description_dial_in.is_match(description) {
        score += 0.3;
    }

    score.clamp(0.0, 1.0)
}

fn virtual_indicator_score(event: &CalendarEvent, rule_set: &RuleSet) -> f32 {
    if !rule_set.rules().detect_virtual_meetings {
        return 0.0;
    }

    let text = format!("{}\n{}", event.description_text(), event.location_text());

    if patterns::contains_conferencing_url(&text) {
        0.8
    } else if rule_set.patterns().virtual_phrases.is_match(&text) {
        0.6
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EventAttendee;
    use crate::detection_rules::MeetingDetectionRules;
    use crate::patterns::PatternLibrary;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap()
    }

    fn attendees(n: usize) -> Vec<EventAttendee> {
        (0..n)
            .map(|i| EventAttendee::new(None, Some(&format!("person{}@example.com", i))))
            .collect()
    }

    fn event(title: &str, minutes: i64, people: usize) -> CalendarEvent {
        CalendarEvent::new("evt", title, start(), start() + Duration::minutes(minutes))
            .with_attendees(attendees(people))
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_weekly_standup_example() {
        let rules = RuleSet::default();
        let breakdown = score_event(&event("Weekly Standup", 15, 3), &rules);

        assert!(close(breakdown.title, 0.7));
        assert!(close(breakdown.duration, 0.8));
        assert!(close(breakdown.attendees, 0.9));
        assert!(close(breakdown.description, 0.5));
        assert!(close(breakdown.virtual_indicators, 0.0));
        assert!(close(breakdown.total, 0.715));
        assert!(breakdown.total >= 0.5);
    }

    #[test]
    fn test_one_on_one_example() {
        let rules = RuleSet::default();
        let breakdown = score_event(&event("1:1 with Sam", 30, 2), &rules);
        assert!(close(breakdown.title, 0.6));
        assert!(close(breakdown.total, 0.65));
    }

    #[test]
    fn test_exclude_keyword_suppresses_title() {
        let rules = RuleSet::default();
        let breakdown = score_event(&event("Lunch with Alex", 60, 2), &rules);
        assert_eq!(breakdown.title, 0.0);
        assert!(breakdown.total < 0.5);
    }

    #[test]
    fn test_title_score_clamped() {
        let rules = RuleSet::default();
        // keyword + strong + group + one-on-one = 1.2 before clamping
        let score = title_score("Team 1:1 sync", &rules);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_duration_buckets() {
        let rules = RuleSet::default();
        assert_eq!(duration_score(&event("x", 2, 0), &rules), 0.1);
        assert_eq!(duration_score(&event("x", 60 * 9, 0), &rules), 0.3);
        assert_eq!(duration_score(&event("x", 30, 0), &rules), 0.8);
        assert_eq!(duration_score(&event("x", 90, 0), &rules), 0.8);
        assert_eq!(duration_score(&event("x", 45, 0), &rules), 0.6);
        assert_eq!(duration_score(&event("x", 180, 0), &rules), 0.4);
    }

    #[test]
    fn test_attendee_buckets() {
        let rules = RuleSet::default();
        assert_eq!(attendee_score(1, &rules), 0.2);
        assert_eq!(attendee_score(2, &rules), 0.8);
        assert_eq!(attendee_score(5, &rules), 0.9);
        assert_eq!(attendee_score(12, &rules), 0.7);
        assert_eq!(attendee_score(40, &rules), 0.5);

        let relaxed = RuleSet::compile(
            MeetingDetectionRules {
                require_attendees: false,
                ..MeetingDetectionRules::default()
            },
            Arc::new(PatternLibrary::default()),
        )
        .unwrap();
        assert_eq!(attendee_score(0, &relaxed), 0.5);
        assert_eq!(attendee_score(5, &relaxed), 0.5);
    }

    #[test]
    fn test_description_score() {
        let rules = RuleSet::default();
        assert_eq!(description_score("   ", &rules), 0.5);
        assert_eq!(description_score("Bring snacks", &rules), 0.0);
        assert!(close(
            description_score("Agenda below. Action items at the end.", &rules),
            0.5
        ));
        assert!(close(
            description_score("Discuss roadmap, action items, dial-in: +1 555 0100", &rules),
            0.8
        ));
    }

    #[test]
    fn test_virtual_indicators() {
        let rules = RuleSet::default();

        let zoom = event("Sync", 30, 2).with_description("Join https://zoom.us/j/1234567890");
        assert_eq!(virtual_indicator_score(&zoom, &rules), 0.8);

        let remote = event("Sync", 30, 2).with_location("Online");
        assert_eq!(virtual_indicator_score(&remote, &rules), 0.6);

        let office = event("Sync", 30, 2).with_location("HQ 3rd floor");
        assert_eq!(virtual_indicator_score(&office, &rules), 0.0);

        let disabled = RuleSet::compile(
            MeetingDetectionRules {
                detect_virtual_meetings: false,
                ..MeetingDetectionRules::default()
            },
            Arc::new(PatternLibrary::default()),
        )
        .unwrap();
        assert_eq!(virtual_indicator_score(&zoom, &disabled), 0.0);
    }

    #[test]
    fn test_malformed_and_all_day_rejected() {
        let rules = RuleSet::default();

        let inverted = CalendarEvent::new("evt", "Planning", start(), start() - Duration::hours(1));
        let breakdown = score_event(&inverted, &rules);
        assert_eq!(breakdown.total, 0.0);
        assert_eq!(breakdown.rejection.as_deref(), Some("malformed event"));

        let all_day = event("Team offsite planning", 24 * 60, 6).all_day();
        assert_eq!(score_event(&all_day, &rules).total, 0.0);
    }

    #[test]
    fn test_confidence_always_in_unit_interval() {
        let rules = RuleSet::compile(
            MeetingDetectionRules {
                scoring_weights: crate::detection_rules::ScoringWeights {
                    title: 2.0,
                    duration: 2.0,
                    attendees: 2.0,
                    description: 2.0,
                    virtual_indicators: 2.0,
                },
                ..MeetingDetectionRules::default()
            },
            Arc::new(PatternLibrary::default()),
        )
        .unwrap();

        let samples = [
            event("Team standup sync 1:1 review", 30, 4)
                .with_description("Agenda, action items, dial-in https://zoom.us/j/1"),
            event("", 0, 0),
            event("Vacation", 600, 100),
        ];
        for sample in &samples {
            let total = score_event(sample, &rules).total;
            assert!((0.0..=1.0).contains(&total), "total {} out of range", total);
            let total = score_event(sample, &RuleSet::default()).total;
            assert!((0.0..=1.0).contains(&total));
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let rules = RuleSet::default();
        let sample = event("Sprint planning", 60, 5).with_description("Discuss scope");
        assert_eq!(score_event(&sample, &rules), score_event(&sample, &rules));
    }
}
