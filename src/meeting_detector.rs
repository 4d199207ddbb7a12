// Meeting Context - Meeting Detector
// Orchestrates scoring and extraction over batches of calendar events
//
// Features:
// - Per-event failure isolation (errors and panics drop one event, never the batch)
// - Atomic rule swaps: each batch runs against one `Arc<RuleSet>` snapshot
// - Stats merged once per batch through `BatchOutcome`
// - Scoped worker threads for large batches
// - Recurring-series linkage between same-titled meetings in a batch

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::agenda_extractor::{extract_agenda, extract_preparation_notes, extract_tags};
use crate::calendar::{CalendarEvent, CalendarSource};
use crate::confidence_scorer::{self, ConfidenceBreakdown};
use crate::detection_rules::{MeetingDetectionRules, RuleSet};
use crate::detection_stats::{BatchOutcome, DetectionStatsStore, MeetingDetectionStats};
use crate::error::{DetectionError, DetectionResult};
use crate::location_resolver::{extract_location, extract_virtual_meeting_info};
use crate::meeting_context::{ContextParts, MeetingContext};
use crate::participant_resolver::resolve_participants;
use crate::patterns::PatternLibrary;
use crate::policy_engine::{
    determine_priority, recording_preferences, should_auto_record, summary_distribution,
};
use crate::type_classifier::classify_event;

/// Builds the context for an event that already passed the confidence threshold
pub trait ContextExtractor: Send + Sync {
    fn extract(
        &self,
        event: &CalendarEvent,
        rule_set: &RuleSet,
        confidence: f32,
    ) -> DetectionResult<ContextParts>;
}

/// Default extraction chain: classifier, participants, agenda, tags, locations, policy
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedExtractor;

impl ContextExtractor for RuleBasedExtractor {
    fn extract(
        &self,
        event: &CalendarEvent,
        rule_set: &RuleSet,
        confidence: f32,
    ) -> DetectionResult<ContextParts> {
        let patterns = rule_set.patterns();
        let rules = rule_set.rules();
        let text = event.searchable_text();
        let description = event.description_text();

        let meeting_type = classify_event(event, patterns);
        let participants = resolve_participants(event, patterns);

        let virtual_meeting_info = if rules.detect_virtual_meetings {
            extract_virtual_meeting_info(event)
        } else {
            None
        };

        let summary = summary_distribution(&text, &participants, rules, patterns);

        Ok(ContextParts {
            event_id: event.id.clone(),
            meeting_type,
            agenda_items: extract_agenda(description, rules.max_agenda_items),
            tags: extract_tags(event, patterns),
            expected_duration: event.duration(),
            priority: determine_priority(event, patterns),
            should_auto_record: should_auto_record(confidence, meeting_type, &text, rules, patterns),
            virtual_meeting_info,
            location: extract_location(event, patterns),
            recording_preferences: recording_preferences(&text, patterns),
            summary_distribution: summary,
            preparation_notes: extract_preparation_notes(description),
            previous_meeting_ids: Vec::new(),
            participants,
        })
    }
}

/// An event that passed the threshold and was extracted, awaiting
/// series linkage and construction
struct Candidate {
    parts: ContextParts,
    confidence: f32,
    threshold: f32,
    title_key: String,
    start: DateTime<Utc>,
}

impl Candidate {
    fn into_context(self) -> DetectionResult<MeetingContext> {
        let context = MeetingContext::new(self.parts, self.confidence, self.threshold)?;
        log::debug!(
            "🎯 Event {} detected as {} ({:.3})",
            context.event_id,
            context.meeting_type.as_str(),
            context.detection_confidence
        );
        Ok(context)
    }
}

fn evaluate(
    rule_set: &RuleSet,
    extractor: &dyn ContextExtractor,
    event: &CalendarEvent,
) -> DetectionResult<Option<Candidate>> {
    let breakdown = confidence_scorer::score_event(event, rule_set);

    if let Some(reason) = &breakdown.rejection {
        log::debug!("⏭️ Event {} skipped: {}", event.id, reason);
        return Ok(None);
    }

    let threshold = rule_set.threshold();
    if breakdown.total < threshold {
        log::debug!(
            "⏭️ Event {} '{}' scored {:.3} (< {:.2}), not a meeting",
            event.id,
            event.title,
            breakdown.total,
            threshold
        );
        return Ok(None);
    }

    let parts = extractor.extract(event, rule_set, breakdown.total)?;
    Ok(Some(Candidate {
        parts,
        confidence: breakdown.total,
        threshold,
        title_key: normalize_title(&event.title),
        start: event.start_time,
    }))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// `evaluate`, with a panic converted into an extraction error
fn evaluate_guarded(
    rule_set: &RuleSet,
    extractor: &dyn ContextExtractor,
    event: &CalendarEvent,
) -> DetectionResult<Option<Candidate>> {
    panic::catch_unwind(AssertUnwindSafe(|| evaluate(rule_set, extractor, event)))
        .unwrap_or_else(|payload| {
            Err(DetectionError::Extraction {
                event_id: event.id.clone(),
                reason: format!("panic during extraction: {}", panic_message(payload.as_ref())),
            })
        })
}

/// Score and extract every event; skips and failures are recorded here,
/// detections once the candidates are built
fn run_batch(
    rule_set: &RuleSet,
    extractor: &dyn ContextExtractor,
    events: &[CalendarEvent],
) -> (Vec<Candidate>, BatchOutcome) {
    let mut candidates = Vec::new();
    let mut outcome = BatchOutcome::new();

    for event in events {
        match evaluate_guarded(rule_set, extractor, event) {
            Ok(Some(candidate)) => candidates.push(candidate),
            Ok(None) => outcome.record_skipped(),
            Err(e) => {
                log::warn!("⚠️ Dropping event {} from batch: {}", event.id, e);
                outcome.record_failure();
            }
        }
    }

    (candidates, outcome)
}

/// Lower-case, punctuation-free, single-spaced title
fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fill `previous_meeting_ids` with earlier same-titled candidates from the batch
fn link_series(candidates: &mut [Candidate]) {
    let keyed: Vec<(String, DateTime<Utc>, String)> = candidates
        .iter()
        .map(|c| (c.title_key.clone(), c.start, c.parts.event_id.clone()))
        .collect();

    for candidate in candidates.iter_mut() {
        if candidate.title_key.is_empty() {
            continue;
        }

        let mut earlier: Vec<&(String, DateTime<Utc>, String)> = keyed
            .iter()
            .filter(|(title, start, id)| {
                *title == candidate.title_key
                    && *start < candidate.start
                    && *id != candidate.parts.event_id
            })
            .collect();
        earlier.sort_by_key(|(_, start, _)| *start);

        candidate.parts.previous_meeting_ids =
            earlier.into_iter().map(|(_, _, id)| id.clone()).collect();
    }
}

/// Build contexts from linked candidates, in order
fn assemble(candidates: Vec<Candidate>, outcome: &mut BatchOutcome) -> Vec<MeetingContext> {
    let mut contexts = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let event_id = candidate.parts.event_id.clone();
        match candidate.into_context() {
            Ok(context) => {
                outcome.record_detected(&context);
                contexts.push(context);
            }
            Err(e) => {
                log::warn!("⚠️ Dropping event {} from batch: {}", event_id, e);
                outcome.record_failure();
            }
        }
    }
    contexts
}

/// Meeting detection engine
pub struct MeetingDetector {
    rules: RwLock<Arc<RuleSet>>,
    patterns: Arc<PatternLibrary>,
    extractor: Arc<dyn ContextExtractor>,
    stats: Arc<DetectionStatsStore>,
}

impl MeetingDetector {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Arc::new(RuleSet::default())),
            patterns: Arc::new(PatternLibrary::default()),
            extractor: Arc::new(RuleBasedExtractor),
            stats: Arc::new(DetectionStatsStore::new()),
        }
    }

    /// Detector with custom rules and the default pattern library
    pub fn with_rules(rules: MeetingDetectionRules) -> DetectionResult<Self> {
        let detector = Self::new();
        detector.configure_meeting_rules(rules)?;
        Ok(detector)
    }

    /// Swap the pattern library, recompiling the current rules against it
    pub fn with_patterns(mut self, patterns: PatternLibrary) -> DetectionResult<Self> {
        let patterns = Arc::new(patterns);
        let rule_set = RuleSet::compile(self.current_rules(), patterns.clone())?;
        self.patterns = patterns;
        self.rules = RwLock::new(Arc::new(rule_set));
        Ok(self)
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ContextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Share a stats store with other components
    pub fn with_stats_store(mut self, stats: Arc<DetectionStatsStore>) -> Self {
        self.stats = stats;
        self
    }

    fn rule_set(&self) -> Arc<RuleSet> {
        self.rules.read().clone()
    }

    pub fn current_rules(&self) -> MeetingDetectionRules {
        self.rules.read().rules().clone()
    }

    /// Validate, compile and atomically install new rules.
    /// On error the previous rules stay in force.
    pub fn configure_meeting_rules(&self, rules: MeetingDetectionRules) -> DetectionResult<()> {
        match RuleSet::compile(rules, self.patterns.clone()) {
            Ok(rule_set) => {
                log::info!(
                    "🎯 Meeting detection rules updated (threshold {:.2}, {}-{} min)",
                    rule_set.threshold(),
                    rule_set.rules().minimum_meeting_duration.num_minutes(),
                    rule_set.rules().maximum_meeting_duration.num_minutes()
                );
                *self.rules.write() = Arc::new(rule_set);
                Ok(())
            }
            Err(e) => {
                log::warn!("⚠️ Rejected meeting detection rules, keeping previous: {}", e);
                Err(e)
            }
        }
    }

    /// Confidence breakdown for one event under the current rules
    pub fn score_event(&self, event: &CalendarEvent) -> ConfidenceBreakdown {
        confidence_scorer::score_event(event, &self.rule_set())
    }

    /// Detect a single event. `Ok(None)` when it is not a meeting.
    /// Stats are not updated.
    pub fn detect_meeting(&self, event: &CalendarEvent) -> DetectionResult<Option<MeetingContext>> {
        evaluate_guarded(&self.rule_set(), self.extractor.as_ref(), event)?
            .map(Candidate::into_context)
            .transpose()
    }

    /// Detect meetings in a batch, in input order
    pub fn detect_meetings(&self, events: &[CalendarEvent]) -> Vec<MeetingContext> {
        let rule_set = self.rule_set();
        let (candidates, outcome) = run_batch(&rule_set, self.extractor.as_ref(), events);
        self.finish_batch(candidates, outcome)
    }

    /// `detect_meetings` split across `workers` scoped threads
    pub fn detect_meetings_parallel(
        &self,
        events: &[CalendarEvent],
        workers: usize,
    ) -> Vec<MeetingContext> {
        let workers = workers.clamp(1, events.len().max(1));
        if workers == 1 {
            return self.detect_meetings(events);
        }

        let rule_set = self.rule_set();
        let extractor = self.extractor.as_ref();
        let chunk_size = (events.len() + workers - 1) / workers;

        let shards: Vec<(Vec<Candidate>, BatchOutcome)> = std::thread::scope(|scope| {
            let handles: Vec<_> = events
                .chunks(chunk_size)
                .map(|chunk| {
                    let rule_set = rule_set.as_ref();
                    (chunk.len(), scope.spawn(move || run_batch(rule_set, extractor, chunk)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(len, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        log::error!("❌ Detection worker died, dropping {} events", len);
                        let mut outcome = BatchOutcome::new();
                        (0..len).for_each(|_| outcome.record_failure());
                        (Vec::new(), outcome)
                    })
                })
                .collect()
        });

        let (candidates, outcome) = shards.into_iter().fold(
            (Vec::new(), BatchOutcome::new()),
            |(mut candidates, outcome), (shard_candidates, shard_outcome)| {
                candidates.extend(shard_candidates);
                (candidates, outcome.merge(shard_outcome))
            },
        );

        self.finish_batch(candidates, outcome)
    }

    /// Fetch events from a provider and detect meetings among them
    pub fn detect_from_source(
        &self,
        source: &dyn CalendarSource,
    ) -> DetectionResult<Vec<MeetingContext>> {
        let events = source.fetch_events().map_err(|e| {
            log::error!("❌ Calendar source failed: {}", e);
            DetectionError::Source(e)
        })?;
        log::info!("📅 Fetched {} calendar events", events.len());
        Ok(self.detect_meetings(&events))
    }

    /// Link the batch's candidates, build their contexts and apply stats once
    fn finish_batch(
        &self,
        mut candidates: Vec<Candidate>,
        mut outcome: BatchOutcome,
    ) -> Vec<MeetingContext> {
        link_series(&mut candidates);
        let contexts = assemble(candidates, &mut outcome);

        let (processed, detected, failures) = (outcome.processed, outcome.detected, outcome.failures);
        self.stats.apply(outcome);

        log::info!(
            "📊 Processed {} events: {} meetings detected, {} failed",
            processed,
            detected,
            failures
        );
        contexts
    }

    pub fn get_detection_stats(&self) -> MeetingDetectionStats {
        self.stats.snapshot()
    }

    pub fn stats_store(&self) -> Arc<DetectionStatsStore> {
        self.stats.clone()
    }
}

impl Default for MeetingDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{EventAttendee, StaticCalendarSource};
    use crate::meeting_context::{MeetingPlatform, MeetingType};
    use chrono::{Duration, TimeZone};
    use std::collections::HashMap;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, day, hour, 0, 0).unwrap()
    }

    fn attendees(n: usize) -> Vec<EventAttendee> {
        (0..n)
            .map(|i| EventAttendee::new(None, Some(&format!("member{}@example.com", i))))
            .collect()
    }

    fn event(id: &str, title: &str, start: DateTime<Utc>, minutes: i64, people: usize) -> CalendarEvent {
        CalendarEvent::new(id, title, start, start + Duration::minutes(minutes))
            .with_attendees(attendees(people))
    }

    fn standups(n: usize) -> Vec<CalendarEvent> {
        (1..=n)
            .map(|i| event(&format!("evt-{}", i), "Weekly Standup", at(i as u32, 9), 15, 3))
            .collect()
    }

    struct FailingExtractor {
        fail_id: &'static str,
        panic: bool,
    }

    impl ContextExtractor for FailingExtractor {
        fn extract(
            &self,
            event: &CalendarEvent,
            rule_set: &RuleSet,
            confidence: f32,
        ) -> DetectionResult<ContextParts> {
            if event.id == self.fail_id {
                if self.panic {
                    panic!("extractor blew up on {}", event.id);
                }
                return Err(DetectionError::Extraction {
                    event_id: event.id.clone(),
                    reason: "injected".to_string(),
                });
            }
            RuleBasedExtractor.extract(event, rule_set, confidence)
        }
    }

    struct BrokenSource;

    impl CalendarSource for BrokenSource {
        fn fetch_events(&self) -> Result<Vec<CalendarEvent>, String> {
            Err("token expired".to_string())
        }
    }

    #[test]
    fn test_weekly_standup_example() {
        let detector = MeetingDetector::new();
        let context = detector
            .detect_meeting(&event("s1", "Weekly Standup", at(1, 9), 15, 3))
            .unwrap()
            .unwrap();

        assert_eq!(context.meeting_type, MeetingType::Standup);
        assert!((context.detection_confidence - 0.715).abs() < 1e-4);
        assert_eq!(context.participants.len(), 3);
        assert_eq!(context.expected_duration, Duration::minutes(15));
        assert!(context.tags.contains("standup"));
    }

    #[test]
    fn test_one_on_one_example() {
        let detector = MeetingDetector::new();
        let context = detector
            .detect_meeting(&event("o1", "1:1 with Sam", at(2, 10), 30, 2))
            .unwrap()
            .unwrap();

        assert_eq!(context.meeting_type, MeetingType::OneOnOne);
        assert!((context.detection_confidence - 0.65).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_example() {
        let detector = MeetingDetector::new();
        let ev = event("z1", "Project sync", at(3, 14), 30, 3)
            .with_description("Join https://zoom.us/j/1234567890?pwd=abc");

        let context = detector.detect_meeting(&ev).unwrap().unwrap();
        let info = context.virtual_meeting_info.unwrap();
        assert_eq!(info.platform, MeetingPlatform::Zoom);
        assert_eq!(info.meeting_id, "1234567890");
        assert_eq!(info.password.as_deref(), Some("abc"));
    }

    #[test]
    fn test_numbered_agenda_example() {
        let detector = MeetingDetector::new();
        let ev = event("a1", "Budget planning", at(4, 11), 60, 4)
            .with_description("Agenda:\n1. Budget\n2. Hiring");

        let context = detector.detect_meeting(&ev).unwrap().unwrap();
        assert_eq!(context.meeting_type, MeetingType::Planning);
        assert_eq!(context.agenda_items, vec!["Budget", "Hiring"]);
    }

    #[test]
    fn test_below_threshold_is_none_and_stats_untouched() {
        let detector = MeetingDetector::new();
        let lunch = event("l1", "Lunch", at(5, 12), 60, 1);

        assert!(detector.detect_meeting(&lunch).unwrap().is_none());
        assert_eq!(detector.get_detection_stats().total_events_processed, 0);
    }

    #[test]
    fn test_batch_isolation_on_error() {
        let detector = MeetingDetector::new().with_extractor(Arc::new(FailingExtractor {
            fail_id: "evt-3",
            panic: false,
        }));

        let results = detector.detect_meetings(&standups(5));
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|c| c.event_id != "evt-3"));

        let stats = detector.get_detection_stats();
        assert_eq!(stats.total_events_processed, 5);
        assert_eq!(stats.meetings_detected, 4);
        assert_eq!(stats.extraction_failures, 1);
    }

    #[test]
    fn test_batch_isolation_on_panic() {
        let detector = MeetingDetector::new().with_extractor(Arc::new(FailingExtractor {
            fail_id: "evt-3",
            panic: true,
        }));

        let results = detector.detect_meetings(&standups(5));
        let ids: Vec<&str> = results.iter().map(|c| c.event_id.as_str()).collect();
        assert_eq!(ids, vec!["evt-1", "evt-2", "evt-4", "evt-5"]);
        assert_eq!(detector.get_detection_stats().total_events_processed, 5);

        let single = detector.detect_meeting(&standups(3)[2]);
        assert!(matches!(single, Err(DetectionError::Extraction { .. })));
    }

    #[test]
    fn test_threshold_contract() {
        let detector = MeetingDetector::new();
        let events = vec![
            event("e1", "Weekly Standup", at(1, 9), 15, 3),
            event("e2", "Focus time", at(1, 13), 120, 0),
            event("e3", "1:1 with Sam", at(1, 15), 30, 2),
        ];

        let results = detector.detect_meetings(&events);
        let threshold = detector.current_rules().minimum_confidence_threshold;
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|c| c.detection_confidence >= threshold && c.detection_confidence <= 1.0));

        let strict = MeetingDetectionRules {
            minimum_confidence_threshold: 0.7,
            ..MeetingDetectionRules::default()
        };
        detector.configure_meeting_rules(strict).unwrap();
        let results = detector.detect_meetings(&events);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].event_id, "e1");
    }

    #[test]
    fn test_detection_is_deterministic() {
        let detector = MeetingDetector::new();
        let ev = event("d1", "Sprint planning", at(6, 10), 60, 5)
            .with_description("Discuss scope. Please record and share notes.");

        let mut first = detector.detect_meeting(&ev).unwrap().unwrap();
        let second = detector.detect_meeting(&ev).unwrap().unwrap();
        first.extracted_at = second.extracted_at;
        assert_eq!(first, second);
    }

    #[test]
    fn test_stats_across_batches() {
        let detector = MeetingDetector::new();

        detector.detect_meetings(&[event("b1", "Weekly Standup", at(1, 9), 15, 3)]);
        detector.detect_meetings(&[event("b2", "1:1 with Sam", at(1, 10), 30, 2)]);

        let stats = detector.get_detection_stats();
        assert_eq!(stats.total_events_processed, 2);
        assert_eq!(stats.meetings_detected, 2);
        assert!((stats.average_confidence - 0.6825).abs() < 1e-4);
        assert_eq!(stats.meeting_type_distribution.len(), 1);
        assert_eq!(stats.meeting_type_distribution[&MeetingType::OneOnOne], 1);
        assert!(stats.last_processed_at.is_some());
    }

    #[test]
    fn test_invalid_rules_keep_previous() {
        let detector = MeetingDetector::new();
        let invalid = MeetingDetectionRules {
            minimum_meeting_duration: Duration::hours(4),
            maximum_meeting_duration: Duration::hours(1),
            ..MeetingDetectionRules::default()
        };

        let result = detector.configure_meeting_rules(invalid);
        assert!(matches!(result, Err(DetectionError::InvalidRules(_))));
        assert_eq!(detector.current_rules(), MeetingDetectionRules::default());
        assert_eq!(detector.detect_meetings(&standups(2)).len(), 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = MeetingDetector::new();
        let parallel = MeetingDetector::new();
        let mut events = standups(7);
        events.push(event("x1", "Lunch", at(8, 12), 60, 1));

        let a: Vec<(String, Vec<String>)> = sequential
            .detect_meetings(&events)
            .into_iter()
            .map(|c| (c.event_id, c.previous_meeting_ids))
            .collect();
        let b: Vec<(String, Vec<String>)> = parallel
            .detect_meetings_parallel(&events, 3)
            .into_iter()
            .map(|c| (c.event_id, c.previous_meeting_ids))
            .collect();

        assert_eq!(a, b);
        assert_eq!(b[6].1.len(), 6);
        let stats = parallel.get_detection_stats();
        assert_eq!(stats.total_events_processed, 8);
        assert_eq!(stats.meetings_detected, 7);
        assert_eq!(stats.meeting_type_distribution[&MeetingType::Standup], 7);
    }

    #[test]
    fn test_parallel_empty_batch() {
        let detector = MeetingDetector::new();
        assert!(detector.detect_meetings_parallel(&[], 4).is_empty());
        assert_eq!(detector.get_detection_stats().total_events_processed, 0);
    }

    #[test]
    fn test_series_linkage() {
        let detector = MeetingDetector::new();
        let mut events = standups(3);
        events.reverse();
        events.push(event("other", "Sprint retro", at(2, 16), 60, 4));

        let results = detector.detect_meetings(&events);
        let by_id: HashMap<&str, &MeetingContext> =
            results.iter().map(|c| (c.event_id.as_str(), c)).collect();

        assert_eq!(by_id["evt-1"].previous_meeting_ids, Vec::<String>::new());
        assert_eq!(by_id["evt-2"].previous_meeting_ids, vec!["evt-1"]);
        assert_eq!(by_id["evt-3"].previous_meeting_ids, vec!["evt-1", "evt-2"]);
        assert!(by_id["other"].previous_meeting_ids.is_empty());
    }

    #[test]
    fn test_series_linkage_skips_failed_events() {
        let detector = MeetingDetector::new().with_extractor(Arc::new(FailingExtractor {
            fail_id: "evt-2",
            panic: false,
        }));

        let results = detector.detect_meetings(&standups(3));
        let ids: Vec<&str> = results.iter().map(|c| c.event_id.as_str()).collect();
        assert_eq!(ids, vec!["evt-1", "evt-3"]);
        assert_eq!(results[1].previous_meeting_ids, vec!["evt-1"]);
    }

    #[test]
    fn test_linked_ids_flow_through_construction() {
        let rule_set = RuleSet::default();
        let mut candidates: Vec<Candidate> = standups(2)
            .iter()
            .map(|ev| evaluate(&rule_set, &RuleBasedExtractor, ev).unwrap().unwrap())
            .collect();
        assert!(candidates.iter().all(|c| c.parts.previous_meeting_ids.is_empty()));

        link_series(&mut candidates);
        let mut outcome = BatchOutcome::new();
        let contexts = assemble(candidates, &mut outcome);

        assert_eq!(contexts[1].previous_meeting_ids, vec!["evt-1"]);
        assert_eq!(outcome.detected, 2);
        assert_eq!(outcome.processed, 2);
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Weekly   STANDUP!! "), "weekly standup");
        assert_eq!(normalize_title("---"), "");
    }

    #[test]
    fn test_detect_from_source() {
        let detector = MeetingDetector::new();
        let source = StaticCalendarSource::new(standups(2));

        let results = detector.detect_from_source(&source).unwrap();
        assert_eq!(results.len(), 2);

        let result = detector.detect_from_source(&BrokenSource);
        assert!(matches!(result, Err(DetectionError::Source(_))));
    }

    #[test]
    fn test_shared_stats_store() {
        let store = Arc::new(DetectionStatsStore::new());
        let detector = MeetingDetector::new().with_stats_store(store.clone());
        detector.detect_meetings(&standups(2));
        assert_eq!(store.snapshot().meetings_detected, 2);
    }

    #[test]
    fn test_custom_patterns() {
        let patterns = PatternLibrary::from_yaml_str("standup: [daily huddle]\n").unwrap();
        let detector = MeetingDetector::new().with_patterns(patterns).unwrap();
        let context = detector
            .detect_meeting(&event("h1", "Daily huddle sync", at(9, 9), 15, 4))
            .unwrap()
            .unwrap();
        assert_eq!(context.meeting_type, MeetingType::Standup);
    }
}
