// Meeting Context - Detection Stats
// Running aggregate counters across detection batches
//
// Workers never touch the shared counters. Each batch (or worker shard) fills a
// `BatchOutcome`; shards are combined with `merge`, then applied to the store
// once under its lock.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::meeting_context::{MeetingContext, MeetingType};

/// Aggregate detection statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeetingDetectionStats {
    pub total_events_processed: u64,
    pub meetings_detected: u64,
    /// Mean confidence over every meeting detected so far
    pub average_confidence: f64,
    /// Type histogram of the most recent batch only
    pub meeting_type_distribution: BTreeMap<MeetingType, u64>,
    pub last_processed_at: Option<DateTime<Utc>>,
    /// Events whose extraction failed and were dropped from the output
    pub extraction_failures: u64,
    pub confidence_sum: f64,
}

impl MeetingDetectionStats {
    /// Log stats summary
    pub fn log_summary(&self) {
        log::info!("══════════════════════════════════════════════════════════");
        log::info!("📊 Meeting Detection Stats");
        log::info!("══════════════════════════════════════════════════════════");
        log::info!("  Events processed:   {:>8}", self.total_events_processed);
        log::info!("  Meetings detected:  {:>8}", self.meetings_detected);
        log::info!("  Extraction failures:{:>8}", self.extraction_failures);
        log::info!("  Avg confidence:     {:>7.1}%", self.average_confidence * 100.0);
        log::info!("──────────────────────────────────────────────────────────");
        for (meeting_type, count) in &self.meeting_type_distribution {
            log::info!("  {:<20}{:>8}", meeting_type.as_str(), count);
        }
        log::info!("══════════════════════════════════════════════════════════");
    }
}

/// Partial result of one batch or worker shard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub processed: u64,
    pub detected: u64,
    pub failures: u64,
    pub confidence_sum: f64,
    pub histogram: BTreeMap<MeetingType, u64>,
}

impl BatchOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event that was detected as a meeting
    pub fn record_detected(&mut self, context: &MeetingContext) {
        self.processed += 1;
        self.detected += 1;
        self.confidence_sum += f64::from(context.detection_confidence);
        *self.histogram.entry(context.meeting_type).or_insert(0) += 1;
    }

    /// Record an event that scored below the threshold
    pub fn record_skipped(&mut self) {
        self.processed += 1;
    }

    /// Record an event whose extraction failed
    pub fn record_failure(&mut self) {
        self.processed += 1;
        self.failures += 1;
    }

    /// Combine two shards; order does not matter
    pub fn merge(mut self, other: BatchOutcome) -> BatchOutcome {
        self.processed += other.processed;
        self.detected += other.detected;
        self.failures += other.failures;
        self.confidence_sum += other.confidence_sum;
        for (meeting_type, count) in other.histogram {
            *self.histogram.entry(meeting_type).or_insert(0) += count;
        }
        self
    }
}

/// Shared stats holder (thread-safe)
pub struct DetectionStatsStore {
    stats: Mutex<MeetingDetectionStats>,
}

impl DetectionStatsStore {
    pub fn new() -> Self {
        Self {
            stats: Mutex::new(MeetingDetectionStats::default()),
        }
    }

    /// Fold a completed batch into the running totals
    pub fn apply(&self, outcome: BatchOutcome) -> MeetingDetectionStats {
        let mut stats = self.stats.lock();

        stats.total_events_processed += outcome.processed;
        stats.meetings_detected += outcome.detected;
        stats.extraction_failures += outcome.failures;
        stats.confidence_sum += outcome.confidence_sum;
        stats.average_confidence = if stats.meetings_detected > 0 {
            stats.confidence_sum / stats.meetings_detected as f64
        } else {
            0.0
        };
        stats.meeting_type_distribution = outcome.histogram;
        stats.last_processed_at = Some(Utc::now());

        stats.clone()
    }

    pub fn snapshot(&self) -> MeetingDetectionStats {
        self.stats.lock().clone()
    }

    pub fn reset(&self) {
        *self.stats.lock() = MeetingDetectionStats::default();
        log::info!("📊 Detection stats reset");
    }
}

impl Default for DetectionStatsStore {
    fn default() -> Self {
        Self::new()
    }
}
