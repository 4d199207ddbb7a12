// Meeting Context - Pattern Library
// Named keyword sets and structural regexes shared by every detection stage
//
// Keyword sets are plain data (`PatternDefinitions`) compiled into one
// case-insensitive, word-bounded regex each, so a locale can ship its own
// definitions file without touching the scoring code.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{DetectionError, DetectionResult};

// ─── Structural patterns ───────────────────────────────────────────

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern should compile")
}

/// Zoom join link, capture 1 = numeric meeting id
pub static ZOOM_URL: Lazy<Regex> = Lazy::new(|| {
    compile(r#"(?i)https?://(?:[\w-]+\.)*zoom\.us/j/(\d+)(?:\?[^\s<>"')\]]*)?"#)
});

/// Google Meet link, capture 1 = meeting code
pub static MEET_URL: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)https?://meet\.google\.com/([a-z0-9]+(?:-[a-z0-9]+)*)")
});

/// Microsoft Teams meetup link
pub static TEAMS_URL: Lazy<Regex> = Lazy::new(|| {
    compile(r#"(?i)https?://teams\.microsoft\.com/l/meetup-join/[^\s<>"')\]]+"#)
});

/// WebEx link, capture 1 = tenant
pub static WEBEX_URL: Lazy<Regex> =
    Lazy::new(|| compile(r#"(?i)https?://([\w-]+)\.webex\.com/[^\s<>"')\]]*"#));

/// Inline "agenda:" header
pub static AGENDA_HEADER: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\bagenda[ \t]*:"));

/// Preparation section header
pub static PREP_HEADER: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(?:prep|preparation|pre-read|pre-reading|before the meeting)[ \t]*:")
});

/// A line that starts a new section: short label ending in a colon, or a markdown heading
pub static HEADER_LINE: Lazy<Regex> = Lazy::new(|| {
    compile(r"^[ \t]*(?:#{1,6}[ \t]+\S.*|[A-Za-z][A-Za-z0-9 /&'-]{0,40}:[ \t]*)$")
});

/// `1. item` / `2) item`
pub static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^[ \t]*\d{1,3}[.)][ \t]+(.+?)[ \t]*$"));

/// `• item`, `- item`, `* item`
pub static BULLET_ITEM: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^[ \t]*[•\-*][ \t]+(.+?)[ \t]*$"));

/// Leading list marker on a single line
pub static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| compile(r"^[ \t]*(?:\d{1,3}[.)]|[•\-*])[ \t]*"));

/// "discuss X", "review X", "update on X", "go over X", "talk about X"
pub static TOPIC_PHRASE: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(discuss|review|update on|go over|talk about)[ \t]+([^.!?\n;]+)")
});

/// `[bracketed]` tag
pub static BRACKET_TAG: Lazy<Regex> = Lazy::new(|| compile(r"\[([^\[\]\n]{1,40})\]"));

/// `#hashtag`
pub static HASHTAG: Lazy<Regex> = Lazy::new(|| compile(r"#([a-zA-Z][a-zA-Z0-9_-]*)"));

/// quarterly / Q1..Q4
pub static QUARTER: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(?:quarterly|q[1-4])\b"));

/// "presented by Jane" / "presenter: Jane", capture 1 = presenter text
pub static PRESENTER_INTRO: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(?:presented by|presenter:)[ \t]*([^\n,;()]+)"));

/// "Building 4, Room 210", capture 1 = building, capture 2 = room
pub static BUILDING_ROOM: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(?:building|bldg\.?)[ \t]*([A-Za-z0-9-]+)[ \t,/-]*(?:conference room|room|rm\.?)[ \t]*#?([A-Za-z0-9-]+)",
    )
});

/// "Conference Room B", capture 1 = room
pub static ROOM_ONLY: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(?:conference room|meeting room|room|rm\.?)[ \t]*#?([A-Za-z0-9][A-Za-z0-9-]*)")
});

/// "221 Baker Street"
pub static STREET_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b\d{1,6}[ \t]+(?:[A-Za-z0-9.'-]+[ \t]+){0,5}(?:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|way|court|ct|place|pl|parkway|pkwy|highway|hwy)\b",
    )
});

/// Known conferencing URLs in platform precedence order
pub fn conferencing_url_patterns() -> [&'static Regex; 4] {
    [&ZOOM_URL, &MEET_URL, &TEAMS_URL, &WEBEX_URL]
}

pub fn contains_conferencing_url(text: &str) -> bool {
    conferencing_url_patterns().iter().any(|re| re.is_match(text))
}

// ─── Keyword sets ──────────────────────────────────────────────────

/// Named keyword list compiled into a single word-bounded regex
#[derive(Debug, Clone)]
pub struct KeywordSet {
    name: String,
    keywords: Vec<String>,
    regex: Regex,
}

impl KeywordSet {
    pub fn new(name: &str, keywords: &[&str]) -> DetectionResult<Self> {
        Self::from_strings(name, keywords.iter().map(|k| k.to_string()).collect())
    }

    pub fn from_strings(name: &str, keywords: Vec<String>) -> DetectionResult<Self> {
        let mut seen = HashSet::new();
        let cleaned: Vec<String> = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();

        // Longest first so "stand-up" wins over "stand"
        let mut alternatives: Vec<&String> = cleaned.iter().collect();
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()));

        let pattern = if alternatives.is_empty() {
            // Never matches
            r"[^\s\S]".to_string()
        } else {
            let body = alternatives
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            format!(r"(?i)(?:^|[^\p{{L}}\p{{N}}])({})(?:[^\p{{L}}\p{{N}}]|$)", body)
        };

        let regex = Regex::new(&pattern).map_err(|e| {
            DetectionError::InvalidRules(format!("keyword set '{}': {}", name, e))
        })?;

        Ok(Self {
            name: name.to_string(),
            keywords: cleaned,
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// First keyword found in the text, lower-cased
    pub fn find(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
    }
}

/// Keywords that map onto a single tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRule {
    pub tag: String,
    pub keywords: Vec<String>,
}

impl TagRule {
    fn new(tag: &str, keywords: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Raw, serializable keyword definitions for one locale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternDefinitions {
    // Title scoring
    pub strong_title: Vec<String>,
    pub group_title: Vec<String>,
    pub one_on_one: Vec<String>,
    // Description scoring
    pub description_topics: Vec<String>,
    pub description_actions: Vec<String>,
    pub description_dial_in: Vec<String>,
    pub virtual_phrases: Vec<String>,
    // Meeting types
    pub standup: Vec<String>,
    pub interview: Vec<String>,
    pub presentation: Vec<String>,
    pub training: Vec<String>,
    pub brainstorming: Vec<String>,
    pub retrospective: Vec<String>,
    pub planning: Vec<String>,
    pub review: Vec<String>,
    // Participants
    pub presenter_cues: Vec<String>,
    pub resource: Vec<String>,
    // Tags
    pub departments: Vec<TagRule>,
    pub meeting_type_tags: Vec<TagRule>,
    // Policy
    pub urgent: Vec<String>,
    pub high_priority: Vec<String>,
    pub low_priority: Vec<String>,
    pub recording: Vec<String>,
    pub notes: Vec<String>,
    pub auto_record: Vec<String>,
    pub video: Vec<String>,
    pub summary: Vec<String>,
    pub no_transcript: Vec<String>,
    // Locations
    pub location_virtual: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for PatternDefinitions {
    fn default() -> Self {
        Self {
            strong_title: words(&[
                "standup", "stand-up", "sync", "retro", "retrospective", "planning", "review",
                "demo",
            ]),
            group_title: words(&["team", "project", "squad", "group"]),
            one_on_one: words(&["1:1", "1-1", "1-on-1", "1on1", "one-on-one", "one on one"]),
            description_topics: words(&[
                "agenda",
                "discuss",
                "discussion",
                "review",
                "update",
                "updates",
                "planning",
            ]),
            description_actions: words(&[
                "action item",
                "action items",
                "follow-up",
                "follow up",
                "next steps",
            ]),
            description_dial_in: words(&[
                "dial-in",
                "dial in",
                "phone",
                "call",
                "zoom",
                "teams",
                "google meet",
                "webex",
                "skype",
                "hangouts",
                "conference bridge",
            ]),
            virtual_phrases: words(&[
                "virtual",
                "online",
                "remote",
                "video call",
                "video conference",
                "web conference",
            ]),
            standup: words(&[
                "standup",
                "stand-up",
                "stand up",
                "daily scrum",
                "scrum",
                "daily sync",
            ]),
            interview: words(&["interview", "candidate", "screening", "phone screen"]),
            presentation: words(&[
                "presentation",
                "demo",
                "showcase",
                "keynote",
                "all-hands",
                "all hands",
                "town hall",
                "webinar",
            ]),
            training: words(&[
                "training",
                "workshop",
                "onboarding",
                "tutorial",
                "course",
                "lunch and learn",
            ]),
            brainstorming: words(&["brainstorm", "brainstorming", "ideation", "whiteboard"]),
            retrospective: words(&[
                "retro",
                "retrospective",
                "post-mortem",
                "postmortem",
                "lessons learned",
            ]),
            planning: words(&[
                "planning",
                "roadmap",
                "kickoff",
                "kick-off",
                "strategy",
                "okr",
                "okrs",
            ]),
            review: words(&["review", "feedback", "assessment", "evaluation", "critique"]),
            presenter_cues: words(&["presentation", "demo"]),
            resource: words(&["room", "resource", "conference", "boardroom"]),
            departments: vec![
                TagRule::new("engineering", &["engineering", "eng", "dev", "development"]),
                TagRule::new("product", &["product"]),
                TagRule::new("design", &["design", "ux", "ui"]),
                TagRule::new("marketing", &["marketing"]),
                TagRule::new("sales", &["sales"]),
                TagRule::new("finance", &["finance", "accounting"]),
                TagRule::new("hr", &["hr", "human resources", "people ops"]),
                TagRule::new("legal", &["legal"]),
                TagRule::new("operations", &["operations", "ops"]),
                TagRule::new("support", &["support", "customer success"]),
                TagRule::new("research", &["research"]),
            ],
            meeting_type_tags: vec![
                TagRule::new("standup", &["standup", "stand-up", "daily scrum"]),
                TagRule::new("retrospective", &["retro", "retrospective"]),
                TagRule::new("planning", &["planning", "sprint planning"]),
                TagRule::new("review", &["review"]),
                TagRule::new("demo", &["demo"]),
                TagRule::new("interview", &["interview"]),
                TagRule::new("training", &["training", "workshop"]),
                TagRule::new("brainstorming", &["brainstorm", "brainstorming"]),
                TagRule::new("one-on-one", &["1:1", "1-on-1", "one-on-one"]),
                TagRule::new("all-hands", &["all-hands", "all hands", "town hall"]),
            ],
            urgent: words(&["urgent", "asap", "emergency", "critical"]),
            high_priority: words(&[
                "important",
                "high priority",
                "executive",
                "board",
                "leadership",
                "client",
                "customer",
                "deadline",
            ]),
            low_priority: words(&[
                "optional",
                "fyi",
                "low priority",
                "casual",
                "social",
                "coffee",
                "informal",
            ]),
            recording: words(&[
                "record",
                "recording",
                "recorded",
                "transcript",
                "transcription",
            ]),
            notes: words(&["notes", "note-taking"]),
            auto_record: words(&["auto record", "auto-record", "autorecord", "record automatically"]),
            video: words(&["video", "camera", "screen", "screen share", "screenshare"]),
            summary: words(&[
                "summary",
                "notes",
                "action items",
                "action item",
                "follow-up",
                "follow up",
                "share notes",
                "recap",
            ]),
            no_transcript: words(&["no transcript", "summary only", "without transcript"]),
            location_virtual: words(&[
                "zoom",
                "teams",
                "google meet",
                "meet.google.com",
                "webex",
                "skype",
                "virtual",
                "online",
                "remote",
                "video call",
                "http",
                "https",
            ]),
        }
    }
}

/// Compiled pattern library used by scorer, classifier and extractors
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    pub strong_title: KeywordSet,
    pub group_title: KeywordSet,
    pub one_on_one: KeywordSet,
    pub description_topics: KeywordSet,
    pub description_actions: KeywordSet,
    pub description_dial_in: KeywordSet,
    pub virtual_phrases: KeywordSet,
    pub standup: KeywordSet,
    pub interview: KeywordSet,
    pub presentation: KeywordSet,
    pub training: KeywordSet,
    pub brainstorming: KeywordSet,
    pub retrospective: KeywordSet,
    pub planning: KeywordSet,
    pub review: KeywordSet,
    pub presenter_cues: KeywordSet,
    pub resource: KeywordSet,
    pub departments: Vec<(String, KeywordSet)>,
    pub meeting_type_tags: Vec<(String, KeywordSet)>,
    pub urgent: KeywordSet,
    pub high_priority: KeywordSet,
    pub low_priority: KeywordSet,
    pub recording: KeywordSet,
    pub notes: KeywordSet,
    pub auto_record: KeywordSet,
    pub video: KeywordSet,
    pub summary: KeywordSet,
    pub no_transcript: KeywordSet,
    pub location_virtual: KeywordSet,
}

fn compile_tag_rules(group: &str, rules: Vec<TagRule>) -> DetectionResult<Vec<(String, KeywordSet)>> {
    rules
        .into_iter()
        .map(|rule| {
            let tag = rule.tag.trim().to_lowercase();
            let set = KeywordSet::from_strings(&format!("{}:{}", group, tag), rule.keywords)?;
            Ok((tag, set))
        })
        .collect()
}

impl PatternLibrary {
    /// Compile a set of definitions
    pub fn from_definitions(defs: PatternDefinitions) -> DetectionResult<Self> {
        let set = |name: &str, keywords: Vec<String>| KeywordSet::from_strings(name, keywords);

        Ok(Self {
            strong_title: set("strong_title", defs.strong_title)?,
            group_title: set("group_title", defs.group_title)?,
            one_on_one: set("one_on_one", defs.one_on_one)?,
            description_topics: set("description_topics", defs.description_topics)?,
            description_actions: set("description_actions", defs.description_actions)?,
            description_dial_in: set("description_dial_in", defs.description_dial_in)?,
            virtual_phrases: set("virtual_phrases", defs.virtual_phrases)?,
            standup: set("standup", defs.standup)?,
            interview: set("interview", defs.interview)?,
            presentation: set("presentation", defs.presentation)?,
            training: set("training", defs.training)?,
            brainstorming: set("brainstorming", defs.brainstorming)?,
            retrospective: set("retrospective", defs.retrospective)?,
            planning: set("planning", defs.planning)?,
            review: set("review", defs.review)?,
            presenter_cues: set("presenter_cues", defs.presenter_cues)?,
            resource: set("resource", defs.resource)?,
            departments: compile_tag_rules("department", defs.departments)?,
            meeting_type_tags: compile_tag_rules("meeting_type", defs.meeting_type_tags)?,
            urgent: set("urgent", defs.urgent)?,
            high_priority: set("high_priority", defs.high_priority)?,
            low_priority: set("low_priority", defs.low_priority)?,
            recording: set("recording", defs.recording)?,
            notes: set("notes", defs.notes)?,
            auto_record: set("auto_record", defs.auto_record)?,
            video: set("video", defs.video)?,
            summary: set("summary", defs.summary)?,
            no_transcript: set("no_transcript", defs.no_transcript)?,
            location_virtual: set("location_virtual", defs.location_virtual)?,
        })
    }

    /// Parse YAML definitions; missing sets fall back to the English defaults
    pub fn from_yaml_str(yaml: &str) -> DetectionResult<Self> {
        let defs: PatternDefinitions = serde_yaml::from_str(yaml)?;
        Self::from_definitions(defs)
    }

    /// Every plain keyword set, in declaration order
    pub fn keyword_sets(&self) -> Vec<&KeywordSet> {
        let mut sets = vec![
            &self.strong_title,
            &self.group_title,
            &self.one_on_one,
            &self.description_topics,
            &self.description_actions,
            &self.description_dial_in,
            &self.virtual_phrases,
            &self.standup,
            &self.interview,
            &self.presentation,
            &self.training,
            &self.brainstorming,
            &self.retrospective,
            &self.planning,
            &self.review,
            &self.presenter_cues,
            &self.resource,
            &self.urgent,
            &self.high_priority,
            &self.low_priority,
            &self.recording,
            &self.notes,
            &self.auto_record,
            &self.video,
            &self.summary,
            &self.no_transcript,
            &self.location_virtual,
        ];
        sets.extend(self.departments.iter().map(|(_, set)| set));
        sets.extend(self.meeting_type_tags.iter().map(|(_, set)| set));
        sets
    }
}

static DEFAULT_LIBRARY: Lazy<PatternLibrary> = Lazy::new(|| {
    PatternLibrary::from_definitions(PatternDefinitions::default())
        .expect("default pattern definitions should compile")
});

impl Default for PatternLibrary {
    fn default() -> Self {
        DEFAULT_LIBRARY.clone()
    }
}
