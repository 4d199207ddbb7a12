// Meeting Context - Agenda & Tag Extractor
// Multi-strategy text parsing for agenda items, tags and preparation notes
//
// Agenda strategies form a fallback chain (first non-empty result wins):
// explicit "agenda:" section → numbered list → bullets → topic phrases.
// Tag strategies all run and their results are unioned.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};

use crate::calendar::CalendarEvent;
use crate::patterns::{
    PatternLibrary, AGENDA_HEADER, BRACKET_TAG, BULLET_ITEM, HASHTAG, HEADER_LINE, LIST_MARKER,
    NUMBERED_ITEM, PREP_HEADER, QUARTER, TOPIC_PHRASE,
};

/// Agenda strategy that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgendaStrategy {
    Section,
    NumberedList,
    BulletList,
    TopicPhrases,
}

type Strategy = fn(&str) -> Vec<String>;

const AGENDA_CHAIN: [(AgendaStrategy, Strategy); 4] = [
    (AgendaStrategy::Section, section_items),
    (AgendaStrategy::NumberedList, numbered_items),
    (AgendaStrategy::BulletList, bullet_items),
    (AgendaStrategy::TopicPhrases, topic_items),
];

/// How a section treats blank lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlankLines {
    Skip,
    EndSection,
}

/// A line that opens another section: a header-like line, or a known
/// section label followed by inline text ("Pre-read: deck")
fn starts_section(line: &str) -> bool {
    let line = line.trim_start();
    HEADER_LINE.is_match(line)
        || [&*AGENDA_HEADER, &*PREP_HEADER]
            .iter()
            .any(|header| header.find(line).map_or(false, |m| m.start() == 0))
}

/// Text following `header` up to the next section start or the end of the text
fn extract_section(text: &str, header: &Regex, blank_lines: BlankLines) -> Option<String> {
    let found = header.find(text)?;
    let mut lines = text[found.end()..].lines();

    let mut collected: Vec<&str> = Vec::new();
    if let Some(inline) = lines.next().map(str::trim) {
        if !inline.is_empty() {
            collected.push(inline);
        }
    }

    for line in lines {
        if starts_section(line) {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if blank_lines == BlankLines::EndSection && !collected.is_empty() {
                break;
            }
            continue;
        }
        collected.push(trimmed);
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}

fn section_items(description: &str) -> Vec<String> {
    let section = match extract_section(description, &AGENDA_HEADER, BlankLines::Skip) {
        Some(section) => section,
        None => return Vec::new(),
    };

    let lines: Vec<&str> = section.lines().collect();
    if lines.len() == 1 && !LIST_MARKER.is_match(lines[0]) {
        // "Agenda: budget, hiring; offsites"
        return lines[0]
            .split(|c: char| c == ',' || c == ';')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
    }

    lines
        .iter()
        .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn numbered_items(description: &str) -> Vec<String> {
    NUMBERED_ITEM
        .captures_iter(description)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

fn bullet_items(description: &str) -> Vec<String> {
    BULLET_ITEM
        .captures_iter(description)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn topic_items(description: &str) -> Vec<String> {
    TOPIC_PHRASE
        .captures_iter(description)
        .filter_map(|caps| {
            let topic = caps[2].trim().trim_end_matches(',').trim();
            if topic.is_empty() {
                return None;
            }
            Some(format!("{} {}", capitalize(&caps[1].to_lowercase()), topic))
        })
        .collect()
}

fn dedupe_and_cap(items: Vec<String>, max_items: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .take(max_items)
        .collect()
}

/// Run the agenda chain, reporting which strategy matched
pub fn extract_agenda_with_strategy(
    description: &str,
    max_items: usize,
) -> (Vec<String>, Option<AgendaStrategy>) {
    if description.trim().is_empty() {
        return (Vec::new(), None);
    }

    for (strategy, extract) in AGENDA_CHAIN {
        let items = dedupe_and_cap(extract(description), max_items);
        if !items.is_empty() {
            return (items, Some(strategy));
        }
    }

    (Vec::new(), None)
}

/// Agenda items for a description; an empty list is a valid outcome
pub fn extract_agenda(description: &str, max_items: usize) -> Vec<String> {
    extract_agenda_with_strategy(description, max_items).0
}

/// Text of a "prep:" / "pre-read:" section, if present; a blank line ends it
pub fn extract_preparation_notes(description: &str) -> Option<String> {
    extract_section(description, &PREP_HEADER, BlankLines::EndSection)
}

/// Union of every tag strategy over title and description
pub fn extract_tags(event: &CalendarEvent, patterns: &PatternLibrary) -> BTreeSet<String> {
    let text = format!("{}\n{}", event.title, event.description_text());
    let mut tags = BTreeSet::new();

    for caps in BRACKET_TAG.captures_iter(&text) {
        let tag = caps[1].trim().to_lowercase();
        if !tag.is_empty() {
            tags.insert(tag);
        }
    }

    for caps in HASHTAG.captures_iter(&text) {
        tags.insert(caps[1].to_lowercase());
    }

    for (tag, set) in patterns.departments.iter().chain(patterns.meeting_type_tags.iter()) {
        if set.is_match(&text) {
            tags.insert(tag.clone());
        }
    }

    if patterns.urgent.is_match(&text) {
        tags.insert("urgent".to_string());
    }

    if QUARTER.is_match(&text) {
        tags.insert("quarterly".to_string());
    }

    tags
}
