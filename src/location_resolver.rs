// Meeting Context - Virtual & Physical Location Resolver
// Recognises conferencing join links and classifies free-text locations

use url::Url;

use crate::calendar::CalendarEvent;
use crate::meeting_context::{LocationType, MeetingLocation, MeetingPlatform, VirtualMeetingInfo};
use crate::patterns::{
    PatternLibrary, BUILDING_ROOM, MEET_URL, ROOM_ONLY, STREET_ADDRESS, TEAMS_URL, WEBEX_URL,
    ZOOM_URL,
};

type LinkParser = fn(&str) -> Option<VirtualMeetingInfo>;

/// Platforms in precedence order; the first one with a link in the text wins
const PLATFORM_PARSERS: [(MeetingPlatform, LinkParser); 4] = [
    (MeetingPlatform::Zoom, parse_zoom),
    (MeetingPlatform::Meet, parse_meet),
    (MeetingPlatform::Teams, parse_teams),
    (MeetingPlatform::Webex, parse_webex),
];

/// Links pasted into prose often carry the sentence's punctuation
fn trim_link(link: &str) -> &str {
    link.trim_end_matches(|c: char| {
        matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')' | ']' | '>' | '"' | '\'')
    })
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn parse_zoom(text: &str) -> Option<VirtualMeetingInfo> {
    let caps = ZOOM_URL.captures(text)?;
    let join_url = trim_link(caps.get(0)?.as_str()).to_string();
    let password = Url::parse(&join_url)
        .ok()
        .and_then(|url| query_value(&url, "pwd"));

    Some(VirtualMeetingInfo {
        platform: MeetingPlatform::Zoom,
        meeting_id: caps[1].to_string(),
        join_url,
        password,
    })
}

fn parse_meet(text: &str) -> Option<VirtualMeetingInfo> {
    let caps = MEET_URL.captures(text)?;

    Some(VirtualMeetingInfo {
        platform: MeetingPlatform::Meet,
        meeting_id: caps[1].to_lowercase(),
        join_url: trim_link(caps.get(0)?.as_str()).to_string(),
        password: None,
    })
}

fn parse_teams(text: &str) -> Option<VirtualMeetingInfo> {
    let found = TEAMS_URL.find(text)?;
    let join_url = trim_link(found.as_str()).to_string();

    let raw_id = Url::parse(&join_url).ok().and_then(|url| {
        let mut segments = url.path_segments()?;
        segments.find(|s| *s == "meetup-join")?;
        segments.next().map(str::to_string)
    })?;
    let meeting_id = urlencoding::decode(&raw_id)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(raw_id);

    Some(VirtualMeetingInfo {
        platform: MeetingPlatform::Teams,
        meeting_id,
        join_url,
        password: None,
    })
}

fn parse_webex(text: &str) -> Option<VirtualMeetingInfo> {
    let caps = WEBEX_URL.captures(text)?;
    let join_url = trim_link(caps.get(0)?.as_str()).to_string();
    let url = Url::parse(&join_url).ok()?;

    let meeting_id = query_value(&url, "MTID")
        .or_else(|| {
            url.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string)
        })
        .unwrap_or_else(|| caps[1].to_lowercase());

    Some(VirtualMeetingInfo {
        platform: MeetingPlatform::Webex,
        meeting_id,
        join_url,
        password: query_value(&url, "pwd"),
    })
}

/// First recognised join link in the text, in platform precedence order
pub fn parse_join_link(text: &str) -> Option<VirtualMeetingInfo> {
    PLATFORM_PARSERS
        .iter()
        .find_map(|(_, parse)| parse(text))
}

/// Conferencing details from the event's description and location
pub fn extract_virtual_meeting_info(event: &CalendarEvent) -> Option<VirtualMeetingInfo> {
    let text = format!("{}\n{}", event.description_text(), event.location_text());
    parse_join_link(&text)
}

/// Classify the event's free-text location
pub fn extract_location(event: &CalendarEvent, patterns: &PatternLibrary) -> Option<MeetingLocation> {
    let name = event.location_text().trim();
    if name.is_empty() {
        return None;
    }

    let mut location = MeetingLocation {
        name: name.to_string(),
        location_type: LocationType::Office,
        building: None,
        room: None,
        address: None,
    };

    if patterns.location_virtual.is_match(name) {
        location.location_type = LocationType::Virtual;
    } else if let Some(caps) = BUILDING_ROOM.captures(name) {
        location.location_type = LocationType::Conference;
        location.building = Some(caps[1].to_string());
        location.room = Some(caps[2].to_string());
    } else if let Some(caps) = ROOM_ONLY.captures(name) {
        location.location_type = LocationType::Conference;
        location.room = Some(caps[1].to_string());
    } else if name.to_lowercase().contains("conference") {
        location.location_type = LocationType::Conference;
    } else if STREET_ADDRESS.is_match(name) {
        location.location_type = LocationType::External;
        location.address = Some(name.to_string());
    }

    Some(location)
}
