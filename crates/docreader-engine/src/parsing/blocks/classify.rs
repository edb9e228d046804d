use super::kinds::{BlockQuote, Heading, ListItem, ListMarker, Media, MediaKind, ThematicBreak};

/// A line that starts a single-line block and ends any pending paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger<'a> {
    Media {
        kind: MediaKind,
        alt: &'a str,
        src: &'a str,
    },
    ThematicBreak,
    Quote {
        depth: u8,
        text: &'a str,
    },
    Heading {
        level: u8,
        text: &'a str,
    },
    Task {
        checked: bool,
        text: &'a str,
    },
    ListItem {
        marker: ListMarker,
        text: &'a str,
    },
    Blank,
}

type Detector = for<'a> fn(&'a str) -> Option<Trigger<'a>>;

/// Block-level triggers in priority order; the first detector that matches
/// decides the line.
const TRIGGERS: &[Detector] = &[
    media,
    thematic_break,
    quote,
    heading,
    task,
    list_item,
    blank,
];

/// Classifies `line` against the block-level triggers.
pub fn classify(line: &str) -> Option<Trigger<'_>> {
    TRIGGERS.iter().find_map(|detect| detect(line))
}

fn media(line: &str) -> Option<Trigger<'_>> {
    Media::detect(line).map(|(kind, alt, src)| Trigger::Media { kind, alt, src })
}

fn thematic_break(line: &str) -> Option<Trigger<'_>> {
    ThematicBreak::detect(line).then_some(Trigger::ThematicBreak)
}

fn quote(line: &str) -> Option<Trigger<'_>> {
    BlockQuote::detect(line).map(|(depth, text)| Trigger::Quote { depth, text })
}

fn heading(line: &str) -> Option<Trigger<'_>> {
    Heading::detect(line).map(|(level, text)| Trigger::Heading { level, text })
}

fn task(line: &str) -> Option<Trigger<'_>> {
    ListItem::detect_task(line).map(|(checked, text)| Trigger::Task { checked, text })
}

fn list_item(line: &str) -> Option<Trigger<'_>> {
    ListItem::detect(line).map(|(marker, text)| Trigger::ListItem { marker, text })
}

fn blank(line: &str) -> Option<Trigger<'_>> {
    line.trim().is_empty().then_some(Trigger::Blank)
}
