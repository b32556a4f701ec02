// WHY: Every expected failure mode is reported as a Notice; nothing here aborts a check

use serde::Serialize;

/// Default number of characters shown in a notice excerpt
pub const DEFAULT_EXCERPT_LENGTH: usize = 20;

/// Priority values (0-999, higher is more serious)
pub mod priority {
    pub const WRONG_DIVIDER: u16 = 918;
    pub const DUPLICATE_NOT_FOUND: u16 = 917;
    pub const QUOTE_NOT_FOUND: u16 = 916;
    pub const SEGMENT_OUT_OF_ORDER: u16 = 914;
    pub const NOT_WORD_START: u16 = 909;
    pub const NOT_WORD_END: u16 = 908;
    pub const SOURCE_NOT_LOCATED: u16 = 851;
    pub const EMPTY_SEGMENT: u16 = 815;
    pub const INVALID_OCCURRENCE: u16 = 792;
    pub const UNCLOSED_OPENER: u16 = 768;
    pub const UNMATCHED_CLOSER: u16 = 767;
    pub const ZERO_OCCURRENCE: u16 = 751;
    pub const FETCH_FAILED: u16 = 601;
    pub const PERIODS_DIVIDER: u16 = 159;
    pub const SPACE_BESIDE_DIVIDER: u16 = 158;
    pub const SPACE_BESIDE_PERIODS: u16 = 156;
    pub const DISCONTIGUOUS_OCCURRENCE: u16 = 50;
}

/// One diagnostic produced by a quote check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub priority: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_index: Option<usize>,
    pub location: String,
}

impl Notice {
    pub fn new(priority: u16, message: impl Into<String>, location: &str) -> Self {
        Self {
            priority,
            message: message.into(),
            details: None,
            excerpt: None,
            character_index: None,
            location: location.to_string(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_character_index(mut self, character_index: usize) -> Self {
        self.character_index = Some(character_index);
        self
    }
}

/// Accumulated notices; the sole output of a check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeList {
    pub notice_list: Vec<Notice>,
}

impl NoticeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.notice_list.push(notice);
    }

    pub fn extend(&mut self, notices: impl IntoIterator<Item = Notice>) {
        self.notice_list.extend(notices);
    }

    pub fn len(&self) -> usize {
        self.notice_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notice_list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Notice> {
        self.notice_list.iter()
    }

    /// Priorities in emission order, mostly for assertions
    pub fn priorities(&self) -> Vec<u16> {
        self.notice_list.iter().map(|n| n.priority).collect()
    }

    pub fn contains_priority(&self, priority: u16) -> bool {
        self.notice_list.iter().any(|n| n.priority == priority)
    }
}

impl IntoIterator for NoticeList {
    type Item = Notice;
    type IntoIter = std::vec::IntoIter<Notice>;

    fn into_iter(self) -> Self::IntoIter {
        self.notice_list.into_iter()
    }
}

/// Prefix a non-empty location with a single space so it reads after a field name
pub fn normalize_location(location: &str) -> String {
    if location.is_empty() || location.starts_with(' ') {
        location.to_string()
    } else {
        format!(" {location}")
    }
}

fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// Window of `excerpt_length` chars around a char index, with ellipses where truncated
pub fn excerpt_around(text: &str, char_index: usize, excerpt_length: usize) -> String {
    let half = excerpt_length / 2;
    let half_plus = excerpt_length.div_ceil(2);
    let total = text.chars().count();
    let start = char_index.saturating_sub(half);
    let end = char_index + half_plus;
    format!(
        "{}{}{}",
        if char_index > half { "…" } else { "" },
        char_slice(text, start, end),
        if end < total { "…" } else { "" },
    )
}

/// First `excerpt_length` chars of the text
pub fn excerpt_start(text: &str, excerpt_length: usize) -> String {
    let total = text.chars().count();
    let head = char_slice(text, 0, excerpt_length);
    if total > excerpt_length {
        format!("{head}…")
    } else {
        head
    }
}

/// Last `excerpt_length` chars of the text
pub fn excerpt_end(text: &str, excerpt_length: usize) -> String {
    let total = text.chars().count();
    let tail = char_slice(text, total.saturating_sub(excerpt_length), total);
    if total > excerpt_length {
        format!("…{tail}")
    } else {
        tail
    }
}

/// Both ends of a long text joined by an ellipsis; short texts are returned whole
pub fn excerpt_ends(text: &str, excerpt_length: usize) -> String {
    let total = text.chars().count();
    if total <= excerpt_length {
        return text.to_string();
    }
    let half = excerpt_length / 2;
    format!("{}…{}", char_slice(text, 0, half), char_slice(text, total - half, total))
}
