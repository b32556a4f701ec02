// WHY: Quote syntax problems are reported whether or not the quote is later found

use tracing::debug;

use super::punctuation::{closer_for, opener_for};
use super::{DividerStyle, QuoteField, QuoteSegment, SegmentRole, LEGACY_DIVIDER};
use crate::notice::{excerpt_around, priority, Notice, DEFAULT_EXCERPT_LENGTH};
use crate::source_text::split_words;

/// Settings for one segmentation pass
#[derive(Debug, Clone)]
pub struct SegmenterOptions<'a> {
    pub excerpt_length: usize,
    /// ’ doubles as an apostrophe (Greek elision, English possessives), so a trailing ’ need not close anything
    pub allow_apostrophe_closer: bool,
    pub location: &'a str,
}

impl Default for SegmenterOptions<'_> {
    fn default() -> Self {
        Self {
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            allow_apostrophe_closer: false,
            location: "",
        }
    }
}

/// Segments of a quote plus the syntax notices found while splitting it
#[derive(Debug, Clone, Default)]
pub struct SegmentedQuote {
    /// Non-empty segments in quote order
    pub segments: Vec<QuoteSegment>,
    pub is_discontiguous: bool,
    pub notices: Vec<Notice>,
}

/// Char index (not byte index) of the first occurrence of `pattern`
fn char_index_of(text: &str, pattern: &str) -> Option<usize> {
    text.find(pattern).map(|byte_index| text[..byte_index].chars().count())
}

/// Split a quote field into ordered segments and validate its syntax
pub fn segment_quote(field: &QuoteField<'_>, options: &SegmenterOptions<'_>) -> SegmentedQuote {
    let text = field.raw_text;
    let style = field.divider_style;
    let divider = style.divider();
    let location = options.location;
    let excerpt_at = |index: usize| excerpt_around(text, index, options.excerpt_length);
    let mut notices = Vec::new();

    if let Some(index) = char_index_of(text, style.other_divider()) {
        notices.push(
            Notice::new(priority::WRONG_DIVIDER, "Seems like the wrong divider for discontiguous quote segments", location)
                .with_details(format!("expected ◗{divider}◖"))
                .with_character_index(index)
                .with_excerpt(excerpt_at(index)),
        );
    }

    if let Some(index) = char_index_of(text, LEGACY_DIVIDER) {
        let message = match style {
            DividerStyle::Ellipsis => "Should use proper ellipse character (not periods)",
            DividerStyle::Ampersand => "Should use ampersand divider (not periods)",
        };
        notices.push(
            Notice::new(priority::PERIODS_DIVIDER, message, location)
                .with_character_index(index)
                .with_excerpt(excerpt_at(index)),
        );
    }

    let (bits, is_discontiguous): (Vec<&str>, bool) = if text.contains(divider) {
        let spaced = char_index_of(text, &format!(" {divider}")).or_else(|| char_index_of(text, &format!("{divider} ")));
        if let Some(index) = spaced {
            notices.push(
                Notice::new(priority::SPACE_BESIDE_DIVIDER, format!("Unexpected space(s) beside divider {divider}"), location)
                    .with_character_index(index)
                    .with_excerpt(excerpt_at(index)),
            );
        }
        (text.split(divider).collect(), true)
    } else if text.contains(LEGACY_DIVIDER) {
        let spaced = char_index_of(text, " ...").or_else(|| char_index_of(text, "... "));
        if let Some(index) = spaced {
            notices.push(
                Notice::new(priority::SPACE_BESIDE_PERIODS, "Unexpected space(s) beside ellipse characters", location)
                    .with_character_index(index)
                    .with_excerpt(excerpt_at(index)),
            );
        }
        (text.split(LEGACY_DIVIDER).collect(), true)
    } else {
        (vec![text], false)
    };

    check_paired_punctuation(text, options, &mut notices);

    let count = bits.len();
    let mut segments = Vec::with_capacity(count);
    let mut reported_empty = false;
    for (index, bit) in bits.into_iter().enumerate() {
        let words = split_words(bit);
        if words.is_empty() && !is_discontiguous && !bit.is_empty() {
            // Whitespace-only quote; kept so the classifier can name the stray space
            segments.push(QuoteSegment { text: bit.to_string(), words, role: SegmentRole::Only });
            continue;
        }
        if words.is_empty() {
            if is_discontiguous && !reported_empty {
                notices.push(Notice::new(priority::EMPTY_SEGMENT, "Divider without surrounding snippet", location));
                reported_empty = true;
            }
            continue;
        }
        segments.push(QuoteSegment {
            text: bit.to_string(),
            words,
            role: SegmentRole::for_position(index, count),
        });
    }

    debug!("Split quote into {} segment(s) with {} notice(s)", segments.len(), notices.len());
    SegmentedQuote { segments, is_discontiguous, notices }
}

/// Flag an opener at the start with no closer, or a closer at the end with no opener
fn check_paired_punctuation(text: &str, options: &SegmenterOptions<'_>, notices: &mut Vec<Notice>) {
    let Some(first) = text.chars().next() else {
        return;
    };
    if let Some(closer) = closer_for(first) {
        if !text[first.len_utf8()..].contains(closer) {
            notices.push(
                Notice::new(priority::UNCLOSED_OPENER, format!("Unclosed {first} at start of quote"), options.location)
                    .with_details(format!("expected a matching {closer}"))
                    .with_character_index(0)
                    .with_excerpt(excerpt_around(text, 0, options.excerpt_length)),
            );
        }
    }

    let Some(last) = text.chars().last() else {
        return;
    };
    if last == '’' && options.allow_apostrophe_closer {
        return;
    }
    if let Some(opener) = opener_for(last) {
        if !text[..text.len() - last.len_utf8()].contains(opener) {
            let index = text.chars().count() - 1;
            notices.push(
                Notice::new(priority::UNMATCHED_CLOSER, format!("Unmatched {last} at end of quote"), options.location)
                    .with_details(format!("expected a preceding {opener}"))
                    .with_character_index(index)
                    .with_excerpt(excerpt_around(text, index, options.excerpt_length)),
            );
        }
    }
}
