// WHY: A bare "not found" is not actionable; name the most likely cause instead
// Invisible characters are checked before boundaries because they explain both

use super::punctuation::{
    describe_char, is_word_end_neighbour, is_word_start_neighbour, NO_BREAK_SPACE, WORD_JOINER, ZERO_WIDTH_JOINER,
    ZERO_WIDTH_SPACE,
};
use super::{Occurrence, SegmentRole, SourceWording};
use crate::notice::{excerpt_end, excerpt_ends, excerpt_start, priority, Notice};

const NO_BREAK_SPACE_SYMBOL: char = '⍽';
const NO_BREAK_SPACE_NOTE: &str = "quote which contains No-Break Space shown as '⍽'";

/// Everything the classifier needs besides the failed segment
#[derive(Debug, Clone, Copy)]
pub struct ClassifierContext<'a> {
    pub source_text: &'a str,
    pub occurrence: Occurrence,
    pub excerpt_length: usize,
    pub location: &'a str,
    pub wording: SourceWording,
    /// ’ may close a quotation right after a word
    pub closing_apostrophe: bool,
}

/// Boundary characters checked in order; the first hit names the cause
const EDGE_CHARACTERS: &[(char, &str)] = &[
    (' ', "a space"),
    (WORD_JOINER, "'word joiner'"),
    (ZERO_WIDTH_SPACE, "'zero-width space'"),
    (ZERO_WIDTH_JOINER, "'zero-width joiner'"),
];

/// Explain why a segment could not be matched as a word run
pub fn classify_unmatched(segment_text: &str, role: SegmentRole, ctx: &ClassifierContext<'_>) -> Notice {
    let has_no_break_space = segment_text.contains(NO_BREAK_SPACE);
    let shown = segment_text.replace(NO_BREAK_SPACE, &NO_BREAK_SPACE_SYMBOL.to_string());
    let not_found = format!("Unable to find {} in {}", ctx.wording.quote_name, ctx.wording.text_name);
    let with_note = |details: String| {
        if has_no_break_space {
            format!("{details} {NO_BREAK_SPACE_NOTE}")
        } else {
            details
        }
    };
    let part_excerpt = role
        .is_part()
        .then(|| format!("({role} quote portion) '{shown}'"));

    for &(ch, name) in EDGE_CHARACTERS {
        if shown.starts_with(ch) {
            let excerpt = part_excerpt.clone().unwrap_or_else(|| excerpt_start(&shown, ctx.excerpt_length));
            return Notice::new(priority::QUOTE_NOT_FOUND, not_found, ctx.location)
                .with_details(with_note(format!("quote which starts with {name}")))
                .with_excerpt(excerpt);
        }
        if shown.ends_with(ch) {
            let excerpt = part_excerpt.clone().unwrap_or_else(|| excerpt_end(&shown, ctx.excerpt_length));
            return Notice::new(priority::QUOTE_NOT_FOUND, not_found, ctx.location)
                .with_details(with_note(format!("quote which ends with {name}")))
                .with_excerpt(excerpt);
        }
    }

    if let Some(notice) = check_word_boundaries(segment_text, role, ctx) {
        return notice;
    }

    let details = if has_no_break_space {
        NO_BREAK_SPACE_NOTE.to_string()
    } else {
        format!("{} ◗{}◖", ctx.wording.text_name, ctx.source_text)
    };
    let excerpt = part_excerpt.unwrap_or_else(|| excerpt_ends(&shown, ctx.excerpt_length));
    Notice::new(priority::QUOTE_NOT_FOUND, not_found, ctx.location)
        .with_details(details)
        .with_excerpt(excerpt)
}

/// Neighbouring characters of one literal occurrence of the segment
fn neighbours(source: &str, byte_start: usize, segment: &str) -> (Option<char>, Option<char>) {
    let before = source[..byte_start].chars().next_back();
    let after = source[byte_start + segment.len()..].chars().next();
    (before, after)
}

fn is_clean_start(before: Option<char>) -> bool {
    before.map_or(true, is_word_start_neighbour)
}

fn is_clean_end(after: Option<char>, closing_apostrophe: bool) -> bool {
    after.map_or(true, |ch| is_word_end_neighbour(ch, closing_apostrophe))
}

/// Source words around a literal occurrence, including their punctuation
fn surrounding_words<'a>(source: &'a str, byte_start: usize, segment: &str) -> &'a str {
    let byte_end = byte_start + segment.len();
    let from = source[..byte_start].rfind(char::is_whitespace).map_or(0, |index| {
        index + source[index..].chars().next().map_or(1, char::len_utf8)
    });
    let to = source[byte_end..].find(char::is_whitespace).map_or(source.len(), |index| byte_end + index);
    &source[from..to]
}

/// 909/908 when the segment occurs only as part of longer words; a punctuation
/// notice when it occurs on word boundaries that the word match still rejects
fn check_word_boundaries(segment_text: &str, role: SegmentRole, ctx: &ClassifierContext<'_>) -> Option<Notice> {
    let source = ctx.source_text;
    let occurrences: Vec<usize> = source.match_indices(segment_text).map(|(index, _)| index).collect();
    let &first = occurrences.first()?;

    let mut details = format!("{} ◗{}◖", ctx.wording.text_name, source);
    if role.is_part() {
        details = format!("{role} part of quote = \"{segment_text}\" -- {details}");
    }

    let clean = occurrences.iter().copied().find(|&index| {
        let (before, after) = neighbours(source, index, segment_text);
        is_clean_start(before) && is_clean_end(after, ctx.closing_apostrophe)
    });
    if let Some(index) = clean {
        let words = surrounding_words(source, index, segment_text);
        return Some(
            Notice::new(
                priority::QUOTE_NOT_FOUND,
                format!("Unable to find {} in {}", ctx.wording.quote_name, ctx.wording.text_name),
                ctx.location,
            )
            .with_details(format!("punctuation around ◗{words}◖ prevents a whole-word match -- {details}"))
            .with_excerpt(excerpt_ends(words, ctx.excerpt_length)),
        );
    }
    let occurrence_note = format!(" occurrence={}", ctx.occurrence);
    let inner_length = ctx.excerpt_length.saturating_sub(3);

    let (before, after) = neighbours(source, first, segment_text);
    if let Some(ch) = before.filter(|&ch| !is_word_start_neighbour(ch)) {
        let excerpt = format!("({}){}{occurrence_note}", describe_char(ch), excerpt_start(segment_text, inner_length));
        return Some(
            Notice::new(
                priority::NOT_WORD_START,
                format!("Seems {} might not start at the beginning of a word", ctx.wording.quote_name),
                ctx.location,
            )
            .with_details(details)
            .with_character_index(0)
            .with_excerpt(excerpt),
        );
    }
    let ch = after.filter(|&ch| !is_word_end_neighbour(ch, ctx.closing_apostrophe))?;
    let excerpt = format!("{}({}){occurrence_note}", excerpt_end(segment_text, inner_length), describe_char(ch));
    Some(
        Notice::new(
            priority::NOT_WORD_END,
            format!("Seems {} might not finish at the end of a word", ctx.wording.quote_name),
            ctx.location,
        )
        .with_details(details)
        .with_character_index(segment_text.chars().count())
        .with_excerpt(excerpt),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::DEFAULT_EXCERPT_LENGTH;

    fn context(source_text: &str) -> ClassifierContext<'_> {
        ClassifierContext {
            source_text,
            occurrence: Occurrence::Nth(1),
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            location: " in GEN 1:1",
            wording: SourceWording::ORIGINAL_LANGUAGE,
            closing_apostrophe: false,
        }
    }

    #[test]
    fn test_leading_space() {
        let notice = classify_unmatched(" quick", SegmentRole::Only, &context("the quick brown fox"));
        assert_eq!(notice.priority, priority::QUOTE_NOT_FOUND);
        assert_eq!(notice.details.as_deref(), Some("quote which starts with a space"));
        assert_eq!(notice.location, " in GEN 1:1");
    }

    #[test]
    fn test_trailing_space_in_part() {
        let notice = classify_unmatched("quick ", SegmentRole::Beginning, &context("the quick brown fox"));
        assert_eq!(notice.details.as_deref(), Some("quote which ends with a space"));
        assert_eq!(notice.excerpt.as_deref(), Some("(beginning quote portion) 'quick '"));
    }

    #[test]
    fn test_invisible_characters_are_named() {
        let ctx = context("the quick brown fox");
        let notice = classify_unmatched("\u{200B}quick brown", SegmentRole::Only, &ctx);
        assert_eq!(notice.details.as_deref(), Some("quote which starts with 'zero-width space'"));

        let notice = classify_unmatched("quick brown\u{2060}", SegmentRole::Only, &ctx);
        assert_eq!(notice.details.as_deref(), Some("quote which ends with 'word joiner'"));

        let notice = classify_unmatched("\u{200D}fox", SegmentRole::Only, &ctx);
        assert_eq!(notice.details.as_deref(), Some("quote which starts with 'zero-width joiner'"));
    }

    #[test]
    fn test_not_at_word_start() {
        let notice = classify_unmatched("own fox", SegmentRole::Only, &context("the quick brown fox"));
        assert_eq!(notice.priority, priority::NOT_WORD_START);
        assert_eq!(notice.character_index, Some(0));
        assert_eq!(notice.excerpt.as_deref(), Some("(r=D114/H72)own fox occurrence=1"));
    }

    #[test]
    fn test_not_at_word_end() {
        let notice = classify_unmatched("quick br", SegmentRole::Only, &context("the quick brown fox"));
        assert_eq!(notice.priority, priority::NOT_WORD_END);
        assert_eq!(notice.character_index, Some(8));
        assert_eq!(notice.excerpt.as_deref(), Some("quick br(o=D111/H6f) occurrence=1"));
    }

    #[test]
    fn test_generic_not_found() {
        let notice = classify_unmatched("lazy dog", SegmentRole::Only, &context("the quick brown fox"));
        assert_eq!(notice.priority, priority::QUOTE_NOT_FOUND);
        assert_eq!(notice.message, "Unable to find original language quote in verse text");
        assert_eq!(notice.details.as_deref(), Some("verse text ◗the quick brown fox◖"));
        assert_eq!(notice.excerpt.as_deref(), Some("lazy dog"));
    }

    #[test]
    fn test_no_break_space_note() {
        let notice = classify_unmatched("quick\u{00A0}brown", SegmentRole::Only, &context("the quick brown fox"));
        assert_eq!(notice.details.as_deref(), Some(NO_BREAK_SPACE_NOTE));
        assert_eq!(notice.excerpt.as_deref(), Some("quick⍽brown"));
    }

    #[test]
    fn test_story_wording() {
        let ctx = ClassifierContext { wording: SourceWording::STORY, ..context("God created the heavens") };
        let notice = classify_unmatched("the earth", SegmentRole::Only, &ctx);
        assert_eq!(notice.message, "Unable to find quote in story text");
        assert_eq!(notice.details.as_deref(), Some("story text ◗God created the heavens◖"));
    }

    #[test]
    fn test_clean_literal_occurrence_names_punctuation() {
        // Two leading marks: the literal sits on a boundary but the word match strips only one
        let notice = classify_unmatched("Let there", SegmentRole::Only, &context("God said, “‘Let there be light"));
        assert_eq!(notice.priority, priority::QUOTE_NOT_FOUND);
        let details = notice.details.unwrap_or_default();
        assert!(details.starts_with("punctuation around ◗“‘Let there◖"), "{details}");
        assert_eq!(notice.excerpt.as_deref(), Some("“‘Let there"));
    }

    #[test]
    fn test_closing_apostrophe_boundary() {
        let ctx = context("there be ‘light’ now");
        assert_eq!(classify_unmatched("ligh", SegmentRole::Only, &ctx).priority, priority::NOT_WORD_END);

        // Greek elision: ’ continues the word
        let notice = classify_unmatched("ἀλλ", SegmentRole::Only, &context("ἀλλ’ ἵνα"));
        assert_eq!(notice.priority, priority::NOT_WORD_END);

        let english = ClassifierContext { closing_apostrophe: true, ..context("‘light’ now") };
        let details = classify_unmatched("light", SegmentRole::Only, &english).details.unwrap_or_default();
        assert!(details.starts_with("punctuation around ◗‘light’◖"), "{details}");
    }
}
