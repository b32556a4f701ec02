// Tests for the matching pipeline exposed at the crate root
// WHY: Callers that already hold verse text use these pieces without the checker

use quote_locator::quote::{DividerStyle, QuoteField, SegmentRole, SegmenterOptions};
use quote_locator::{segment_quote, Occurrence, SourceText, WordMatcher};

fn field(text: &str) -> QuoteField<'_> {
    QuoteField { raw_text: text, occurrence: Occurrence::Nth(1), divider_style: DividerStyle::Ampersand }
}

#[test]
fn test_segment_then_match_in_order() {
    let source = SourceText::new("the quick brown fox jumps");
    let words = source.words();
    let matcher = WordMatcher::new(&words);

    let segmented = segment_quote(&field("quick & jumps"), &SegmenterOptions::default());
    assert!(segmented.is_discontiguous);
    assert_eq!(segmented.segments[1].role, SegmentRole::End);

    let first = matcher.locate(&segmented.segments[0].words, Occurrence::Nth(1), 0);
    assert_eq!((first.start, first.end), (1, 2));
    let second = matcher.locate(&segmented.segments[1].words, Occurrence::Nth(1), first.end);
    assert_eq!((second.start, second.end), (4, 5));
}

#[test]
fn test_every_word_aligned_substring_is_found() {
    let source = SourceText::new("a a b a a a b c");
    let words = source.words();
    let matcher = WordMatcher::new(&words);

    for start in 0..words.len() {
        for end in start + 1..=words.len() {
            let segment = &words[start..end];
            let result = matcher.next_match(segment, 0);
            assert!(result.found, "{segment:?} should be found");
            assert!(result.start <= start, "{segment:?} found late at {}", result.start);
        }
    }
}

#[test]
fn test_found_span_is_consistent() {
    let source = SourceText::new("In the beginning God created the heavens and the earth.");
    let words = source.words();
    let matcher = WordMatcher::new(&words);
    let segment = SourceText::new("the earth").words();

    let result = matcher.locate(&segment, Occurrence::Nth(1), 0);
    assert!(result.found);
    assert!(result.start < result.end && result.end <= words.len());
    assert_eq!(result.end - result.start, segment.len());
    assert_eq!(words[result.end - 1], "earth.");
}

#[test]
fn test_occurrence_counting() {
    let source = SourceText::new("the man and the woman and the child");
    let words = source.words();
    let matcher = WordMatcher::new(&words);
    let the = vec!["the".to_string()];

    assert_eq!(matcher.count(&the, 0), 3);
    assert_eq!(matcher.count(&the, 3), 2);
    assert_eq!(matcher.count(&the, 4), 1);
    assert_eq!(matcher.locate(&the, Occurrence::Nth(3), 0).start, 6);
    assert!(!matcher.locate(&the, Occurrence::Nth(4), 0).found);
    assert_eq!(Occurrence::parse("-1"), Some(Occurrence::AnyLater));
}
