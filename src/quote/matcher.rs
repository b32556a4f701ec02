// WHY: Explicit state machine over source words so every transition can be traced
// Matches never overlap: the next search starts where the previous match ended

#[cfg(feature = "debug-states")]
use tracing::trace;

use super::punctuation::{matches_with_trailing_punctuation, strip_leading_punctuation};
use super::Occurrence;

/// Outcome of a search; `start..end` is a word-index range into the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResult {
    pub found: bool,
    pub start: usize,
    pub end: usize,
}

impl MatchResult {
    pub fn not_found() -> Self {
        Self::default()
    }

    fn at(start: usize, end: usize) -> Self {
        Self { found: true, start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchState {
    /// Looking for the first segment word
    Idle,
    /// `matched` segment words agree with source words from `start`
    Accumulating { start: usize, matched: usize },
    Done { start: usize, end: usize },
}

/// Finds ordered word sequences in one verse or frame
#[derive(Debug, Clone, Copy)]
pub struct WordMatcher<'a> {
    source: &'a [String],
    closing_apostrophe: bool,
}

impl<'a> WordMatcher<'a> {
    pub fn new(source: &'a [String]) -> Self {
        Self { source, closing_apostrophe: false }
    }

    /// Let ’ directly after the last word close a quotation (content where ’ is not elision)
    pub fn with_closing_apostrophe(mut self, closing_apostrophe: bool) -> Self {
        self.closing_apostrophe = closing_apostrophe;
        self
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// First match of `segment` at or after word index `from`
    pub fn next_match(&self, segment: &[String], from: usize) -> MatchResult {
        if segment.is_empty() {
            return MatchResult::not_found();
        }

        let mut state = MatchState::Idle;
        let mut position = from;
        loop {
            let next = match state {
                MatchState::Done { start, end } => return MatchResult::at(start, end),
                MatchState::Accumulating { start, matched } if matched == segment.len() => {
                    MatchState::Done { start, end: position }
                }
                _ if position >= self.source.len() => return MatchResult::not_found(),
                MatchState::Idle => {
                    position += 1;
                    if self.word_matches(&self.source[position - 1], segment, 0) {
                        MatchState::Accumulating { start: position - 1, matched: 1 }
                    } else {
                        MatchState::Idle
                    }
                }
                MatchState::Accumulating { start, matched } => {
                    if self.word_matches(&self.source[position], segment, matched) {
                        position += 1;
                        MatchState::Accumulating { start, matched: matched + 1 }
                    } else {
                        // Resume one word after the failed candidate so overlapping prefixes are retried
                        position = start + 1;
                        MatchState::Idle
                    }
                }
            };
            #[cfg(feature = "debug-states")]
            trace!("matcher {:?} -> {:?} at word {}", state, next, position);
            state = next;
        }
    }

    /// The `n`th non-overlapping match at or after `offset`
    pub fn find_nth(&self, segment: &[String], n: u32, offset: usize) -> MatchResult {
        if n == 0 {
            return MatchResult::not_found();
        }
        let mut from = offset;
        let mut result = MatchResult::not_found();
        for _ in 0..n {
            result = self.next_match(segment, from);
            if !result.found {
                return result;
            }
            from = result.end;
        }
        result
    }

    /// Number of non-overlapping matches at or after `offset`
    pub fn count(&self, segment: &[String], offset: usize) -> usize {
        let mut from = offset;
        let mut total = 0;
        loop {
            let result = self.next_match(segment, from);
            if !result.found {
                return total;
            }
            total += 1;
            from = result.end;
        }
    }

    /// Resolve an occurrence request against the source
    pub fn locate(&self, segment: &[String], occurrence: Occurrence, offset: usize) -> MatchResult {
        match occurrence {
            Occurrence::Nth(n) => self.find_nth(segment, n, offset),
            Occurrence::AnyLater if self.count(segment, offset) >= 2 => self.find_nth(segment, 2, offset),
            Occurrence::AnyLater | Occurrence::Zero => MatchResult::not_found(),
        }
    }

    /// Compare one source word with segment word `index`.
    /// The first word may drop one leading punctuation mark; only the last word tolerates trailing punctuation.
    fn word_matches(&self, source_word: &str, segment: &[String], index: usize) -> bool {
        let query = segment[index].as_str();
        let is_last = index + 1 == segment.len();
        let agrees = |candidate: &str| {
            candidate == query
                || (is_last && matches_with_trailing_punctuation(candidate, query, self.closing_apostrophe))
        };

        if agrees(source_word) {
            return true;
        }
        index == 0 && strip_leading_punctuation(source_word).is_some_and(agrees)
    }
}
