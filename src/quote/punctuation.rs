// WHY: Character classes used by the segmenter, matcher and classifier live together
// so the word-boundary rules stay consistent between matching and diagnostics

/// Opening halves of paired punctuation; index-aligned with `PAIRED_CLOSERS`
pub const PAIRED_OPENERS: &[char] = &[
    '[', '(', '{', '<', '⟨', '“', '‘', '«', '‹', '《', '〈', '⸢', '⸤',
];

/// Closing halves of paired punctuation; index-aligned with `PAIRED_OPENERS`
pub const PAIRED_CLOSERS: &[char] = &[
    ']', ')', '}', '>', '⟩', '”', '’', '»', '›', '》', '〉', '⸣', '⸥',
];

/// One layer of these may precede the first word of a match
pub const LEADING_PUNCTUATION: &[char] = &[
    '[', '(', '{', '<', '⟨', '“', '‘', '«', '‹', '《', '〈', '⸢', '⸤', '"', '\'',
];

/// May follow the last word of a match without appearing in the quote.
/// Excludes ’ which is an elision apostrophe in Greek (δι’, ἀλλ’).
pub const TRAILING_PUNCTUATION: &[char] = &[
    ',', '.', '?', '!', ';', ':', ')', ']', '}', '>', '⟩', '”', '»', '›', '》', '〉', '⸣', '⸥', '…',
    '\u{05C3}', // ׃ sof pasuq
    '\u{05C0}', // ׀ paseq
    '\u{00B7}', // · middle dot
    '\u{0387}', // · Greek ano teleia
    '\u{037E}', // ; Greek question mark
];

/// Closing single quotes that may also be apostrophes
pub const CLOSING_APOSTROPHES: &[char] = &['’', '\''];

/// Separators that may sit on either side of a word
const WORD_SEPARATORS: &[char] = &[' ', '\u{05BE}', '–', '—'];

/// True when `ch` may immediately precede a word
pub fn is_word_start_neighbour(ch: char) -> bool {
    WORD_SEPARATORS.contains(&ch) || ch == '*' || LEADING_PUNCTUATION.contains(&ch)
}

/// True when `ch` may immediately follow a word; `closing_apostrophe` admits ’ and '
pub fn is_word_end_neighbour(ch: char, closing_apostrophe: bool) -> bool {
    WORD_SEPARATORS.contains(&ch)
        || TRAILING_PUNCTUATION.contains(&ch)
        || (closing_apostrophe && CLOSING_APOSTROPHES.contains(&ch))
}

pub const WORD_JOINER: char = '\u{2060}';
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';
pub const ZERO_WIDTH_JOINER: char = '\u{200D}';
pub const NO_BREAK_SPACE: char = '\u{00A0}';

/// Matching closer for an opening character
pub fn closer_for(opener: char) -> Option<char> {
    PAIRED_OPENERS
        .iter()
        .position(|&ch| ch == opener)
        .map(|index| PAIRED_CLOSERS[index])
}

/// Matching opener for a closing character
pub fn opener_for(closer: char) -> Option<char> {
    PAIRED_CLOSERS
        .iter()
        .position(|&ch| ch == closer)
        .map(|index| PAIRED_OPENERS[index])
}

/// Word with one leading punctuation character removed, if it had one
pub fn strip_leading_punctuation(word: &str) -> Option<&str> {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if LEADING_PUNCTUATION.contains(&first) => Some(chars.as_str()),
        _ => None,
    }
}

/// True when `word` is `query` followed only by trailing punctuation.
/// A closing apostrophe is accepted after another closing mark (`light.’`),
/// or anywhere when `closing_apostrophe` is set for content without elision.
pub fn matches_with_trailing_punctuation(word: &str, query: &str, closing_apostrophe: bool) -> bool {
    let Some(rest) = word.strip_prefix(query) else {
        return false;
    };
    !query.is_empty()
        && !rest.is_empty()
        && rest.chars().enumerate().all(|(index, ch)| {
            TRAILING_PUNCTUATION.contains(&ch)
                || (CLOSING_APOSTROPHES.contains(&ch) && (closing_apostrophe || index > 0))
        })
}

/// Human-readable description of a character for excerpts
pub fn describe_char(ch: char) -> String {
    match ch {
        WORD_JOINER => "WordJoiner".to_string(),
        ZERO_WIDTH_JOINER => "ZeroWidth-WordJoiner".to_string(),
        _ => format!("{ch}=D{}/H{:x}", ch as u32, ch as u32),
    }
}
