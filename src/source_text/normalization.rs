// WHY: One whitespace rule shared by source text and quotes so both tokenize identically
// No-break spaces are not separators; they must stay visible to the classifier

/// Characters that join words visually but are treated as word separators
pub const DASH_LIKE_CHARACTERS: &[char] = &['\u{05BE}', '\u{2013}', '\u{2014}'];

/// No-break spaces stay inside a word
const NON_BREAKING_SPACES: &[char] = &['\u{00A0}', '\u{2007}', '\u{202F}'];

/// Whitespace that separates words
pub fn is_word_separator(ch: char) -> bool {
    ch.is_whitespace() && !NON_BREAKING_SPACES.contains(&ch)
}

/// Collapse runs of separator whitespace (including line breaks) into single spaces and trim
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_text_into(text, &mut result);
    result
}

/// Normalize into a supplied buffer to avoid allocation
pub fn normalize_text_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut prev_was_space = true; // drops leading whitespace
    for ch in text.chars() {
        if is_word_separator(ch) {
            if !prev_was_space {
                buffer.push(' ');
                prev_was_space = true;
            }
        } else {
            buffer.push(ch);
            prev_was_space = false;
        }
    }

    if buffer.ends_with(' ') {
        buffer.pop();
    }
}

/// Split text into words after turning dash-like joiners into spaces
pub fn split_words(text: &str) -> Vec<String> {
    text.split(|ch: char| is_word_separator(ch) || DASH_LIKE_CHARACTERS.contains(&ch))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}
