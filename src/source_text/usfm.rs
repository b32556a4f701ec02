// WHY: Reconstructs plain verse text from aligned original-language USFM
// Marker stripping order matters: \w unwrapping must see footnotes still intact

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::debug;

use super::normalization::normalize_text;

const WORD_OPEN: &str = "\\w ";
const WORD_CLOSE: &str = "\\w*";

/// Compiled marker patterns for verse extraction
#[derive(Debug)]
pub struct UsfmPatterns {
    milestone: Regex,
    paragraph: Regex,
    footnote: Regex,
    alternate_verse: Regex,
    cross_reference: Regex,
}

impl UsfmPatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // \k-s | x-tw="..."\*  \k-e\*  \zaln-s |x-strong="..."\*  \zaln-e\*
            milestone: Regex::new(r"\\[a-z0-9]+-(?:s[^\\]*|e)\\\*")?,
            paragraph: Regex::new(r"\\(?:p|m|nb|b|q[1-4]?)(?:\s|$)")?,
            footnote: Regex::new(r"\\f .*?\\f\*")?,
            alternate_verse: Regex::new(r"\\va .*?\\va\*")?,
            cross_reference: Regex::new(r"\\x .*?\\x\*")?,
        })
    }

    /// Extract the plain text of one verse, `None` if chapter or verse is absent
    pub fn extract_verse(&self, usfm: &str, chapter: u32, verse: u32) -> Option<String> {
        let usfm = replace_all(&self.milestone, usfm, "");
        let chapter_line = format!("\\c {chapter}");
        let verse_prefix = format!("\\v {verse}");

        let mut found_chapter = false;
        let mut found_verse = false;
        let mut verse_text = String::new();

        for line in usfm.lines() {
            let line = line.trim_end();
            if !found_chapter {
                found_chapter = line == chapter_line;
                continue;
            }
            let mut line = line;
            if !found_verse {
                if line.starts_with("\\c ") {
                    break;
                }
                match strip_verse_marker(line, &verse_prefix) {
                    Some(rest) => {
                        found_verse = true;
                        line = rest;
                    }
                    None => continue,
                }
            } else if line.starts_with("\\v ") || line.starts_with("\\c ") {
                break;
            }
            if !line.starts_with("\\f ") {
                verse_text.push(' ');
            }
            verse_text.push_str(line);
        }

        if !found_verse {
            debug!("Verse {}:{} not found (chapter found: {})", chapter, verse, found_chapter);
            return None;
        }

        let text = replace_all(&self.paragraph, &verse_text, " ");
        let text = unwrap_word_spans(&normalize_text(&text));
        let text = replace_all(&self.footnote, &text, "");
        let text = replace_all(&self.alternate_verse, &text, "");
        let text = replace_all(&self.cross_reference, &text, "");
        let text = normalize_text(&replace_all(&self.milestone, &text, ""));
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Returns the rest of the line when it opens the wanted verse (`\v 1` never matches `\v 10`)
fn strip_verse_marker<'a>(line: &'a str, verse_prefix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(verse_prefix)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(ch) if ch.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

/// Replace `\w word|metadata\w*` with the bare word
pub fn unwrap_word_spans(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(WORD_OPEN) {
        result.push_str(&rest[..open]);
        let body = &rest[open + WORD_OPEN.len()..];
        match body.find(WORD_CLOSE) {
            Some(close) => {
                let field = &body[..close];
                let word = field.split('|').next().unwrap_or(field);
                result.push_str(word);
                rest = &body[close + WORD_CLOSE.len()..];
            }
            None => {
                debug!("Missing \\w* closer in verse text");
                rest = body;
            }
        }
    }
    result.push_str(rest);
    result
}

/// Replace every match of the pattern
pub(crate) fn replace_all(regex: &Regex, text: &str, replacement: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;
    for found in regex.find_iter(text) {
        result.push_str(&text[last_end..found.start()]);
        result.push_str(replacement);
        last_end = found.end();
    }
    result.push_str(&text[last_end..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\\id GEN\n\\c 1\n\\p\n\\v 1 \\w בְּ⁠רֵאשִׁ֖ית|lemma=\"רֵאשִׁית\" strong=\"b:H7225\"\\w*\n\\w בָּרָ֣א|lemma=\"בָּרָא\"\\w* \\w אֱלֹהִ֑ים|lemma=\"אֱלֹהִים\"\\w*׃\n\\v 2 \\w וְ⁠הָ⁠אָ֗רֶץ|lemma=\"אֶרֶץ\"\\w*\n\\v 10 \\w עֶשֶׂר\\w*\n\\c 2\n\\v 1 \\w וַ⁠יְכֻלּ֛וּ\\w*\n";

    fn patterns() -> UsfmPatterns {
        UsfmPatterns::new().unwrap()
    }

    #[test]
    fn test_extract_first_verse() {
        let text = patterns().extract_verse(SAMPLE, 1, 1).unwrap();
        assert_eq!(text, "בְּ⁠רֵאשִׁ֖ית בָּרָ֣א אֱלֹהִ֑ים׃");
    }

    #[test]
    fn test_verse_one_does_not_match_verse_ten() {
        let text = patterns().extract_verse(SAMPLE, 1, 10).unwrap();
        assert_eq!(text, "עֶשֶׂר");
        let text = patterns().extract_verse(SAMPLE, 2, 1).unwrap();
        assert_eq!(text, "וַ⁠יְכֻלּ֛וּ");
    }

    #[test]
    fn test_missing_chapter_or_verse() {
        assert!(patterns().extract_verse(SAMPLE, 3, 1).is_none());
        assert!(patterns().extract_verse(SAMPLE, 1, 5).is_none());
    }

    #[test]
    fn test_footnotes_and_alternate_verses_removed() {
        let usfm = "\\c 3\n\\v 4 \\va 5\\va* \\w λόγος\\w*\n\\f + \\ft Some note\\f*\n\\w καὶ\\w*\n";
        let text = patterns().extract_verse(usfm, 3, 4).unwrap();
        assert_eq!(text, "λόγος καὶ");
    }

    #[test]
    fn test_milestones_removed() {
        let usfm = "\\c 1\n\\v 1 \\zaln-s |x-strong=\"G35880\"\\*\\w ὁ|x-occurrence=\"1\"\\w*\\zaln-e\\*\n\\k-s | x-tw=\"rc://*/tw/dict/bible/kt/god\"\\*\\w θεός\\w*\\k-e\\*\n";
        let text = patterns().extract_verse(usfm, 1, 1).unwrap();
        assert_eq!(text, "ὁ θεός");
    }

    #[test]
    fn test_unwrap_word_spans_unterminated() {
        assert_eq!(unwrap_word_spans("\\w one|x\\w* \\w two"), "one two");
    }

    #[test]
    fn test_replace_all() {
        let regex = Regex::new("a+").unwrap();
        assert_eq!(replace_all(&regex, "baaab a", "-"), "b-b -");
    }
}
