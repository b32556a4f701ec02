use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::books::{self, Testament};

/// Book id used for Open Bible Stories references
pub const STORY_BOOK_ID: &str = "OBS";

/// Coordinate of one passage: a Bible verse or an Open Bible Stories frame
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Reference {
    #[serde(rename_all = "camelCase")]
    Book { book_id: String, chapter: u32, verse: u32 },
    #[serde(rename_all = "camelCase")]
    Story { story: u32, frame: u32 },
}

impl Reference {
    /// Build a Bible reference, rejecting ids that are not USFM book codes
    pub fn book(book_id: &str, chapter: u32, verse: u32) -> Result<Self> {
        let book_id = book_id.trim().to_uppercase();
        if !books::is_valid_book_id(&book_id) {
            bail!("Invalid USFM book id: '{book_id}'");
        }
        if chapter == 0 {
            bail!("Chapter number must be positive for {book_id}");
        }
        Ok(Reference::Book { book_id, chapter, verse })
    }

    /// Build a story reference; frame 0 addresses the story title
    pub fn story(story: u32, frame: u32) -> Result<Self> {
        if story == 0 {
            bail!("Story number must be positive");
        }
        Ok(Reference::Story { story, frame })
    }

    pub fn testament(&self) -> Testament {
        match self {
            // Constructors only admit valid ids
            Reference::Book { book_id, .. } => books::testament(book_id).unwrap_or(Testament::Other),
            Reference::Story { .. } => Testament::Other,
        }
    }

    pub fn is_story(&self) -> bool {
        matches!(self, Reference::Story { .. })
    }

    pub fn book_id(&self) -> &str {
        match self {
            Reference::Book { book_id, .. } => book_id,
            Reference::Story { .. } => STORY_BOOK_ID,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Book { book_id, chapter, verse } => write!(f, "{book_id} {chapter}:{verse}"),
            Reference::Story { story, frame } => write!(f, "{STORY_BOOK_ID} {story}:{frame}"),
        }
    }
}

/// Parses `"GEN 1:3"` or `"OBS 12:4"`
impl FromStr for Reference {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (book_part, cv_part) = s
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| anyhow!("Reference '{s}' should look like 'GEN 1:3'"))?;
        let (chapter, verse) = parse_chapter_verse(cv_part)?;
        if book_part.eq_ignore_ascii_case(STORY_BOOK_ID) {
            Reference::story(chapter, verse)
        } else {
            Reference::book(book_part, chapter, verse)
        }
    }
}

/// Parses the `C:V` part of a reference
pub fn parse_chapter_verse(text: &str) -> Result<(u32, u32)> {
    let (c, v) = text
        .trim()
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected chapter:verse but got '{text}'"))?;
    let chapter = c.trim().parse::<u32>().map_err(|e| anyhow!("Bad chapter '{c}': {e}"))?;
    let verse = v.trim().parse::<u32>().map_err(|e| anyhow!("Bad verse '{v}': {e}"))?;
    Ok((chapter, verse))
}
