// WHY: Source text extraction is separate from matching so callers may supply text directly
// Book references read original-language USFM; story references read OBS markdown

use anyhow::{bail, Result};

pub mod normalization;
pub mod story;
pub mod usfm;

pub use normalization::{normalize_text, split_words};

use crate::books::{self, Testament};
use crate::fetch::FetchRequest;
use crate::reference::Reference;

/// Normalized plain text for exactly one verse or frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
}

impl SourceText {
    /// Wrap caller-supplied text, collapsing whitespace
    pub fn new(text: &str) -> Self {
        Self { text: normalize_text(text) }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Word list scanned by the matcher
    pub fn words(&self) -> Vec<String> {
        split_words(&self.text)
    }
}

/// Turns a fetched document into the source text for one reference
#[derive(Debug)]
pub struct SourceExtractor {
    usfm: usfm::UsfmPatterns,
}

impl SourceExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self { usfm: usfm::UsfmPatterns::new()? })
    }

    /// `None` when the verse or frame cannot be located in the document
    pub fn extract(&self, reference: &Reference, document: &str) -> Option<SourceText> {
        let text = match reference {
            Reference::Book { chapter, verse, .. } => self.usfm.extract_verse(document, *chapter, *verse),
            Reference::Story { story, frame } => story::extract_frame(document, *story, *frame),
        }?;
        Some(SourceText { text })
    }
}

/// Where the source document for a reference lives
pub fn document_request(
    reference: &Reference,
    language_code: &str,
    username: &str,
    branch: &str,
) -> Result<FetchRequest> {
    let (repository, path) = match reference {
        Reference::Story { story, .. } => (format!("{language_code}_obs"), format!("content/{story:02}.md")),
        Reference::Book { book_id, .. } => {
            let repository = match reference.testament() {
                Testament::Old => "hbo_uhb",
                Testament::New => "el-x-koine_ugnt",
                Testament::Other => bail!("No original-language text exists for book '{book_id}'"),
            };
            let Some(number_name) = books::usfm_number_name(book_id) else {
                bail!("No USFM file name for book '{book_id}'");
            };
            (repository.to_string(), format!("{number_name}.usfm"))
        }
    };
    Ok(FetchRequest {
        username: username.to_string(),
        repository,
        path,
        branch: branch.to_string(),
    })
}
