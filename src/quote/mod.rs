// WHY: Quote-side types shared by segmentation, matching and diagnostics
// Matching operates on word lists; raw segment text is kept for the classifier

use std::fmt;

pub mod classifier;
pub mod matcher;
pub mod punctuation;
pub mod segmenter;

pub use classifier::{classify_unmatched, ClassifierContext};
pub use matcher::{MatchResult, WordMatcher};
pub use segmenter::{segment_quote, SegmentedQuote, SegmenterOptions};

use crate::source_text::normalization::is_word_separator;

/// Three ASCII periods, tolerated as a divider in every content family
pub const LEGACY_DIVIDER: &str = "...";

/// Which numbered instance of a quote is intended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// The quote does not occur in this verse (valid only for an empty quote)
    Zero,
    /// Exactly the Nth occurrence, N >= 1
    Nth(u32),
    /// Legacy `-1`: any occurrence from the second onwards
    AnyLater,
}

impl Occurrence {
    /// Parse the occurrence column; `None` for anything other than `-1`, `0` or a positive integer
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "-1" => Some(Occurrence::AnyLater),
            "0" => Some(Occurrence::Zero),
            other => match other.parse::<u32>() {
                Ok(n) if n >= 1 => Some(Occurrence::Nth(n)),
                _ => None,
            },
        }
    }
}

impl Default for Occurrence {
    fn default() -> Self {
        Occurrence::Nth(1)
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occurrence::Zero => write!(f, "0"),
            Occurrence::Nth(n) => write!(f, "{n}"),
            Occurrence::AnyLater => write!(f, "-1"),
        }
    }
}

/// Divider between the parts of a discontiguous quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividerStyle {
    /// `…`, used by the original notes format
    Ellipsis,
    /// ` & `, used by the newer annotation formats
    Ampersand,
}

impl DividerStyle {
    /// Only the original `TN` repos use the ellipsis
    pub fn for_repo_code(repo_code: &str) -> Self {
        if repo_code.eq_ignore_ascii_case("TN") {
            DividerStyle::Ellipsis
        } else {
            DividerStyle::Ampersand
        }
    }

    pub fn divider(&self) -> &'static str {
        match self {
            DividerStyle::Ellipsis => "…",
            DividerStyle::Ampersand => " & ",
        }
    }

    /// The other family's divider, searched without surrounding spaces
    pub fn other_divider(&self) -> &'static str {
        match self {
            DividerStyle::Ellipsis => "&",
            DividerStyle::Ampersand => "…",
        }
    }
}

/// Quote field as it appears in an annotation row
#[derive(Debug, Clone)]
pub struct QuoteField<'a> {
    pub raw_text: &'a str,
    pub occurrence: Occurrence,
    pub divider_style: DividerStyle,
}

/// Position of a segment within its quote, used only in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    Only,
    Beginning,
    /// Numbered only when the quote has more than three parts
    Middle(Option<usize>),
    End,
}

impl SegmentRole {
    pub fn for_position(index: usize, count: usize) -> Self {
        if count <= 1 {
            SegmentRole::Only
        } else if index == 0 {
            SegmentRole::Beginning
        } else if index == count - 1 {
            SegmentRole::End
        } else if count > 3 {
            SegmentRole::Middle(Some(index))
        } else {
            SegmentRole::Middle(None)
        }
    }

    pub fn is_part(&self) -> bool {
        !matches!(self, SegmentRole::Only)
    }
}

impl fmt::Display for SegmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentRole::Only => Ok(()),
            SegmentRole::Beginning => write!(f, "beginning"),
            SegmentRole::Middle(None) => write!(f, "middle"),
            SegmentRole::Middle(Some(n)) => write!(f, "middle{n}"),
            SegmentRole::End => write!(f, "end"),
        }
    }
}

/// One ordered word run of a quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteSegment {
    pub text: String,
    pub words: Vec<String>,
    pub role: SegmentRole,
}

impl QuoteSegment {
    /// Leading or trailing whitespace means the segment cannot sit on word boundaries
    pub fn has_outer_whitespace(&self) -> bool {
        self.text.starts_with(is_word_separator) || self.text.ends_with(is_word_separator)
    }
}

/// Wording used in notices, which differs for story content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceWording {
    pub quote_name: &'static str,
    pub text_name: &'static str,
}

impl SourceWording {
    pub const ORIGINAL_LANGUAGE: SourceWording = SourceWording {
        quote_name: "original language quote",
        text_name: "verse text",
    };

    pub const STORY: SourceWording = SourceWording {
        quote_name: "quote",
        text_name: "story text",
    };
}
