// WHY: One entry point ties syntax checks, source loading and ordered matching together
// Every data problem becomes a notice; only contract violations are errors

use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::books::Testament;
use crate::fetch::DocumentFetcher;
use crate::notice::{excerpt_ends, normalize_location, priority, Notice, NoticeList, DEFAULT_EXCERPT_LENGTH};
use crate::quote::{
    classify_unmatched, segment_quote, ClassifierContext, DividerStyle, Occurrence, QuoteField, SegmentedQuote,
    SegmenterOptions, SourceWording, WordMatcher,
};
use crate::reference::Reference;
use crate::source_text::{document_request, SourceExtractor, SourceText};

pub const DEFAULT_BRANCH: &str = "master";

/// One quote cell to verify
#[derive(Debug, Clone, Copy)]
pub struct QuoteCheckRequest<'a> {
    pub language_code: &'a str,
    /// Annotation repo code, e.g. `TN`, `TN2`, `TWL`, `SN`; selects the divider
    pub repo_code: &'a str,
    pub field_name: &'a str,
    pub quote: &'a str,
    /// Occurrence column exactly as written
    pub occurrence: &'a str,
    pub reference: &'a Reference,
    pub location: &'a str,
}

/// Knobs for a check; the defaults fetch nothing and use 20-character excerpts
#[derive(Clone)]
pub struct CheckOptions {
    /// Verse or frame text supplied by the caller, used instead of fetching
    pub source_text: Option<String>,
    pub fetcher: Option<Arc<dyn DocumentFetcher>>,
    /// Defaults to `unfoldingWord` for English and `Door43-Catalog` otherwise
    pub repo_username: Option<String>,
    pub repo_branch: Option<String>,
    pub excerpt_length: usize,
    /// With no supplied text, stop after the quote syntax checks
    pub disable_fetching: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            source_text: None,
            fetcher: None,
            repo_username: None,
            repo_branch: None,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            disable_fetching: false,
        }
    }
}

impl fmt::Debug for CheckOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckOptions")
            .field("source_text", &self.source_text)
            .field("fetcher", &self.fetcher.as_ref().map(|_| "dyn DocumentFetcher"))
            .field("repo_username", &self.repo_username)
            .field("repo_branch", &self.repo_branch)
            .field("excerpt_length", &self.excerpt_length)
            .field("disable_fetching", &self.disable_fetching)
            .finish()
    }
}

impl CheckOptions {
    pub fn with_source_text(text: impl Into<String>) -> Self {
        Self { source_text: Some(text.into()), ..Default::default() }
    }

    pub fn with_fetcher(fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self { fetcher: Some(fetcher), ..Default::default() }
    }

    pub fn username_for(&self, language_code: &str) -> String {
        match &self.repo_username {
            Some(username) => username.clone(),
            None if language_code == "en" => "unfoldingWord".to_string(),
            None => "Door43-Catalog".to_string(),
        }
    }

    pub fn branch(&self) -> &str {
        self.repo_branch.as_deref().unwrap_or(DEFAULT_BRANCH)
    }
}

/// Quote after syntax checks, ready for matching
struct PreparedQuote<'a> {
    raw_text: &'a str,
    segmented: SegmentedQuote,
    occurrence: Occurrence,
    wording: SourceWording,
    closing_apostrophe: bool,
}

/// Verifies quotes against original-language verse text or story text
#[derive(Debug)]
pub struct QuoteChecker {
    extractor: SourceExtractor,
}

impl QuoteChecker {
    pub fn new() -> Result<Self> {
        Ok(Self { extractor: SourceExtractor::new()? })
    }

    /// Check one quote, loading the source text through the options' fetcher when needed
    pub async fn check(&self, request: &QuoteCheckRequest<'_>, options: &CheckOptions) -> Result<NoticeList> {
        let location = normalize_location(request.location);
        let mut notices = NoticeList::new();
        debug!("Checking {} quote '{}'{}", request.field_name, request.quote, location);

        let Some(prepared) = prepare(request, &location, options.excerpt_length, &mut notices) else {
            return Ok(notices);
        };
        let Some(source) = self.obtain_source(request, options, &location, &mut notices).await? else {
            return Ok(notices);
        };
        match_segments(&prepared, &source, &location, options.excerpt_length, &mut notices);
        Ok(notices)
    }

    /// Check one quote against source text the caller already has
    pub fn check_against_source(
        &self,
        request: &QuoteCheckRequest<'_>,
        source: &SourceText,
        excerpt_length: usize,
    ) -> NoticeList {
        let location = normalize_location(request.location);
        let mut notices = NoticeList::new();
        if let Some(prepared) = prepare(request, &location, excerpt_length, &mut notices) {
            if source.is_empty() {
                notices.push(load_failure_notice(request.reference, &location));
            } else {
                match_segments(&prepared, source, &location, excerpt_length, &mut notices);
            }
        }
        notices
    }

    /// `Ok(None)` once the appropriate notices have been pushed and nothing more can be checked
    async fn obtain_source(
        &self,
        request: &QuoteCheckRequest<'_>,
        options: &CheckOptions,
        location: &str,
        notices: &mut NoticeList,
    ) -> Result<Option<SourceText>> {
        if let Some(text) = options.source_text.as_deref().filter(|text| !text.trim().is_empty()) {
            return Ok(Some(SourceText::new(text)));
        }
        if options.disable_fetching {
            debug!("No source text supplied and fetching disabled{}", location);
            return Ok(None);
        }
        let Some(fetcher) = &options.fetcher else {
            warn!("No source text or fetcher available{}", location);
            notices.push(load_failure_notice(request.reference, location));
            return Ok(None);
        };

        let username = options.username_for(request.language_code);
        let fetch_request = document_request(request.reference, request.language_code, &username, options.branch())?;
        let document = match fetcher.fetch(&fetch_request).await {
            Ok(document) => document,
            Err(e) => {
                warn!("Failed to fetch {}: {:#}", fetch_request, e);
                notices.push(
                    Notice::new(priority::FETCH_FAILED, "Unable to load", location)
                        .with_details(format!("username={username} error={e:#}")),
                );
                notices.push(load_failure_notice(request.reference, location));
                return Ok(None);
            }
        };

        match self.extractor.extract(request.reference, &document) {
            Some(source) => Ok(Some(source)),
            None => {
                info!("{} not found in {}", request.reference, fetch_request);
                notices.push(load_failure_notice(request.reference, location));
                Ok(None)
            }
        }
    }
}

fn load_failure_notice(reference: &Reference, location: &str) -> Notice {
    let message = if reference.is_story() {
        "Unable to load OBS story text"
    } else {
        "Unable to load original language verse text"
    };
    Notice::new(priority::SOURCE_NOT_LOCATED, message, location)
}

/// Occurrence and syntax checks; `None` when there is nothing to locate
fn prepare<'a>(
    request: &QuoteCheckRequest<'a>,
    location: &str,
    excerpt_length: usize,
    notices: &mut NoticeList,
) -> Option<PreparedQuote<'a>> {
    let quote = request.quote;
    let mut occurrence = match Occurrence::parse(request.occurrence) {
        Some(occurrence) => occurrence,
        None => {
            notices.push(
                Notice::new(priority::INVALID_OCCURRENCE, "Invalid occurrence field", location)
                    .with_details(format!("{} occurrence ◗{}◖", request.field_name, request.occurrence))
                    .with_excerpt(request.occurrence),
            );
            Occurrence::Nth(1)
        }
    };
    if quote.is_empty() {
        return None;
    }
    if occurrence == Occurrence::Zero {
        notices.push(
            Notice::new(
                priority::ZERO_OCCURRENCE,
                "Invalid zero occurrence field when we have an original quote",
                location,
            )
            .with_excerpt(excerpt_ends(quote, excerpt_length)),
        );
        occurrence = Occurrence::Nth(1);
    }

    let field = QuoteField {
        raw_text: quote,
        occurrence,
        divider_style: DividerStyle::for_repo_code(request.repo_code),
    };
    // ’ is Greek elision and an English apostrophe; only Hebrew verse text never uses it
    let testament = request.reference.testament();
    let segmenter_options = SegmenterOptions {
        excerpt_length,
        allow_apostrophe_closer: testament == Testament::New
            || request.reference.is_story()
            || request.language_code == "en",
        location,
    };
    let segmented = segment_quote(&field, &segmenter_options);
    notices.extend(segmented.notices.iter().cloned());
    if segmented.segments.is_empty() {
        return None;
    }

    let wording = if request.reference.is_story() {
        SourceWording::STORY
    } else {
        SourceWording::ORIGINAL_LANGUAGE
    };
    Some(PreparedQuote {
        raw_text: quote,
        segmented,
        occurrence,
        wording,
        closing_apostrophe: testament != Testament::New,
    })
}

/// Match segments in order; each later segment must follow the previous match
fn match_segments(
    prepared: &PreparedQuote<'_>,
    source: &SourceText,
    location: &str,
    excerpt_length: usize,
    notices: &mut NoticeList,
) {
    let words = source.words();
    let matcher = WordMatcher::new(&words).with_closing_apostrophe(prepared.closing_apostrophe);
    let wording = prepared.wording;
    let mut offset = 0;

    if prepared.segmented.is_discontiguous && prepared.occurrence != Occurrence::Nth(1) {
        notices.push(
            Notice::new(priority::DISCONTIGUOUS_OCCURRENCE, "Is this quote/occurrence correct???", location)
                .with_details(format!("Occurrence={}", prepared.occurrence))
                .with_excerpt(prepared.raw_text),
        );
    }

    for (index, segment) in prepared.segmented.segments.iter().enumerate() {
        let occurrence = if index == 0 { prepared.occurrence } else { Occurrence::Nth(1) };
        let ctx = ClassifierContext {
            source_text: source.as_str(),
            occurrence,
            excerpt_length,
            location,
            wording,
            closing_apostrophe: prepared.closing_apostrophe,
        };

        if segment.has_outer_whitespace() {
            notices.push(classify_unmatched(&segment.text, segment.role, &ctx));
            continue;
        }

        let result = matcher.locate(&segment.words, occurrence, offset);
        if result.found {
            debug!("Matched segment {} at words {}..{}", index, result.start, result.end);
            offset = result.end;
            continue;
        }

        if index > 0 && matcher.next_match(&segment.words, 0).found {
            notices.push(
                Notice::new(
                    priority::SEGMENT_OUT_OF_ORDER,
                    format!("Unable to find {} portion in the right place in the {}", wording.quote_name, wording.text_name),
                    location,
                )
                .with_details(format!("{} ◗{}◖", wording.text_name, source.as_str()))
                .with_excerpt(format!("({} quote portion) '{}'", segment.role, segment.text)),
            );
            continue;
        }

        let available = if index == 0 { matcher.count(&segment.words, 0) } else { 0 };
        if available > 0 {
            notices.push(
                Notice::new(
                    priority::DUPLICATE_NOT_FOUND,
                    format!("Unable to find duplicate {} in {}", wording.quote_name, wording.text_name),
                    location,
                )
                .with_details(format!(
                    "occurrence={} but only {} occurrence{} found, passage ◗{}◖",
                    occurrence,
                    available,
                    if available == 1 { "" } else { "s" },
                    source.as_str()
                ))
                .with_excerpt(excerpt_ends(&segment.text, excerpt_length)),
            );
            continue;
        }

        notices.push(classify_unmatched(&segment.text, segment.role, &ctx));
    }
}
