pub mod batch;
pub mod books;
pub mod checker;
pub mod fetch;
pub mod notice;
pub mod quote;
pub mod reader;
pub mod reference;
pub mod source_text;

// Re-export main types for convenient access
pub use checker::{CheckOptions, QuoteCheckRequest, QuoteChecker};
pub use notice::{Notice, NoticeList};
pub use reference::Reference;

// Re-export the matching pipeline for callers that supply their own source text
pub use quote::{segment_quote, Occurrence, WordMatcher};
pub use source_text::{SourceExtractor, SourceText};

// Re-export fetch collaborators
pub use fetch::{CachingFetcher, DirectoryFetcher, DocumentFetcher, FetchRequest};
