// WHY: Annotation files hold thousands of quotes over a handful of source documents,
// so rows are checked concurrently through one shared document cache

use anyhow::{anyhow, bail, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::checker::{CheckOptions, QuoteCheckRequest, QuoteChecker};
use crate::notice::{Notice, NoticeList};
use crate::reference::{parse_chapter_verse, Reference, STORY_BOOK_ID};

/// Configuration for a batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Rows checked at once (default: number of CPUs)
    pub concurrency: usize,
    /// Abort the run on the first row that cannot be checked
    pub fail_fast: bool,
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: num_cpus::get(),
            fail_fast: false,
            show_progress: true,
        }
    }
}

/// One annotation row with a quote to verify
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    /// 1-based line number in the TSV file
    pub line_number: usize,
    pub reference: Reference,
    pub id: String,
    pub quote: String,
    pub occurrence: String,
}

/// Rows of one annotation file plus the name of its quote column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTable {
    pub field_name: String,
    pub rows: Vec<AnnotationRow>,
}

const QUOTE_COLUMNS: &[&str] = &["Quote", "OrigQuote"];

fn column_index(header: &[&str], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|column| *column == name)
        .ok_or_else(|| anyhow!("Annotation header has no '{name}' column"))
}

/// Parse a tab-separated annotation file for one book
/// Rows whose reference is not numeric (`front:intro`, `1:intro`) or whose quote is empty are skipped
pub fn parse_annotation_rows(tsv: &str, book_id: &str) -> Result<AnnotationTable> {
    let is_story = book_id.eq_ignore_ascii_case(STORY_BOOK_ID);
    if !is_story {
        // Validate the book id once rather than failing on every row
        Reference::book(book_id, 1, 1)?;
    }

    let mut lines = tsv.lines().enumerate();
    let (_, header_line) = lines.next().context("Annotation file is empty")?;
    let header: Vec<&str> = header_line.split('\t').map(str::trim).collect();
    let reference_column = column_index(&header, "Reference")?;
    let id_column = column_index(&header, "ID")?;
    let occurrence_column = column_index(&header, "Occurrence")?;
    let Some((quote_column, field_name)) = QUOTE_COLUMNS
        .iter()
        .find_map(|name| header.iter().position(|column| column == name).map(|index| (index, *name)))
    else {
        bail!("Annotation header has no Quote or OrigQuote column");
    };

    let mut rows = Vec::new();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('\t').collect();
        let cell = |column: usize| cells.get(column).copied().unwrap_or("");
        let line_number = index + 1;

        let quote = cell(quote_column);
        if quote.is_empty() {
            continue;
        }
        let Ok((chapter, verse)) = parse_chapter_verse(cell(reference_column)) else {
            debug!("Skipping line {} with non-numeric reference '{}'", line_number, cell(reference_column));
            continue;
        };
        let reference = if is_story {
            Reference::story(chapter, verse)
        } else {
            Reference::book(book_id, chapter, verse)
        };
        let reference = match reference {
            Ok(reference) => reference,
            Err(e) => {
                warn!("Skipping line {}: {:#}", line_number, e);
                continue;
            }
        };

        rows.push(AnnotationRow {
            line_number,
            reference,
            id: cell(id_column).to_string(),
            quote: quote.to_string(),
            occurrence: cell(occurrence_column).to_string(),
        });
    }

    info!("Parsed {} annotation rows with quotes for {}", rows.len(), book_id);
    Ok(AnnotationTable { field_name: field_name.to_string(), rows })
}

/// Per-run statistics
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub rows_checked: u64,
    pub rows_with_notices: u64,
    pub notices_emitted: u64,
    /// Rows whose check returned an error instead of notices
    pub failed_rows: u64,
    pub duration_ms: u64,
}

/// Notices for every row, in file order, plus run statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    #[serde(flatten)]
    pub notices: NoticeList,
    pub stats: BatchStats,
}

/// Which annotation repo the rows come from
#[derive(Debug, Clone, Copy)]
pub struct BatchSource<'a> {
    pub language_code: &'a str,
    pub repo_code: &'a str,
}

fn progress_bar(total: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows {msg}") {
        progress.set_style(style);
    }
    progress
}

/// Check every row; the options' fetcher should be a `CachingFetcher` shared by all rows
pub async fn check_rows(
    checker: &QuoteChecker,
    table: &AnnotationTable,
    source: BatchSource<'_>,
    options: &CheckOptions,
    config: &BatchConfig,
) -> Result<BatchReport> {
    let start_time = Instant::now();
    let progress = progress_bar(table.rows.len(), config.show_progress);

    let mut checks = stream::iter(table.rows.iter().enumerate())
        .map(|(index, row)| {
            let progress = &progress;
            async move {
                let location = format!("in {} with ID {}", row.reference, row.id);
                let request = QuoteCheckRequest {
                    language_code: source.language_code,
                    repo_code: source.repo_code,
                    field_name: &table.field_name,
                    quote: &row.quote,
                    occurrence: &row.occurrence,
                    reference: &row.reference,
                    location: &location,
                };
                let result = checker.check(&request, options).await;
                progress.inc(1);
                (index, row, result)
            }
        })
        .buffer_unordered(config.concurrency.max(1));

    let mut report = BatchReport::default();
    let mut checked: Vec<(usize, NoticeList)> = Vec::with_capacity(table.rows.len());
    while let Some((index, row, result)) = checks.next().await {
        report.stats.rows_checked += 1;
        match result {
            Ok(notices) => checked.push((index, notices)),
            Err(e) if config.fail_fast => {
                // WHY: dropping the stream cancels the checks still in flight
                progress.abandon();
                return Err(e.context(format!("Failed to check line {} (ID {})", row.line_number, row.id)));
            }
            Err(e) => {
                warn!("Failed to check line {} (ID {}): {:#}", row.line_number, row.id, e);
                report.stats.failed_rows += 1;
            }
        }
    }
    drop(checks);
    progress.finish_and_clear();

    // WHY: completion order is nondeterministic; reports follow file order
    checked.sort_by_key(|(index, _)| *index);
    for (_, notices) in checked {
        if !notices.is_empty() {
            report.stats.rows_with_notices += 1;
            report.stats.notices_emitted += notices.len() as u64;
        }
        report.notices.extend(notices);
    }

    report.stats.duration_ms = start_time.elapsed().as_millis() as u64;
    info!(
        "Checked {} rows: {} with notices, {} notices, {} failed in {}ms",
        report.stats.rows_checked,
        report.stats.rows_with_notices,
        report.stats.notices_emitted,
        report.stats.failed_rows,
        report.stats.duration_ms
    );
    Ok(report)
}

/// Notices at or above a priority, for quick triage
pub fn notices_at_or_above(report: &BatchReport, minimum_priority: u16) -> Vec<&Notice> {
    report.notices.iter().filter(|notice| notice.priority >= minimum_priority).collect()
}

/// Write the report as pretty JSON
pub async fn write_report(path: &Path, report: &BatchReport) -> Result<()> {
    let json = serde_json::to_vec_pretty(report)?;
    let file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
