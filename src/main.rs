use anyhow::Result;
use clap::{Parser, Subcommand};
use quote_locator::batch::{self, BatchConfig, BatchSource};
use quote_locator::reader::read_document;
use quote_locator::{CachingFetcher, CheckOptions, DirectoryFetcher, QuoteCheckRequest, QuoteChecker, Reference};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "quote-locator")]
#[command(about = "Locates original-language quotes in Bible and Open Bible Stories source texts")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

/// Options shared by both subcommands
#[derive(clap::Args, Debug)]
struct SourceArgs {
    /// Directory holding local repository clones (hbo_uhb, el-x-koine_ugnt, {lang}_obs)
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Language code of the annotations
    #[arg(long, default_value = "en")]
    language: String,

    /// Annotation repo code; TN uses the … divider, others use &
    #[arg(long, default_value = "TN2")]
    repo_code: String,

    /// Characters shown in notice excerpts
    #[arg(long, default_value_t = quote_locator::notice::DEFAULT_EXCERPT_LENGTH)]
    excerpt_length: usize,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a single quote
    Check {
        /// Reference such as "GEN 1:1" or "OBS 1:2"
        reference: String,

        /// The quote to locate
        quote: String,

        /// Occurrence: a positive number, or -1 for any later occurrence
        #[arg(long, default_value = "1")]
        occurrence: String,

        /// Check against this text instead of reading a source document
        #[arg(long)]
        source_text: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Check every quote in a tab-separated annotation file
    Batch {
        /// Annotation TSV file with Reference, ID, Quote and Occurrence columns
        tsv: PathBuf,

        /// Book the file annotates, e.g. GEN or OBS
        #[arg(long)]
        book: String,

        /// Abort on first error
        #[arg(long)]
        fail_fast: bool,

        /// Suppress console progress bars
        #[arg(long)]
        no_progress: bool,

        /// Rows checked concurrently (default: number of CPUs)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Report output file path
        #[arg(long, default_value = "quote_report.json")]
        report_out: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },
}

impl SourceArgs {
    fn options(&self) -> Result<CheckOptions> {
        let mut options = CheckOptions { excerpt_length: self.excerpt_length, ..Default::default() };
        if let Some(dir) = &self.source_dir {
            // WHY: validate source directory early to fail fast with clear error
            if !dir.is_dir() {
                anyhow::bail!("Source directory does not exist: {}", dir.display());
            }
            options.fetcher = Some(Arc::new(CachingFetcher::new(DirectoryFetcher::new(dir))));
        }
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging enables observability and debugging in production
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let checker = QuoteChecker::new()?;
    match args.command {
        Command::Check { reference, quote, occurrence, source_text, source } => {
            let reference: Reference = reference.parse()?;
            let mut options = source.options()?;
            options.source_text = source_text;
            let location = format!("in {reference}");
            let request = QuoteCheckRequest {
                language_code: &source.language,
                repo_code: &source.repo_code,
                field_name: "Quote",
                quote: &quote,
                occurrence: &occurrence,
                reference: &reference,
                location: &location,
            };
            let notices = checker.check(&request, &options).await?;
            println!("{}", serde_json::to_string_pretty(&notices)?);
        }
        Command::Batch { tsv, book, fail_fast, no_progress, concurrency, report_out, source } => {
            let options = source.options()?;
            let text = read_document(&tsv).await?;
            let table = batch::parse_annotation_rows(&text, &book)?;
            let config = BatchConfig {
                concurrency: concurrency.unwrap_or_else(num_cpus::get),
                fail_fast,
                show_progress: !no_progress,
            };
            let batch_source = BatchSource { language_code: &source.language, repo_code: &source.repo_code };
            let report = batch::check_rows(&checker, &table, batch_source, &options, &config).await?;
            batch::write_report(&report_out, &report).await?;

            println!("quote-locator v{} - {}", env!("CARGO_PKG_VERSION"), tsv.display());
            println!("  Rows checked: {}", report.stats.rows_checked);
            println!("  Rows with notices: {}", report.stats.rows_with_notices);
            println!("  Notices: {}", report.stats.notices_emitted);
            if report.stats.failed_rows > 0 {
                println!("  Failed rows: {}", report.stats.failed_rows);
            }
            println!("  Report written to {}", report_out.display());
        }
    }
    Ok(())
}
