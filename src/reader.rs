use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Configuration for document reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
    /// Drop a leading byte-order mark, which some editors add to USFM and TSV files
    pub strip_bom: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 8192, // WHY: 8KB is optimal for most filesystems and network storage
            strip_bom: true,
        }
    }
}

/// Statistics for one document read
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadStats {
    pub file_path: String,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
}

/// Async reader for USFM, story markdown and annotation TSV documents
#[derive(Debug, Clone, Default)]
pub struct DocumentReader {
    config: ReaderConfig,
}

impl DocumentReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a document line-by-line with async buffered I/O
    /// WHY: a document that cannot be read at all is an error for the caller to report,
    /// never an empty verse list
    pub async fn read_lines<P: AsRef<Path>>(&self, file_path: P) -> Result<(Vec<String>, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of document: {}", path.display());

        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open document {}", path.display()))?;

        // WHY: BufReader with custom buffer size reduces syscalls and improves throughput
        let reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut lines = reader.lines();
        let mut result_lines = Vec::new();
        let mut byte_count = 0u64;

        while let Some(line) = lines
            .next_line()
            .await
            .with_context(|| format!("UTF-8 decoding error in {} at line {}", path.display(), result_lines.len() + 1))?
        {
            byte_count += line.len() as u64 + 1; // +1 for newline
            let line = if result_lines.is_empty() && self.config.strip_bom && line.starts_with(BYTE_ORDER_MARK) {
                line[BYTE_ORDER_MARK.len_utf8()..].to_string()
            } else {
                line
            };
            result_lines.push(line);
        }

        let stats = ReadStats {
            file_path: path.display().to_string(),
            lines_read: result_lines.len() as u64,
            bytes_read: byte_count,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Read {}: {} lines, {} bytes in {}ms",
            path.display(),
            stats.lines_read,
            stats.bytes_read,
            stats.duration_ms
        );
        Ok((result_lines, stats))
    }

    /// Whole document as one string with `\n` line endings
    pub async fn read_to_string<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let (lines, stats) = self.read_lines(file_path).await?;
        Ok((lines.join("\n"), stats))
    }
}

/// Convenience function for reading a single document with default configuration
/// WHY: Simplifies common use case for integration tests and external callers
pub async fn read_document<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let (text, _stats) = DocumentReader::default().read_to_string(file_path).await?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    async fn create_test_file(dir: &Path, name: &str, content: &str) -> Result<std::path::PathBuf> {
        let file_path = dir.join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&file_path, content).await?;
        Ok(file_path)
    }

    #[tokio::test]
    async fn test_read_valid_document() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DocumentReader::new(ReaderConfig::default());

        let content = "\\id GEN\n\\c 1\n\\v 1 In the beginning";
        let file_path = create_test_file(temp_dir.path(), "01-GEN.usfm", content).await.unwrap();

        let (lines, stats) = reader.read_lines(&file_path).await.unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "\\id GEN");
        assert_eq!(lines[2], "\\v 1 In the beginning");
        assert_eq!(stats.lines_read, 3);
        assert!(stats.bytes_read > 0);
    }

    #[tokio::test]
    async fn test_read_empty_document() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DocumentReader::default();

        let file_path = create_test_file(temp_dir.path(), "empty.usfm", "").await.unwrap();
        let (lines, stats) = reader.read_lines(&file_path).await.unwrap();

        assert!(lines.is_empty());
        assert_eq!(stats.bytes_read, 0);
    }

    #[tokio::test]
    async fn test_read_missing_document_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DocumentReader::default();

        let result = reader.read_lines(temp_dir.path().join("nonexistent.usfm")).await;
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to open document"));
    }

    #[tokio::test]
    async fn test_byte_order_mark_stripped() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_file(temp_dir.path(), "bom.tsv", "\u{FEFF}Reference\tID\n1:1\tabcd").await.unwrap();

        let text = read_document(&file_path).await.unwrap();
        assert_eq!(text, "Reference\tID\n1:1\tabcd");

        let keep = DocumentReader::new(ReaderConfig { strip_bom: false, ..Default::default() });
        let (text, _) = keep.read_to_string(&file_path).await.unwrap();
        assert!(text.starts_with(BYTE_ORDER_MARK));
    }

    #[tokio::test]
    async fn test_unicode_content() {
        let temp_dir = TempDir::new().unwrap();
        let content = "\\v 1 בְּרֵאשִׁ֖ית בָּרָ֣א\n\\v 2 Ἐν ἀρχῇ ἦν ὁ λόγος";
        let file_path = create_test_file(temp_dir.path(), "mixed.usfm", content).await.unwrap();

        let (lines, _) = DocumentReader::default().read_lines(&file_path).await.unwrap();
        assert_eq!(lines[1], "\\v 2 Ἐν ἀρχῇ ἦν ὁ λόγος");
    }

    #[tokio::test]
    async fn test_custom_buffer_size() {
        let temp_dir = TempDir::new().unwrap();
        let reader = DocumentReader::new(ReaderConfig { buffer_size: 1024, ..Default::default() });

        // Create file larger than buffer
        let content = "x".repeat(2048) + "\n" + &"y".repeat(2048);
        let file_path = create_test_file(temp_dir.path(), "large.txt", &content).await.unwrap();

        let (lines, _) = reader.read_lines(&file_path).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].len(), 2048);
    }
}
