// WHY: Fetching is a collaborator so checks run against local clones, caches or test doubles
// The checker only ever sees document text, never where it came from

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::reader::DocumentReader;

/// Identifies one source document in a content repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FetchRequest {
    pub username: String,
    pub repository: String,
    /// Path within the repository, e.g. `01-GEN.usfm` or `content/07.md`
    pub path: String,
    pub branch: String,
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}@{}", self.username, self.repository, self.path, self.branch)
    }
}

/// Source of raw document text
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Full text of the requested document, or an error describing why it is unavailable
    async fn fetch(&self, request: &FetchRequest) -> Result<Arc<str>>;
}

/// Reads documents from local repository clones laid out as `{root}/{repository}/{path}`
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
    reader: DocumentReader,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), reader: DocumentReader::default() }
    }

    pub fn with_reader(mut self, reader: DocumentReader) -> Self {
        self.reader = reader;
        self
    }

    /// Local path for a request; username and branch select nothing in a plain checkout
    pub fn path_for(&self, request: &FetchRequest) -> PathBuf {
        self.root.join(&request.repository).join(&request.path)
    }
}

#[async_trait]
impl DocumentFetcher for DirectoryFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Arc<str>> {
        let path = self.path_for(request);
        let (text, stats) = self.reader.read_to_string(&path).await?;
        debug!("Fetched {} ({} lines)", request, stats.lines_read);
        Ok(Arc::from(text))
    }
}

type CacheSlot = Arc<OnceCell<Arc<str>>>;

/// Memoizes another fetcher so each document is fetched at most once, even under concurrency
pub struct CachingFetcher<F> {
    inner: F,
    documents: Mutex<HashMap<FetchRequest, CacheSlot>>,
}

impl<F: DocumentFetcher> CachingFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self { inner, documents: Mutex::new(HashMap::new()) }
    }

    /// Number of documents requested so far (fetched or in flight)
    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Forget every cached document
    pub async fn clear(&self) {
        self.documents.lock().await.clear();
    }
}

#[async_trait]
impl<F: DocumentFetcher> DocumentFetcher for CachingFetcher<F> {
    async fn fetch(&self, request: &FetchRequest) -> Result<Arc<str>> {
        // WHY: the map lock is held only to find the slot; the fetch itself runs outside it
        let slot = {
            let mut documents = self.documents.lock().await;
            documents.entry(request.clone()).or_default().clone()
        };
        let text = slot.get_or_try_init(|| self.inner.fetch(request)).await?;
        Ok(Arc::clone(text))
    }
}

impl<F> fmt::Debug for CachingFetcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingFetcher").finish_non_exhaustive()
    }
}
