//! Autosave
//!
//! Debounced persistence of the active document. The saver watches a
//! [`SharedHistory`](crate::history::SharedHistory) subscription, waits for a
//! quiet period after the last change and then writes the latest document.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::sync::watch;

use crate::history::ActiveDocument;
use crate::model::Document;

/// Default quiet period before a save
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Destination for saved documents
pub trait DocumentStore: Send + Sync + 'static {
    /// Create or overwrite the stored copy of `document`
    fn save(&self, document: Arc<Document>) -> impl Future<Output = Result<()>> + Send;

    /// Load a stored document; `Ok(None)` when nothing is stored under `id`
    fn load(&self, id: &str) -> impl Future<Output = Result<Option<Document>>> + Send;
}

/// One pretty-printed JSON file per document id
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a document id is stored at.
    ///
    /// ASCII letters, digits and `-` are kept; every other byte becomes
    /// `_XX` (upper-case hex), so distinct ids never share a file.
    pub fn path_for(&self, id: &str) -> PathBuf {
        if id.is_empty() {
            return self.dir.join("_empty.json");
        }
        let mut stem = String::with_capacity(id.len());
        for byte in id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                stem.push(char::from(byte));
            } else {
                stem.push_str(&format!("_{:02X}", byte));
            }
        }
        self.dir.join(format!("{}.json", stem))
    }
}

impl DocumentStore for FileStore {
    fn save(&self, document: Arc<Document>) -> impl Future<Output = Result<()>> + Send {
        let path = self.path_for(&document.id);
        let dir = self.dir.clone();
        async move {
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create autosave directory: {}", dir.display()))?;

            let content = document.to_json_pretty()?;
            // Written beside the target, then renamed into place
            let tmp = path.with_extension("json.tmp");
            tokio::fs::write(&tmp, content)
                .await
                .with_context(|| format!("Failed to write map file: {}", tmp.display()))?;
            tokio::fs::rename(&tmp, &path)
                .await
                .with_context(|| format!("Failed to replace map file: {}", path.display()))?;
            Ok(())
        }
    }

    fn load(&self, id: &str) -> impl Future<Output = Result<Option<Document>>> + Send {
        let path = self.path_for(id);
        let id = id.to_string();
        async move {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to read map file: {}", path.display()));
                }
            };
            let document = Document::from_json(&content)
                .with_context(|| format!("Invalid map file: {}", path.display()))?;
            if document.id != id {
                bail!(
                    "Map file {} holds map '{}', expected '{}'",
                    path.display(),
                    document.id,
                    id
                );
            }
            Ok(Some(document))
        }
    }
}

/// Outcome counters reported when the saver stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutosaveStats {
    pub saves: usize,
    pub failures: usize,
}

/// Debounced saver bound to one history subscription
pub struct Autosaver<S: DocumentStore> {
    store: S,
    updates: watch::Receiver<ActiveDocument>,
    debounce: Duration,
    last_saved: Option<Arc<Document>>,
    stats: AutosaveStats,
}

impl<S: DocumentStore> Autosaver<S> {
    pub fn new(store: S, updates: watch::Receiver<ActiveDocument>, debounce: Duration) -> Self {
        Self {
            store,
            updates,
            debounce,
            last_saved: None,
            stats: AutosaveStats::default(),
        }
    }

    /// Save until the history is dropped. A change still inside its
    /// debounce window at that point is flushed before returning.
    pub async fn run(mut self) -> AutosaveStats {
        while self.updates.changed().await.is_ok() {
            let open = self.wait_for_quiet().await;
            self.save_latest().await;
            if !open {
                break;
            }
        }
        log::debug!(
            "autosave stopped: {} saves, {} failures",
            self.stats.saves,
            self.stats.failures
        );
        self.stats
    }

    /// Returns `false` when the sender went away during the wait
    async fn wait_for_quiet(&mut self) -> bool {
        loop {
            match tokio::time::timeout(self.debounce, self.updates.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) => return false,
                Err(_) => return true,
            }
        }
    }

    async fn save_latest(&mut self) {
        let Some(document) = self.updates.borrow_and_update().clone() else {
            return;
        };
        if self
            .last_saved
            .as_ref()
            .is_some_and(|saved| Arc::ptr_eq(saved, &document))
        {
            return;
        }

        match self.store.save(Arc::clone(&document)).await {
            Ok(()) => {
                log::info!("Map '{}' auto-saved", document.id);
                self.stats.saves += 1;
                self.last_saved = Some(document);
            }
            Err(e) => {
                log::warn!("Failed to auto-save map '{}': {:#}", document.id, e);
                self.stats.failures += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_sanitizes_ids() {
        let store = FileStore::new("/tmp/maps");
        assert_eq!(store.path_for("abc-123"), PathBuf::from("/tmp/maps/abc-123.json"));
        assert_eq!(store.path_for("../etc"), PathBuf::from("/tmp/maps/_2E_2E_2Fetc.json"));
        assert_eq!(store.path_for("a_b"), PathBuf::from("/tmp/maps/a_5Fb.json"));
        assert_eq!(store.path_for("é"), PathBuf::from("/tmp/maps/_C3_A9.json"));
        assert_eq!(store.path_for(""), PathBuf::from("/tmp/maps/_empty.json"));
    }

    #[test]
    fn test_path_for_is_injective() {
        let store = FileStore::new("/tmp/maps");
        let ids = ["a.b", "a/b", "a_b", "a_2Eb", "a b", "_empty", ""];
        let paths: std::collections::HashSet<PathBuf> = ids.iter().map(|id| store.path_for(id)).collect();
        assert_eq!(paths.len(), ids.len());
    }
}
