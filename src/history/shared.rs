//! Shared History Handle
//!
//! Puts a [`HistoryManager`] behind one async mutex so the snapshot list,
//! cursor and active document always change together, and publishes the
//! active document on a watch channel for observers such as autosave.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use super::manager::HistoryManager;
use crate::model::Document;

/// Value observers receive: the active document, if any
pub type ActiveDocument = Option<Arc<Document>>;

/// Cloneable handle to one editor session's history
#[derive(Debug, Clone)]
pub struct SharedHistory {
    inner: Arc<Mutex<HistoryManager>>,
    publisher: Arc<watch::Sender<ActiveDocument>>,
}

impl SharedHistory {
    pub fn new(manager: HistoryManager) -> Self {
        let (publisher, _) = watch::channel(manager.document_arc());
        Self {
            inner: Arc::new(Mutex::new(manager)),
            publisher: Arc::new(publisher),
        }
    }

    /// Receive the active document every time it changes.
    ///
    /// Observers only ever see the latest value; intermediate documents
    /// committed between two reads are skipped.
    pub fn subscribe(&self) -> watch::Receiver<ActiveDocument> {
        self.publisher.subscribe()
    }

    pub async fn set_document(&self, document: Document) {
        let mut history = self.inner.lock().await;
        history.set_document(document);
        self.publish(&history);
    }

    pub async fn update_document<F>(&self, updater: F) -> bool
    where
        F: FnOnce(&Document) -> Document,
    {
        let mut history = self.inner.lock().await;
        let committed = history.update_document(updater);
        self.publish(&history);
        committed
    }

    pub async fn try_update_document<F, E>(&self, updater: F) -> Result<bool, E>
    where
        F: FnOnce(&Document) -> Result<Document, E>,
    {
        let mut history = self.inner.lock().await;
        let committed = history.try_update_document(updater)?;
        self.publish(&history);
        Ok(committed)
    }

    pub async fn undo(&self) -> bool {
        let mut history = self.inner.lock().await;
        let moved = history.undo();
        self.publish(&history);
        moved
    }

    pub async fn redo(&self) -> bool {
        let mut history = self.inner.lock().await;
        let moved = history.redo();
        self.publish(&history);
        moved
    }

    pub async fn can_undo(&self) -> bool {
        self.inner.lock().await.can_undo()
    }

    pub async fn can_redo(&self) -> bool {
        self.inner.lock().await.can_redo()
    }

    pub async fn select(&self, id: Option<String>) {
        self.inner.lock().await.select(id);
    }

    pub async fn selected_id(&self) -> Option<String> {
        self.inner.lock().await.selected_id().map(str::to_string)
    }

    pub async fn document(&self) -> ActiveDocument {
        self.inner.lock().await.document_arc()
    }

    /// Run `f` against the manager while holding the lock
    pub async fn inspect<R>(&self, f: impl FnOnce(&HistoryManager) -> R) -> R {
        f(&*self.inner.lock().await)
    }

    fn publish(&self, history: &HistoryManager) {
        let next = history.document_arc();
        self.publisher.send_if_modified(|current| {
            let changed = match (current.as_ref(), next.as_ref()) {
                (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
                (None, None) => false,
                _ => true,
            };
            if changed {
                *current = next;
            }
            changed
        });
    }
}

impl Default for SharedHistory {
    fn default() -> Self {
        Self::new(HistoryManager::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn doc(topic: &str) -> Document {
        Document::new("m1", "Shared", Node::new("root", topic))
    }

    #[tokio::test]
    async fn test_publishes_on_commit_and_undo() {
        let shared = SharedHistory::default();
        let mut rx = shared.subscribe();
        assert!(rx.borrow().is_none());

        shared.set_document(doc("a")).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().root.topic, "a");

        shared
            .update_document(|d| {
                let mut next = d.clone();
                next.root.topic = "b".to_string();
                next
            })
            .await;
        shared.undo().await;
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().root.topic, "a");
    }

    #[tokio::test]
    async fn test_noops_do_not_notify() {
        let shared = SharedHistory::default();
        let mut rx = shared.subscribe();

        assert!(!shared.update_document(|d| d.clone()).await);
        assert!(!shared.undo().await);
        shared.select(Some("n1".to_string())).await;
        assert!(!rx.has_changed().unwrap());

        assert_eq!(shared.selected_id().await.as_deref(), Some("n1"));
        assert!(shared.inspect(|h| h.is_empty()).await);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_serialized() {
        let shared = SharedHistory::default();
        shared.set_document(doc("0")).await;

        let mut tasks = Vec::new();
        for _ in 0..20 {
            let handle = shared.clone();
            tasks.push(tokio::spawn(async move {
                handle
                    .update_document(|d| {
                        let mut next = d.clone();
                        let n: u32 = next.root.topic.parse().unwrap_or(0);
                        next.root.topic = (n + 1).to_string();
                        next
                    })
                    .await
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap());
        }

        let current = shared.document().await.unwrap();
        assert_eq!(current.root.topic, "20");
        assert_eq!(shared.inspect(|h| h.len()).await, 21);
    }
}
