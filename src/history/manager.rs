//! History Manager
//!
//! Bounded linear undo/redo over whole-document snapshots.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Deserialize;

use crate::model::Document;

/// Default number of snapshots retained
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// What a commit does when the history is already full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Drop the oldest snapshot and keep the cursor on the newest entry
    #[default]
    EvictOldest,
    /// Leave stored history and cursor untouched; only the active
    /// document changes (matches the web editor's store)
    FreezeWindow,
}

/// Undo/redo history for one open document
#[derive(Debug, Clone)]
pub struct HistoryManager {
    snapshots: VecDeque<Arc<Document>>,
    cursor: Option<usize>,
    active: Option<Arc<Document>>,
    selected_id: Option<String>,
    limit: usize,
    overflow: OverflowPolicy,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT, OverflowPolicy::default())
    }

    /// A zero limit is raised to one so the active snapshot always fits
    pub fn with_limit(limit: usize, overflow: OverflowPolicy) -> Self {
        Self {
            snapshots: VecDeque::new(),
            cursor: None,
            active: None,
            selected_id: None,
            limit: limit.max(1),
            overflow,
        }
    }

    /// Replace the active document and record it as a new snapshot
    pub fn set_document(&mut self, document: Document) {
        log::debug!("set_document: {}", document.id);
        self.commit(Arc::new(document));
    }

    /// Apply `updater` to the active document and commit the result.
    ///
    /// Returns `false` without recording anything when no document is loaded.
    pub fn update_document<F>(&mut self, updater: F) -> bool
    where
        F: FnOnce(&Document) -> Document,
    {
        let Some(current) = self.active.clone() else {
            log::debug!("update_document ignored: no active document");
            return false;
        };
        self.commit(Arc::new(updater(&current)));
        true
    }

    /// Fallible variant of [`HistoryManager::update_document`]. An error from
    /// `updater` leaves the history untouched.
    pub fn try_update_document<F, E>(&mut self, updater: F) -> Result<bool, E>
    where
        F: FnOnce(&Document) -> Result<Document, E>,
    {
        let Some(current) = self.active.clone() else {
            log::debug!("try_update_document ignored: no active document");
            return Ok(false);
        };
        let next = updater(&current)?;
        self.commit(Arc::new(next));
        Ok(true)
    }

    /// Step back one snapshot. Returns whether the cursor moved.
    pub fn undo(&mut self) -> bool {
        match self.cursor {
            Some(index) if index > 0 => {
                self.move_to(index - 1);
                true
            }
            _ => false,
        }
    }

    /// Step forward one snapshot. Returns whether the cursor moved.
    pub fn redo(&mut self) -> bool {
        match self.cursor {
            Some(index) if index + 1 < self.snapshots.len() => {
                self.move_to(index + 1);
                true
            }
            _ => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|index| index > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor
            .is_some_and(|index| index + 1 < self.snapshots.len())
    }

    /// Set or clear the selected node. Not validated against the tree.
    pub fn select(&mut self, id: Option<String>) {
        self.selected_id = id;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn document(&self) -> Option<&Document> {
        self.active.as_deref()
    }

    /// Shared handle to the active snapshot
    pub fn document_arc(&self) -> Option<Arc<Document>> {
        self.active.clone()
    }

    /// Index of the active snapshot; `None` while history is empty
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Stored snapshots, oldest first
    pub fn snapshots(&self) -> impl Iterator<Item = &Document> + '_ {
        self.snapshots.iter().map(|doc| doc.as_ref())
    }

    fn move_to(&mut self, index: usize) {
        self.cursor = Some(index);
        self.active = self.snapshots.get(index).cloned();
        log::debug!("history cursor -> {}/{}", index, self.snapshots.len());
    }

    /// Truncate redo entries, append, then enforce the limit
    fn commit(&mut self, document: Arc<Document>) {
        let keep = self.cursor.map_or(0, |index| index + 1);

        if keep + 1 > self.limit && self.overflow == OverflowPolicy::FreezeWindow {
            log::debug!("history full ({}), snapshot not recorded", self.limit);
            self.active = Some(document);
            return;
        }

        self.snapshots.truncate(keep);
        self.snapshots.push_back(Arc::clone(&document));
        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }

        self.cursor = Some(self.snapshots.len() - 1);
        self.active = Some(document);
    }
}
