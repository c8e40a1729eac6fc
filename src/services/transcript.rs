// src/services/transcript.rs
use std::{
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Instant,
};

use uuid::Uuid;

use crate::surface::{ScrollControl, TranscriptSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryStyle {
    User,
    Bot,
    EvaluationHeader,
    Score,
    Feedback,
    Error,
}

/// One rendered line of the conversation. Never modified once appended.
#[derive(Clone, Debug)]
pub struct TranscriptEntry {
    pub text: String,
    pub style: EntryStyle,
    /// Send that produced this entry.
    pub request_id: Uuid,
    pub timestamp: Instant,
}

impl TranscriptEntry {
    pub fn new(request_id: Uuid, style: EntryStyle, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style,
            request_id,
            timestamp: Instant::now(),
        }
    }
}

#[derive(Default)]
struct Inner {
    entries: Vec<TranscriptEntry>,
    scroll_top: usize,
}

/// Append-only transcript with a scroll position measured in entries.
#[derive(Clone, Default)]
pub struct Transcript {
    inner: Arc<Mutex<Inner>>,
}

impl Debug for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let guard = self.lock();
        f.debug_struct("Transcript")
            .field("len", &guard.entries.len())
            .field("scroll_top", &guard.scroll_top)
            .finish()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // a panicking writer cannot leave a half-pushed entry behind
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry and return the new length.
    pub fn push(&self, entry: TranscriptEntry) -> usize {
        let mut guard = self.lock();
        guard.entries.push(entry);
        guard.entries.len()
    }

    /// Append an entry and show the stored copy to `on_stored` while still
    /// holding the lock, so observers see entries in transcript order.
    pub fn push_then(
        &self,
        entry: TranscriptEntry,
        on_stored: impl FnOnce(&TranscriptEntry),
    ) -> usize {
        let mut guard = self.lock();
        guard.entries.push(entry);
        if let Some(stored) = guard.entries.last() {
            on_stored(stored);
        }
        guard.entries.len()
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.lock().entries.clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.lock().entries.iter().map(|e| e.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn scroll_height(&self) -> usize {
        self.len()
    }

    pub fn scroll_top(&self) -> usize {
        self.lock().scroll_top
    }

    pub fn is_scrolled_to_bottom(&self) -> bool {
        let guard = self.lock();
        guard.scroll_top == guard.entries.len()
    }
}

impl TranscriptSink for Transcript {
    fn append(&self, entry: TranscriptEntry) {
        self.push(entry);
    }
}

impl ScrollControl for Transcript {
    fn scroll_to_bottom(&self) {
        let mut guard = self.lock();
        guard.scroll_top = guard.entries.len();
    }
}
