// src/surface.rs
//! Seams between the chat handler and whatever displays it.
//!
//! The handler never looks anything up by id. A host builds a [`Surface`]
//! from its own widgets and hands it over, tests build one from fakes.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::services::transcript::TranscriptEntry;

/// Text field the user types into.
pub trait InputSource: Send + Sync {
    fn value(&self) -> String;
    fn clear(&self);
}

pub trait TranscriptSink: Send + Sync {
    fn append(&self, entry: TranscriptEntry);
}

pub trait ScrollControl: Send + Sync {
    fn scroll_to_bottom(&self);
}

/// Blocking user notice, used for the empty-input rejection.
pub trait Alert: Send + Sync {
    fn alert(&self, message: &str);
}

#[derive(Clone)]
pub struct Surface {
    pub input: Arc<dyn InputSource>,
    pub transcript: Arc<dyn TranscriptSink>,
    pub scroll: Arc<dyn ScrollControl>,
    pub alert: Arc<dyn Alert>,
}

impl Surface {
    pub fn new(
        input: Arc<dyn InputSource>,
        transcript: Arc<dyn TranscriptSink>,
        scroll: Arc<dyn ScrollControl>,
        alert: Arc<dyn Alert>,
    ) -> Self {
        Self { input, transcript, scroll, alert }
    }
}

/// In-memory input field shared between a host and the handler.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    value: Arc<Mutex<String>>,
}

impl InputField {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.lock() = text.into();
    }
}

impl InputSource for InputField {
    fn value(&self) -> String {
        self.lock().clone()
    }

    fn clear(&self) {
        self.lock().clear();
    }
}
