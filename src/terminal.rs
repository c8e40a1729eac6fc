// src/terminal.rs
//! Hosts the chat widget on a terminal: stdin lines are typed into the
//! input field and submitted with Enter, entries are printed as they land.
use std::{
    fmt::Debug,
    io::Write,
    sync::{Arc, Mutex, PoisonError},
};

use crossterm::style::Stylize;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::{
    events::{ChatWidget, Key, UiEvent},
    services::{
        chat_client::ChatBackend,
        input_handler::SendOutcome,
        transcript::{EntryStyle, Transcript, TranscriptEntry},
    },
    surface::{Alert, InputField, ScrollControl, TranscriptSink},
};

/// Prints every entry to stdout and keeps a copy for scrolling.
#[derive(Clone)]
pub struct TerminalTranscript {
    transcript: Transcript,
    out: Arc<Mutex<dyn Write + Send>>,
}

impl Debug for TerminalTranscript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalTranscript")
            .field("transcript", &self.transcript)
            .finish_non_exhaustive()
    }
}

impl Default for TerminalTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalTranscript {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            transcript: Transcript::new(),
            out: Arc::new(Mutex::new(out)),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

pub fn render(entry: &TranscriptEntry) -> String {
    let text = entry.text.as_str();
    match entry.style {
        EntryStyle::User => text.blue().to_string(),
        EntryStyle::Score => text.green().to_string(),
        EntryStyle::Feedback => text.magenta().to_string(),
        EntryStyle::Error => text.red().to_string(),
        EntryStyle::EvaluationHeader => text.bold().to_string(),
        EntryStyle::Bot => text.to_string(),
    }
}

impl TranscriptSink for TerminalTranscript {
    fn append(&self, entry: TranscriptEntry) {
        // printed under the transcript lock so stdout order matches
        self.transcript.push_then(entry, |stored| {
            let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
            let _ = writeln!(out, "{}", render(stored));
        });
    }
}

impl ScrollControl for TerminalTranscript {
    fn scroll_to_bottom(&self) {
        self.transcript.scroll_to_bottom();
        let _ = self.out.lock().unwrap_or_else(PoisonError::into_inner).flush();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalAlert;

impl Alert for TerminalAlert {
    fn alert(&self, message: &str) {
        eprintln!("{}", format!("⚠ {message}").yellow());
    }
}

/// Feed `reader` into the widget one line at a time until it runs dry,
/// then wait for every send still in flight. Returns the number of lines read.
pub async fn run<B, R>(
    widget: &ChatWidget<B>,
    input: &InputField,
    reader: R,
) -> std::io::Result<usize>
where
    B: ChatBackend,
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut pending: Vec<JoinHandle<SendOutcome>> = Vec::new();
    let mut count = 0;

    while let Some(line) = lines.next_line().await? {
        count += 1;
        input.set(line);

        let dispatch = widget.dispatch(UiEvent::KeyDown(Key::Enter));
        if let Some(send) = dispatch.send {
            pending.push(send);
        }
        pending.retain(|send| !send.is_finished());
    }

    debug!(pending = pending.len(), "input closed, waiting for replies");
    for send in pending {
        if let Err(err) = send.await {
            warn!(error = %err, "chat send task failed");
        }
    }

    Ok(count)
}
