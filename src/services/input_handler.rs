// src/services/input_handler.rs
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    message::{Command, ServerReply},
    services::{
        chat_client::ChatBackend,
        transcript::{EntryStyle, TranscriptEntry},
    },
    surface::Surface,
};

pub const EMPTY_INPUT_ALERT: &str = "Please type a message.";
pub const EVALUATION_HEADER: &str = "Chat ended. Here is your evaluation:";
pub const EVALUATION_ERROR: &str = "Bot: An error occurred while processing your evaluation.";
pub const FALLBACK_REPLY: &str = "Bot: Something went wrong.";
pub const CONNECTION_ERROR: &str = "Error: Unable to connect to the server.";

/// What to do when a send arrives while another is still waiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendPolicy {
    /// Run it. Replies land in whatever order they arrive.
    #[default]
    Concurrent,
    /// Drop it, leaving the input untouched.
    SingleInFlight,
}

/// Which branch a send ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    EmptyInput,
    Busy,
    Replied,
    Fallback,
    Evaluated,
    EvaluationIncomplete,
    ConnectionFailed,
}

/// Counts a request as in flight until dropped.
#[derive(Debug)]
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A send that passed validation and already shows the user's line.
#[derive(Debug)]
pub struct PreparedSend {
    request_id: Uuid,
    raw: String,
    command: Command,
    _in_flight: InFlight,
}

impl PreparedSend {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn query(&self) -> &str {
        &self.raw
    }
}

pub struct ChatInputHandler<B> {
    backend: B,
    surface: Surface,
    policy: SendPolicy,
    in_flight: Arc<AtomicUsize>,
}

impl<B: ChatBackend> ChatInputHandler<B> {
    pub fn new(backend: B, surface: Surface) -> Self {
        Self {
            backend,
            surface,
            policy: SendPolicy::default(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_policy(mut self, policy: SendPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Requests currently waiting on the backend.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Send whatever is in the input field and render the reply.
    pub async fn send_message(&self) -> SendOutcome {
        match self.prepare() {
            Ok(prepared) => self.complete(prepared).await,
            Err(outcome) => outcome,
        }
    }

    /// Synchronous half of a send: read and validate the input, then show
    /// the user's line. Hosts that spawn the network half call this first so
    /// the input is captured before anything else can change it.
    pub fn prepare(&self) -> Result<PreparedSend, SendOutcome> {
        let raw = self.surface.input.value();
        if raw.trim().is_empty() {
            self.surface.alert.alert(EMPTY_INPUT_ALERT);
            return Err(SendOutcome::EmptyInput);
        }

        let in_flight = self.acquire().ok_or_else(|| {
            warn!("send ignored, previous message still waiting for a reply");
            SendOutcome::Busy
        })?;

        let request_id = Uuid::new_v4();
        let command = Command::parse(&raw);
        info!(%request_id, ?command, "sending chat message");

        self.append(request_id, EntryStyle::User, format!("You: {raw}"));

        Ok(PreparedSend {
            request_id,
            raw,
            command,
            _in_flight: in_flight,
        })
    }

    /// Network half of a send. Always ends scrolled down with an empty input.
    pub async fn complete(&self, prepared: PreparedSend) -> SendOutcome {
        let request_id = prepared.request_id;

        let outcome = match self.backend.send_query(&prepared.raw).await {
            Ok(reply) => self.render_reply(request_id, prepared.command, reply),
            Err(err) => {
                warn!(%request_id, error = %err, "chat request failed");
                self.append(request_id, EntryStyle::Error, CONNECTION_ERROR);
                SendOutcome::ConnectionFailed
            }
        };
        drop(prepared);

        self.surface.scroll.scroll_to_bottom();
        self.surface.input.clear();

        debug!(%request_id, ?outcome, "chat message finished");
        outcome
    }

    fn acquire(&self) -> Option<InFlight> {
        match self.policy {
            SendPolicy::Concurrent => {
                self.in_flight.fetch_add(1, Ordering::AcqRel);
            }
            SendPolicy::SingleInFlight => {
                self.in_flight
                    .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
                    .ok()?;
            }
        }
        Some(InFlight(Arc::clone(&self.in_flight)))
    }

    fn render_reply(&self, request_id: Uuid, command: Command, reply: ServerReply) -> SendOutcome {
        match command {
            Command::EndChat => match (reply.score, reply.feedback) {
                (Some(score), Some(feedback)) => {
                    self.append(request_id, EntryStyle::EvaluationHeader, EVALUATION_HEADER);
                    self.append(request_id, EntryStyle::Score, format!("⭐ Score: {score}/10"));
                    self.append(
                        request_id,
                        EntryStyle::Feedback,
                        format!("📌 Feedback: {feedback}"),
                    );
                    SendOutcome::Evaluated
                }
                _ => {
                    self.append(request_id, EntryStyle::Bot, EVALUATION_ERROR);
                    SendOutcome::EvaluationIncomplete
                }
            },
            Command::Message => match reply.response_text() {
                Some(response) => {
                    self.append(request_id, EntryStyle::Bot, format!("Bot: {response}"));
                    SendOutcome::Replied
                }
                None => {
                    self.append(request_id, EntryStyle::Bot, FALLBACK_REPLY);
                    SendOutcome::Fallback
                }
            },
        }
    }

    fn append(&self, request_id: Uuid, style: EntryStyle, text: impl Into<String>) {
        self.surface
            .transcript
            .append(TranscriptEntry::new(request_id, style, text));
    }
}
