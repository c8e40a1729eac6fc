// src/events.rs
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::services::{
    chat_client::ChatBackend,
    input_handler::{ChatInputHandler, SendOutcome},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Send,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Backspace,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Click(Control),
    /// Key pressed while the input field has focus.
    KeyDown(Key),
}

/// Result of routing one event.
#[derive(Debug, Default)]
pub struct Dispatch {
    /// The host must not apply the key's default action (Enter inserting a newline).
    pub default_prevented: bool,
    pub send: Option<JoinHandle<SendOutcome>>,
}

/// Binds UI events to the chat handler.
pub struct ChatWidget<B> {
    handler: Arc<ChatInputHandler<B>>,
}

impl<B> Clone for ChatWidget<B> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<B: ChatBackend> ChatWidget<B> {
    pub fn new(handler: ChatInputHandler<B>) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn handler(&self) -> &Arc<ChatInputHandler<B>> {
        &self.handler
    }

    /// Must be called from inside a tokio runtime.
    pub fn dispatch(&self, event: UiEvent) -> Dispatch {
        match event {
            UiEvent::Click(Control::Send) => Dispatch {
                default_prevented: false,
                send: Some(self.spawn_send()),
            },
            UiEvent::KeyDown(Key::Enter) => Dispatch {
                default_prevented: true,
                send: Some(self.spawn_send()),
            },
            _ => Dispatch::default(),
        }
    }

    fn spawn_send(&self) -> JoinHandle<SendOutcome> {
        // input is read now, the reply is awaited in the background
        match self.handler.prepare() {
            Ok(prepared) => {
                let handler = Arc::clone(&self.handler);
                tokio::spawn(async move { handler.complete(prepared).await })
            }
            Err(outcome) => tokio::spawn(std::future::ready(outcome)),
        }
    }
}
