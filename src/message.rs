// src/message.rs
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Input that asks the service to close the session and score it.
pub const END_CHAT_COMMAND: &str = "end chat";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

/// Reply from the chat service.
///
/// The service never tags which shape it sent, so every field is optional
/// and the caller decides what to look at from its own [`Command`]. A key
/// that is sent counts as present whatever its value, `null` included.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerReply {
    #[serde(default, deserialize_with = "present")]
    pub response: Option<Field>,
    #[serde(default, deserialize_with = "present")]
    pub score: Option<Field>,
    #[serde(default, deserialize_with = "present")]
    pub feedback: Option<Field>,
    /// Sent alongside 4xx/5xx statuses. Logged, never shown.
    #[serde(default, deserialize_with = "present")]
    pub error: Option<Field>,
}

impl ServerReply {
    /// Bot text, if the service sent a usable one.
    pub fn response_text(&self) -> Option<String> {
        self.response
            .as_ref()
            .filter(|field| field.is_truthy())
            .map(Field::to_string)
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Field>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| Some(Field(value)))
}

/// One reply field, kept as whatever JSON the service put there.
///
/// Displays the way a browser interpolates the value into text: strings
/// bare, numbers without a trailing `.0`, `null`/`true`/`false` spelled out.
#[derive(Debug, Clone, PartialEq)]
pub struct Field(pub Value);

impl Field {
    /// `null`, `false`, `0` and `""` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match &self.0 {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

impl From<String> for Field {
    fn from(text: String) -> Self {
        Field(Value::String(text))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, &self.0)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::String(s) => f.write_str(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                write!(f, "{i}")
            } else if let Some(u) = n.as_u64() {
                write!(f, "{u}")
            } else {
                // f64 Display already drops the `.0` of whole numbers
                write!(f, "{}", n.as_f64().unwrap_or_default())
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                if !item.is_null() {
                    write_value(f, item)?;
                }
            }
            Ok(())
        }
        Value::Object(_) => f.write_str("[object Object]"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Regular chat turn, expects `response`.
    Message,
    /// `end chat`, expects `score` and `feedback`.
    EndChat,
}

impl Command {
    pub fn parse(input: &str) -> Self {
        if input.trim().to_lowercase() == END_CHAT_COMMAND {
            Command::EndChat
        } else {
            Command::Message
        }
    }
}
