// src/config.rs
use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::error::ConfigError;
use crate::services::input_handler::SendPolicy;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/response";

/// Command-line flags. Each one falls back to an environment variable,
/// which `main` may have populated from a `.env` file first.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "chat-widget",
    version,
    about = "💬 Terminal chat widget for a remote chat/evaluation service",
    long_about = "Type a message and press Enter to send it. \
                  Type 'end chat' to close the session and receive your score and feedback."
)]
pub struct CliArgs {
    /// URL the chat messages are POSTed to.
    #[arg(long, env = "CHAT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Give up on a reply after this many seconds (0 or unset waits forever).
    #[arg(long, env = "CHAT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Ignore sends while a previous message is still waiting for its reply.
    #[arg(long, env = "CHAT_SINGLE_IN_FLIGHT")]
    pub single_in_flight: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub endpoint: Url,
    pub timeout: Option<Duration>,
    pub policy: SendPolicy,
}

impl WidgetConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            timeout: None,
            policy: SendPolicy::default(),
        }
    }

    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::new(parse_endpoint(&args.endpoint)?);
        config.timeout = args
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        if args.single_in_flight {
            config.policy = SendPolicy::SingleInFlight;
        }
        Ok(config)
    }
}

pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
