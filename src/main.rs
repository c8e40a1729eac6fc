use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_widget::{
    config::{CliArgs, WidgetConfig},
    events::ChatWidget,
    services::{chat_client::HttpChatClient, input_handler::ChatInputHandler},
    surface::{InputField, Surface},
    terminal::{self, TerminalAlert, TerminalTranscript},
};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = WidgetConfig::from_args(&args).context("invalid configuration")?;
    let client = HttpChatClient::from_config(&config).context("failed to build HTTP client")?;
    info!(endpoint = %client.endpoint(), policy = ?config.policy, "chat widget starting");

    let input = InputField::new();
    let transcript = Arc::new(TerminalTranscript::new());
    let surface = Surface::new(
        Arc::new(input.clone()),
        transcript.clone(),
        transcript,
        Arc::new(TerminalAlert),
    );
    let widget = ChatWidget::new(ChatInputHandler::new(client, surface).with_policy(config.policy));

    println!("💬 Chat widget connected to {}", config.endpoint);
    println!("Type a message and press Enter. Type 'end chat' to get your evaluation.");

    let lines = terminal::run(&widget, &input, BufReader::new(tokio::io::stdin()))
        .await
        .context("failed to read from stdin")?;

    info!(lines, "input closed");
    Ok(())
}
