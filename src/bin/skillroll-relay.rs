use async_trait::async_trait;
use futures::try_join;
use log::{error, info};
use skillroll::config::{read_config, Config};
use skillroll::error::{RelayError, SkillRollError};
use skillroll::parser::expression::RollParser;
use skillroll::relay::channel::{LocalChannel, RollChannel};
use skillroll::relay::loopback::Loopback;
use skillroll::relay::render::ChatMessage;
use skillroll::relay::service::{ChatSink, RollRelay};
use std::env;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::filter::EnvFilter;

/// Prints chat messages to stdout as plain text.
struct StdoutSink {
    gm: Option<String>,
}

#[async_trait]
impl ChatSink for StdoutSink {
    async fn create_message(&self, message: ChatMessage) -> Result<(), RelayError> {
        if !message.whisper.is_empty() {
            println!("(whispered to {})", message.whisper.join(", "));
        }

        println!("{}", message.message_plain().trim());
        Ok(())
    }

    fn active_gm(&self) -> Option<String> {
        self.gm.clone()
    }
}

#[tokio::main]
async fn main() -> Result<(), SkillRollError> {
    let filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("skillroll=info,skillroll_relay=info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run().await {
        Ok(_) => (),
        Err(e) => error!("Error: {}", e),
    }

    Ok(())
}

/// Relay every line typed on stdin as a chat message from the local
/// user. Rolls are answered by the loopback roller.
async fn chat(
    relay: &RollRelay<LocalChannel, StdoutSink>,
    cfg: &Config,
    channel: &LocalChannel,
) -> Result<(), SkillRollError> {
    let mut lines = BufReader::new(io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match relay.on_chat_message(&line, cfg.relay_user(), cfg.relay_alias()).await {
            Ok(Some(_)) => (),
            Ok(None) => println!("{}: {}", cfg.relay_alias(), line),
            Err(e) => error!("Could not relay message: {}", e),
        }
    }

    info!("End of input, closing {}", channel.name());
    channel.unsubscribe();
    Ok(())
}

async fn run() -> Result<(), SkillRollError> {
    let config_path = env::args().nth(1).ok_or(SkillRollError::MissingConfig)?;
    let cfg = read_config(config_path)?;

    let channel = Arc::new(LocalChannel::subscribe(cfg.relay_channel(), cfg.event_capacity()));
    let sink = Arc::new(StdoutSink {
        gm: Some(cfg.relay_user().to_owned()),
    });

    let relay = RollRelay::new(channel.clone(), sink, cfg.irc(), cfg.relay_user());
    let loopback = Loopback::new(channel.clone(), RollParser::default());

    let results = async { relay.run().await.map_err(SkillRollError::from) };
    let answers = async { loopback.run().await.map_err(SkillRollError::from) };
    try_join!(results, answers, chat(&relay, &cfg, &channel))?;
    Ok(())
}
