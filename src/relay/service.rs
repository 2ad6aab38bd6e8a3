use super::channel::RollChannel;
use super::render::{ChatMessage, RollResult};
use super::request::RollRequest;
use super::{DO_ROLL_EVENT, ROLL_RESULT_EVENT};
use crate::config::IrcSettings;
use crate::error::RelayError;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use log::{debug, error, info};
use serde_json::Value;
use std::sync::Arc;
use substring::Substring;

/// Where rendered roll results end up: the host's chat log.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn create_message(&self, message: ChatMessage) -> Result<(), RelayError>;

    /// User id of the GM currently present, if any.
    fn active_gm(&self) -> Option<String>;
}

/// Relays dice in chat to the IRC bot and posts the results it sends
/// back. Only messages written by the local user are relayed, so each
/// roll is sent once no matter how many clients are connected.
pub struct RollRelay<C: RollChannel, S: ChatSink> {
    channel: Arc<C>,
    sink: Arc<S>,
    irc: IrcSettings,
    local_user: String,
}

impl<C: RollChannel, S: ChatSink> RollRelay<C, S> {
    pub fn new(channel: Arc<C>, sink: Arc<S>, irc: IrcSettings, local_user: &str) -> RollRelay<C, S> {
        RollRelay {
            channel,
            sink,
            irc,
            local_user: local_user.to_owned(),
        }
    }

    /// Native rolls are hidden from chat while the relay is connected,
    /// since the IRC bot's result replaces them.
    pub fn hides_native_rolls(&self, is_roll: bool) -> bool {
        is_roll && self.channel.is_subscribed()
    }

    /// Handle a chat message written by `author` speaking as `alias`.
    /// Returns the request that was sent, if any.
    pub async fn on_chat_message(
        &self,
        message: &str,
        author: &str,
        alias: &str,
    ) -> Result<Option<RollRequest>, RelayError> {
        if author != self.local_user {
            return Ok(None);
        }

        let request = match RollRequest::from_chat(message, author, alias, &self.irc) {
            Some(request) => request,
            None => return Ok(None),
        };

        info!("Relaying roll from {}: {}", alias, request.roll.substring(0, 30));
        let payload = serde_json::to_value(&request)?;
        self.channel.trigger(DO_ROLL_EVENT, payload).await?;
        Ok(Some(request))
    }

    /// Post a roll result to chat.
    pub async fn handle_result(&self, result: RollResult) -> Result<(), RelayError> {
        debug!("Received roll result for {}: {:?}", result.nick, result.rolls);
        let gm = self.sink.active_gm();
        let message = ChatMessage::from_result(&result, gm.as_deref());
        self.sink.create_message(message).await
    }

    /// Listen for roll results until the channel closes.
    pub async fn run(&self) -> Result<(), RelayError> {
        info!("Listening for roll results on {}", self.channel.name());
        self.process_results(self.channel.bind(ROLL_RESULT_EVENT)).await;
        info!("Channel {} closed", self.channel.name());
        Ok(())
    }

    /// Post every result payload of `results`. Bad payloads and failed
    /// messages are logged and skipped.
    pub async fn process_results(&self, mut results: BoxStream<'_, Value>) {
        while let Some(payload) = results.next().await {
            let result = match serde_json::from_value::<RollResult>(payload) {
                Ok(result) => result,
                Err(e) => {
                    error!("Malformed roll result: {}", e);
                    continue;
                }
            };

            if let Err(e) = self.handle_result(result).await {
                error!("Error posting roll result: {}", e);
            }
        }
    }
}
