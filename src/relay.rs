//! Relays rolls between the host's chat and the IRC bot over a pub/sub
//! channel. Chat messages with dice become roll requests; roll results
//! coming back are rendered into chat messages.
pub mod channel;
pub mod command;
pub mod loopback;
pub mod outcome;
pub mod render;
pub mod request;
pub mod service;

/// Event carrying a [`request::RollRequest`] to the IRC bot.
pub const DO_ROLL_EVENT: &str = "client-do-roll-dice";

/// Event carrying a [`render::RollResult`] back from the IRC bot.
pub const ROLL_RESULT_EVENT: &str = "client-roll-dice-result";
