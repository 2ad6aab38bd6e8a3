use crate::parser::eat_whitespace;
use nom::{bytes::complete::tag, character::complete::alpha1, IResult};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Visibility of a roll, named after the chat command that asked for it.
#[derive(
    Debug, PartialEq, Eq, Clone, Copy, EnumString, Display, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RollMode {
    Roll,
    GmRoll,
    BlindRoll,
    SelfRoll,
    PublicRoll,
}

impl RollMode {
    /// Rolls that only the GM (and perhaps the roller) should see.
    pub fn is_gm_roll(&self) -> bool {
        matches!(self, RollMode::GmRoll | RollMode::BlindRoll | RollMode::SelfRoll)
    }

    /// Map a command word (without the slash) to a roll mode. Each mode
    /// accepts its short and long spellings, e.g. `br`, `blindr`,
    /// `broll` and `blindroll`.
    pub fn from_command(word: &str) -> Option<RollMode> {
        match word.to_ascii_lowercase().as_str() {
            "r" | "roll" => Some(RollMode::Roll),
            "gmr" | "gmroll" => Some(RollMode::GmRoll),
            "br" | "broll" | "blindr" | "blindroll" => Some(RollMode::BlindRoll),
            "sr" | "sroll" | "selfr" | "selfroll" => Some(RollMode::SelfRoll),
            "pr" | "proll" | "publicr" | "publicroll" => Some(RollMode::PublicRoll),
            _ => None,
        }
    }
}

/// A roll command typed into chat: `/gmr 2s6 # sneaky`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ChatCommand {
    pub mode: RollMode,
    pub dice: String,
    pub comment: Option<String>,
}

/// Split a chat line into its command word and the rest of the line.
fn split_command(input: &str) -> IResult<&str, &str> {
    let (input, _) = eat_whitespace(input)?;
    let (input, _) = tag("/")(input)?;
    let (command_input, command) = alpha1(input)?;
    let (command_input, _) = tag(" ")(command_input)?;
    Ok((command_input, command))
}

/// Recognize a roll command on the first line of a chat message. Returns
/// none for ordinary chat and for commands that are not rolls.
pub fn parse_chat_command(message: &str) -> Option<ChatCommand> {
    let first_line = message.lines().next().unwrap_or("");
    let (rest, command) = split_command(first_line).ok()?;
    let mode = RollMode::from_command(command)?;

    let (dice, comment) = match rest.find('#') {
        Some(idx) => (&rest[..idx], Some(rest[idx + 1..].to_owned())),
        None => (rest, None),
    };

    if dice.is_empty() {
        return None;
    }

    Some(ChatCommand {
        mode,
        dice: dice.to_owned(),
        comment,
    })
}
