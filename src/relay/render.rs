use super::command::RollMode;
use super::outcome::Outcome;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// The bot echoes back whatever roll mode it was sent, which is an empty
/// string for rolls made outside of a roll command.
fn lenient_roll_mode<'de, D>(deserializer: D) -> Result<Option<RollMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let mode: Option<String> = Option::deserialize(deserializer)?;
    Ok(mode.and_then(|m| RollMode::from_str(&m).ok()))
}

/// Escape text from chat or the IRC bot for use in the chat card.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Payload of the roll result event sent back by the IRC bot.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default, deserialize_with = "lenient_roll_mode")]
    pub roll_mode: Option<RollMode>,

    /// Faces of the rolled die.
    pub die: u32,

    /// The roll as the user wrote it, when it differs from `roll`.
    #[serde(default)]
    pub base_roll: Option<String>,
    pub roll: String,

    /// One `(face, total with bonus)` pair per die.
    pub rolls: Vec<(u32, i64)>,

    #[serde(default)]
    pub user: Option<String>,
    pub nick: String,
}

/// A die of a roll result, with its display class.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DieRoll {
    pub outcome: Outcome,
    pub result: u32,
    pub total: i64,
}

impl DieRoll {
    pub fn css_class(&self) -> String {
        self.outcome.css_class()
    }
}

impl RollResult {
    pub fn dice(&self) -> Vec<DieRoll> {
        self.rolls
            .iter()
            .map(|&(result, total)| DieRoll {
                outcome: Outcome::classify(result, self.die),
                result,
                total,
            })
            .collect()
    }

    pub fn sum(&self) -> i64 {
        self.rolls.iter().map(|&(_, total)| total).sum()
    }

    /// Class of the overall total: that of the first notable die.
    pub fn total_class(&self) -> String {
        self.dice()
            .into_iter()
            .find(|die| die.outcome.is_notable())
            .map(|die| die.css_class())
            .unwrap_or_default()
    }

    /// The base roll, unless it is the same as the roll itself.
    pub fn distinct_base_roll(&self) -> Option<&str> {
        self.base_roll
            .as_deref()
            .filter(|base| !base.is_empty() && *base != self.roll)
    }

    fn reason_suffix(&self) -> String {
        match self.reason.as_deref() {
            Some(reason) if !reason.is_empty() => format!("[{}]", escape_html(reason)),
            _ => String::new(),
        }
    }

    /// The chat card for this result.
    pub fn render_html(&self) -> String {
        let reason = self.reason_suffix();
        let roll = escape_html(&self.roll);
        let formula = match self.distinct_base_roll() {
            Some(base) => format!("<div>{}{}</div><div>{}</div>", escape_html(base), reason, roll),
            None => format!("<div>{}{}</div>", roll, reason),
        };

        let dice: Vec<String> = self
            .dice()
            .iter()
            .map(|die| {
                format!(
                    "<li class=\"{}\"><span class=\"result\">{}</span> \
                     <span class=\"roll-flex paren-total\"><span class=\"paren\">(</span>\
                     <span class=\"total\">{}</span><span class=\"paren\">)</span></span></li>",
                    die.css_class(),
                    die.result,
                    die.total
                )
            })
            .collect();

        format!(
            "<div class=\"dice-roll\"><div class=\"dice-result\">\
             <div class=\"dice-formula\">{}</div>\
             <div class=\"dice-tooltip\"><section class=\"tooltip-part\">{}</section></div>\
             <h4 class=\"dice-total {}\"><div class=\"dice\"><ol class=\"dice-rolls\">{}</ol></div></h4>\
             </div></div>",
            formula,
            self.sum(),
            self.total_class(),
            dice.join("\n")
        )
    }
}

/// A chat message for the host to create.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ChatMessage {
    pub content: String,
    pub user: Option<String>,
    pub speaker_alias: String,
    pub roll_mode: Option<RollMode>,

    /// Users that can see the message; empty means everyone.
    pub whisper: Vec<String>,
}

impl ChatMessage {
    /// Build the chat message for a result. GM rolls are whispered to the
    /// active GM and the user who rolled.
    pub fn from_result(result: &RollResult, active_gm: Option<&str>) -> ChatMessage {
        let user = result.user.clone().filter(|u| !u.is_empty());
        let whisper = match (result.roll_mode, active_gm) {
            (Some(RollMode::GmRoll), Some(gm)) => std::iter::once(gm.to_owned())
                .chain(user.clone().filter(|u| u != gm))
                .collect(),
            _ => vec![],
        };

        ChatMessage {
            content: result.render_html(),
            user,
            speaker_alias: result.nick.clone(),
            roll_mode: result.roll_mode,
            whisper,
        }
    }

    /// Plain text fallback of the message, mentioning the speaker.
    pub fn message_plain(&self) -> String {
        format!(
            "{}:\n{}",
            self.speaker_alias,
            html2text::from_read(self.content.as_bytes(), 80)
        )
    }
}
