use super::command::{parse_chat_command, RollMode};
use crate::config::IrcSettings;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// First `[count](s|d)<die>[(+|-)bonus][[reason]]` in a chat message.
    static ref CHAT_DICE: Regex = Regex::new(
        r"(?i)(?P<amount>\d*)(?P<kind>s|d)(?P<die>\d+)((?P<operator>[+\-])(?P<bonus>[1-9]\d*))?(\[(?P<reason>.*)\])?"
    )
    .expect("chat dice pattern is valid");
}

/// Payload of the roll request event sent to the IRC bot.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequest {
    pub roll_mode: Option<RollMode>,
    pub gm_roll: bool,

    /// IRC channel for public rolls, the GM's nick otherwise.
    pub target: String,
    pub nick: String,
    pub user: String,

    /// Normalized roll text, e.g. `2s6+3 dodge`.
    pub roll: String,
}

/// Rebuild the dice found in `message` as the IRC bot's roll syntax.
pub fn extract_roll(message: &str) -> Option<String> {
    let caps = CHAT_DICE.captures(message)?;
    let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or("");

    let amount = match group("amount") {
        "" => "1",
        amount => amount,
    };

    let mut roll = format!(
        "{}{}{}{}{}",
        amount,
        group("kind"),
        group("die"),
        group("operator"),
        group("bonus")
    );

    let reason = group("reason");
    if !reason.is_empty() {
        roll.push(' ');
        roll.push_str(reason);
    }

    Some(roll)
}

impl RollRequest {
    /// Build the request for a chat message written by `user` speaking
    /// as `nick`. Any message with dice in it is relayed; a roll command
    /// only decides the roll mode and whether the GM alone sees it.
    /// Nothing is relayed until both IRC settings are filled in.
    pub fn from_chat(message: &str, user: &str, nick: &str, irc: &IrcSettings) -> Option<RollRequest> {
        if !irc.is_complete() {
            return None;
        }

        let roll = extract_roll(message)?;
        let roll_mode = parse_chat_command(message).map(|command| command.mode);
        let gm_roll = roll_mode.map_or(false, |mode| mode.is_gm_roll());
        let target = if gm_roll { &irc.gm_nickname } else { &irc.channel };

        Some(RollRequest {
            roll_mode,
            gm_roll,
            target: target.clone(),
            nick: nick.to_owned(),
            user: user.to_owned(),
            roll,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn irc() -> IrcSettings {
        IrcSettings::new("#returners", "gm")
    }

    #[test]
    fn extract_full_roll_test() {
        assert_eq!(Some("2s6+3 dodge".to_owned()), extract_roll("/r 2s6+3[dodge]"));
    }

    #[test]
    fn extract_defaults_amount_test() {
        assert_eq!(Some("1s4".to_owned()), extract_roll("/r s4"));
        assert_eq!(Some("1D20-2".to_owned()), extract_roll("attack D20-2 now"));
    }

    #[test]
    fn extract_ignores_zero_bonus_test() {
        assert_eq!(Some("3d6".to_owned()), extract_roll("3d6+0"));
    }

    #[test]
    fn extract_no_dice_test() {
        assert_eq!(None, extract_roll("hello there"));
        assert_eq!(None, extract_roll("/r 42"));
    }

    #[test]
    fn public_roll_goes_to_channel_test() {
        let request = RollRequest::from_chat("/r 2s6[dodge]", "user-1", "Terra", &irc()).unwrap();
        assert_eq!(
            RollRequest {
                roll_mode: Some(RollMode::Roll),
                gm_roll: false,
                target: "#returners".to_owned(),
                nick: "Terra".to_owned(),
                user: "user-1".to_owned(),
                roll: "2s6 dodge".to_owned(),
            },
            request
        );
    }

    #[test]
    fn gm_roll_goes_to_gm_test() {
        let request = RollRequest::from_chat("/blindroll 1s10", "user-1", "Terra", &irc()).unwrap();
        assert_eq!(Some(RollMode::BlindRoll), request.roll_mode);
        assert!(request.gm_roll);
        assert_eq!("gm", request.target);
    }

    #[test]
    fn plain_chat_with_dice_test() {
        let request = RollRequest::from_chat("I swing for 2s8", "user-1", "Terra", &irc()).unwrap();
        assert_eq!(None, request.roll_mode);
        assert!(!request.gm_roll);
        assert_eq!("2s8", request.roll);
    }

    #[test]
    fn incomplete_irc_settings_test() {
        let irc = IrcSettings::new("#returners", "");
        assert_eq!(None, RollRequest::from_chat("/r 2s6", "user-1", "Terra", &irc));
    }

    #[test]
    fn payload_field_names_test() {
        let request = RollRequest::from_chat("/gmr 2s6", "user-1", "Terra", &irc()).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!("gmroll", json["rollMode"]);
        assert_eq!(true, json["gmRoll"]);
        assert_eq!("gm", json["target"]);
        assert_eq!("2s6", json["roll"]);
    }
}
