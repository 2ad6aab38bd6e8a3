use super::channel::RollChannel;
use super::render::RollResult;
use super::request::RollRequest;
use super::{DO_ROLL_EVENT, ROLL_RESULT_EVENT};
use crate::error::RelayError;
use crate::parser::expression::{RollExpression, RollParser};
use crate::parser::term::{Operator, Term};
use crate::roll::{Roll, MAX_DICE};
use futures::StreamExt;
use log::{error, info, warn};
use rand::Rng;
use std::sync::Arc;

/// Sum of the plain numbers in a roll, signed by the operator in front of
/// them. Other arithmetic is not applied.
fn flat_bonus(expression: &RollExpression) -> i64 {
    let mut sign = 1;
    let mut bonus = 0;

    for term in expression.terms() {
        match term {
            Term::Operator(Operator::Minus) => sign = -1,
            Term::Operator(_) => sign = 1,
            Term::Number(number) => {
                bonus += sign * number.number as i64;
                sign = 1;
            }
            _ => sign = 1,
        }
    }

    bonus
}

fn signed(bonus: i64) -> String {
    match bonus {
        0 => String::new(),
        b if b > 0 => format!("+{}", b),
        b => b.to_string(),
    }
}

/// Answers roll requests on the channel itself, standing in for the IRC
/// bot when there is none.
pub struct Loopback<C: RollChannel> {
    channel: Arc<C>,
    parser: RollParser,
}

impl<C: RollChannel> Loopback<C> {
    pub fn new(channel: Arc<C>, parser: RollParser) -> Loopback<C> {
        Loopback { channel, parser }
    }

    /// Roll the first die of a request. The text after the formula is the
    /// reason for the roll.
    pub fn answer_with<R: Rng>(&self, request: &RollRequest, rng: &mut R) -> Result<RollResult, RelayError> {
        let mut parts = request.roll.trim().splitn(2, char::is_whitespace);
        let formula = parts.next().unwrap_or("");
        let reason = parts.next().map(str::trim).filter(|r| !r.is_empty());

        let expression = self.parser.parse(formula)?;
        let die = expression
            .dice()
            .next()
            .ok_or_else(|| RelayError::NoDice(request.roll.clone()))?;

        let mut die = die.clone();
        if die.count() > MAX_DICE {
            warn!("Capping {} dice to {}", die.count(), MAX_DICE);
            die.descriptor.count = MAX_DICE;
        }

        let bonus = flat_bonus(&expression);
        let rolls = die
            .roll_with(rng)
            .rolls()
            .iter()
            .map(|&r| (r, r as i64 + bonus))
            .collect();

        Ok(RollResult {
            reason: reason.map(str::to_owned),
            roll_mode: request.roll_mode,
            die: die.faces(),
            base_roll: Some(formula.to_owned()),
            roll: format!("{}d{}{}", die.count(), die.faces(), signed(bonus)),
            rolls,
            user: Some(request.user.clone()),
            nick: request.nick.clone(),
        })
    }

    pub fn answer(&self, request: &RollRequest) -> Result<RollResult, RelayError> {
        self.answer_with(request, &mut rand::thread_rng())
    }

    async fn respond(&self, request: RollRequest) -> Result<(), RelayError> {
        let result = self.answer(&request)?;
        info!("Rolled {} for {}: {:?}", result.roll, result.nick, result.rolls);
        let payload = serde_json::to_value(&result)?;
        self.channel.trigger(ROLL_RESULT_EVENT, payload).await
    }

    /// Answer requests until the channel closes.
    pub async fn run(&self) -> Result<(), RelayError> {
        let mut requests = self.channel.bind(DO_ROLL_EVENT);
        info!("Answering roll requests on {}", self.channel.name());

        while let Some(payload) = requests.next().await {
            let request = match serde_json::from_value::<RollRequest>(payload) {
                Ok(request) => request,
                Err(e) => {
                    error!("Malformed roll request: {}", e);
                    continue;
                }
            };

            if let Err(e) = self.respond(request).await {
                error!("Could not answer roll request: {}", e);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiceParsingError;
    use crate::relay::channel::LocalChannel;
    use crate::relay::command::RollMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn request(roll: &str) -> RollRequest {
        RollRequest {
            roll_mode: Some(RollMode::Roll),
            gm_roll: false,
            target: "#returners".to_owned(),
            nick: "Terra".to_owned(),
            user: "user-1".to_owned(),
            roll: roll.to_owned(),
        }
    }

    fn loopback() -> Loopback<LocalChannel> {
        let channel = LocalChannel::subscribe("private-test", 8);
        Loopback::new(Arc::new(channel), RollParser::default())
    }

    #[test]
    fn skill_roll_with_bonus_test() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = loopback().answer_with(&request("2s6+3 dodge"), &mut rng).unwrap();

        assert_eq!(140, result.die);
        assert_eq!("2d140+3", result.roll);
        assert_eq!(Some("2s6+3"), result.distinct_base_roll());
        assert_eq!(Some("dodge".to_owned()), result.reason);
        assert_eq!(Some(RollMode::Roll), result.roll_mode);
        assert_eq!(2, result.rolls.len());

        for &(face, total) in &result.rolls {
            assert!(face >= 1 && face <= 140);
            assert_eq!(face as i64 + 3, total);
        }
    }

    #[test]
    fn negative_bonus_test() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = loopback().answer_with(&request("1d20-2"), &mut rng).unwrap();
        assert_eq!("1d20-2", result.roll);
        assert_eq!(None, result.reason);

        let (face, total) = result.rolls[0];
        assert_eq!(face as i64 - 2, total);
    }

    #[test]
    fn dice_count_is_capped_test() {
        let mut rng = StdRng::seed_from_u64(7);
        let result = loopback().answer_with(&request("500s1"), &mut rng).unwrap();
        assert_eq!(MAX_DICE as usize, result.rolls.len());
        assert_eq!(40, result.die);
    }

    #[test]
    fn no_dice_test() {
        let result = loopback().answer(&request("42"));
        assert!(matches!(result, Err(RelayError::NoDice(roll)) if roll == "42"));
    }

    #[test]
    fn unparseable_roll_test() {
        let result = loopback().answer(&request("2s6+("));
        assert!(matches!(
            result,
            Err(RelayError::DiceParsingError(DiceParsingError::UnbalancedGroup))
        ));
    }

    #[tokio::test]
    async fn request_is_answered_over_channel_test() {
        let channel = LocalChannel::subscribe("private-test", 8);
        let loopback = Arc::new(Loopback::new(Arc::new(channel.clone()), RollParser::default()));
        let mut results = channel.bind(ROLL_RESULT_EVENT);

        let answering = tokio::spawn({
            let loopback = loopback.clone();
            async move { loopback.run().await }
        });
        tokio::task::yield_now().await;

        let payload = serde_json::to_value(&request("3s1 climb")).unwrap();
        channel.trigger(DO_ROLL_EVENT, payload).await.unwrap();

        let payload = results.next().await.expect("result should arrive");
        let result: RollResult = serde_json::from_value(payload).unwrap();
        assert_eq!("3d40", result.roll);
        assert_eq!(Some("climb".to_owned()), result.reason);
        assert_eq!(3, result.rolls.len());

        channel.unsubscribe();
        assert!(answering.await.unwrap().is_ok());
    }
}
