use crate::dice::DieTerm;
use rand::prelude::*;
use std::fmt;

pub trait Roll {
    type Output;

    fn roll(&self) -> Self::Output {
        self.roll_with(&mut rand::thread_rng())
    }

    fn roll_with<R: Rng>(&self, rng: &mut R) -> Self::Output;
}

pub trait Rolled {
    fn rolled_value(&self) -> i64;
}

/// Face results of a die term, in the order they were rolled.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DiceRoll(pub Vec<u32>);

impl DiceRoll {
    pub fn rolls(&self) -> &[u32] {
        &self.0
    }
}

impl Rolled for DiceRoll {
    fn rolled_value(&self) -> i64 {
        self.0.iter().map(|&r| r as i64).sum()
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rolled_value())?;
        let mut iter = self.0.iter();
        if let Some(first) = iter.next() {
            write!(f, " ({}", first)?;
            for roll in iter {
                write!(f, " + {}", roll)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Most dice rolled for a single term.
pub const MAX_DICE: u32 = 100;

/// Rolls `count` dice of the resolved face count, at most [`MAX_DICE`].
/// Modifiers are left to the evaluator.
impl Roll for DieTerm {
    type Output = DiceRoll;

    fn roll_with<R: Rng>(&self, rng: &mut R) -> DiceRoll {
        let faces = self.faces().max(1);
        let count = self.count().min(MAX_DICE);
        let rolls = (0..count).map(|_| rng.gen_range(1..=faces)).collect();
        DiceRoll(rolls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{DieTermDescriptor, Notation};
    use rand::rngs::StdRng;

    #[test]
    fn dice_roll_display_test() {
        assert_eq!(DiceRoll(vec![1, 3, 4]).to_string(), "8 (1 + 3 + 4)");
        assert_eq!(DiceRoll(vec![]).to_string(), "0");
        assert_eq!(DiceRoll(vec![140]).to_string(), "140 (140)");
    }

    #[test]
    fn skill_die_rolls_within_faces_test() {
        let die = DieTerm::new(
            "s",
            Notation::Tier(6),
            DieTermDescriptor {
                count: 5,
                faces: 140,
                modifiers: vec![],
                flavor: None,
            },
        );

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let roll = die.roll_with(&mut rng);
            assert_eq!(5, roll.rolls().len());
            assert!(roll.rolls().iter().all(|&r| r >= 1 && r <= 140));
        }
    }

    #[test]
    fn huge_counts_are_capped_test() {
        let die = DieTerm::new(
            "s",
            Notation::Tier(4),
            DieTermDescriptor {
                count: u32::MAX,
                faces: 90,
                modifiers: vec![],
                flavor: None,
            },
        );

        let roll = die.roll_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(MAX_DICE as usize, roll.rolls().len());
    }
}
