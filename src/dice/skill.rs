use super::grammar::{self, DieMatch};
use super::registry::{DieKind, TermRegistry};
use super::tier::SkillTierTable;
use super::{DieTerm, DieTermDescriptor, Notation, TermParser};
use crate::error::DiceParsingError;

/// Registry key of skill dice.
pub const SKILL_DENOMINATION: &str = "s";

/// Skill dice: `s<tier>`, where the tier is looked up in the skill tier
/// table to find the real die size.
#[derive(Debug, Default, Clone)]
pub struct SkillDie {
    table: SkillTierTable,
}

impl SkillDie {
    pub fn faces(&self, tier: u32) -> u32 {
        self.table.resolve(tier)
    }
}

impl DieKind for SkillDie {
    fn denomination(&self) -> &'static str {
        SKILL_DENOMINATION
    }

    fn build(&self, die: DieMatch<'_>) -> DieTerm {
        let tier = die.number.unwrap_or(0);
        DieTerm::new(
            SKILL_DENOMINATION,
            Notation::Tier(tier),
            DieTermDescriptor {
                count: die.count.unwrap_or(1),
                faces: self.faces(tier),
                modifiers: die.modifiers,
                flavor: die.flavor.map(|f| f.to_owned()),
            },
        )
    }
}

/// Recognizes `[count]s<tier>[modifiers][[flavor]]` tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkillDieParser;

impl TermParser for SkillDieParser {
    fn matches(&self, token: &str) -> bool {
        grammar::match_skill_die(token).is_some()
    }

    fn parse(
        &self,
        token: &str,
        registry: &TermRegistry,
    ) -> Result<Option<DieTerm>, DiceParsingError> {
        match grammar::match_skill_die(token) {
            Some(die) => registry.build(die).map(Some),
            None => Ok(None),
        }
    }
}
