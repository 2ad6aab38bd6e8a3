use super::grammar::{self, DieMatch};
use super::registry::{DieKind, TermRegistry};
use super::{DieTerm, DieTermDescriptor, Notation, TermParser};
use crate::error::DiceParsingError;

fn descriptor(die: DieMatch<'_>, faces: u32) -> DieTermDescriptor {
    DieTermDescriptor {
        count: die.count.unwrap_or(1),
        faces,
        modifiers: die.modifiers,
        flavor: die.flavor.map(|f| f.to_owned()),
    }
}

/// Ordinary `NdX` dice.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardDie;

impl DieKind for StandardDie {
    fn denomination(&self) -> &'static str {
        "d"
    }

    fn build(&self, die: DieMatch<'_>) -> DieTerm {
        let faces = die.number.unwrap_or(1);
        DieTerm::new("d", Notation::Faces(faces), descriptor(die, faces))
    }
}

/// A two sided coin, written `dc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Coin;

impl DieKind for Coin {
    fn denomination(&self) -> &'static str {
        "c"
    }

    fn build(&self, die: DieMatch<'_>) -> DieTerm {
        DieTerm::new("c", Notation::Symbol("c".to_owned()), descriptor(die, 2))
    }
}

/// Fate/Fudge dice, written `dF`: three faces (-1, 0, +1).
#[derive(Debug, Default, Clone, Copy)]
pub struct FateDie;

impl DieKind for FateDie {
    fn denomination(&self) -> &'static str {
        "f"
    }

    fn build(&self, die: DieMatch<'_>) -> DieTerm {
        DieTerm::new("f", Notation::Symbol("f".to_owned()), descriptor(die, 3))
    }
}

/// Recognizes `[count]d<faces|symbol>[modifiers][[flavor]]` tokens and
/// resolves the denomination through the registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDieParser;

impl TermParser for GenericDieParser {
    fn matches(&self, token: &str) -> bool {
        grammar::match_generic_die(token).is_some()
    }

    fn parse(
        &self,
        token: &str,
        registry: &TermRegistry,
    ) -> Result<Option<DieTerm>, DiceParsingError> {
        match grammar::match_generic_die(token) {
            Some(die) => registry.build(die).map(Some),
            None => Ok(None),
        }
    }
}
