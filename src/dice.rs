pub mod generic;
pub mod grammar;
pub mod registry;
pub mod skill;
pub mod tier;

use crate::error::DiceParsingError;
use registry::TermRegistry;
use std::fmt;

/// The resolved shape of a die term: how many dice, how many faces
/// each, the modifiers written after it, and its flavor label.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DieTermDescriptor {
    pub count: u32,
    pub faces: u32,
    pub modifiers: Vec<String>,
    pub flavor: Option<String>,
}

/// What followed the denomination in the original notation. Kept so
/// that a skill die renders back as `2s6`, not as its resolved faces.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Notation {
    /// `s<tier>`
    Tier(u32),

    /// `d<faces>`
    Faces(u32),

    /// `d<symbol>`, e.g. `dF`, `dc`.
    Symbol(String),
}

/// A classified die term of any registered denomination.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DieTerm {
    pub(crate) denomination: String,
    pub(crate) notation: Notation,
    pub(crate) descriptor: DieTermDescriptor,
}

impl DieTerm {
    pub fn new(denomination: &str, notation: Notation, descriptor: DieTermDescriptor) -> DieTerm {
        DieTerm {
            denomination: denomination.to_owned(),
            notation,
            descriptor,
        }
    }

    pub fn denomination(&self) -> &str {
        &self.denomination
    }

    pub fn notation(&self) -> &Notation {
        &self.notation
    }

    pub fn descriptor(&self) -> &DieTermDescriptor {
        &self.descriptor
    }

    pub fn count(&self) -> u32 {
        self.descriptor.count
    }

    pub fn faces(&self) -> u32 {
        self.descriptor.faces
    }

    pub fn modifiers(&self) -> &[String] {
        &self.descriptor.modifiers
    }

    pub fn flavor(&self) -> Option<&str> {
        self.descriptor.flavor.as_deref()
    }

    /// The term without its flavor text, e.g. `2s6kh1` or `4df`.
    pub fn expression(&self) -> String {
        let die = match &self.notation {
            Notation::Tier(tier) => format!("{}{}", self.denomination, tier),
            Notation::Faces(faces) => format!("d{}", faces),
            Notation::Symbol(symbol) => format!("d{}", symbol),
        };

        format!(
            "{}{}{}",
            self.descriptor.count,
            die,
            self.descriptor.modifiers.concat()
        )
    }
}

/// Full formula of the term, flavor text included. Parsing this output
/// again gives back an equal term.
impl fmt::Display for DieTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression())?;
        if let Some(flavor) = self.flavor() {
            write!(f, "[{}]", flavor)?;
        }
        Ok(())
    }
}

/// A family of die notation that can recognize and build terms. Terms
/// are rendered back to text through [`DieTerm`]'s `Display`.
pub trait TermParser {
    /// Whether the whole token is written in this notation.
    fn matches(&self, token: &str) -> bool;

    /// Build a term from the token. `Ok(None)` means the token is not in
    /// this notation; errors come from resolving the denomination.
    fn parse(
        &self,
        token: &str,
        registry: &TermRegistry,
    ) -> Result<Option<DieTerm>, DiceParsingError>;
}
