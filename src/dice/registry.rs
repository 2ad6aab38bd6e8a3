use super::generic::{Coin, FateDie, StandardDie};
use super::grammar::DieMatch;
use super::skill::SkillDie;
use super::DieTerm;
use crate::error::DiceParsingError;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Capability of one die denomination: given the parsed pieces of a
/// term, resolve its faces and build the term.
pub trait DieKind: Send + Sync {
    /// Registry key, e.g. `d` or `s`.
    fn denomination(&self) -> &'static str;

    fn build(&self, die: DieMatch<'_>) -> DieTerm;
}

/// Denomination → die kind dispatch table. Passed explicitly to the
/// parsers and classifiers that need it, and immutable once shared.
#[derive(Clone, Default)]
pub struct TermRegistry {
    kinds: HashMap<String, Arc<dyn DieKind>>,
}

impl fmt::Debug for TermRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermRegistry")
            .field("denominations", &self.denominations())
            .finish()
    }
}

impl TermRegistry {
    /// A registry with no denominations at all.
    pub fn new() -> TermRegistry {
        TermRegistry::default()
    }

    /// Standard dice, coins, fate dice and skill dice.
    pub fn with_defaults() -> TermRegistry {
        let mut registry = TermRegistry::new();
        registry.register(Arc::new(StandardDie));
        registry.register(Arc::new(Coin));
        registry.register(Arc::new(FateDie));
        registry.register(Arc::new(SkillDie::default()));
        registry
    }

    /// Register a die kind under its denomination, returning the kind it
    /// replaced, if any.
    pub fn register(&mut self, kind: Arc<dyn DieKind>) -> Option<Arc<dyn DieKind>> {
        let key = kind.denomination().to_owned();
        debug!("Registering die denomination {}", key);
        self.kinds.insert(key, kind)
    }

    pub fn contains(&self, denomination: &str) -> bool {
        self.kinds.contains_key(denomination)
    }

    pub fn get(&self, denomination: &str) -> Result<&dyn DieKind, DiceParsingError> {
        self.kinds
            .get(denomination)
            .map(|kind| kind.as_ref())
            .ok_or_else(|| DiceParsingError::UnregisteredDenomination(denomination.to_owned()))
    }

    /// Sorted list of registered denominations.
    pub fn denominations(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.kinds.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }

    /// Resolve a matched die through the kind registered for its
    /// denomination.
    pub fn build(&self, die: DieMatch<'_>) -> Result<DieTerm, DiceParsingError> {
        let kind = self.get(&die.denomination)?;
        Ok(kind.build(die))
    }
}
