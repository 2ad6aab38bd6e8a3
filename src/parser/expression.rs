use super::classifier::{group_term, ClassificationContext, ClassifierChain};
use super::term::{Term, Token};
use super::tokenizer::tokenize;
use crate::dice::registry::TermRegistry;
use crate::dice::DieTerm;
use crate::error::DiceParsingError;
use itertools::Itertools;
use std::fmt;
use std::sync::Arc;

/// An ordered sequence of classified terms, ready for an evaluator.
#[derive(Debug, PartialEq, Clone)]
pub struct RollExpression {
    terms: Vec<Term>,
}

impl RollExpression {
    /// Tokenize and classify `formula` left to right. Groups and function
    /// calls are classified first; every other token then sees the
    /// classified token before it and the token after it.
    pub fn parse(
        formula: &str,
        chain: &ClassifierChain,
        intermediate: bool,
    ) -> Result<RollExpression, DiceParsingError> {
        let mut tokens: Vec<Token> = tokenize(formula)?
            .into_iter()
            .map(|raw| match group_term(&raw) {
                Some(group) => Token::Term(group),
                None => Token::Raw(raw),
            })
            .collect();

        if tokens.is_empty() {
            return Err(DiceParsingError::EmptyExpression);
        }

        for idx in 0..tokens.len() {
            let token = std::mem::replace(&mut tokens[idx], Token::Raw(String::new()));
            let term = {
                let prior = idx.checked_sub(1).map(|i| &tokens[i]);
                let next = tokens.get(idx + 1);
                let ctx = ClassificationContext::new(prior, next, intermediate);
                chain.classify(token, &ctx)?
            };
            tokens[idx] = Token::Term(term);
        }

        let terms = tokens
            .into_iter()
            .filter_map(|token| match token {
                Token::Term(term) => Some(term),
                Token::Raw(_) => None,
            })
            .collect();

        Ok(RollExpression { terms })
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn dice(&self) -> impl Iterator<Item = &DieTerm> {
        self.terms.iter().filter_map(Term::as_die)
    }

    /// Fail on the first term that never got classified.
    pub fn validate(&self) -> Result<(), DiceParsingError> {
        match self.terms.iter().find(|term| term.is_placeholder()) {
            Some(term) => Err(DiceParsingError::UnrecognizedTerm(term.to_string())),
            None => Ok(()),
        }
    }
}

impl fmt::Display for RollExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.terms.iter().join(" "))
    }
}

/// A registry and a classifier chain with skill dice installed, shared
/// by everything that parses roll formulas.
#[derive(Clone)]
pub struct RollParser {
    registry: Arc<TermRegistry>,
    chain: Arc<ClassifierChain>,
}

impl Default for RollParser {
    fn default() -> Self {
        RollParser::new(Arc::new(TermRegistry::with_defaults()))
    }
}

impl RollParser {
    pub fn new(registry: Arc<TermRegistry>) -> RollParser {
        let chain = ClassifierChain::with_skill_dice(registry.clone());
        RollParser {
            registry,
            chain: Arc::new(chain),
        }
    }

    pub fn registry(&self) -> &TermRegistry {
        &self.registry
    }

    /// Parse a complete formula. Every term must be recognized.
    pub fn parse(&self, formula: &str) -> Result<RollExpression, DiceParsingError> {
        let expression = RollExpression::parse(formula, &self.chain, false)?;
        expression.validate()?;
        Ok(expression)
    }

    /// Parse a formula that is still being written; terms next to
    /// unfinished ones are left unclassified.
    pub fn parse_intermediate(&self, formula: &str) -> Result<RollExpression, DiceParsingError> {
        RollExpression::parse(formula, &self.chain, true)
    }
}
