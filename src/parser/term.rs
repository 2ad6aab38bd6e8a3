use crate::dice::DieTerm;
use std::fmt;
use strum::{Display, EnumString};

#[derive(Debug, PartialEq, Eq, Clone, Copy, EnumString, Display)]
pub enum Operator {
    #[strum(serialize = "+")]
    Plus,

    #[strum(serialize = "-")]
    Minus,

    #[strum(serialize = "*")]
    Multiply,

    #[strum(serialize = "/")]
    Divide,

    #[strum(serialize = "%")]
    Modulo,
}

#[derive(Debug, PartialEq, Clone)]
pub struct NumericTerm {
    pub number: f64,
    pub flavor: Option<String>,
}

impl fmt::Display for NumericTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)?;
        if let Some(flavor) = &self.flavor {
            write!(f, "[{}]", flavor)?;
        }
        Ok(())
    }
}

/// A single classified unit of a roll expression.
#[derive(Debug, PartialEq, Clone)]
pub enum Term {
    Number(NumericTerm),
    Die(DieTerm),
    Operator(Operator),

    /// `( ... )`, with the inner expression kept as text for the
    /// evaluator to classify on its own.
    Parenthetical {
        expression: String,
        flavor: Option<String>,
    },

    /// A math function call such as `floor(1d6/2)`.
    Function { name: String, arguments: String },

    /// Text that was not (or not yet) classified.
    String(String),
}

impl Term {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Term::String(_))
    }

    pub fn as_die(&self) -> Option<&DieTerm> {
        match self {
            Term::Die(die) => Some(die),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Number(number) => write!(f, "{}", number),
            Term::Die(die) => write!(f, "{}", die),
            Term::Operator(op) => write!(f, "{}", op),
            Term::Parenthetical { expression, flavor } => {
                write!(f, "({})", expression)?;
                if let Some(flavor) = flavor {
                    write!(f, "[{}]", flavor)?;
                }
                Ok(())
            }
            Term::Function { name, arguments } => write!(f, "{}({})", name, arguments),
            Term::String(term) => write!(f, "{}", term),
        }
    }
}

/// A token of a roll expression: raw text from the tokenizer, or a term
/// that has already been classified.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Raw(String),
    Term(Term),
}

impl Token {
    pub fn raw(text: &str) -> Token {
        Token::Raw(text.to_owned())
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Token::Term(term) => Some(term),
            Token::Raw(_) => None,
        }
    }
}

impl From<Term> for Token {
    fn from(term: Term) -> Token {
        Token::Term(term)
    }
}
