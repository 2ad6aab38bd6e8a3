use super::term::{NumericTerm, Operator, Term, Token};
use crate::dice::generic::GenericDieParser;
use crate::dice::grammar;
use crate::dice::registry::TermRegistry;
use crate::dice::skill::SkillDieParser;
use crate::dice::TermParser;
use crate::error::DiceParsingError;
use log::debug;
use std::str::FromStr;
use std::sync::Arc;

/// Neighbors of the token being classified. `prior` is the previous
/// token after classification, `next` the following token as it stands.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationContext<'a> {
    pub prior: Option<&'a Token>,
    pub next: Option<&'a Token>,

    /// Allow classification to be deferred while the expression is
    /// still being built.
    pub intermediate: bool,
}

impl<'a> ClassificationContext<'a> {
    pub fn new(prior: Option<&'a Token>, next: Option<&'a Token>, intermediate: bool) -> Self {
        ClassificationContext {
            prior,
            next,
            intermediate,
        }
    }

    /// No neighbors, no deferral.
    pub fn isolated() -> Self {
        ClassificationContext::new(None, None, false)
    }
}

/// Turns one token into one term.
pub trait Classifier: Send + Sync {
    fn classify(&self, token: Token, ctx: &ClassificationContext<'_>) -> Result<Term, DiceParsingError>;

    /// Whether a neighboring token is not final yet, which defers
    /// classification of dice next to it.
    fn is_intermediate(&self, token: &Token) -> bool;
}

fn numeric_term(token: &str) -> Option<Term> {
    grammar::match_numeric(token).map(|(number, flavor)| {
        Term::Number(NumericTerm {
            number,
            flavor: flavor.map(|f| f.to_owned()),
        })
    })
}

/// Function calls and parenthesized groups. These are classified before
/// anything else in an expression, so they are terms by the time their
/// neighbors are looked at.
pub fn group_term(token: &str) -> Option<Term> {
    if let Some((name, arguments)) = grammar::match_function(token) {
        return Some(Term::Function {
            name: name.to_owned(),
            arguments: arguments.to_owned(),
        });
    }

    grammar::match_parenthetical(token).map(|(expression, flavor)| Term::Parenthetical {
        expression: expression.to_owned(),
        flavor: flavor.map(|f| f.to_owned()),
    })
}

fn should_defer(classifier: &dyn Classifier, ctx: &ClassificationContext<'_>) -> bool {
    let intermediate = |token: Option<&Token>| token.map_or(false, |t| classifier.is_intermediate(t));
    ctx.intermediate && (intermediate(ctx.prior) || intermediate(ctx.next))
}

/// The host's default classification: numbers, operators, groups, math
/// functions and `d` dice. Anything else becomes a string placeholder.
#[derive(Debug, Clone)]
pub struct GenericClassifier {
    registry: Arc<TermRegistry>,
    dice: GenericDieParser,
}

impl GenericClassifier {
    pub fn new(registry: Arc<TermRegistry>) -> GenericClassifier {
        GenericClassifier {
            registry,
            dice: GenericDieParser,
        }
    }
}

impl Classifier for GenericClassifier {
    fn classify(&self, token: Token, ctx: &ClassificationContext<'_>) -> Result<Term, DiceParsingError> {
        let raw = match token {
            Token::Term(term) => return Ok(term),
            Token::Raw(raw) => raw,
        };

        if let Some(number) = numeric_term(&raw) {
            return Ok(number);
        }

        if let Ok(op) = Operator::from_str(&raw) {
            return Ok(Term::Operator(op));
        }

        if let Some(group) = group_term(&raw) {
            return Ok(group);
        }

        if self.dice.matches(&raw) {
            if should_defer(self, ctx) {
                debug!("Deferring die term {} next to an intermediate term", raw);
                return Ok(Term::String(raw));
            }

            if let Some(die) = self.dice.parse(&raw, &self.registry)? {
                return Ok(Term::Die(die));
            }
        }

        Ok(Term::String(raw))
    }

    fn is_intermediate(&self, token: &Token) -> bool {
        matches!(
            token,
            Token::Term(Term::Parenthetical { .. })
                | Token::Term(Term::Function { .. })
                | Token::Term(Term::String(_))
        )
    }
}

/// Classifier override that understands skill dice, falling back to
/// another classifier for everything else.
pub struct SkillClassifier {
    registry: Arc<TermRegistry>,
    skill_dice: SkillDieParser,
    fallback: Arc<dyn Classifier>,
}

impl SkillClassifier {
    pub fn new(registry: Arc<TermRegistry>, fallback: Arc<dyn Classifier>) -> SkillClassifier {
        SkillClassifier {
            registry,
            skill_dice: SkillDieParser,
            fallback,
        }
    }
}

impl Classifier for SkillClassifier {
    fn classify(&self, token: Token, ctx: &ClassificationContext<'_>) -> Result<Term, DiceParsingError> {
        let raw = match token {
            Token::Term(term) => return Ok(term),
            Token::Raw(raw) => raw,
        };

        // Numbers always win over dice notation.
        if let Some(number) = numeric_term(&raw) {
            return Ok(number);
        }

        if self.skill_dice.matches(&raw) {
            if should_defer(self, ctx) {
                debug!("Deferring skill die {} next to an intermediate term", raw);
                return Ok(Term::String(raw));
            }

            if let Some(die) = self.skill_dice.parse(&raw, &self.registry)? {
                debug!("Classified skill die {} as {} faces", raw, die.faces());
                return Ok(Term::Die(die));
            }
        }

        self.fallback.classify(Token::Raw(raw), ctx)
    }

    fn is_intermediate(&self, token: &Token) -> bool {
        self.fallback.is_intermediate(token)
    }
}

/// Ordered classifier overrides. Installing puts a classifier in front,
/// and the front classifier classifies every token. An override hands
/// what it does not recognize to the classifier it was built over (see
/// [`ClassifierChain::head`]), so each classifier sees a token at most
/// once and the last one is the fallback.
pub struct ClassifierChain {
    classifiers: Vec<Arc<dyn Classifier>>,
}

impl ClassifierChain {
    pub fn new(fallback: Arc<dyn Classifier>) -> ClassifierChain {
        ClassifierChain {
            classifiers: vec![fallback],
        }
    }

    /// The generic classifier with the skill classifier installed over
    /// it, both sharing `registry`.
    pub fn with_skill_dice(registry: Arc<TermRegistry>) -> ClassifierChain {
        let mut chain = ClassifierChain::new(Arc::new(GenericClassifier::new(registry.clone())));
        let skill = SkillClassifier::new(registry, chain.head());
        chain.install(Arc::new(skill));
        chain
    }

    /// The classifier currently in front, for a new override to fall
    /// back to.
    pub fn head(&self) -> Arc<dyn Classifier> {
        self.classifiers[0].clone()
    }

    pub fn install(&mut self, classifier: Arc<dyn Classifier>) {
        self.classifiers.insert(0, classifier);
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    pub fn classify(&self, token: Token, ctx: &ClassificationContext<'_>) -> Result<Term, DiceParsingError> {
        self.classifiers[0].classify(token, ctx)
    }
}

impl Classifier for ClassifierChain {
    fn classify(&self, token: Token, ctx: &ClassificationContext<'_>) -> Result<Term, DiceParsingError> {
        ClassifierChain::classify(self, token, ctx)
    }

    fn is_intermediate(&self, token: &Token) -> bool {
        self.classifiers
            .last()
            .map_or(false, |fallback| fallback.is_intermediate(token))
    }
}
