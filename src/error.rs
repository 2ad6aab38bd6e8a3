use crate::config::ConfigError;
use thiserror::Error;

/// Errors raised while turning roll expression text into terms.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DiceParsingError {
    #[error("die denomination {0} is not registered as a valid die kind")]
    UnregisteredDenomination(String),

    #[error("unrecognized roll expression term: {0}")]
    UnrecognizedTerm(String),

    #[error("unbalanced parenthesis or bracket in roll expression")]
    UnbalancedGroup,

    #[error("roll expression is empty")]
    EmptyExpression,
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("payload serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("channel {0} is not subscribed")]
    NotSubscribed(String),

    #[error("chat message could not be created: {0}")]
    ChatError(String),

    #[error("roll could not be parsed: {0}")]
    DiceParsingError(#[from] DiceParsingError),

    #[error("no dice to roll in: {0}")]
    NoDice(String),
}

#[derive(Error, Debug)]
pub enum SkillRollError {
    #[error("configuration error: {0}")]
    ConfigurationError(#[from] ConfigError),

    #[error("dice parsing error: {0}")]
    DiceParsingError(#[from] DiceParsingError),

    #[error("relay error: {0}")]
    RelayError(#[from] RelayError),

    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("no roll expression given")]
    MissingExpression,

    #[error("need a config file as an argument")]
    MissingConfig,
}
