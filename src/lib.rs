//! Skill-tier dice notation (`2s6`, `s4[dodge]`) on top of a registry of
//! die kinds and a chain of term classifiers, plus a relay that carries
//! chat rolls to an IRC dice bot and renders the results.
pub mod config;
pub mod dice;
pub mod error;
pub mod parser;
pub mod relay;
pub mod roll;
