use log::{error, warn};
use skillroll::error::SkillRollError;
use skillroll::parser::expression::RollParser;
use skillroll::roll::{Roll, MAX_DICE};
use std::env;
use tracing_subscriber::filter::EnvFilter;

fn main() -> Result<(), SkillRollError> {
    let filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("skillroll=info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run() {
        Ok(_) => (),
        Err(e) => error!("Error: {}", e),
    }

    Ok(())
}

fn run() -> Result<(), SkillRollError> {
    let input = env::args().skip(1).collect::<Vec<String>>().join(" ");
    if input.trim().is_empty() {
        return Err(SkillRollError::MissingExpression);
    }

    let parser = RollParser::default();
    let expression = parser.parse(&input)?;
    println!("{}", expression);

    for die in expression.dice() {
        if die.count() > MAX_DICE {
            warn!("Only rolling {} of the {} dice in {}", MAX_DICE, die.count(), die);
        }

        println!("{} (d{}): {}", die, die.faces(), die.roll());
    }

    Ok(())
}
