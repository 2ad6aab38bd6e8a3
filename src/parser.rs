pub mod classifier;
pub mod expression;
pub mod term;
pub mod tokenizer;

use nom::{bytes::complete::take_while, IResult};

fn is_whitespace(input: char) -> bool {
    input == ' ' || input == '\n' || input == '\t' || input == '\r'
}

/// Eat whitespace, returning it
pub fn eat_whitespace(input: &str) -> IResult<&str, &str> {
    let (input, whitespace) = take_while(is_whitespace)(input)?;
    Ok((input, whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eat_whitespace_test() {
        assert_eq!(Ok(("/r 2s6", " \t")), eat_whitespace(" \t/r 2s6"));
        assert_eq!(Ok(("2s6", "")), eat_whitespace("2s6"));
    }
}
