//! Roll term grammar, assembled from small named nom parsers: dice
//! count, denomination, tier or faces, modifiers and flavor text. Each
//! `match_*` function requires the whole token to be consumed, and a
//! failure to match is never an error.
use nom::bytes::complete::{is_not, take_while, take_while_m_n};
use nom::character::complete::{alpha1, char, digit0, digit1, one_of};
use nom::combinator::{all_consuming, map, opt, recognize};
use nom::multi::many0;
use nom::sequence::{delimited, pair};
use nom::IResult;

/// Math functions the fallback classifier accepts as function terms.
pub const MATH_FUNCTIONS: &[&str] = &[
    "abs", "ceil", "floor", "round", "trunc", "sqrt", "min", "max", "sign",
];

/// Symbols the tokenizer splits on; each becomes its own token.
pub const OPERATORS: &str = "+-*/%";

/// The pieces of a matched die term, before the denomination is
/// resolved against a registry.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DieMatch<'a> {
    pub count: Option<u32>,

    /// Lowercased registry key: `s` for skill dice, `d` for numeric
    /// faces, or the letter following `d` (`4dF` is `f`).
    pub denomination: String,

    /// The tier (skill dice) or face count (standard dice), if the
    /// notation carried a number.
    pub number: Option<u32>,
    pub modifiers: Vec<String>,
    pub flavor: Option<&'a str>,
}

/// Digit strings are already validated by the grammar, so the only
/// possible failure is overflow, which saturates.
fn parse_saturating(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

fn is_modifier_argument(c: char) -> bool {
    !c.is_ascii_alphabetic() && !c.is_whitespace() && !"()[]+-*/".contains(c)
}

/// Dice count: a positive integer without leading zeros.
fn dice_count(input: &str) -> IResult<&str, u32> {
    map(recognize(pair(one_of("123456789"), digit0)), parse_saturating)(input)
}

fn number(input: &str) -> IResult<&str, u32> {
    map(digit1, parse_saturating)(input)
}

fn skill_denomination(input: &str) -> IResult<&str, char> {
    one_of("sS")(input)
}

fn dice_denomination(input: &str) -> IResult<&str, char> {
    one_of("dD")(input)
}

/// Face count of a standard die: a positive integer.
fn faces(input: &str) -> IResult<&str, u32> {
    map(recognize(pair(one_of("123456789"), digit0)), parse_saturating)(input)
}

/// `s` and `d` have their own notation, so they are never a symbol.
fn is_die_symbol(c: char) -> bool {
    c.is_ascii_alphabetic() && !"sSdD".contains(c)
}

fn denomination_symbol(input: &str) -> IResult<&str, &str> {
    take_while_m_n(1, 1, is_die_symbol)(input)
}

/// A single modifier such as `kh2`, `x`, `r<3` or `cs>=5`.
fn modifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, take_while(is_modifier_argument)))(input)
}

fn modifiers(input: &str) -> IResult<&str, Vec<&str>> {
    many0(modifier)(input)
}

/// Bracketed flavor text, e.g. `[dodge]`.
pub fn flavor(input: &str) -> IResult<&str, &str> {
    delimited(char('['), is_not("]"), char(']'))(input)
}

fn to_owned_all(modifiers: Vec<&str>) -> Vec<String> {
    modifiers.into_iter().map(|m| m.to_owned()).collect()
}

/// `[count]s<tier>[modifiers][[flavor]]`
pub fn skill_die(input: &str) -> IResult<&str, DieMatch> {
    let (input, count) = opt(dice_count)(input)?;
    let (input, denomination) = skill_denomination(input)?;
    let (input, tier) = number(input)?;
    let (input, modifiers) = modifiers(input)?;
    let (input, flavor) = opt(flavor)(input)?;

    Ok((
        input,
        DieMatch {
            count,
            denomination: denomination.to_ascii_lowercase().to_string(),
            number: Some(tier),
            modifiers: to_owned_all(modifiers),
            flavor,
        },
    ))
}

/// `[count]d<faces|symbol>[modifiers][[flavor]]`
pub fn generic_die(input: &str) -> IResult<&str, DieMatch> {
    let (input, count) = opt(dice_count)(input)?;
    let (input, _) = dice_denomination(input)?;
    let (input, faces) = opt(faces)(input)?;
    let (input, symbol) = match faces {
        Some(_) => (input, None),
        None => map(denomination_symbol, Some)(input)?,
    };
    let (input, modifiers) = modifiers(input)?;
    let (input, flavor) = opt(flavor)(input)?;

    let denomination = match symbol {
        Some(symbol) => symbol.to_ascii_lowercase(),
        None => "d".to_owned(),
    };

    Ok((
        input,
        DieMatch {
            count,
            denomination,
            number: faces,
            modifiers: to_owned_all(modifiers),
            flavor,
        },
    ))
}

/// Numeric literal with optional decimals and flavor: `4`, `2.5[bonus]`.
pub fn numeric(input: &str) -> IResult<&str, (f64, Option<&str>)> {
    let (input, value) = recognize(pair(digit1, opt(pair(char('.'), digit1))))(input)?;
    let (input, flavor) = opt(flavor)(input)?;
    let value = value.parse::<f64>().unwrap_or(f64::MAX);
    Ok((input, (value, flavor)))
}

pub fn match_skill_die(token: &str) -> Option<DieMatch> {
    all_consuming(skill_die)(token).ok().map(|(_, m)| m)
}

pub fn match_generic_die(token: &str) -> Option<DieMatch> {
    all_consuming(generic_die)(token).ok().map(|(_, m)| m)
}

pub fn match_numeric(token: &str) -> Option<(f64, Option<&str>)> {
    all_consuming(numeric)(token).ok().map(|(_, m)| m)
}

/// Split a leading `( ... )` group off `input`, honoring nesting.
/// Returns the inside of the group and whatever follows the closing
/// parenthesis.
pub fn split_group(input: &str) -> Option<(&str, &str)> {
    if !input.starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    for (idx, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&input[1..idx], &input[idx + 1..]));
                }
            }
            _ => (),
        }
    }

    None
}

/// `( ... )[flavor]` as a whole token.
pub fn match_parenthetical(token: &str) -> Option<(&str, Option<&str>)> {
    let (inner, rest) = split_group(token)?;
    if rest.is_empty() {
        return Some((inner, None));
    }

    all_consuming(flavor)(rest)
        .ok()
        .map(|(_, flavor)| (inner, Some(flavor)))
}

fn function_name(input: &str) -> IResult<&str, &str> {
    alpha1(input)
}

/// `name( ... )` as a whole token, where name is a known math function.
pub fn match_function(token: &str) -> Option<(&str, &str)> {
    let (rest, name) = function_name(token).ok()?;
    if !MATH_FUNCTIONS.contains(&name) {
        return None;
    }

    match split_group(rest)? {
        (args, "") => Some((name, args)),
        _ => None,
    }
}

/// Extract every modifier from a modifier string, in order.
pub fn parse_modifiers(input: &str) -> Vec<String> {
    modifiers(input)
        .map(|(_, mods)| to_owned_all(mods))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_die_with_count_test() {
        let m = match_skill_die("3s4").expect("should match");
        assert_eq!(Some(3), m.count);
        assert_eq!("s", m.denomination);
        assert_eq!(Some(4), m.number);
        assert!(m.modifiers.is_empty());
        assert_eq!(None, m.flavor);
    }

    #[test]
    fn skill_die_is_case_insensitive_test() {
        let m = match_skill_die("2S10").expect("should match");
        assert_eq!("s", m.denomination);
        assert_eq!(Some(10), m.number);
    }

    #[test]
    fn skill_die_modifiers_and_flavor_test() {
        let m = match_skill_die("4s6kh2x[attack roll]").expect("should match");
        assert_eq!(Some(4), m.count);
        assert_eq!(vec!["kh2".to_owned(), "x".to_owned()], m.modifiers);
        assert_eq!(Some("attack roll"), m.flavor);
    }

    #[test]
    fn skill_die_rejects_non_digit_tier_test() {
        assert!(match_skill_die("2sx").is_none());
        assert!(match_skill_die("s").is_none());
        assert!(match_skill_die("2s").is_none());
    }

    #[test]
    fn skill_die_rejects_zero_count_test() {
        assert!(match_skill_die("0s4").is_none());
    }

    #[test]
    fn skill_die_rejects_trailing_garbage_test() {
        assert!(match_skill_die("2s4 ").is_none());
        assert!(match_skill_die("2s4[dodge").is_none());
        assert!(match_skill_die("2s4+1").is_none());
    }

    #[test]
    fn numbers_are_not_skill_dice_test() {
        assert!(match_skill_die("42").is_none());
        assert!(match_numeric("42").is_some());
    }

    #[test]
    fn huge_tier_saturates_test() {
        let m = match_skill_die("s99999999999").expect("should match");
        assert_eq!(Some(u32::MAX), m.number);
    }

    #[test]
    fn generic_numeric_faces_test() {
        let m = match_generic_die("2d20kh1").expect("should match");
        assert_eq!(Some(2), m.count);
        assert_eq!("d", m.denomination);
        assert_eq!(Some(20), m.number);
        assert_eq!(vec!["kh1".to_owned()], m.modifiers);
    }

    #[test]
    fn generic_symbol_denomination_test() {
        let m = match_generic_die("4dF").expect("should match");
        assert_eq!("f", m.denomination);
        assert_eq!(None, m.number);

        let m = match_generic_die("dq").expect("should match");
        assert_eq!(None, m.count);
        assert_eq!("q", m.denomination);
    }

    #[test]
    fn reserved_letters_are_not_symbols_test() {
        assert_eq!(None, match_generic_die("2ds"));
        assert_eq!(None, match_generic_die("2dS"));
        assert_eq!(None, match_generic_die("2dd"));
        assert_eq!(None, match_generic_die("dD"));
    }

    #[test]
    fn zero_faces_do_not_match_test() {
        assert_eq!(None, match_generic_die("2d0"));
        assert_eq!(None, match_generic_die("d06"));
        assert_eq!(Some(10), match_generic_die("1d10").and_then(|m| m.number));
    }

    #[test]
    fn numeric_literal_test() {
        assert_eq!(Some((4.0, None)), match_numeric("4"));
        assert_eq!(Some((2.5, Some("bonus"))), match_numeric("2.5[bonus]"));
        assert_eq!(None, match_numeric("2."));
        assert_eq!(None, match_numeric("2d6"));
    }

    #[test]
    fn modifier_arguments_test() {
        assert_eq!(
            vec!["r<3".to_owned(), "cs>=5".to_owned(), "kh".to_owned()],
            parse_modifiers("r<3cs>=5kh")
        );
        assert!(parse_modifiers("").is_empty());
    }

    #[test]
    fn parenthetical_test() {
        assert_eq!(Some(("1d6+(2)", None)), match_parenthetical("(1d6+(2))"));
        assert_eq!(Some(("2s4", Some("fire"))), match_parenthetical("(2s4)[fire]"));
        assert_eq!(None, match_parenthetical("(1d6"));
        assert_eq!(None, match_parenthetical("(1d6)x"));
    }

    #[test]
    fn function_test() {
        assert_eq!(Some(("floor", "1d6/2")), match_function("floor(1d6/2)"));
        assert_eq!(None, match_function("explode(1d6)"));
        assert_eq!(None, match_function("floor(1d6"));
    }
}
