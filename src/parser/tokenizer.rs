use crate::dice::grammar::OPERATORS;
use crate::error::DiceParsingError;

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// Split a roll expression into raw tokens. Operators are tokens of
/// their own, parenthesized groups and function calls stay in one
/// token, and bracketed flavor text is never split.
pub fn tokenize(input: &str) -> Result<Vec<String>, DiceParsingError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_flavor = false;

    for c in input.chars() {
        if in_flavor {
            current.push(c);
            if c == ']' {
                in_flavor = false;
            }
            continue;
        }

        match c {
            '[' => {
                in_flavor = true;
                current.push(c);
            }
            ']' => return Err(DiceParsingError::UnbalancedGroup),
            '(' => {
                // A group right after a name is a function call.
                if depth == 0 && !current.chars().all(|c| c.is_ascii_alphabetic()) {
                    flush(&mut tokens, &mut current);
                }
                depth += 1;
                current.push(c);
            }
            ')' => {
                if depth == 0 {
                    return Err(DiceParsingError::UnbalancedGroup);
                }
                depth -= 1;
                current.push(c);
            }
            _ if depth > 0 => current.push(c),
            c if c.is_whitespace() => flush(&mut tokens, &mut current),
            c if OPERATORS.contains(c) => {
                flush(&mut tokens, &mut current);
                tokens.push(c.to_string());
            }
            _ => current.push(c),
        }
    }

    if depth > 0 || in_flavor {
        return Err(DiceParsingError::UnbalancedGroup);
    }

    flush(&mut tokens, &mut current);
    Ok(tokens)
}
