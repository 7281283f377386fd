//! Textual hotkey notation: `"ctrl+k, ctrl+c"` → `Vec<KeyGesture>`.
//!
//! A sequence is a comma-separated list of gestures; a gesture is a list of
//! `+`-joined names where every name but the last is a modifier and the last
//! names the primary key. Names are case-insensitive.

use logos::Logos;

use crate::event::input::{Key, KeyGesture, Modifiers};

/// Errors from gesture parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GestureParseError {
    #[error("empty hotkey")]
    Empty,
    #[error("unrecognized input at {0}: {1:?}")]
    InvalidToken(usize, String),
    #[error("unknown key name: {0}")]
    UnknownKey(String),
    #[error("{0} is not a modifier")]
    NotAModifier(String),
    #[error("a gesture cannot consist of the bare modifier {0}")]
    BareModifier(String),
    #[error("expected a key name at {0}")]
    ExpectedKey(usize),
}

/// Token of the hotkey notation.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    /// Joins modifiers and the primary key.
    #[token("+")]
    Plus,

    /// Separates the gestures of a sequence.
    #[token(",")]
    Comma,

    /// Key or modifier name.
    #[regex(r"[a-zA-Z0-9_]+")]
    Name,

    /// A single punctuation key such as `/` or `.`.
    #[regex(r"[^ \t\r\na-zA-Z0-9_+,]")]
    Symbol,
}

/// Map a modifier name to its flag.
fn modifier_from_name(name: &str) -> Option<Modifiers> {
    match name.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some(Modifiers::CTRL),
        "shift" => Some(Modifiers::SHIFT),
        "alt" | "option" => Some(Modifiers::ALT),
        "super" | "cmd" | "meta" | "win" => Some(Modifiers::SUPER),
        _ => None,
    }
}

/// Lex `input` into `(token, offset, text)` triples, failing on the first error.
fn lex(input: &str) -> Result<Vec<(Token, usize, &str)>, GestureParseError> {
    Token::lexer(input)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => Ok((token, span.start, &input[span])),
            Err(()) => Err(GestureParseError::InvalidToken(
                span.start,
                input[span].to_owned(),
            )),
        })
        .collect()
}

/// Turn the `+`-joined names of one gesture into a [`KeyGesture`].
fn build_gesture(names: &[&str]) -> Result<KeyGesture, GestureParseError> {
    let (last, mods) = names.split_last().ok_or(GestureParseError::Empty)?;
    let mut modifiers = Modifiers::NONE;
    for name in mods {
        let flag = modifier_from_name(name)
            .ok_or_else(|| GestureParseError::NotAModifier((*name).to_owned()))?;
        modifiers = modifiers | flag;
    }
    let key = Key::from_name(last).ok_or_else(|| GestureParseError::UnknownKey((*last).to_owned()))?;
    if key.is_modifier() {
        return Err(GestureParseError::BareModifier((*last).to_owned()));
    }
    Ok(KeyGesture::new(key, modifiers))
}

/// Parse a comma-separated gesture sequence.
pub fn parse_sequence(input: &str) -> Result<Vec<KeyGesture>, GestureParseError> {
    let tokens = lex(input)?;
    if tokens.is_empty() {
        return Err(GestureParseError::Empty);
    }

    let mut sequence = Vec::new();
    let mut names: Vec<&str> = Vec::new();
    // Whether the next token must be a key name.
    let mut expect_name = true;
    for (token, offset, text) in tokens {
        match token {
            Token::Name | Token::Symbol if expect_name => {
                names.push(text);
                expect_name = false;
            }
            Token::Plus | Token::Comma if !expect_name => {
                if token == Token::Comma {
                    sequence.push(build_gesture(&names)?);
                    names.clear();
                }
                expect_name = true;
            }
            Token::Name | Token::Symbol => {
                return Err(GestureParseError::InvalidToken(offset, text.to_owned()));
            }
            Token::Plus | Token::Comma => return Err(GestureParseError::ExpectedKey(offset)),
        }
    }
    if expect_name {
        return Err(GestureParseError::ExpectedKey(input.len()));
    }
    sequence.push(build_gesture(&names)?);
    Ok(sequence)
}

/// Parse a single gesture such as `"ctrl+shift+p"`.
pub fn parse_gesture(input: &str) -> Result<KeyGesture, GestureParseError> {
    let mut sequence = parse_sequence(input)?;
    if sequence.len() != 1 {
        return Err(GestureParseError::InvalidToken(0, input.to_owned()));
    }
    Ok(sequence.remove(0))
}

/// Render a sequence back into notation, e.g. `"Ctrl+K, Ctrl+C"`.
pub fn format_sequence(sequence: &[KeyGesture]) -> String {
    sequence
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_plain_key() {
        assert_eq!(parse_gesture("a").unwrap(), KeyGesture::plain(Key::Char('a')));
    }

    #[test]
    fn modifiers_are_case_insensitive() {
        let g = parse_gesture("Ctrl+SHIFT+p").unwrap();
        assert_eq!(g, KeyGesture::new(Key::Char('p'), Modifiers::CTRL | Modifiers::SHIFT));
    }

    #[test]
    fn chord_sequence() {
        let seq = parse_sequence("ctrl+k, ctrl+c").unwrap();
        assert_eq!(
            seq,
            vec![KeyGesture::ctrl(Key::Char('k')), KeyGesture::ctrl(Key::Char('c'))]
        );
    }

    #[test]
    fn symbol_and_named_keys() {
        let seq = parse_sequence("ctrl+/, alt+enter, f5").unwrap();
        assert_eq!(
            seq,
            vec![
                KeyGesture::ctrl(Key::Char('/')),
                KeyGesture::new(Key::Enter, Modifiers::ALT),
                KeyGesture::plain(Key::F(5)),
            ]
        );
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(parse_sequence("   "), Err(GestureParseError::Empty));
    }

    #[test]
    fn rejects_bare_modifier() {
        assert_eq!(
            parse_sequence("ctrl"),
            Err(GestureParseError::BareModifier("ctrl".into()))
        );
    }

    #[test]
    fn rejects_non_modifier_prefix() {
        assert_eq!(
            parse_sequence("k+c"),
            Err(GestureParseError::NotAModifier("k".into()))
        );
    }

    #[test]
    fn rejects_dangling_separator() {
        assert!(matches!(parse_sequence("ctrl+"), Err(GestureParseError::ExpectedKey(_))));
        assert!(matches!(parse_sequence("ctrl+k,"), Err(GestureParseError::ExpectedKey(_))));
        assert!(matches!(parse_sequence(", a"), Err(GestureParseError::ExpectedKey(0))));
    }

    #[test]
    fn rejects_unknown_key() {
        assert_eq!(
            parse_sequence("ctrl+banana"),
            Err(GestureParseError::UnknownKey("banana".into()))
        );
    }

    #[test]
    fn parse_gesture_rejects_sequences() {
        assert!(parse_gesture("a, b").is_err());
    }

    #[test]
    fn format_round_trip_text() {
        let seq = parse_sequence("ctrl+k, ctrl+shift+c").unwrap();
        insta::assert_snapshot!(format_sequence(&seq), @"Ctrl+K, Ctrl+Shift+C");
    }
}
