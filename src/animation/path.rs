//! Property paths: [`Component`] lists and their textual form.
//!
//! A path such as `visuals.geometries[0].fill.solid_color:color.r` is a
//! dot-separated list of segments. Each segment names a property, optionally
//! prefixed by the type the property is looked up on (`type:property`) and
//! optionally followed by an array index (`property[index]`).

use std::fmt;

use logos::Logos;

/// Errors from path parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathParseError {
    #[error("empty property path")]
    Empty,
    #[error("unrecognized input at {0}: {1:?}")]
    InvalidToken(usize, String),
    #[error("expected {expected} at {offset}")]
    Expected { expected: &'static str, offset: usize },
    #[error("invalid index at {0}: {1:?}")]
    InvalidIndex(usize, String),
}

/// One segment of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Component {
    /// Type the property belongs to. Empty matches any type.
    pub type_hint: String,
    /// Property name.
    pub property: String,
    /// Element index for array properties.
    pub index: Option<usize>,
}

impl Component {
    /// A component with no type hint and no index.
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            type_hint: String::new(),
            property: property.into(),
            index: None,
        }
    }

    /// Set the type hint (builder).
    pub fn with_type(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = type_hint.into();
        self
    }

    /// Set the index (builder).
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.type_hint.is_empty() {
            write!(f, "{}:", self.type_hint)?;
        }
        f.write_str(&self.property)?;
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

/// An ordered list of components from the root object to a leaf.
pub type ComponentList = Vec<Component>;

/// Render a component list back into a path string.
pub fn format_path(components: &[Component]) -> String {
    components
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Token of the property-path notation.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t]+")]
enum Token {
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Number,

    #[token(".")]
    Dot,

    #[token(":")]
    Colon,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,
}

/// Cursor over lexed tokens.
struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(Token, usize, &'a str)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, PathParseError> {
        let tokens = Token::lexer(input)
            .spanned()
            .map(|(result, span)| match result {
                Ok(token) => Ok((token, span.start, &input[span])),
                Err(()) => Err(PathParseError::InvalidToken(span.start, input[span].to_owned())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { input, tokens, pos: 0 })
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(token, ..)| *token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, offset, _)| *offset)
            .unwrap_or(self.input.len())
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<&'a str, PathParseError> {
        match self.tokens.get(self.pos) {
            Some(&(t, _, text)) if t == token => {
                self.pos += 1;
                Ok(text)
            }
            _ => Err(PathParseError::Expected { expected, offset: self.offset() }),
        }
    }

    fn segment(&mut self) -> Result<Component, PathParseError> {
        let first = self.expect(Token::Ident, "a property name")?;
        let mut component = Component::new(first);
        if self.peek() == Some(Token::Colon) {
            self.pos += 1;
            component.type_hint = first.to_owned();
            component.property = self.expect(Token::Ident, "a property name")?.to_owned();
        }
        if self.peek() == Some(Token::BracketOpen) {
            self.pos += 1;
            let offset = self.offset();
            let digits = self.expect(Token::Number, "an index")?;
            let index = digits
                .parse()
                .map_err(|_| PathParseError::InvalidIndex(offset, digits.to_owned()))?;
            component.index = Some(index);
            self.expect(Token::BracketClose, "`]`")?;
        }
        Ok(component)
    }
}

/// Parse a property path into components.
pub fn parse_path(input: &str) -> Result<ComponentList, PathParseError> {
    let mut parser = Parser::new(input)?;
    if parser.tokens.is_empty() {
        return Err(PathParseError::Empty);
    }
    let mut components = vec![parser.segment()?];
    while parser.peek().is_some() {
        parser.expect(Token::Dot, "`.`")?;
        components.push(parser.segment()?);
    }
    Ok(components)
}

// ===========================================================================
// Tests
// ===========================================================================
