//! Errors raised while reading declarations
//!
//! A `ParseError` only knows its byte span. Callers that hold the source turn
//! the span into a line and column with [`ParseError::location`].

use std::fmt;

use crate::lexer::{LexError, LineIndex, Location, Span, TokenKind};
use thiserror::Error;

/// Why a source file could not be read as declarations
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}{}", .hint.as_ref().map(|h| format!("; help: {h}")).unwrap_or_default())]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Where the offending token starts and ends
    pub span: Span,
    pub hint: Option<String>,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self {
            kind,
            span,
            hint: None,
        }
    }

    /// Attach a suggestion shown after the message
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Line and column of the error within `source`
    #[must_use]
    pub fn location(&self, source: &str) -> Location {
        LineIndex::new(source).location(self.span.start)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("found `{found}` where {expected} was expected")]
    UnexpectedToken { found: TokenKind, expected: Expected },

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("expected an identifier")]
    ExpectedIdentifier,

    #[error("expected a type")]
    ExpectedType,

    #[error("`{0}` is never closed")]
    UnclosedDelimiter(TokenKind),

    #[error(transparent)]
    Lex(LexError),
}

/// What the parser was looking for when it failed
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    Kind(TokenKind),
    /// Any of several tokens, in the order they are tried
    AnyOf(Vec<TokenKind>),
    /// A construct rather than a single token
    Named(&'static str),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Kind(kind) => write!(f, "`{kind}`"),
            Expected::AnyOf(kinds) => {
                for (i, kind) in kinds.iter().enumerate() {
                    match i {
                        0 => {}
                        _ if i + 1 == kinds.len() => f.write_str(" or ")?,
                        _ => f.write_str(", ")?,
                    }
                    write!(f, "`{kind}`")?;
                }
                Ok(())
            }
            Expected::Named(what) => write!(f, "{what}"),
        }
    }
}
