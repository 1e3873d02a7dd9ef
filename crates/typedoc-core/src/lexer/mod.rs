//! Lexer for Rust source files
//!
//! The lexer only needs to be good enough to find type declarations and the
//! documentation attached to them. It handles:
//! - Identifiers, raw identifiers, lifetimes and punctuation
//! - String, raw string, char and numeric literals
//! - Doc comments (`///`, `//!`, `/** */`, `/*! */`) as real tokens
//! - Plain and nested block comments as trivia

mod span;
mod token;

pub use span::{LineIndex, Location, Span};
pub use token::TokenKind;

use logos::Logos;
use thiserror::Error;

/// A token with its kind, span, and source text
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
    /// The source text of the token
    pub lexeme: String,
}

impl Token {
    /// Create a new token
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
        }
    }

    /// Text of a doc comment token with its markers removed.
    ///
    /// Line docs lose the `///` or `//!` prefix and one following space. Block
    /// docs lose their delimiters and any leading ` * ` gutter on each line.
    #[must_use]
    pub fn doc_text(&self) -> Option<String> {
        if !self.kind.is_doc() {
            return None;
        }
        let text = self.lexeme.as_str();
        if let Some(rest) = text.strip_prefix("///").or_else(|| text.strip_prefix("//!")) {
            return Some(rest.strip_prefix(' ').unwrap_or(rest).trim_end().to_string());
        }

        let body = text
            .strip_prefix("/**")
            .or_else(|| text.strip_prefix("/*!"))
            .unwrap_or(text);
        let body = body.strip_suffix("*/").unwrap_or(body);
        let lines: Vec<&str> = body
            .lines()
            .map(|line| {
                let trimmed = line.trim_start();
                match trimmed.strip_prefix('*') {
                    Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                    None => trimmed,
                }
                .trim_end()
            })
            .collect();
        Some(lines.join("\n").trim_matches('\n').to_string())
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character")]
    UnexpectedChar,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("unterminated raw string literal")]
    UnterminatedRawString,
}

/// A lexer error with location information
#[derive(Debug, Clone)]
pub struct SpannedError {
    pub error: LexError,
    pub span: Span,
}

impl SpannedError {
    #[must_use]
    pub fn new(error: LexError, span: Span) -> Self {
        Self { error, span }
    }
}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.span)
    }
}

impl std::error::Error for SpannedError {}

/// The Rust declaration lexer
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, TokenKind>,
    /// Set once the EOF token has been emitted
    finished: bool,
    /// Collected errors during lexing
    errors: Vec<SpannedError>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            finished: false,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, returning all tokens and any errors
    #[must_use]
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<SpannedError>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.collect_all();
        (tokens, lexer.errors)
    }

    /// Collect all tokens from the source, ending with EOF
    pub fn collect_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Get the next token, or `None` once EOF has been returned
    pub fn next_token(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        let Some(result) = self.inner.next() else {
            self.finished = true;
            let end = self.inner.source().len();
            return Some(Token::new(TokenKind::Eof, Span::new(end, end), ""));
        };

        let span = Span::from(self.inner.span());
        let lexeme = self.inner.slice();

        match result {
            Ok(kind) => Some(Token::new(classify_comment(kind, lexeme), span, lexeme)),
            Err(()) => {
                let error = if lexeme.starts_with("/*") {
                    LexError::UnterminatedBlockComment
                } else if is_raw_string_opener(lexeme) {
                    LexError::UnterminatedRawString
                } else {
                    LexError::UnexpectedChar
                };
                self.errors.push(SpannedError::new(error, span));
                Some(Token::new(TokenKind::Error, span, lexeme))
            }
        }
    }
}

/// `r"`, `r#"`, `br##"`, `cr"` and so on, with nothing after the quote
fn is_raw_string_opener(lexeme: &str) -> bool {
    let rest = lexeme.strip_prefix(['b', 'c']).unwrap_or(lexeme);
    rest.strip_prefix('r')
        .and_then(|rest| rest.strip_suffix('"'))
        .is_some_and(|hashes| hashes.bytes().all(|b| b == b'#'))
}

/// Promote comments written with doc markers to doc comment tokens.
///
/// `////` and `/***` are ordinary comments, as are the empty `/**/`.
fn classify_comment(kind: TokenKind, lexeme: &str) -> TokenKind {
    match kind {
        TokenKind::LineComment if lexeme.starts_with("//!") => TokenKind::InnerDoc,
        TokenKind::LineComment if lexeme.starts_with("///") && !lexeme.starts_with("////") => {
            TokenKind::OuterDoc
        }
        TokenKind::BlockComment if lexeme.starts_with("/*!") => TokenKind::InnerDoc,
        TokenKind::BlockComment
            if lexeme.starts_with("/**") && !lexeme.starts_with("/***") && lexeme != "/**/" =>
        {
            TokenKind::OuterDoc
        }
        other => other,
    }
}
