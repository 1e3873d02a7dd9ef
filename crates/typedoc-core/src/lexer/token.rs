//! Token types for the Rust declaration lexer

use logos::Logos;

/// The kind of token produced by the lexer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("struct")]
    Struct,
    #[token("enum")]
    Enum,
    #[token("pub")]
    Pub,
    #[token("where")]
    Where,

    // ========== Identifiers ==========
    /// Regular identifier (ASCII start)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", priority = 3)]
    Ident,

    /// Raw identifier: `r#type`
    #[regex(r"r#[a-zA-Z_][a-zA-Z0-9_]*")]
    RawIdent,

    /// Unicode identifier (starts with a non-ASCII letter)
    #[regex(r"[\p{XID_Start}][\p{XID_Continue}]*", priority = 2)]
    UnicodeIdent,

    /// Lifetime or label: `'a`, `'static`
    #[regex(r"'[a-zA-Z_][a-zA-Z0-9_]*")]
    Lifetime,

    // ========== Literals ==========
    /// Integer or float literal, with optional suffix
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9_]+)?([a-zA-Z][a-zA-Z0-9_]*)?")]
    Number,

    /// String literal, including byte and C strings
    #[regex(r#"[bc]?"([^"\\]|\\[\s\S])*""#)]
    Str,

    /// Raw string literal: `r"..."`, `r#"..."#`, `br##"..."##`
    #[regex(r##"[bc]?r#*""##, raw_string)]
    RawStr,

    /// Character or byte literal
    #[regex(r"b?'([^'\\\n]|\\[^\n][^'\n]*)'")]
    Char,

    // ========== Punctuation ==========
    #[token("#")]
    Hash,
    #[token("!")]
    Bang,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token("=")]
    Eq,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("&")]
    Ampersand,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("?")]
    Question,
    #[token("|")]
    Pipe,
    #[token("@")]
    At,
    #[token("$")]
    Dollar,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,

    // ========== Comments ==========
    /// Line comment: `// ...` (reclassified as a doc comment by the lexer when it is one)
    #[regex(r"//[^\n]*")]
    LineComment,

    /// Block comment: `/* ... */`, nesting allowed
    #[token("/*", block_comment)]
    BlockComment,

    /// Outer doc comment: `///` or `/** */`
    /// Not matched by logos - produced by the lexer from comment tokens
    OuterDoc,

    /// Inner doc comment: `//!` or `/*! */`
    /// Not matched by logos - produced by the lexer from comment tokens
    InnerDoc,

    // ========== Special ==========
    /// End of file (added by lexer, not matched by logos)
    Eof,

    /// Lexer error - invalid character or unterminated literal
    Error,
}

/// Consume the remainder of a nested block comment after the opening `/*`
fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let rest = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < rest.len() {
        match (rest[i], rest.get(i + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                i += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    lex.bump(i);
                    return true;
                }
            }
            _ => i += 1,
        }
    }
    false
}

/// Consume a raw string body once the `r#*"` opener has been matched
fn raw_string(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let hashes = lex.slice().bytes().filter(|&b| b == b'#').count();
    let closing = format!("\"{}", "#".repeat(hashes));
    match lex.remainder().find(&closing) {
        Some(pos) => {
            lex.bump(pos + closing.len());
            true
        }
        None => false,
    }
}

impl TokenKind {
    /// Returns true if this token is a plain (non-doc) comment
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Returns true if this token is a doc comment of either flavour
    #[must_use]
    pub const fn is_doc(&self) -> bool {
        matches!(self, Self::OuterDoc | Self::InnerDoc)
    }

    /// Returns true if this token reads as a word when rendering source text
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(
            self,
            Self::Struct
                | Self::Enum
                | Self::Pub
                | Self::Where
                | Self::Ident
                | Self::RawIdent
                | Self::UnicodeIdent
                | Self::Lifetime
                | Self::Number
                | Self::Str
                | Self::RawStr
                | Self::Char
        )
    }

    /// Returns true if this token can name a field, variant or type
    #[must_use]
    pub const fn is_ident(&self) -> bool {
        matches!(self, Self::Ident | Self::RawIdent | Self::UnicodeIdent)
    }
}

impl std::fmt::Display for TokenKind {
    #[allow(clippy::match_same_arms)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Struct => write!(f, "struct"),
            Self::Enum => write!(f, "enum"),
            Self::Pub => write!(f, "pub"),
            Self::Where => write!(f, "where"),
            Self::Ident => write!(f, "identifier"),
            Self::RawIdent => write!(f, "identifier"),
            Self::UnicodeIdent => write!(f, "identifier"),
            Self::Lifetime => write!(f, "lifetime"),
            Self::Number => write!(f, "number"),
            Self::Str => write!(f, "string"),
            Self::RawStr => write!(f, "raw string"),
            Self::Char => write!(f, "character"),
            Self::Hash => write!(f, "#"),
            Self::Bang => write!(f, "!"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::LBracket => write!(f, "["),
            Self::RBracket => write!(f, "]"),
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Colon => write!(f, ":"),
            Self::ColonColon => write!(f, "::"),
            Self::Eq => write!(f, "="),
            Self::Arrow => write!(f, "->"),
            Self::FatArrow => write!(f, "=>"),
            Self::Ampersand => write!(f, "&"),
            Self::Star => write!(f, "*"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Slash => write!(f, "/"),
            Self::Dot => write!(f, "."),
            Self::DotDot => write!(f, ".."),
            Self::Question => write!(f, "?"),
            Self::Pipe => write!(f, "|"),
            Self::At => write!(f, "@"),
            Self::Dollar => write!(f, "$"),
            Self::Percent => write!(f, "%"),
            Self::Caret => write!(f, "^"),
            Self::Tilde => write!(f, "~"),
            Self::LineComment => write!(f, "// comment"),
            Self::BlockComment => write!(f, "/* comment */"),
            Self::OuterDoc => write!(f, "doc comment"),
            Self::InnerDoc => write!(f, "inner doc comment"),
            Self::Eof => write!(f, "end of file"),
            Self::Error => write!(f, "error"),
        }
    }
}
