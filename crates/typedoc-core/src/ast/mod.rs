//! Declarations recovered from a Rust source file
//!
//! Only the parts of the language that carry documentation for configuration
//! types are modelled: structs, enums, their fields and variants, attributes,
//! and doc comments. Everything else in a file is skipped by the parser.

mod attr;

pub use attr::{unquote, Attribute, DefaultAttr, MetaItem, RenameRule, SerdeAttrs};

use crate::lexer::Span;

/// An identifier with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    /// The identifier as written, without any `r#` prefix
    pub name: String,
    pub span: Span,
}

impl Ident {
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        let name = name.into();
        let name = match name.strip_prefix("r#") {
            Some(stripped) => stripped.to_string(),
            None => name,
        };
        Self { name, span }
    }
}

/// A parsed source file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFile {
    /// Inner documentation (`//!`, `/*! */`, `#![doc = "..."]`), one entry per comment
    pub docs: Vec<String>,
    /// Documentable declarations, in source order
    pub items: Vec<Decl>,
}

impl SourceFile {
    /// Iterate over the struct declarations
    pub fn structs(&self) -> impl Iterator<Item = &StructDecl> {
        self.items.iter().filter_map(|item| match item {
            Decl::Struct(s) => Some(s),
            Decl::Enum(_) => None,
        })
    }

    /// Iterate over the enum declarations
    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.items.iter().filter_map(|item| match item {
            Decl::Enum(e) => Some(e),
            Decl::Struct(_) => None,
        })
    }
}

/// A top-level declaration worth documenting
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Struct(StructDecl),
    Enum(EnumDecl),
}

impl Decl {
    /// The declared type name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Decl::Struct(s) => &s.name.name,
            Decl::Enum(e) => &e.name.name,
        }
    }
}

/// A struct declaration
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: Ident,
    /// Generic parameter list as compact source text, including the angle brackets
    pub generics: Option<String>,
    /// Outer doc comments, one entry per comment
    pub docs: Vec<String>,
    pub attrs: Vec<Attribute>,
    pub fields: Fields,
    pub span: Span,
}

/// An enum declaration
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Ident,
    /// Generic parameter list as compact source text, including the angle brackets
    pub generics: Option<String>,
    /// Outer doc comments, one entry per comment
    pub docs: Vec<String>,
    pub attrs: Vec<Attribute>,
    pub variants: Vec<VariantDecl>,
    pub span: Span,
}

/// The body shape of a struct or enum variant
#[derive(Debug, Clone, PartialEq)]
pub enum Fields {
    /// `{ a: T, b: U }`
    Named(Vec<FieldDecl>),
    /// `(T, U)`
    Tuple(Vec<FieldDecl>),
    /// No body
    Unit,
}

impl Fields {
    /// The fields in declaration order; empty for unit bodies
    #[must_use]
    pub fn as_slice(&self) -> &[FieldDecl] {
        match self {
            Fields::Named(fields) | Fields::Tuple(fields) => fields,
            Fields::Unit => &[],
        }
    }
}

/// A single struct or variant field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Field name; `None` for tuple fields
    pub name: Option<Ident>,
    /// Field type as compact source text
    pub ty: String,
    pub docs: Vec<String>,
    pub attrs: Vec<Attribute>,
    pub span: Span,
}

/// A single enum variant
#[derive(Debug, Clone, PartialEq)]
pub struct VariantDecl {
    pub name: Ident,
    pub docs: Vec<String>,
    pub attrs: Vec<Attribute>,
    pub fields: Fields,
    /// Explicit discriminant expression, if any
    pub discriminant: Option<String>,
    pub span: Span,
}

/// Render a token run as compact source text.
///
/// Spacing follows rustfmt closely enough for type signatures:
/// `Option<Vec<String>>`, `&'a mut [u8; 4]`, `Box<dyn Fn(u8) -> u8 + Send>`.
#[must_use]
pub fn render_tokens(tokens: &[crate::lexer::Token]) -> String {
    use crate::lexer::TokenKind as K;

    const PREFIX_WORDS: [&str; 5] = ["mut", "dyn", "impl", "const", "unsafe"];

    let mut out = String::new();
    let mut prev: Option<&crate::lexer::Token> = None;
    for token in tokens {
        if let Some(prev) = prev {
            let space = match (prev.kind, token.kind) {
                _ if PREFIX_WORDS.contains(&prev.lexeme.as_str()) => true,
                (
                    _,
                    K::Comma
                    | K::Semicolon
                    | K::Gt
                    | K::RParen
                    | K::RBracket
                    | K::ColonColon
                    | K::Question
                    | K::Dot
                    | K::Colon
                    | K::Lt
                    | K::LParen
                    | K::LBracket,
                )
                | (
                    K::Lt
                    | K::LParen
                    | K::LBracket
                    | K::ColonColon
                    | K::Ampersand
                    | K::Star
                    | K::Bang
                    | K::Hash
                    | K::Dot,
                    _,
                ) => false,
                (K::Comma | K::Semicolon | K::Colon | K::Arrow | K::FatArrow | K::Plus | K::Eq, _)
                | (_, K::Arrow | K::FatArrow | K::Plus | K::Eq) => true,
                (p, c) => (p.is_word() || matches!(p, K::Gt | K::RParen | K::RBracket)) && c.is_word(),
            };
            if space {
                out.push(' ');
            }
        }
        out.push_str(&token.lexeme);
        prev = Some(token);
    }
    out
}
