//! Parser for Rust declaration sources
//!
//! A recursive-descent parser that recovers struct and enum declarations,
//! together with their attributes and doc comments, from a token stream.
//! Any other item is skipped by matching delimiters, so function bodies,
//! impl blocks and macro invocations never need to be understood.
//!
//! Parsing stops at the first error.
//!
//! # Example
//!
//! ```
//! use typedoc_core::parser::Parser;
//!
//! let source = "/// A volume mount\npub struct Volume { pub size: u64 }";
//! let file = Parser::parse_file(source).unwrap();
//! assert_eq!(file.items[0].name(), "Volume");
//! ```

mod error;

pub use error::{Expected, ParseError, ParseErrorKind};

use crate::ast::{
    render_tokens, Attribute, Decl, EnumDecl, FieldDecl, Fields, Ident, SourceFile, StructDecl,
    VariantDecl,
};
use crate::lexer::{Lexer, Span, Token, TokenKind};

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Docs and attributes written in front of an item, field or variant
#[derive(Default)]
struct Preamble {
    docs: Vec<String>,
    attrs: Vec<Attribute>,
}

/// The declaration parser
pub struct Parser {
    /// Tokens from the source, with plain comments removed
    tokens: Vec<Token>,
    /// Current position in the token stream
    position: usize,
    /// Returned once the stream is exhausted
    eof: Token,
}

impl Parser {
    /// Create a new parser, failing on the first lexer error
    pub fn new(source: &str) -> ParseResult<Self> {
        let (tokens, errors) = Lexer::tokenize(source);
        if let Some(first) = errors.into_iter().next() {
            return Err(ParseError::new(
                ParseErrorKind::Lex(first.error),
                first.span,
            ));
        }
        let eof = tokens
            .last()
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, Span::default(), ""));
        let tokens = tokens
            .into_iter()
            .filter(|token| !token.kind.is_trivia())
            .collect();
        Ok(Self {
            tokens,
            position: 0,
            eof,
        })
    }

    /// Parse an entire source file
    pub fn parse_file(source: &str) -> ParseResult<SourceFile> {
        Parser::new(source)?.file()
    }

    // ==================== Token Management ====================

    /// Get the current token
    fn current(&self) -> &Token {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    /// Get the current token kind
    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Check if we're at end of file
    fn is_eof(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Advance to the next token
    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    /// Peek at the token after the current one
    fn peek(&self) -> &Token {
        self.tokens.get(self.position + 1).unwrap_or(&self.eof)
    }

    /// Span of the most recently consumed token
    fn previous_span(&self) -> Span {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(self.eof.span, |token| token.span)
    }

    /// Check if the current token matches a kind
    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume a token if it matches, returning it
    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expect and consume a specific token, or error
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(Expected::Kind(kind)))
        }
    }

    /// Expect an identifier token
    fn expect_ident(&mut self) -> ParseResult<Ident> {
        let token = self.current().clone();
        if token.kind.is_ident() {
            self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else if token.kind == TokenKind::Eof {
            Err(ParseError::new(ParseErrorKind::UnexpectedEof, token.span))
        } else {
            Err(ParseError::new(ParseErrorKind::ExpectedIdentifier, token.span))
        }
    }

    /// Build an error for the current token
    fn unexpected(&self, expected: Expected) -> ParseError {
        let token = self.current();
        let kind = if token.kind == TokenKind::Eof {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::UnexpectedToken {
                found: token.kind,
                expected,
            }
        };
        ParseError::new(kind, token.span)
    }

    // ==================== Token Groups ====================

    /// Consume a balanced delimiter group, returning it with its delimiters
    fn delimited(&mut self) -> ParseResult<Vec<Token>> {
        let open = self.advance();
        let mut stack = vec![open.kind];
        let mut tokens = vec![open.clone()];
        while let Some(&top) = stack.last() {
            let kind = self.current_kind();
            match kind {
                TokenKind::Eof => {
                    return Err(
                        ParseError::new(ParseErrorKind::UnclosedDelimiter(top), open.span)
                            .with_hint(format!("add a matching '{}'", closer(top))),
                    );
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => stack.push(kind),
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if kind != closer(top) {
                        return Err(self.unexpected(Expected::Kind(closer(top))));
                    }
                    stack.pop();
                }
                _ => {}
            }
            tokens.push(self.advance());
        }
        Ok(tokens)
    }

    /// Collect tokens up to one of `terminators` at nesting depth zero.
    ///
    /// Delimiter groups are always balanced; angle brackets only count
    /// towards the depth when `angles` is set, since `<` is also an operator.
    fn collect_until(&mut self, terminators: &[TokenKind], angles: bool) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut angle_depth = 0usize;
        loop {
            let kind = self.current_kind();
            if angle_depth == 0 && terminators.contains(&kind) {
                return Ok(tokens);
            }
            match kind {
                TokenKind::Eof => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedEof,
                        self.current().span,
                    ));
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                    tokens.extend(self.delimited()?);
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    return Err(self.unexpected(Expected::AnyOf(terminators.to_vec())));
                }
                TokenKind::Lt if angles => {
                    angle_depth += 1;
                    tokens.push(self.advance());
                }
                TokenKind::Gt if angles && angle_depth > 0 => {
                    angle_depth -= 1;
                    tokens.push(self.advance());
                }
                _ => tokens.push(self.advance()),
            }
        }
    }

    // ==================== File Parsing ====================

    /// Parse a complete source file
    fn file(&mut self) -> ParseResult<SourceFile> {
        let mut file = SourceFile::default();
        loop {
            match self.current_kind() {
                TokenKind::InnerDoc => {
                    let token = self.advance();
                    file.docs.extend(token.doc_text());
                }
                TokenKind::Hash if self.peek().kind == TokenKind::Bang => {
                    let attr = self.attribute()?;
                    file.docs.extend(attr.doc_value());
                }
                _ => break,
            }
        }

        while !self.is_eof() {
            if let Some(decl) = self.item()? {
                file.items.push(decl);
            }
        }
        Ok(file)
    }

    /// Doc comments and attributes in front of the next item
    fn preamble(&mut self) -> ParseResult<Preamble> {
        let mut preamble = Preamble::default();
        loop {
            match self.current_kind() {
                TokenKind::OuterDoc => {
                    let token = self.advance();
                    preamble.docs.extend(token.doc_text());
                }
                // Misplaced inner docs document nothing we render
                TokenKind::InnerDoc => {
                    self.advance();
                }
                TokenKind::Hash => {
                    let attr = self.attribute()?;
                    match attr.doc_value() {
                        Some(doc) => preamble.docs.push(doc),
                        None => preamble.attrs.push(attr),
                    }
                }
                _ => return Ok(preamble),
            }
        }
    }

    /// Parse `#[...]` or `#![...]`
    fn attribute(&mut self) -> ParseResult<Attribute> {
        let start = self.expect(TokenKind::Hash)?.span;
        self.eat(TokenKind::Bang);
        self.expect(TokenKind::LBracket)?;

        let mut path = self.expect_ident()?.name;
        while self.eat(TokenKind::ColonColon).is_some() {
            path.push_str("::");
            path.push_str(&self.expect_ident()?.name);
        }

        let mut args = Vec::new();
        let mut value = None;
        match self.current_kind() {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                let group = self.delimited()?;
                if let [_, inner @ .., _] = group.as_slice() {
                    args = inner.to_vec();
                }
            }
            TokenKind::Eq => {
                self.advance();
                let tokens = self.collect_until(&[TokenKind::RBracket], false)?;
                value = tokens.into_iter().next();
            }
            _ => {}
        }

        let end = self.expect(TokenKind::RBracket)?.span;
        Ok(Attribute {
            path,
            args,
            value,
            span: start.merge(end),
        })
    }

    /// Skip `pub`, `pub(crate)`, `pub(super)`, `pub(self)` and `pub(in path)`
    fn visibility(&mut self) -> ParseResult<()> {
        if self.eat(TokenKind::Pub).is_some()
            && self.check(TokenKind::LParen)
            && is_restriction(self.peek())
        {
            self.delimited()?;
        }
        Ok(())
    }

    // ==================== Item Parsing ====================

    /// Parse a top-level item, returning it when it is worth documenting
    fn item(&mut self) -> ParseResult<Option<Decl>> {
        let preamble = self.preamble()?;
        let start = self.current().span;
        self.visibility()?;

        match self.current_kind() {
            TokenKind::Struct => Ok(Some(Decl::Struct(self.struct_decl(preamble, start)?))),
            TokenKind::Enum => Ok(Some(Decl::Enum(self.enum_decl(preamble, start)?))),
            TokenKind::Eof => Ok(None),
            _ => {
                self.skip_item()?;
                Ok(None)
            }
        }
    }

    /// Skip an item we do not document: up to a `;` or through a `{ ... }` body
    fn skip_item(&mut self) -> ParseResult<()> {
        loop {
            match self.current_kind() {
                TokenKind::Eof => return Ok(()),
                TokenKind::Semicolon => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::LBrace => {
                    self.delimited()?;
                    return Ok(());
                }
                TokenKind::LParen | TokenKind::LBracket => {
                    self.delimited()?;
                }
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    return Err(self.unexpected(Expected::Named("an item")));
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Parse a struct declaration
    fn struct_decl(&mut self, preamble: Preamble, start: Span) -> ParseResult<StructDecl> {
        self.expect(TokenKind::Struct)?;
        let name = self.expect_ident()?;
        let generics = self.generics()?;
        self.where_clause()?;

        let fields = match self.current_kind() {
            TokenKind::LBrace => Fields::Named(self.named_fields()?),
            TokenKind::LParen => {
                let fields = self.tuple_fields()?;
                self.where_clause()?;
                self.expect(TokenKind::Semicolon)?;
                Fields::Tuple(fields)
            }
            TokenKind::Semicolon => {
                self.advance();
                Fields::Unit
            }
            _ => {
                return Err(self.unexpected(Expected::AnyOf(vec![
                    TokenKind::LBrace,
                    TokenKind::LParen,
                    TokenKind::Semicolon,
                ])));
            }
        };

        Ok(StructDecl {
            name,
            generics,
            docs: preamble.docs,
            attrs: preamble.attrs,
            fields,
            span: start.merge(self.previous_span()),
        })
    }

    /// Parse an enum declaration
    fn enum_decl(&mut self, preamble: Preamble, start: Span) -> ParseResult<EnumDecl> {
        self.expect(TokenKind::Enum)?;
        let name = self.expect_ident()?;
        let generics = self.generics()?;
        self.where_clause()?;
        self.expect(TokenKind::LBrace)?;

        let mut variants = Vec::new();
        loop {
            let variant_preamble = self.preamble()?;
            if self.eat(TokenKind::RBrace).is_some() {
                break;
            }
            variants.push(self.variant(variant_preamble)?);
            if self.eat(TokenKind::Comma).is_none() {
                self.expect(TokenKind::RBrace)?;
                break;
            }
        }

        Ok(EnumDecl {
            name,
            generics,
            docs: preamble.docs,
            attrs: preamble.attrs,
            variants,
            span: start.merge(self.previous_span()),
        })
    }

    /// Parse a single enum variant
    fn variant(&mut self, preamble: Preamble) -> ParseResult<VariantDecl> {
        let start = self.current().span;
        self.visibility()?;
        let name = self.expect_ident()?;

        let fields = match self.current_kind() {
            TokenKind::LBrace => Fields::Named(self.named_fields()?),
            TokenKind::LParen => Fields::Tuple(self.tuple_fields()?),
            _ => Fields::Unit,
        };

        let discriminant = if self.eat(TokenKind::Eq).is_some() {
            let tokens = self.collect_until(&[TokenKind::Comma, TokenKind::RBrace], false)?;
            if tokens.is_empty() {
                return Err(self.unexpected(Expected::Named("a discriminant")));
            }
            Some(render_tokens(&tokens))
        } else {
            None
        };

        Ok(VariantDecl {
            name,
            docs: preamble.docs,
            attrs: preamble.attrs,
            fields,
            discriminant,
            span: start.merge(self.previous_span()),
        })
    }

    /// Parse `{ name: Type, ... }`
    fn named_fields(&mut self) -> ParseResult<Vec<FieldDecl>> {
        self.expect(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        loop {
            let preamble = self.preamble()?;
            if self.eat(TokenKind::RBrace).is_some() {
                return Ok(fields);
            }

            let start = self.current().span;
            self.visibility()?;
            let name = self.expect_ident()?;
            self.expect(TokenKind::Colon)?;
            let ty = self.ty(&[TokenKind::Comma, TokenKind::RBrace])?;
            fields.push(FieldDecl {
                name: Some(name),
                ty,
                docs: preamble.docs,
                attrs: preamble.attrs,
                span: start.merge(self.previous_span()),
            });

            if self.eat(TokenKind::Comma).is_none() {
                self.expect(TokenKind::RBrace)?;
                return Ok(fields);
            }
        }
    }

    /// Parse `(Type, ...)`
    fn tuple_fields(&mut self) -> ParseResult<Vec<FieldDecl>> {
        self.expect(TokenKind::LParen)?;
        let mut fields = Vec::new();
        loop {
            let preamble = self.preamble()?;
            if self.eat(TokenKind::RParen).is_some() {
                return Ok(fields);
            }

            let start = self.current().span;
            self.visibility()?;
            let ty = self.ty(&[TokenKind::Comma, TokenKind::RParen])?;
            fields.push(FieldDecl {
                name: None,
                ty,
                docs: preamble.docs,
                attrs: preamble.attrs,
                span: start.merge(self.previous_span()),
            });

            if self.eat(TokenKind::Comma).is_none() {
                self.expect(TokenKind::RParen)?;
                return Ok(fields);
            }
        }
    }

    /// Parse a type up to one of `terminators`, rendered as compact source text
    fn ty(&mut self, terminators: &[TokenKind]) -> ParseResult<String> {
        let tokens = self.collect_until(terminators, true)?;
        if tokens.is_empty() {
            return Err(ParseError::new(ParseErrorKind::ExpectedType, self.current().span));
        }
        Ok(render_tokens(&tokens))
    }

    /// Parse an optional `<...>` parameter list
    fn generics(&mut self) -> ParseResult<Option<String>> {
        let Some(open) = self.eat(TokenKind::Lt) else {
            return Ok(None);
        };
        let mut tokens = vec![open];
        tokens.extend(self.collect_until(&[TokenKind::Gt], true)?);
        tokens.push(self.expect(TokenKind::Gt)?);
        Ok(Some(render_tokens(&tokens)))
    }

    /// Skip an optional `where` clause
    fn where_clause(&mut self) -> ParseResult<()> {
        if self.eat(TokenKind::Where).is_some() {
            self.collect_until(&[TokenKind::LBrace, TokenKind::Semicolon], true)?;
        }
        Ok(())
    }
}

/// The closing delimiter for an opening one
fn closer(open: TokenKind) -> TokenKind {
    match open {
        TokenKind::LParen => TokenKind::RParen,
        TokenKind::LBracket => TokenKind::RBracket,
        _ => TokenKind::RBrace,
    }
}

fn is_restriction(token: &Token) -> bool {
    token.kind == TokenKind::Ident
        && matches!(token.lexeme.as_str(), "crate" | "super" | "self" | "in")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{LexError, Location};

    fn parse(source: &str) -> SourceFile {
        match Parser::parse_file(source) {
            Ok(file) => file,
            Err(e) => panic!("parse failed: {e}"),
        }
    }

    fn parse_err(source: &str) -> ParseError {
        match Parser::parse_file(source) {
            Ok(_) => panic!("expected a parse error"),
            Err(e) => e,
        }
    }

    fn only_struct(file: &SourceFile) -> &StructDecl {
        file.structs().next().expect("a struct")
    }

    #[test]
    fn parse_named_struct() {
        let file = parse(
            r#"
/// Secret reference
///
/// Points at a key in a secret store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRef {
    /// Name of the secret
    pub name: String,
    #[serde(default)]
    pub(crate) key: Option<String>,
    retries: HashMap<String, Vec<u32>>,
}
"#,
        );
        let s = only_struct(&file);
        assert_eq!(s.name.name, "SecretRef");
        assert_eq!(
            s.docs,
            vec!["Secret reference", "", "Points at a key in a secret store."]
        );
        assert_eq!(s.attrs.len(), 2);
        assert!(s.attrs[1].is("serde"));

        let fields = s.fields.as_slice();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name.as_ref().map(|n| n.name.as_str()), Some("name"));
        assert_eq!(fields[0].docs, vec!["Name of the secret"]);
        assert_eq!(fields[1].ty, "Option<String>");
        assert_eq!(fields[1].attrs.len(), 1);
        assert_eq!(fields[2].ty, "HashMap<String, Vec<u32>>");
    }

    #[test]
    fn parse_tuple_and_unit_structs() {
        let file = parse("pub struct Size(pub u64, (u8, u8));\nstruct Marker;");
        let structs: Vec<_> = file.structs().collect();
        assert_eq!(structs.len(), 2);
        match &structs[0].fields {
            Fields::Tuple(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].ty, "u64");
                assert_eq!(fields[1].ty, "(u8, u8)");
                assert!(fields[0].name.is_none());
            }
            other => panic!("expected tuple fields, got {other:?}"),
        }
        assert_eq!(structs[1].fields, Fields::Unit);
    }

    #[test]
    fn parse_generics_and_where_clauses() {
        let file = parse(
            "struct Cache<'a, T: Clone = Vec<u8>, const N: usize> where T: Send + 'a { items: [T; N] }\n\
             struct Wrapper<T>(T) where T: Default;",
        );
        let structs: Vec<_> = file.structs().collect();
        assert_eq!(
            structs[0].generics.as_deref(),
            Some("<'a, T: Clone = Vec<u8>, const N: usize>")
        );
        assert_eq!(structs[0].fields.as_slice()[0].ty, "[T; N]");
        assert_eq!(structs[1].generics.as_deref(), Some("<T>"));
    }

    #[test]
    fn parse_enum_variants() {
        let file = parse(
            r#"
/// Access modes
pub enum AccessMode {
    /// Single writer
    ReadWriteOnce = 1,
    ReadOnlyMany = -2,
    #[serde(rename = "rwx")]
    Shared { nodes: Vec<String> },
    Pair(u8, u8),
}
"#,
        );
        let e = file.enums().next().expect("an enum");
        assert_eq!(e.name.name, "AccessMode");
        assert_eq!(e.docs, vec!["Access modes"]);
        assert_eq!(e.variants.len(), 4);
        assert_eq!(e.variants[0].docs, vec!["Single writer"]);
        assert_eq!(e.variants[0].discriminant.as_deref(), Some("1"));
        assert_eq!(e.variants[1].discriminant.as_deref(), Some("-2"));
        assert_eq!(e.variants[2].attrs.len(), 1);
        assert!(matches!(&e.variants[2].fields, Fields::Named(f) if f.len() == 1));
        assert!(matches!(&e.variants[3].fields, Fields::Tuple(f) if f.len() == 2));
    }

    #[test]
    fn other_items_are_skipped() {
        let file = parse(
            r#"
use std::collections::{BTreeMap, HashMap};
const LIMIT: Limits = Limits { max: 3 };
static NAMES: &[&str] = &["a", "b"];
macro_rules! noop { ($x:expr) => { $x }; }
noop!(1);
fn build() -> Option<u8> { struct Hidden; None }
impl Default for Volume { fn default() -> Self { Self { size: 0 } } }
mod inner { pub struct AlsoHidden; }
#[cfg(test)]
mod tests {}
pub struct Volume { size: u64 }
"#,
        );
        let names: Vec<_> = file.items.iter().map(Decl::name).collect();
        assert_eq!(names, vec!["Volume"]);
    }

    #[test]
    fn inner_docs_and_doc_attributes() {
        let file = parse(
            r#"//! Volume types
#![doc = " Second line"]
#![allow(dead_code)]

#[doc = " Documented by attribute"]
#[doc(hidden)]
struct Volume;
"#,
        );
        assert_eq!(file.docs, vec!["Volume types", "Second line"]);
        let s = only_struct(&file);
        assert_eq!(s.docs, vec!["Documented by attribute"]);
        assert_eq!(s.attrs.len(), 1);
        assert!(s.attrs[0].is("doc"));
    }

    #[test]
    fn raw_identifiers_and_restricted_visibility() {
        let file = parse("pub(in crate::types) struct r#Type { pub(super) r#type: String }");
        let s = only_struct(&file);
        assert_eq!(s.name.name, "Type");
        assert_eq!(
            s.fields.as_slice()[0].name.as_ref().map(|n| n.name.as_str()),
            Some("type")
        );
    }

    #[test]
    fn missing_brace_is_unexpected_eof() {
        let err = parse_err("struct Volume { size: u64");
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn unclosed_group_reports_opening_delimiter() {
        let source = "fn main() {\n    let x = (1, 2;\n}";
        let err = parse_err(source);
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
        assert_eq!(err.location(source), Location { line: 3, column: 1 });

        let err = parse_err("impl Volume {");
        assert_eq!(err.kind, ParseErrorKind::UnclosedDelimiter(TokenKind::LBrace));
        assert!(err.hint.is_some());
    }

    #[test]
    fn lexer_errors_fail_the_parse() {
        let source = "struct Volume;\n/* open";
        let err = parse_err(source);
        assert_eq!(
            err.kind,
            ParseErrorKind::Lex(LexError::UnterminatedBlockComment)
        );
        assert_eq!(err.location(source).line, 2);
    }

    #[test]
    fn missing_field_type_is_reported() {
        let err = parse_err("struct Volume { size: }");
        assert_eq!(err.kind, ParseErrorKind::ExpectedType);
        assert_eq!(err.to_string(), "expected a type");
    }
}
