//! Attributes and the `serde` options the renderer cares about

use crate::lexer::{Span, Token, TokenKind};

/// An outer or inner attribute: `#[path]`, `#[path(args)]` or `#[path = value]`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Attribute path, e.g. `serde`, `doc`, `cfg_attr`
    pub path: String,
    /// Tokens inside the delimiter group, if the attribute has one
    pub args: Vec<Token>,
    /// Literal after `=`, if the attribute uses the name-value form
    pub value: Option<Token>,
    pub span: Span,
}

impl Attribute {
    /// Check the attribute path
    #[must_use]
    pub fn is(&self, path: &str) -> bool {
        self.path == path
    }

    /// Text of a `#[doc = "..."]` attribute, normalised like a `///` comment
    #[must_use]
    pub fn doc_value(&self) -> Option<String> {
        if !self.is("doc") {
            return None;
        }
        let text = unquote(self.value.as_ref()?)?;
        Some(match text.strip_prefix(' ') {
            Some(rest) => rest.to_string(),
            None => text,
        })
    }

    /// Split the argument group into comma separated meta items
    #[must_use]
    pub fn meta_items(&self) -> Vec<MetaItem> {
        MetaItem::split(&self.args)
    }
}

/// One entry of an attribute argument list: `name`, `name = "lit"` or `name(...)`
#[derive(Debug, Clone, PartialEq)]
pub struct MetaItem {
    pub name: String,
    /// Unquoted literal of the name-value form
    pub value: Option<String>,
    /// Tokens of a nested list
    pub nested: Option<Vec<Token>>,
}

impl MetaItem {
    fn split(tokens: &[Token]) -> Vec<MetaItem> {
        let mut items = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                }
                TokenKind::Comma if depth == 0 => {
                    items.extend(Self::parse(&tokens[start..i]));
                    start = i + 1;
                }
                _ => {}
            }
        }
        items.extend(Self::parse(&tokens[start..]));
        items
    }

    fn parse(tokens: &[Token]) -> Option<MetaItem> {
        let (first, rest) = tokens.split_first()?;
        let mut name = first.lexeme.clone();
        let mut rest = rest;
        // Paths such as `serde::rename` keep only their last segment
        while let [sep, segment, tail @ ..] = rest {
            if sep.kind != TokenKind::ColonColon {
                break;
            }
            name.clone_from(&segment.lexeme);
            rest = tail;
        }

        match rest {
            [] => Some(MetaItem {
                name,
                value: None,
                nested: None,
            }),
            [eq, value, ..] if eq.kind == TokenKind::Eq => Some(MetaItem {
                name,
                value: unquote(value),
                nested: None,
            }),
            [open, inner @ .., close]
                if open.kind == TokenKind::LParen && close.kind == TokenKind::RParen =>
            {
                Some(MetaItem {
                    name,
                    value: None,
                    nested: Some(inner.to_vec()),
                })
            }
            _ => None,
        }
    }
}

/// Value of a string or raw string literal token, with escapes resolved
#[must_use]
pub fn unquote(token: &Token) -> Option<String> {
    let text = token.lexeme.as_str();
    match token.kind {
        TokenKind::Str => {
            let text = text.trim_start_matches(['b', 'c']);
            let inner = text.strip_prefix('"')?.strip_suffix('"')?;
            Some(unescape(inner))
        }
        TokenKind::RawStr => {
            let text = text.trim_start_matches(['b', 'c']).strip_prefix('r')?;
            let text = text.trim_start_matches('#');
            let text = text.trim_end_matches('#');
            Some(text.strip_prefix('"')?.strip_suffix('"')?.to_string())
        }
        _ => None,
    }
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let code: String = chars
                    .by_ref()
                    .skip_while(|&c| c == '{')
                    .take_while(|&c| c != '}')
                    .collect();
                if let Some(ch) = u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    out.push(ch);
                }
            }
            // Line continuation swallows the newline and leading whitespace
            Some('\n') => {
                while chars.next_if(|c| c.is_whitespace()).is_some() {}
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// `#[serde(default)]` or `#[serde(default = "path")]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultAttr {
    /// Uses `Default::default()`
    Trait,
    /// Calls the named function
    Path(String),
}

/// The subset of serde options that affect generated reference docs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerdeAttrs {
    pub rename: Option<String>,
    pub rename_all: Option<RenameRule>,
    pub default: Option<DefaultAttr>,
    pub flatten: bool,
    /// `skip` or `skip_deserializing`: the value cannot be configured
    pub skip: bool,
    pub skip_serializing_if: Option<String>,
}

impl SerdeAttrs {
    /// Collect serde options from `#[serde(...)]` and `#[cfg_attr(..., serde(...))]`
    #[must_use]
    pub fn from_attrs(attrs: &[Attribute]) -> Self {
        let mut serde = SerdeAttrs::default();
        for attr in attrs {
            if attr.is("serde") {
                serde.apply(&attr.meta_items());
            } else if attr.is("cfg_attr") {
                for item in attr.meta_items() {
                    if item.name != "serde" {
                        continue;
                    }
                    if let Some(nested) = &item.nested {
                        serde.apply(&MetaItem::split(nested));
                    }
                }
            }
        }
        serde
    }

    fn apply(&mut self, items: &[MetaItem]) {
        for item in items {
            match item.name.as_str() {
                "rename" => {
                    if let Some(name) = directional(item) {
                        self.rename = Some(name);
                    }
                }
                "rename_all" => {
                    if let Some(rule) = directional(item).as_deref().and_then(RenameRule::parse) {
                        self.rename_all = Some(rule);
                    }
                }
                "default" => {
                    self.default = Some(match &item.value {
                        Some(path) => DefaultAttr::Path(path.clone()),
                        None => DefaultAttr::Trait,
                    });
                }
                "flatten" => self.flatten = true,
                "skip" | "skip_deserializing" => self.skip = true,
                "skip_serializing_if" => self.skip_serializing_if.clone_from(&item.value),
                _ => {}
            }
        }
    }
}

/// Value of `key = "x"` or of the `deserialize` side of `key(serialize = "a", deserialize = "b")`
fn directional(item: &MetaItem) -> Option<String> {
    if item.value.is_some() {
        return item.value.clone();
    }
    let nested = MetaItem::split(item.nested.as_deref()?);
    let pick = |side: &str| {
        nested
            .iter()
            .find(|inner| inner.name == side)
            .and_then(|inner| inner.value.clone())
    };
    pick("deserialize").or_else(|| pick("serialize"))
}

/// A `rename_all` case convention, applied the same way serde applies it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    LowerCase,
    UpperCase,
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
}

impl RenameRule {
    /// Parse the serde spelling of a rule
    #[must_use]
    pub fn parse(rule: &str) -> Option<Self> {
        Some(match rule {
            "lowercase" => Self::LowerCase,
            "UPPERCASE" => Self::UpperCase,
            "PascalCase" => Self::PascalCase,
            "camelCase" => Self::CamelCase,
            "snake_case" => Self::SnakeCase,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnakeCase,
            "kebab-case" => Self::KebabCase,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebabCase,
            _ => return None,
        })
    }

    /// Rename a `snake_case` field name
    #[must_use]
    pub fn apply_to_field(self, field: &str) -> String {
        match self {
            Self::LowerCase | Self::SnakeCase => field.to_string(),
            Self::UpperCase | Self::ScreamingSnakeCase => field.to_ascii_uppercase(),
            Self::PascalCase => {
                let mut pascal = String::new();
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            Self::CamelCase => {
                let pascal = Self::PascalCase.apply_to_field(field);
                lower_first(&pascal)
            }
            Self::KebabCase => field.replace('_', "-"),
            Self::ScreamingKebabCase => field.to_ascii_uppercase().replace('_', "-"),
        }
    }

    /// Rename a `PascalCase` variant name
    #[must_use]
    pub fn apply_to_variant(self, variant: &str) -> String {
        match self {
            Self::PascalCase => variant.to_string(),
            Self::LowerCase => variant.to_ascii_lowercase(),
            Self::UpperCase => variant.to_ascii_uppercase(),
            Self::CamelCase => lower_first(variant),
            Self::SnakeCase => {
                let mut snake = String::new();
                for (i, ch) in variant.char_indices() {
                    if i > 0 && ch.is_uppercase() {
                        snake.push('_');
                    }
                    snake.push(ch.to_ascii_lowercase());
                }
                snake
            }
            Self::ScreamingSnakeCase => Self::SnakeCase
                .apply_to_variant(variant)
                .to_ascii_uppercase(),
            Self::KebabCase => Self::SnakeCase.apply_to_variant(variant).replace('_', "-"),
            Self::ScreamingKebabCase => Self::ScreamingSnakeCase
                .apply_to_variant(variant)
                .replace('_', "-"),
        }
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
