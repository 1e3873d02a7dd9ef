//! Typedoc Core - reference documentation for Rust configuration types
//!
//! This crate provides the generation engine:
//! - Lexer: Tokenization of Rust source files
//! - AST: Struct and enum declarations with their docs and attributes
//! - Parser: Declaration recovery from the token stream
//! - Doc: Extraction of documentation and Markdown rendering
//! - Lister: Source discovery, filtering, and the generation run

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexer module - tokenization of Rust source code
pub mod lexer;

/// Declarations recovered from source files
pub mod ast;

/// Parser module - converts tokens into declarations
pub mod parser;

/// Documentation extraction and Markdown rendering
pub mod doc;

/// Generated documents and their destinations
pub mod document;

/// Source discovery and the generation pipeline
pub mod lister;

/// Lexical relative paths
pub mod relpath;

mod error;

pub use document::{Doc, DocItem};
pub use error::{GenerateError, HookError};
pub use lister::{compose_index, GenerateReport, SourceDir, SourceFilter, SourceLister};
pub use parser::Parser;
pub use relpath::{link_target, relative_path, RelPathError};
