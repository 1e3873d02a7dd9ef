//! Documentation extraction and rendering for Rust type declarations
//!
//! This module turns a parsed source file into a [`DocumentedModule`] and
//! renders it as a Markdown reference page.

mod extractor;
mod markdown;
mod types;

pub use extractor::{serde_default_path, DefaultValueExtractor, DocExtractor};
pub use markdown::{escape_cell, MarkdownGenerator};
pub use types::{
    DocComment, Directives, DocumentedItem, DocumentedModule, FieldDoc, ItemKind, VariantDoc,
};
