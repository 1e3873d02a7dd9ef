//! Generated documents and where they are written

use std::fs;
use std::path::PathBuf;

use crate::doc::{DocumentedModule, MarkdownGenerator};
use crate::error::GenerateError;

/// Identity of a document: its name, where it came from, and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocItem {
    /// Base name of the output file, without extension
    pub name: String,
    /// Source file the document is generated from; `None` for the index
    pub source_path: Option<PathBuf>,
    /// Directory the document is written to
    pub dest_path: PathBuf,
}

impl DocItem {
    #[must_use]
    pub fn new(name: impl Into<String>, dest_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_path: None,
            dest_path: dest_path.into(),
        }
    }

    /// Attach the source file
    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// `<name>.md`
    pub fn file_name(&self) -> String {
        format!("{}.md", self.name)
    }

    /// `<dest_path>/<name>.md`
    pub fn output_path(&self) -> PathBuf {
        self.dest_path.join(self.file_name())
    }
}

/// A Markdown document and the metadata the index needs about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doc {
    pub item: DocItem,
    /// Title shown in the index
    pub display_name: String,
    /// One-line description shown in the index
    pub desc: String,
    /// Markdown body
    pub content: String,
}

impl Doc {
    /// An empty document titled after its item
    #[must_use]
    pub fn new(item: DocItem) -> Self {
        Self {
            display_name: item.name.clone(),
            desc: String::new(),
            content: String::new(),
            item,
        }
    }

    /// Render extracted documentation into a document
    #[must_use]
    pub fn from_module(item: DocItem, module: &DocumentedModule) -> Self {
        Self {
            display_name: module.display_name().to_string(),
            desc: module.description().to_string(),
            content: MarkdownGenerator::generate(module),
            item,
        }
    }

    /// Append a line to the body
    pub fn append(&mut self, line: &str) {
        self.content.push_str(line);
        self.content.push('\n');
    }

    /// Write the body to `dest_path/name.md`, creating the directory if needed
    pub fn write(&self) -> Result<PathBuf, GenerateError> {
        fs::create_dir_all(&self.item.dest_path).map_err(GenerateError::io(&self.item.dest_path))?;
        let path = self.item.output_path();
        fs::write(&path, &self.content).map_err(GenerateError::io(&path))?;
        Ok(path)
    }
}
