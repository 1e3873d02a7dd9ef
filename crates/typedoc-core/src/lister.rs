//! Source discovery and the generation pipeline
//!
//! A [`SourceLister`] walks a set of named source groups, filters the file
//! names it finds, renders one Markdown document per kept file, and finally
//! writes an index document assembled by a caller-supplied hook.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use crate::doc::{DefaultValueExtractor, DocExtractor};
use crate::document::{Doc, DocItem};
use crate::error::{GenerateError, HookError};
use crate::parser::Parser;

/// Extension of the source files picked up by the lister
pub const SOURCE_EXT: &str = "rs";

/// Called once per generated document, with the index when one is configured
pub type DocGeneratedHook = Box<dyn FnMut(&Doc, Option<&mut Doc>) -> Result<(), HookError>>;

/// One source group: where to read from and where to write to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDir {
    pub path: PathBuf,
    pub dest_path: PathBuf,
}

impl SourceDir {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, dest_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            dest_path: dest_path.into(),
        }
    }
}

/// Compiled include and ignore patterns
#[derive(Debug, Clone)]
pub struct SourceFilter {
    include: Vec<Regex>,
    ignore: Vec<Regex>,
}

impl SourceFilter {
    /// Compile both pattern lists, failing on the first invalid pattern
    pub fn compile<S: AsRef<str>>(include: &[S], ignore: &[S]) -> Result<Self, GenerateError> {
        Ok(Self {
            include: compile_all(include)?,
            ignore: compile_all(ignore)?,
        })
    }

    /// A name is ignored when an ignore pattern matches and no include pattern does
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|re| re.is_match(name))
            && !self.include.iter().any(|re| re.is_match(name))
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, GenerateError> {
    patterns
        .iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Regex::new(pattern).map_err(|source| GenerateError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}

/// Files written by a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// Generated documents, in generation order
    pub documents: Vec<PathBuf>,
    /// The index document, if one was configured
    pub index: Option<PathBuf>,
}

/// Join the index header, the rows collected by the hook, and the footer.
///
/// Each non-empty part is terminated by a newline.
pub fn compose_index(header: &str, rows: &str, footer: &str) -> String {
    let mut out = String::with_capacity(header.len() + rows.len() + footer.len() + 2);
    for part in [header, rows, footer] {
        if part.is_empty() {
            continue;
        }
        out.push_str(part);
        if !part.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Lists source files by group and generates their documentation
#[derive(Default)]
pub struct SourceLister {
    sources: BTreeMap<String, SourceDir>,
    include_sources: Vec<String>,
    ignored_sources: Vec<String>,
    index: Option<Doc>,
    header: String,
    footer: String,
    hook: Option<DocGeneratedHook>,
    default_value_extractor: Option<Box<DefaultValueExtractor>>,
}

impl SourceLister {
    /// Create a lister over the given groups, keyed by group name
    #[must_use]
    pub fn new(sources: BTreeMap<String, SourceDir>) -> Self {
        Self {
            sources,
            ..Self::default()
        }
    }

    /// Patterns that keep a source even when an ignore pattern matches it
    #[must_use]
    pub fn include_sources<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_sources = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Patterns that drop a source unless an include pattern keeps it
    #[must_use]
    pub fn ignored_sources<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_sources = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Write an index document framed by `header` and `footer`
    #[must_use]
    pub fn index(mut self, index: Doc, header: impl Into<String>, footer: impl Into<String>) -> Self {
        self.index = Some(index);
        self.header = header.into();
        self.footer = footer.into();
        self
    }

    /// Run `hook` after each document is written
    #[must_use]
    pub fn on_doc_generated<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&Doc, Option<&mut Doc>) -> Result<(), HookError> + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Compute field defaults from attributes when no `+default` directive is given
    #[must_use]
    pub fn default_value_extractor<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&[crate::ast::Attribute]) -> Option<String> + 'static,
    {
        self.default_value_extractor = Some(Box::new(extractor));
        self
    }

    /// The configured groups
    pub fn sources(&self) -> &BTreeMap<String, SourceDir> {
        &self.sources
    }

    /// The configured include and ignore patterns
    pub fn patterns(&self) -> (&[String], &[String]) {
        (&self.include_sources, &self.ignored_sources)
    }

    /// Every `.rs` file of every group, groups by name and files by stem
    pub fn list_sources(&self) -> Result<Vec<DocItem>, GenerateError> {
        let mut items = Vec::new();
        for (group, dir) in &self.sources {
            let mut found = list_dir(&dir.path)?;
            found.sort();
            debug!(target: "lister", group = %group, path = %dir.path.display(), count = found.len(), "listed sources");
            items.extend(
                found
                    .into_iter()
                    .map(|(name, path)| DocItem::new(name, &dir.dest_path).with_source(path)),
            );
        }
        Ok(items)
    }

    /// Generate every document, then the index.
    ///
    /// Stops at the first error; documents already written stay on disk.
    pub fn generate(mut self) -> Result<GenerateReport, GenerateError> {
        let filter = SourceFilter::compile(&self.include_sources, &self.ignored_sources)?;
        let mut extractor = DocExtractor::new();
        if let Some(default_value) = self.default_value_extractor.as_deref() {
            extractor = extractor.with_default_value(default_value);
        }

        let mut report = GenerateReport::default();
        for item in self.list_sources()? {
            if filter.is_ignored(&item.name) {
                debug!(target: "lister", name = %item.name, "ignoring source");
                continue;
            }

            let doc = render(item, &extractor)?;
            let path = doc.write()?;
            info!(target: "typedoc", path = %path.display(), "generated documentation");

            if let Some(hook) = self.hook.as_mut() {
                hook(&doc, self.index.as_mut())?;
            }
            report.documents.push(path);
        }

        if let Some(index) = self.index.as_mut() {
            index.content = compose_index(&self.header, &index.content, &self.footer);
            let path = index.write()?;
            info!(target: "typedoc", path = %path.display(), rows = report.documents.len(), "generated index");
            report.index = Some(path);
        }

        Ok(report)
    }
}

/// `(stem, path)` of each `.rs` file directly inside `dir`
fn list_dir(dir: &Path) -> Result<Vec<(String, PathBuf)>, GenerateError> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(GenerateError::io(dir))? {
        let entry = entry.map_err(GenerateError::io(dir))?;
        let path = entry.path();
        let is_file = entry
            .file_type()
            .map_err(GenerateError::io(&path))?
            .is_file();
        if !is_file || !path.extension().is_some_and(|ext| ext == SOURCE_EXT) {
            continue;
        }
        match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => found.push((stem.to_string(), path.clone())),
            None => debug!(target: "lister", path = %path.display(), "skipping non UTF-8 file name"),
        }
    }
    Ok(found)
}

/// Read, parse, and render one source file
fn render(item: DocItem, extractor: &DocExtractor<'_>) -> Result<Doc, GenerateError> {
    let Some(path) = item.source_path.clone() else {
        return Ok(Doc::new(item));
    };
    let source = fs::read_to_string(&path).map_err(GenerateError::io(&path))?;
    let file = Parser::parse_file(&source).map_err(|error| GenerateError::Parse {
        location: error.location(&source),
        path,
        error,
    })?;
    let module = extractor.extract(&file, &item.name);
    Ok(Doc::from_module(item, &module))
}
