//! Types for representing extracted documentation

/// `+key:value` directives found in a doc comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// `+docName:"..."`
    pub doc_name: Option<String>,
    /// `+description:"..."`
    pub description: Option<String>,
    /// `+default:"..."` or `+kubebuilder:default:=...`
    pub default: Option<String>,
}

impl Directives {
    /// Record a directive line (without its leading `+`); unknown keys are ignored
    fn apply(&mut self, directive: &str) {
        if let Some(value) = directive.strip_prefix("docName:") {
            self.doc_name = Some(unquote_directive(value));
        } else if let Some(value) = directive.strip_prefix("description:") {
            self.description = Some(unquote_directive(value));
        } else if let Some(value) = directive.strip_prefix("default:") {
            self.default = Some(unquote_directive(value));
        } else if let Some(value) = directive.strip_prefix("kubebuilder:default:") {
            let value = value.strip_prefix('=').unwrap_or(value);
            self.default = Some(unquote_directive(value));
        }
    }
}

fn unquote_directive(value: &str) -> String {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

/// Parsed documentation comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    /// Brief summary (first paragraph, lines joined with spaces)
    pub summary: String,
    /// Remaining paragraphs, line breaks preserved
    pub paragraphs: Vec<String>,
    /// Directives, removed from the prose
    pub directives: Directives,
}

impl DocComment {
    /// Parse a doc comment from its lines, one entry per comment line
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut doc = DocComment::default();
        let mut paragraphs: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut in_code_block = false;

        for line in lines.iter().flat_map(|l| l.as_ref().split('\n')) {
            let trimmed = line.trim();

            if trimmed.starts_with("```") {
                in_code_block = !in_code_block;
                current.push(line.trim_end());
                continue;
            }
            if in_code_block {
                current.push(line.trim_end());
                continue;
            }

            if let Some(directive) = trimmed.strip_prefix('+') {
                doc.directives.apply(directive);
            } else if trimmed.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(std::mem::take(&mut current));
                }
            } else {
                current.push(trimmed);
            }
        }
        if !current.is_empty() {
            paragraphs.push(current);
        }

        let mut paragraphs = paragraphs.into_iter();
        if let Some(first) = paragraphs.next() {
            // A leading code block stays a block
            doc.summary = if first.iter().any(|l| l.trim_start().starts_with("```")) {
                first.join("\n")
            } else {
                first.join(" ")
            };
        }
        doc.paragraphs = paragraphs.map(|p| p.join("\n")).collect();
        doc
    }

    /// Check if the doc comment has no prose
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.paragraphs.is_empty()
    }

    /// Summary followed by the remaining paragraphs
    pub fn prose(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.summary.as_str())
            .filter(|s| !s.is_empty())
            .chain(self.paragraphs.iter().map(String::as_str))
    }
}

/// A documented struct or enum
#[derive(Debug, Clone)]
pub struct DocumentedItem {
    /// Name of the type
    pub name: String,
    /// Heading text (`+docName` or the type name)
    pub heading: String,
    /// Kind of item
    pub kind: ItemKind,
    /// Documentation comment
    pub doc: DocComment,
    /// Field rows, for structs
    pub fields: Vec<FieldDoc>,
    /// Variant rows, for enums
    pub variants: Vec<VariantDoc>,
}

impl DocumentedItem {
    /// Create a new documented item
    pub fn new(name: String, kind: ItemKind, doc: DocComment) -> Self {
        let heading = doc.directives.doc_name.clone().unwrap_or_else(|| name.clone());
        Self {
            name,
            heading,
            kind,
            doc,
            fields: Vec::new(),
            variants: Vec::new(),
        }
    }
}

/// Kind of documented item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Struct,
    Enum,
}

/// One row of a struct table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDoc {
    /// Serialized name
    pub name: String,
    /// Compact type text
    pub ty: String,
    pub required: bool,
    pub default: Option<String>,
    pub description: String,
}

/// One row of an enum table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDoc {
    /// Serialized name
    pub name: String,
    pub description: String,
}

/// Documentation for a complete source file
#[derive(Debug, Clone)]
pub struct DocumentedModule {
    /// Module name (the file stem)
    pub name: String,
    /// Module-level documentation
    pub doc: DocComment,
    /// Documented items in the module
    pub items: Vec<DocumentedItem>,
}

impl DocumentedModule {
    /// Create a new documented module
    pub fn new(name: String, doc: DocComment) -> Self {
        Self {
            name,
            doc,
            items: Vec::new(),
        }
    }

    /// Add a documented item
    pub fn add_item(&mut self, item: DocumentedItem) {
        self.items.push(item);
    }

    /// Title of the generated page: `+docName` or the module name
    pub fn display_name(&self) -> &str {
        self.doc.directives.doc_name.as_deref().unwrap_or(&self.name)
    }

    /// One-line description: `+description` or the doc summary
    pub fn description(&self) -> &str {
        self.doc
            .directives
            .description
            .as_deref()
            .unwrap_or(&self.doc.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_doc() {
        let doc = DocComment::parse(&["Secret reference."]);
        assert_eq!(doc.summary, "Secret reference.");
        assert!(doc.paragraphs.is_empty());
    }

    #[test]
    fn test_parse_doc_with_paragraphs() {
        let doc = DocComment::parse(&[
            "Brief summary",
            "over two lines.",
            "",
            "- first",
            "- second",
            "",
            "Closing words.",
        ]);
        assert_eq!(doc.summary, "Brief summary over two lines.");
        assert_eq!(doc.paragraphs, vec!["- first\n- second", "Closing words."]);
    }

    #[test]
    fn test_blank_lines_split_paragraphs() {
        let doc = DocComment::parse(&["Secret references.", "", "Resolved at startup."]);
        assert_eq!(doc.summary, "Secret references.");
        assert_eq!(doc.paragraphs, vec!["Resolved at startup."]);

        // A block doc arrives as one multi-line entry
        let block = DocComment::parse(&["Secret references.\n\nResolved at startup."]);
        assert_eq!(block, doc);
    }

    #[test]
    fn test_directives_are_removed_from_prose() {
        let doc = DocComment::parse(&[
            "+docName:\"Secret Types\"",
            "Types for referencing secrets.",
            "+description:\"Secret references\"",
            "+kubebuilder:validation:Optional",
        ]);
        assert_eq!(doc.summary, "Types for referencing secrets.");
        assert_eq!(doc.directives.doc_name.as_deref(), Some("Secret Types"));
        assert_eq!(
            doc.directives.description.as_deref(),
            Some("Secret references")
        );
        assert!(doc.directives.default.is_none());
    }

    #[test]
    fn test_default_directive_forms() {
        let quoted = DocComment::parse(&["Port.", "+default:\"8080\""]);
        assert_eq!(quoted.directives.default.as_deref(), Some("8080"));

        let bare = DocComment::parse(&["+default:8080"]);
        assert_eq!(bare.directives.default.as_deref(), Some("8080"));

        let kubebuilder = DocComment::parse(&["+kubebuilder:default:=ReadWriteOnce"]);
        assert_eq!(
            kubebuilder.directives.default.as_deref(),
            Some("ReadWriteOnce")
        );
        assert!(kubebuilder.is_empty());
    }

    #[test]
    fn test_code_blocks_keep_their_lines() {
        let doc = DocComment::parse(&["Example:", "", "```toml", "", "+default = 1", "```"]);
        assert_eq!(doc.summary, "Example:");
        assert_eq!(doc.paragraphs, vec!["```toml\n\n+default = 1\n```"]);
        assert!(doc.directives.default.is_none());
    }

    #[test]
    fn test_module_display_name_and_description() {
        let module = DocumentedModule::new(
            "secret_types".to_string(),
            DocComment::parse(&["Secret handling.", "", "More detail."]),
        );
        assert_eq!(module.display_name(), "secret_types");
        assert_eq!(module.description(), "Secret handling.");

        let named = DocumentedModule::new(
            "secret_types".to_string(),
            DocComment::parse(&["+docName:\"Secrets\"", "+description:\"All secrets\""]),
        );
        assert_eq!(named.display_name(), "Secrets");
        assert_eq!(named.description(), "All secrets");
    }
}
