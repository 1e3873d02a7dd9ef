//! Markdown documentation generator

use std::fmt::Write;

use super::types::{DocumentedItem, DocumentedModule, FieldDoc, ItemKind};

/// Generates Markdown reference pages from extracted documentation
pub struct MarkdownGenerator;

impl MarkdownGenerator {
    /// Generate the Markdown page for a module
    pub fn generate(module: &DocumentedModule) -> String {
        let mut output = String::new();

        writeln!(output, "# {}", module.display_name()).unwrap();
        writeln!(output).unwrap();

        if !module.doc.is_empty() {
            writeln!(output, "## Overview").unwrap();
            writeln!(output).unwrap();
            for paragraph in module.doc.prose() {
                writeln!(output, "{paragraph}").unwrap();
                writeln!(output).unwrap();
            }
        }

        writeln!(output, "## Configuration").unwrap();
        writeln!(output).unwrap();

        for item in &module.items {
            Self::write_item(&mut output, item);
        }
        output
    }

    fn write_item(output: &mut String, item: &DocumentedItem) {
        writeln!(output, "## {}", item.heading).unwrap();
        writeln!(output).unwrap();

        for paragraph in item.doc.prose() {
            writeln!(output, "{paragraph}").unwrap();
            writeln!(output).unwrap();
        }

        match item.kind {
            ItemKind::Struct if !item.fields.is_empty() => {
                writeln!(output, "| Variable Name | Type | Required | Default | Description |").unwrap();
                writeln!(output, "|---|---|---|---|---|").unwrap();
                for field in &item.fields {
                    Self::write_field(output, field);
                }
                writeln!(output).unwrap();
            }
            ItemKind::Enum if !item.variants.is_empty() => {
                writeln!(output, "| Variant | Description |").unwrap();
                writeln!(output, "|---|---|").unwrap();
                for variant in &item.variants {
                    writeln!(
                        output,
                        "| {} | {} |",
                        escape_cell(&variant.name),
                        escape_cell(&variant.description)
                    )
                    .unwrap();
                }
                writeln!(output).unwrap();
            }
            _ => {}
        }
    }

    fn write_field(output: &mut String, field: &FieldDoc) {
        writeln!(
            output,
            "| {} | `{}` | {} | {} | {} |",
            escape_cell(&field.name),
            escape_cell(&field.ty),
            if field.required { "Yes" } else { "No" },
            field.default.as_deref().map_or_else(|| "-".to_string(), escape_cell),
            escape_cell(&field.description)
        )
        .unwrap();
    }
}

/// Make text safe for a single table cell: `|` is escaped and line breaks become spaces
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::DocExtractor;
    use crate::Parser;

    fn render(source: &str, name: &str) -> String {
        let file = Parser::parse_file(source).unwrap();
        let module = DocExtractor::new().extract(&file, name);
        MarkdownGenerator::generate(&module)
    }

    #[test]
    fn test_generate_markdown() {
        let source = r#"
//! Secret references.
//!
//! Secrets are resolved at startup.

/// Points at a key in a secret
#[serde(rename_all = "camelCase")]
pub struct SecretRef {
    /// Secret name
    pub secret_name: String,
    /// Key within the secret, `a|b` style
    /// +default:"token"
    pub key: Option<String>,
}

/// Where a secret lives
pub enum Store {
    /// Kubernetes secret
    Kube,
    Vault,
}
"#;
        let expected = "\
# secret_types

## Overview

Secret references.

Secrets are resolved at startup.

## Configuration

## SecretRef

Points at a key in a secret

| Variable Name | Type | Required | Default | Description |
|---|---|---|---|---|
| secretName | `String` | Yes | - | Secret name |
| key | `Option<String>` | No | token | Key within the secret, `a\\|b` style |

## Store

Where a secret lives

| Variant | Description |
|---|---|
| Kube | Kubernetes secret |
| Vault |  |

";
        assert_eq!(render(source, "secret_types"), expected);
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a | b\nc"), "a \\| b c");
        assert_eq!(escape_cell("plain"), "plain");
    }

    #[test]
    fn test_empty_module_has_no_overview() {
        let markdown = render("pub struct Marker;", "marker_types");
        assert_eq!(
            markdown,
            "# marker_types\n\n## Configuration\n\n## Marker\n\n"
        );
    }
}
