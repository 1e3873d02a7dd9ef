//! Integration tests for a full generation run over a source tree

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use typedoc_core::doc::serde_default_path;
use typedoc_core::{link_target, relative_path, Doc, DocItem, HookError, SourceDir, SourceLister};

const SECRET_TYPES: &str = r#"//! +docName:"Secret"
//! +description:"Secret references"
//! Types that point at secret material.

use serde::Deserialize;

/// Reference to a key in a secret
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeyRef {
    /// Name of the secret
    pub secret_name: String,
    /// Key within the secret
    #[serde(default = "defaults::key")]
    pub key: String,
}

impl SecretKeyRef {
    pub fn new(secret_name: impl Into<String>) -> Self {
        Self { secret_name: secret_name.into(), key: defaults::key() }
    }
}

mod defaults {
    pub fn key() -> String { "token".to_string() }
}
"#;

const VOLUME_TYPES: &str = r"//! Volume sources.

/// How a volume may be mounted
pub enum AccessMode {
    /// One node, read-write
    ReadWriteOnce,
    /// Many nodes, read-only
    ReadOnlyMany,
}
";

const NODE_OVERRIDE: &str = r"/// Per-node overrides
pub struct NodeOverride {
    /// Node selector labels
    pub selector: Option<Vec<String>>,
}
";

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn source_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "pkg/secret/secret_types.rs", SECRET_TYPES);
    write(root, "pkg/secret/helpers.rs", "pub fn helper() {}");
    write(root, "pkg/volume/volume_types.rs", VOLUME_TYPES);
    write(root, "pkg/typeoverride/node_override.rs", NODE_OVERRIDE);
    write(root, "pkg/typeoverride/README.md", "not a source");
    tmp
}

fn lister(root: &Path) -> SourceLister {
    let groups: BTreeMap<String, SourceDir> = [
        ("secret", "pkg/secret", "docs/types"),
        ("volume", "pkg/volume", "docs/types"),
        ("overrides", "pkg/typeoverride", "docs/overrides"),
    ]
    .into_iter()
    .map(|(name, path, dest)| (name.to_string(), SourceDir::new(root.join(path), root.join(dest))))
    .collect();

    SourceLister::new(groups)
        .include_sources([".*types$", ".*override$"])
        .ignored_sources([".*"])
        .index(
            Doc::new(DocItem::new("Readme", root.join("docs/types"))),
            "| Name | Description |\n|---|---|\n",
            "</center>\n",
        )
        .default_value_extractor(serde_default_path)
        .on_doc_generated(|doc, index| {
            let Some(index) = index else {
                return Ok(());
            };
            let rel = relative_path(&index.item.dest_path, &doc.item.dest_path).map_err(
                |source| HookError::PathResolution {
                    dest: doc.item.dest_path.clone(),
                    source,
                },
            )?;
            index.append(&format!(
                "| **[{}]({})** | {} |",
                doc.display_name,
                link_target(&rel, &doc.item.file_name()),
                doc.desc
            ));
            Ok(())
        })
}

#[test]
fn test_generates_one_page_per_included_source() {
    let tmp = source_tree();
    let root = tmp.path();

    let report = lister(root).generate().unwrap();

    assert_eq!(
        report.documents,
        vec![
            root.join("docs/overrides/node_override.md"),
            root.join("docs/types/secret_types.md"),
            root.join("docs/types/volume_types.md"),
        ]
    );
    assert!(!root.join("docs/types/helpers.md").exists());
    assert_eq!(report.index, Some(root.join("docs/types/Readme.md")));

    let index = fs::read_to_string(root.join("docs/types/Readme.md")).unwrap();
    let rows: Vec<_> = index.lines().filter(|l| l.starts_with("| **[")).collect();
    assert_eq!(rows.len(), report.documents.len());
    assert_eq!(
        rows,
        vec![
            "| **[node_override](../overrides/node_override.md)** |  |",
            "| **[Secret](secret_types.md)** | Secret references |",
            "| **[volume_types](volume_types.md)** | Volume sources. |",
        ]
    );
    assert!(index.ends_with("</center>\n"));
}

#[test]
fn test_page_content() {
    let tmp = source_tree();
    let root = tmp.path();
    lister(root).generate().unwrap();

    let secret = fs::read_to_string(root.join("docs/types/secret_types.md")).unwrap();
    assert!(secret.starts_with("# Secret\n\n## Overview\n\nTypes that point at secret material.\n"));
    assert!(secret.contains("| secretName | `String` | Yes | - | Name of the secret |"));
    assert!(secret.contains("| key | `String` | No | `defaults::key()` | Key within the secret |"));

    let node = fs::read_to_string(root.join("docs/overrides/node_override.md")).unwrap();
    assert!(node.contains("| selector | `Option<Vec<String>>` | No | - | Node selector labels |"));

    let volume = fs::read_to_string(root.join("docs/types/volume_types.md")).unwrap();
    assert!(volume.contains("| ReadWriteOnce | One node, read-write |"));
}

#[test]
fn test_regeneration_is_byte_identical() {
    let tmp = source_tree();
    let root = tmp.path();

    let first = lister(root).generate().unwrap();
    let snapshot: Vec<_> = first
        .documents
        .iter()
        .chain(first.index.iter())
        .map(|p| fs::read(p).unwrap())
        .collect();

    let second = lister(root).generate().unwrap();
    assert_eq!(first, second);
    let again: Vec<_> = second
        .documents
        .iter()
        .chain(second.index.iter())
        .map(|p| fs::read(p).unwrap())
        .collect();
    assert_eq!(snapshot, again);
}
