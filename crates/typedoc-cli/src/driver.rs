//! The documentation run and its index hook

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use typedoc_core::doc::escape_cell;
use typedoc_core::{link_target, relative_path, Doc, GenerateReport, HookError};

use crate::config::DriverConfig;

/// Append a row linking `doc` to the index.
///
/// The link is relative to the index's directory. When no index is
/// configured the hook does nothing.
pub fn append_index_row(doc: &Doc, index: Option<&mut Doc>) -> Result<(), HookError> {
    let Some(index) = index else {
        return Ok(());
    };
    let rel = relative_path(&index.item.dest_path, &doc.item.dest_path).map_err(|source| {
        HookError::PathResolution {
            dest: doc.item.dest_path.clone(),
            source,
        }
    })?;
    index.append(&format!(
        "| **[{}]({})** | {} |",
        escape_cell(&doc.display_name),
        link_target(&rel, &doc.item.file_name()),
        escape_cell(&doc.desc)
    ));
    Ok(())
}

/// Generate every page and the index for `config`, with paths resolved against `root`.
pub fn run(config: DriverConfig, root: &Path) -> Result<GenerateReport> {
    info!(target: "typedoc", root = %root.display(), groups = config.groups.len(), "generating documentation");
    let report = config
        .into_lister(root)
        .generate()
        .context("documentation generation failed")?;
    info!(target: "typedoc", documents = report.documents.len(), "done");
    Ok(report)
}
