//! Lexical relative path computation
//!
//! Paths are never touched on disk: both sides are cleaned (`.` removed,
//! `name/..` folded) and compared component by component.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Why no relative path exists between two paths
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelPathError {
    #[error("can't make {} relative to {}: one path is absolute and the other is not", target.display(), base.display())]
    MixedRoots { base: PathBuf, target: PathBuf },

    #[error("can't make {} relative to {}: paths have different prefixes", target.display(), base.display())]
    DifferentPrefix { base: PathBuf, target: PathBuf },

    #[error("can't make {} relative to {}: base climbs above the common ancestor", target.display(), base.display())]
    Unreachable { base: PathBuf, target: PathBuf },
}

/// A lexically cleaned path
#[derive(Debug, PartialEq, Eq)]
struct CleanPath {
    prefix: Option<OsString>,
    rooted: bool,
    parts: Vec<OsString>,
}

impl CleanPath {
    fn new(path: &Path) -> Self {
        let mut clean = CleanPath {
            prefix: None,
            rooted: false,
            parts: Vec::new(),
        };
        for component in path.components() {
            match component {
                Component::Prefix(prefix) => clean.prefix = Some(prefix.as_os_str().to_os_string()),
                Component::RootDir => clean.rooted = true,
                Component::CurDir => {}
                Component::ParentDir => {
                    let folds = clean.parts.last().is_some_and(|last| last != "..");
                    if folds {
                        clean.parts.pop();
                    } else if !clean.rooted {
                        // `/..` is `/`
                        clean.parts.push(OsString::from(".."));
                    }
                }
                Component::Normal(part) => clean.parts.push(part.to_os_string()),
            }
        }
        clean
    }
}

/// Compute `target` relative to `base`, such that `base.join(result)` names `target`.
///
/// Equal paths give `.`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use typedoc_core::relpath::relative_path;
///
/// let rel = relative_path(Path::new("docs/types"), Path::new("docs/overrides")).unwrap();
/// assert_eq!(rel, Path::new("../overrides"));
/// ```
pub fn relative_path(base: &Path, target: &Path) -> Result<PathBuf, RelPathError> {
    let clean_base = CleanPath::new(base);
    let clean_target = CleanPath::new(target);
    if clean_base == clean_target {
        return Ok(PathBuf::from("."));
    }

    let errors = || (base.to_path_buf(), target.to_path_buf());
    if clean_base.rooted != clean_target.rooted {
        let (base, target) = errors();
        return Err(RelPathError::MixedRoots { base, target });
    }
    if clean_base.prefix != clean_target.prefix {
        let (base, target) = errors();
        return Err(RelPathError::DifferentPrefix { base, target });
    }

    let common = clean_base
        .parts
        .iter()
        .zip(&clean_target.parts)
        .take_while(|(b, t)| b == t)
        .count();
    let base_rest = &clean_base.parts[common..];
    let target_rest = &clean_target.parts[common..];

    if base_rest.first().is_some_and(|part| part == "..") {
        let (base, target) = errors();
        return Err(RelPathError::Unreachable { base, target });
    }

    let mut rel = PathBuf::new();
    for _ in base_rest {
        rel.push("..");
    }
    for part in target_rest {
        rel.push(part);
    }
    Ok(rel)
}

/// Render `rel/file_name` as a Markdown link target.
///
/// Separators are always `/`, and a `.` directory is dropped.
pub fn link_target(rel: &Path, file_name: &str) -> String {
    let mut parts: Vec<String> = rel
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.push(file_name.to_string());
    parts.join("/")
}
