//! Driver configuration: source groups, filters, and the index page.
//!
//! The built-in configuration documents this repository's own type packages.
//! A TOML file with the same shape can replace it:
//!
//! ```toml
//! include = [".*types$"]
//! exclude = [".*"]
//! footer = "</center>\n"
//!
//! [index]
//! name = "Readme"
//! dest_path = "docs/types"
//!
//! [groups.secret]
//! path = "pkg/secret"
//! dest_path = "docs/types"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use typedoc_core::doc::serde_default_path;
use typedoc_core::{Doc, DocItem, SourceDir, SourceLister};

use crate::driver::append_index_row;

/// Header written at the top of the index page.
pub const INDEX_HEADER: &str = "\
# Available Types

For more information please click on the name
<center>

| Name | Description |
|---|---|
";

/// Footer written at the bottom of the index page.
pub const INDEX_FOOTER: &str = "</center>\n";

/// Errors that can occur when loading a driver configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no source groups configured")]
    NoGroups,
}

/// One source group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Directory holding the `.rs` sources.
    pub path: PathBuf,
    /// Directory the pages are written to.
    pub dest_path: PathBuf,
}

/// The index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// File name of the page, without extension.
    pub name: String,
    /// Directory the page is written to.
    pub dest_path: PathBuf,
}

/// Everything a documentation run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    /// Patterns that keep a source name even when an exclude pattern matches.
    #[serde(default)]
    pub include: Vec<String>,

    /// Patterns that drop a source name unless an include pattern keeps it.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub header: String,

    #[serde(default)]
    pub footer: String,

    pub index: IndexConfig,

    /// Source groups by name.
    pub groups: BTreeMap<String, GroupConfig>,
}

impl DriverConfig {
    /// The configuration compiled into the binary.
    pub fn builtin() -> Self {
        let group = |path: &str, dest_path: &str| GroupConfig {
            path: PathBuf::from(path),
            dest_path: PathBuf::from(dest_path),
        };
        let groups = BTreeMap::from([
            ("secret".to_string(), group("pkg/secret", "docs/types")),
            ("volume".to_string(), group("pkg/volume", "docs/types")),
            ("base".to_string(), group("pkg/types", "docs/types")),
            ("overrides".to_string(), group("pkg/typeoverride", "docs/overrides")),
        ]);

        Self {
            include: vec![".*types$".to_string(), ".*override$".to_string()],
            exclude: vec![".*".to_string()],
            header: INDEX_HEADER.to_string(),
            footer: INDEX_FOOTER.to_string(),
            index: IndexConfig {
                name: "Readme".to_string(),
                dest_path: PathBuf::from("docs/types"),
            },
            groups,
        }
    }

    /// Load a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// configures no groups.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        if config.groups.is_empty() {
            return Err(ConfigError::NoGroups);
        }
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Build the lister for this configuration, resolving every path against `root`.
    pub fn into_lister(self, root: &Path) -> SourceLister {
        let sources = self
            .groups
            .into_iter()
            .map(|(name, group)| {
                let dir = SourceDir::new(root.join(group.path), root.join(group.dest_path));
                (name, dir)
            })
            .collect();
        let index = Doc::new(DocItem::new(self.index.name, root.join(self.index.dest_path)));

        SourceLister::new(sources)
            .include_sources(self.include)
            .ignored_sources(self.exclude)
            .index(index, self.header, self.footer)
            .default_value_extractor(serde_default_path)
            .on_doc_generated(append_index_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_groups_match_the_table() {
        let config = DriverConfig::builtin();
        let table: Vec<_> = config
            .groups
            .iter()
            .map(|(name, g)| (name.as_str(), g.path.to_str().unwrap(), g.dest_path.to_str().unwrap()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("base", "pkg/types", "docs/types"),
                ("overrides", "pkg/typeoverride", "docs/overrides"),
                ("secret", "pkg/secret", "docs/types"),
                ("volume", "pkg/volume", "docs/types"),
            ]
        );
        assert_eq!(config.index.name, "Readme");
        assert_eq!(config.index.dest_path, PathBuf::from("docs/types"));
    }

    #[test]
    fn builtin_patterns_and_templates() {
        let config = DriverConfig::builtin();
        assert_eq!(config.include, vec![".*types$", ".*override$"]);
        assert_eq!(config.exclude, vec![".*"]);
        assert!(config.header.starts_with("# Available Types\n\n"));
        assert!(config.header.ends_with("| Name | Description |\n|---|---|\n"));
        assert_eq!(config.footer, "</center>\n");
    }

    #[test]
    fn lister_carries_the_configuration() {
        let lister = DriverConfig::builtin().into_lister(Path::new("/work"));
        let secret = &lister.sources()["secret"];
        assert_eq!(secret.path, PathBuf::from("/work/pkg/secret"));
        assert_eq!(secret.dest_path, PathBuf::from("/work/docs/types"));

        let (include, exclude) = lister.patterns();
        assert_eq!(include, [".*types$", ".*override$"]);
        assert_eq!(exclude, [".*"]);
    }

    #[test]
    fn toml_round_trip() {
        let config = DriverConfig::builtin();
        let text = config.to_toml_string().unwrap();
        assert_eq!(DriverConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn parse_minimal_config() {
        let config = DriverConfig::parse(
            r#"
[index]
name = "Index"
dest_path = "out"

[groups.api]
path = "src/api"
dest_path = "out/api"
"#,
        )
        .unwrap();
        assert!(config.include.is_empty());
        assert!(config.header.is_empty());
        assert_eq!(config.groups["api"].path, PathBuf::from("src/api"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = DriverConfig::parse(
            r#"
[index]
name = "Index"
dest_path = "out"
colour = "blue"

[groups.api]
path = "src/api"
dest_path = "out"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn empty_groups_are_rejected() {
        let err = DriverConfig::parse("groups = {}\n[index]\nname = \"I\"\ndest_path = \"o\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::NoGroups));
    }

    #[test]
    fn load_reports_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("typedoc.toml");
        let err = DriverConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        std::fs::write(&path, DriverConfig::builtin().to_toml_string().unwrap()).unwrap();
        assert_eq!(DriverConfig::load(&path).unwrap(), DriverConfig::builtin());
    }
}
