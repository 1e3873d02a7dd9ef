//! Documentation extractor - walks declarations and extracts documentation

use crate::ast::{
    Attribute, Decl, DefaultAttr, EnumDecl, FieldDecl, RenameRule, SerdeAttrs, SourceFile,
    StructDecl,
};

use super::types::{DocComment, DocumentedItem, DocumentedModule, FieldDoc, ItemKind, VariantDoc};

/// Computes a default value for a field from its attributes
pub type DefaultValueExtractor = dyn Fn(&[Attribute]) -> Option<String>;

/// Default value extractor that reports `#[serde(default = "path")]` as a call
pub fn serde_default_path(attrs: &[Attribute]) -> Option<String> {
    match SerdeAttrs::from_attrs(attrs).default? {
        DefaultAttr::Path(path) => Some(format!("`{path}()`")),
        DefaultAttr::Trait => None,
    }
}

/// Extracts documentation from a parsed source file
#[derive(Default)]
pub struct DocExtractor<'a> {
    default_value: Option<&'a DefaultValueExtractor>,
}

impl<'a> DocExtractor<'a> {
    /// Create an extractor without a default value hook
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult `extractor` for fields that carry no `+default` directive
    #[must_use]
    pub fn with_default_value(mut self, extractor: &'a DefaultValueExtractor) -> Self {
        self.default_value = Some(extractor);
        self
    }

    /// Extract documentation from a source file
    pub fn extract(&self, file: &SourceFile, name: &str) -> DocumentedModule {
        let mut module = DocumentedModule::new(name.to_string(), DocComment::parse(&file.docs));

        for decl in &file.items {
            let item = match decl {
                Decl::Struct(s) => self.extract_struct(s),
                Decl::Enum(e) => Self::extract_enum(e),
            };
            if let Some(item) = item {
                module.add_item(item);
            }
        }

        module
    }

    fn extract_struct(&self, s: &StructDecl) -> Option<DocumentedItem> {
        if is_hidden(&s.attrs) {
            return None;
        }
        let container = SerdeAttrs::from_attrs(&s.attrs);
        let mut item = DocumentedItem::new(
            s.name.name.clone(),
            ItemKind::Struct,
            DocComment::parse(&s.docs),
        );

        for (index, field) in s.fields.as_slice().iter().enumerate() {
            if let Some(row) = self.extract_field(field, index, &container) {
                item.fields.push(row);
            }
        }

        Some(item)
    }

    fn extract_field(
        &self,
        field: &FieldDecl,
        index: usize,
        container: &SerdeAttrs,
    ) -> Option<FieldDoc> {
        let serde = SerdeAttrs::from_attrs(&field.attrs);
        if serde.skip || is_hidden(&field.attrs) {
            return None;
        }
        let doc = DocComment::parse(&field.docs);

        let name = if serde.flatten {
            "(flattened)".to_string()
        } else if let Some(rename) = &serde.rename {
            rename.clone()
        } else {
            match &field.name {
                Some(ident) => match container.rename_all {
                    Some(rule) => rule.apply_to_field(&ident.name),
                    None => ident.name.clone(),
                },
                None => index.to_string(),
            }
        };

        let required = !(is_option(&field.ty)
            || serde.default.is_some()
            || serde.skip_serializing_if.is_some()
            || container.default.is_some());

        let default = doc.directives.default.clone().or_else(|| {
            self.default_value
                .and_then(|extractor| extractor(&field.attrs))
        });

        Some(FieldDoc {
            name,
            ty: field.ty.clone(),
            required,
            default,
            description: doc.summary,
        })
    }

    fn extract_enum(e: &EnumDecl) -> Option<DocumentedItem> {
        if is_hidden(&e.attrs) {
            return None;
        }
        let container = SerdeAttrs::from_attrs(&e.attrs);
        let mut item = DocumentedItem::new(
            e.name.name.clone(),
            ItemKind::Enum,
            DocComment::parse(&e.docs),
        );

        for variant in &e.variants {
            let serde = SerdeAttrs::from_attrs(&variant.attrs);
            if serde.skip || is_hidden(&variant.attrs) {
                continue;
            }
            let name = serde.rename.unwrap_or_else(|| {
                variant_name(&variant.name.name, container.rename_all)
            });
            let description = DocComment::parse(&variant.docs).summary;
            item.variants.push(VariantDoc { name, description });
        }

        Some(item)
    }
}

fn variant_name(name: &str, rule: Option<RenameRule>) -> String {
    match rule {
        Some(rule) => rule.apply_to_variant(name),
        None => name.to_string(),
    }
}

/// `#[doc(hidden)]`
fn is_hidden(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.is("doc"))
        .flat_map(Attribute::meta_items)
        .any(|item| item.name == "hidden")
}

fn is_option(ty: &str) -> bool {
    ["Option<", "std::option::Option<", "core::option::Option<"]
        .iter()
        .any(|prefix| ty.starts_with(prefix))
}
