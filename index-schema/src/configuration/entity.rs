//! The configuration record for one entity type.

use std::fmt;

use crate::configuration::mapping::{IndexSettings, Properties, TypeMapping};
use crate::document::Document;
use crate::resolver::Accessor;

/// Callback populating the field mappings of `T`.
pub type MappingCallback<T> = Box<dyn Fn(&mut Properties<T>) + Send + Sync>;

/// Callback populating index-level settings.
pub type SettingsCallback = Box<dyn Fn(&mut IndexSettings) + Send + Sync>;

/// How entity type `T` maps onto a search index.
///
/// `index_name` and `field_mapping` must both be set before evaluation.
/// Field references are stored unresolved and validated when an evaluator
/// resolves them.
pub struct EntityConfiguration<T> {
    pub(crate) document_key: Option<Accessor<T>>,
    pub(crate) field_mapping: Option<MappingCallback<T>>,
    pub(crate) settings: Option<SettingsCallback>,
    pub(crate) ignored_fields: Vec<Accessor<T>>,
    pub(crate) index_name: Option<String>,
}

impl<T: Document> EntityConfiguration<T> {
    pub fn new() -> Self {
        Self {
            document_key: None,
            field_mapping: None,
            settings: None,
            ignored_fields: Vec::new(),
            index_name: None,
        }
    }

    /// Field used as the document's external identifier.
    pub fn document_key(&self) -> Option<&Accessor<T>> {
        self.document_key.as_ref()
    }

    pub fn field_mapping(&self) -> Option<&MappingCallback<T>> {
        self.field_mapping.as_ref()
    }

    pub fn settings(&self) -> Option<&SettingsCallback> {
        self.settings.as_ref()
    }

    /// Fields excluded from default mapping inference.
    pub fn ignored_fields(&self) -> &[Accessor<T>] {
        &self.ignored_fields
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    /// Run the field-mapping callback, if one is set.
    pub fn build_mapping(&self) -> Option<TypeMapping> {
        self.field_mapping.as_ref().map(|configure| {
            let mut properties = Properties::new();
            configure(&mut properties);
            properties.build()
        })
    }

    /// Run the settings callback, if one is set.
    pub fn build_settings(&self) -> Option<IndexSettings> {
        self.settings.as_ref().map(|configure| {
            let mut settings = IndexSettings::default();
            configure(&mut settings);
            settings
        })
    }
}

impl<T: Document> Default for EntityConfiguration<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> fmt::Debug for EntityConfiguration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityConfiguration")
            .field("entity", &T::TYPE_NAME)
            .field("index_name", &self.index_name)
            .field("document_key", &self.document_key)
            .field("field_mapping", &self.field_mapping.is_some())
            .field("settings", &self.settings.is_some())
            .field("ignored_fields", &self.ignored_fields)
            .finish()
    }
}
