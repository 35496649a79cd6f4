//! Fluent builder for entity configurations.

use tracing::warn;

use crate::configuration::entity::EntityConfiguration;
use crate::configuration::mapping::{IndexSettings, Properties};
use crate::document::Document;
use crate::naming;
use crate::resolver::Accessor;

/// Fluent builder populating an [`EntityConfiguration`] for `T`.
///
/// Mutators only store their argument; validation happens when the
/// configuration is evaluated.
///
/// # Example
///
/// ```ignore
/// let builder = EntityConfigBuilder::<UserProfile>::new()
///     .to_index(None)
///     .has_key(field!(UserProfile => id))
///     .properties(|p| {
///         p.keyword("id").text_with_keyword("name");
///     });
/// ```
#[derive(Debug)]
pub struct EntityConfigBuilder<T: Document> {
    configuration: EntityConfiguration<T>,
}

impl<T: Document> EntityConfigBuilder<T> {
    pub fn new() -> Self {
        Self {
            configuration: EntityConfiguration::new(),
        }
    }

    /// Set the field used as the document identifier.
    pub fn has_key(mut self, accessor: Accessor<T>) -> Self {
        self.configuration.document_key = Some(accessor);
        self
    }

    /// Set the field-mapping callback.
    pub fn properties<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut Properties<T>) + Send + Sync + 'static,
    {
        self.configuration.field_mapping = Some(Box::new(configure));
        self
    }

    /// Set the index settings callback.
    pub fn settings<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut IndexSettings) + Send + Sync + 'static,
    {
        self.configuration.settings = Some(Box::new(configure));
        self
    }

    /// Derive the index name from `T`'s type name and an optional prefix.
    ///
    /// The name is fixed by the first call; later calls are ignored.
    pub fn to_index(mut self, prefix: Option<&str>) -> Self {
        let index_name = naming::index_name(prefix, T::TYPE_NAME);
        match &self.configuration.index_name {
            Some(existing) => {
                warn!(
                    entity = T::TYPE_NAME,
                    index = %existing,
                    ignored = %index_name,
                    "Index name already set"
                );
            }
            None => self.configuration.index_name = Some(index_name),
        }
        self
    }

    /// Set the fields excluded from default mapping inference.
    pub fn ignores(mut self, accessors: Vec<Accessor<T>>) -> Self {
        self.configuration.ignored_fields = accessors;
        self
    }

    pub fn configuration(&self) -> &EntityConfiguration<T> {
        &self.configuration
    }

    pub fn build(self) -> EntityConfiguration<T> {
        self.configuration
    }
}

impl<T: Document> Default for EntityConfigBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
