//! Mapping and settings payloads.
//!
//! Field-mapping and settings callbacks populate these builders. The core
//! never inspects their contents; it hands the built values to the backend.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::document::Document;

/// Numeric field types supported by OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberType {
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    HalfFloat,
    ScaledFloat,
    UnsignedLong,
}

/// Field mapping builder handed to field-mapping callbacks for `T`.
pub struct Properties<T> {
    properties: Map<String, Value>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> Properties<T> {
    pub fn new() -> Self {
        Self {
            properties: Map::new(),
            _marker: PhantomData,
        }
    }

    /// Map a field with a raw mapping body.
    pub fn property(&mut self, name: impl Into<String>, mapping: Value) -> &mut Self {
        self.properties.insert(name.into(), mapping);
        self
    }

    pub fn keyword(&mut self, name: impl Into<String>) -> &mut Self {
        self.property(name, json!({ "type": "keyword" }))
    }

    pub fn text(&mut self, name: impl Into<String>) -> &mut Self {
        self.property(name, json!({ "type": "text" }))
    }

    /// Map a text field with a `keyword` sub-field for exact matching.
    ///
    /// The sub-field is addressed by [`crate::naming::keyword_name`].
    pub fn text_with_keyword(&mut self, name: impl Into<String>) -> &mut Self {
        self.property(
            name,
            json!({
                "type": "text",
                "fields": {
                    "keyword": { "type": "keyword", "ignore_above": 256 }
                }
            }),
        )
    }

    pub fn search_as_you_type(&mut self, name: impl Into<String>) -> &mut Self {
        self.property(name, json!({ "type": "search_as_you_type" }))
    }

    pub fn date(&mut self, name: impl Into<String>) -> &mut Self {
        self.property(name, json!({ "type": "date" }))
    }

    pub fn boolean(&mut self, name: impl Into<String>) -> &mut Self {
        self.property(name, json!({ "type": "boolean" }))
    }

    pub fn number(&mut self, name: impl Into<String>, number_type: NumberType) -> &mut Self {
        self.property(name, json!({ "type": number_type }))
    }

    /// Map a field of document type `U` as an object.
    pub fn object<U: Document>(
        &mut self,
        name: impl Into<String>,
        configure: impl FnOnce(&mut Properties<U>),
    ) -> &mut Self {
        let mut inner = Properties::<U>::new();
        configure(&mut inner);
        self.property(
            name,
            json!({ "type": "object", "properties": inner.properties }),
        )
    }

    /// Map a collection of `U` as a nested field.
    pub fn nested<U: Document>(
        &mut self,
        name: impl Into<String>,
        configure: impl FnOnce(&mut Properties<U>),
    ) -> &mut Self {
        let mut inner = Properties::<U>::new();
        configure(&mut inner);
        self.property(
            name,
            json!({ "type": "nested", "properties": inner.properties }),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn build(self) -> TypeMapping {
        TypeMapping {
            properties: self.properties,
        }
    }
}

impl<T: Document> Default for Properties<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Properties<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Properties")
            .field("properties", &self.properties)
            .finish()
    }
}

/// Built field mappings for one index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeMapping {
    pub properties: Map<String, Value>,
}

impl TypeMapping {
    /// Request body for a put-mapping call.
    pub fn to_body(&self) -> Value {
        json!({ "properties": self.properties })
    }
}

/// Index-level settings, applied only when an index is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_shards: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_replicas: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IndexSettings {
    pub fn number_of_shards(&mut self, shards: u32) -> &mut Self {
        self.number_of_shards = Some(shards);
        self
    }

    pub fn number_of_replicas(&mut self, replicas: u32) -> &mut Self {
        self.number_of_replicas = Some(replicas);
        self
    }

    pub fn refresh_interval(&mut self, interval: impl Into<String>) -> &mut Self {
        self.refresh_interval = Some(interval.into());
        self
    }

    /// Set any other index setting, e.g. `analysis`.
    pub fn setting(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.extra.insert(key.into(), value);
        self
    }
}
