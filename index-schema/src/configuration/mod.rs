//! Per-entity index configuration.
//!
//! An [`EntityConfiguration`] is populated through the fluent
//! [`EntityConfigBuilder`] during discovery, then handed read-only to one
//! evaluator.

mod builder;
mod entity;
mod mapping;

pub use builder::EntityConfigBuilder;
pub use entity::{EntityConfiguration, MappingCallback, SettingsCallback};
pub use mapping::{IndexSettings, NumberType, Properties, TypeMapping};
