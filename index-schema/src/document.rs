//! Field graph metadata for entity types.
//!
//! Rust has no runtime reflection, so every type that can appear in an
//! entity's field graph describes itself through [`FieldType`]. Entity types
//! themselves implement [`Document`], usually via `#[derive(Document)]`.

use std::any::type_name;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Path prefixes of types that belong to the standard library.
const BUILTIN_PREFIXES: &[&str] = &["core::", "alloc::", "std::"];

/// Shape of a type as seen by the property path resolver.
#[derive(Clone, Copy)]
pub enum TypeKind {
    /// A leaf value. Paths never walk through it.
    Scalar,
    /// A collection whose elements are described by the given descriptor.
    Collection(fn() -> TypeDescriptor),
    /// A struct with named fields.
    Object(fn() -> &'static [FieldDescriptor]),
}

impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("Scalar"),
            Self::Collection(element) => f.debug_tuple("Collection").field(&element().path).finish(),
            Self::Object(fields) => f.debug_tuple("Object").field(&fields().len()).finish(),
        }
    }
}

/// Describes a type that can appear in a document's field graph.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    /// Short name, e.g. `UserProfile` or `String`.
    pub name: &'static str,
    /// Fully qualified path as reported by [`std::any::type_name`].
    pub path: &'static str,
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Descriptor for a leaf type.
    pub fn scalar<T: ?Sized>() -> Self {
        Self {
            name: short_name(type_name::<T>()),
            path: type_name::<T>(),
            kind: TypeKind::Scalar,
        }
    }

    /// Descriptor for a collection `C` of `E` elements.
    pub fn collection<C: ?Sized, E: FieldType + ?Sized>() -> Self {
        Self {
            name: short_name(type_name::<C>()),
            path: type_name::<C>(),
            kind: TypeKind::Collection(E::descriptor),
        }
    }

    /// Descriptor for a document type.
    pub fn object<T: Document>() -> Self {
        Self {
            name: T::TYPE_NAME,
            path: type_name::<T>(),
            kind: TypeKind::Object(T::fields),
        }
    }

    /// Fields declared by this type. Empty unless the type is an object.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        match self.kind {
            TypeKind::Object(fields) => fields(),
            _ => &[],
        }
    }

    /// Element descriptor if this type is a collection.
    pub fn element(&self) -> Option<TypeDescriptor> {
        match self.kind {
            TypeKind::Collection(element) => Some(element()),
            _ => None,
        }
    }

    /// Whether this is an application-defined object type rather than a
    /// standard library or leaf type.
    pub fn is_user_defined(&self) -> bool {
        matches!(self.kind, TypeKind::Object(_))
            && !BUILTIN_PREFIXES
                .iter()
                .any(|prefix| self.path.starts_with(prefix))
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for TypeDescriptor {}

/// Describes a single named field declared on a document type.
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    owner: &'static str,
    name: &'static str,
    ty: fn() -> TypeDescriptor,
}

impl FieldDescriptor {
    pub const fn new(owner: &'static str, name: &'static str, ty: fn() -> TypeDescriptor) -> Self {
        Self { owner, name, ty }
    }

    /// Name of the type declaring this field.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Declared field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared field type.
    pub fn ty(&self) -> TypeDescriptor {
        (self.ty)()
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.name == other.name && self.ty() == other.ty()
    }
}

impl Eq for FieldDescriptor {}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("ty", &self.ty().path)
            .finish()
    }
}

/// A type that can appear as a field of a [`Document`].
pub trait FieldType {
    fn descriptor() -> TypeDescriptor;
}

/// An entity type whose instances are stored in a search index.
///
/// Implement with `#[derive(Document)]`:
///
/// ```ignore
/// #[derive(Document)]
/// struct UserProfile {
///     name: String,
///     address: Address,
///     orders: Vec<Order>,
/// }
/// ```
pub trait Document: FieldType + Send + Sync + 'static {
    /// Type name used to derive the index name.
    const TYPE_NAME: &'static str;

    /// Fields declared on this type, in declaration order.
    fn fields() -> &'static [FieldDescriptor];
}

/// Declare types as scalar leaves of the field graph.
///
/// Use this for application enums and newtypes that are stored as a single
/// value.
///
/// ```ignore
/// index_schema::scalar_field_types!(OrderStatus, Currency);
/// ```
#[macro_export]
macro_rules! scalar_field_types {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::document::FieldType for $ty {
                fn descriptor() -> $crate::document::TypeDescriptor {
                    $crate::document::TypeDescriptor::scalar::<$ty>()
                }
            }
        )*
    };
}

scalar_field_types!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    str,
    uuid::Uuid,
    serde_json::Value,
    chrono::NaiveDate,
    chrono::NaiveDateTime,
    chrono::NaiveTime,
);

impl<T: FieldType + ?Sized> FieldType for &T {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

impl<Tz: chrono::TimeZone> FieldType for chrono::DateTime<Tz> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<Self>()
    }
}

impl<K, V, S> FieldType for HashMap<K, V, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<Self>()
    }
}

impl<K, V> FieldType for BTreeMap<K, V> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar::<Self>()
    }
}

macro_rules! transparent_field_types {
    ($($wrapper:ident),*) => {
        $(
            impl<T: FieldType + ?Sized> FieldType for $wrapper<T> {
                fn descriptor() -> TypeDescriptor {
                    T::descriptor()
                }
            }
        )*
    };
}

transparent_field_types!(Box, Arc, Rc);

impl<T: FieldType> FieldType for Option<T> {
    fn descriptor() -> TypeDescriptor {
        T::descriptor()
    }
}

macro_rules! collection_field_types {
    ($($collection:ident),*) => {
        $(
            impl<T: FieldType> FieldType for $collection<T> {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::collection::<Self, T>()
                }
            }
        )*
    };
}

collection_field_types!(Vec, VecDeque, BTreeSet);

impl<T: FieldType, S> FieldType for HashSet<T, S> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>()
    }
}

impl<T: FieldType, const N: usize> FieldType for [T; N] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>()
    }
}

impl<T: FieldType> FieldType for [T] {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::collection::<Self, T>()
    }
}

/// Strip module paths from a type name, keeping generic arguments readable.
fn short_name(path: &'static str) -> &'static str {
    let base = path.split('<').next().unwrap_or(path);
    match base.rfind("::") {
        Some(idx) => &path[idx + 2..],
        None => path,
    }
}
