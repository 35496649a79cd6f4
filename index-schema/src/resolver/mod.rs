//! Property path resolution.
//!
//! Resolves symbolic accessors and dotted string paths against a document's
//! field graph, returning the terminal [`FieldDescriptor`]. Resolution never
//! returns a partial result: a missing or ambiguous segment fails the whole
//! lookup.

mod accessor;

pub use accessor::{Accessor, Expr};

use crate::document::{Document, FieldDescriptor, TypeDescriptor};
use crate::errors::ResolutionError;
use crate::naming;

/// Resolve a symbolic accessor to the field it references.
///
/// Only a single field access, or a cast wrapping one, is accepted.
pub fn resolve<T: Document>(accessor: &Accessor<T>) -> Result<FieldDescriptor, ResolutionError> {
    let name = match accessor.expr() {
        Expr::Field(name) => name,
        Expr::Cast { operand, .. } => match operand.as_ref() {
            Expr::Field(name) => name,
            _ => return Err(ResolutionError::unsupported(accessor.to_string())),
        },
        _ => return Err(ResolutionError::unsupported(accessor.to_string())),
    };

    let root = T::descriptor();
    root.fields()
        .iter()
        .find(|field| field.name() == *name)
        .copied()
        .ok_or_else(|| ResolutionError::not_found(*name, root.name))
}

/// Resolve a dotted path such as `orders.total` starting at `T`.
///
/// Segments are matched case-insensitively. When a segment resolves to a
/// collection of user-defined elements, the next segment is looked up on the
/// element type.
pub fn resolve_path<T: Document>(path: &str) -> Result<FieldDescriptor, ResolutionError> {
    resolve_path_in(T::descriptor(), path)
}

/// Resolve a dotted path starting at an arbitrary type.
pub fn resolve_path_in(
    root: TypeDescriptor,
    path: &str,
) -> Result<FieldDescriptor, ResolutionError> {
    let mut current = root;
    let mut resolved = None;

    for segment in path.trim().split('.') {
        let field = find_field(&current, segment.trim())?;
        let ty = field.ty();

        current = match ty.element() {
            Some(element) if element.is_user_defined() => element,
            _ => ty,
        };
        resolved = Some(field);
    }

    // split always yields at least one segment
    resolved.ok_or_else(|| ResolutionError::not_found(path, root.name))
}

/// Keyword sub-field name for the field an accessor references.
pub fn keyword_name<T: Document>(accessor: &Accessor<T>) -> Result<String, ResolutionError> {
    let field = resolve(accessor)?;
    Ok(naming::keyword_name(field.name()))
}

/// Keyword sub-field name for a field given by name or dotted path.
pub fn keyword_name_for_path<T: Document>(path: &str) -> Result<String, ResolutionError> {
    let field = resolve_path::<T>(path)?;
    Ok(naming::keyword_name(field.name()))
}

fn find_field(ty: &TypeDescriptor, segment: &str) -> Result<FieldDescriptor, ResolutionError> {
    let wanted = segment.to_lowercase();
    let candidates: Vec<&FieldDescriptor> = ty
        .fields()
        .iter()
        .filter(|field| field.name().to_lowercase() == wanted)
        .collect();

    match candidates.as_slice() {
        [] => Err(ResolutionError::not_found(segment, ty.name)),
        [field] => Ok(**field),
        many => Err(ResolutionError::AmbiguousField {
            segment: segment.to_string(),
            type_name: ty.name.to_string(),
            candidates: many.iter().map(|field| field.name()).collect(),
        }),
    }
}
