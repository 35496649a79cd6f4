use proc_macro::TokenStream;

mod document;

/// Derive `Document` and `FieldType` for a struct with named fields.
///
/// Every field type must implement `index_schema::document::FieldType`.
/// `#[document(rename = "...")]` on the struct overrides the type name used
/// for the index name.
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input.into()).into()
}
