use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Error, Fields, LitStr};

// derive_document
pub fn derive_document(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(input: &DeriveInput) -> Result<TokenStream, Error> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Document cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Document can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "Document can only be derived for structs with named fields",
            ))
        }
    };

    let type_name = type_name(input)?;

    let descriptors = fields.iter().filter_map(|field| {
        let field_ident = field.ident.as_ref()?;
        let field_name = field_ident.unraw().to_string();
        let field_ty = &field.ty;

        Some(quote! {
            ::index_schema::document::FieldDescriptor::new(
                #type_name,
                #field_name,
                <#field_ty as ::index_schema::document::FieldType>::descriptor,
            )
        })
    });

    Ok(quote! {
        impl ::index_schema::document::Document for #ident {
            const TYPE_NAME: &'static str = #type_name;

            fn fields() -> &'static [::index_schema::document::FieldDescriptor] {
                static FIELDS: &[::index_schema::document::FieldDescriptor] = &[
                    #(#descriptors),*
                ];
                FIELDS
            }
        }

        impl ::index_schema::document::FieldType for #ident {
            fn descriptor() -> ::index_schema::document::TypeDescriptor {
                ::index_schema::document::TypeDescriptor::object::<Self>()
            }
        }
    })
}

/// Read `#[document(rename = "...")]`, falling back to the struct name.
fn type_name(input: &DeriveInput) -> Result<String, Error> {
    let mut rename = None;

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("document")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported document attribute"))
            }
        })?;
    }

    Ok(rename.unwrap_or_else(|| input.ident.unraw().to_string()))
}
