//! Derive support for `formbind`.
//!
//! `#[derive(Bindable)]` turns a named-field struct into a bindable
//! type by emitting its field table: one `FieldSpec` per declared
//! field, in declaration order, carrying the raw `#[form("...")]` tag
//! string (parsed later, at schema-build time) and accessor functions
//! projecting the struct onto each field's storage. The derive also
//! implements `BindField` for the struct itself so it flattens when
//! used as a field of another bindable type.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

#[proc_macro_derive(Bindable, attributes(form))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => expanded.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Bindable cannot be derived for generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Bindable requires named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Bindable can only be derived for structs",
            ))
        }
    };

    let mut specs = Vec::with_capacity(fields.len());
    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let ty = &field.ty;
        let ident_str = ident.to_string();

        let mut tag = String::new();
        for attr in &field.attrs {
            if attr.path().is_ident("form") {
                let lit: LitStr = attr.parse_args()?;
                tag = lit.value();
            }
        }

        specs.push(quote! {
            ::formbind::binder::FieldSpec::of::<#ty>(
                #ident_str,
                #tag,
                |parent| parent
                    .downcast_ref::<#name>()
                    .map(|v| &v.#ident as &dyn ::core::any::Any),
                |parent| parent
                    .downcast_mut::<#name>()
                    .map(|v| &mut v.#ident as &mut dyn ::core::any::Any),
            )
        });
    }

    let name_str = name.to_string();

    Ok(quote! {
        impl ::formbind::binder::Bindable for #name {
            fn type_name() -> &'static str {
                #name_str
            }

            fn fields() -> ::std::vec::Vec<::formbind::binder::FieldSpec> {
                ::std::vec![#(#specs),*]
            }
        }

        impl ::formbind::binder::BindField for #name {
            fn field_kind() -> ::formbind::binder::FieldKind {
                ::formbind::binder::FieldKind::Nested(::formbind::binder::NestedSpec {
                    fields: <#name as ::formbind::binder::Bindable>::fields,
                    enter: |slot| slot
                        .downcast_ref::<#name>()
                        .map(|v| v as &dyn ::core::any::Any),
                    enter_mut: |slot| slot
                        .downcast_mut::<#name>()
                        .map(|v| v as &mut dyn ::core::any::Any),
                })
            }
        }
    })
}
