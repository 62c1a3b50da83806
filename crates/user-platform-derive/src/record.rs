//! Record derive macro implementation

use crate::common::rename::RenameRule;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let rename = get_rename_rule(&input)?;
    let type_name = name.unraw().to_string();

    let descriptors = fields
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
            let ty = &field.ty;
            let field_name = ident.unraw().to_string();
            let column = rename.apply(&field_name);

            Ok(quote! {
                ::user_platform::FieldDescriptor {
                    name: #field_name,
                    column: #column,
                    scalar: <#ty as ::user_platform::Scalar>::SCALAR_TYPE,
                    nullable: <#ty as ::user_platform::Scalar>::NULLABLE,
                    get: |record: &#name| ::user_platform::Scalar::to_value(&record.#ident),
                    set: |record: &mut #name, value: ::user_platform::Value| {
                        record.#ident = <#ty as ::user_platform::Scalar>::from_value(value)?;
                        ::std::result::Result::Ok(())
                    },
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        impl ::user_platform::Record for #name {
            fn shape() -> &'static ::user_platform::RecordShape<Self> {
                static SHAPE: ::std::sync::OnceLock<::user_platform::RecordShape<#name>> =
                    ::std::sync::OnceLock::new();
                SHAPE.get_or_init(|| {
                    ::user_platform::RecordShape::new(#type_name, ::std::vec![#(#descriptors),*])
                })
            }
        }
    })
}

fn get_rename_rule(input: &DeriveInput) -> Result<RenameRule> {
    let mut rule = RenameRule::None;
    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                rule = RenameRule::parse(&lit.value()).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &lit,
                        "unsupported rename_all rule (expected camelCase, PascalCase, snake_case or lowercase)",
                    )
                })?;
                Ok(())
            } else {
                Err(meta.error("unsupported record attribute"))
            }
        })?;
    }
    Ok(rule)
}
