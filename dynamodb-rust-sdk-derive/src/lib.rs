//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
extern crate proc_macro;
extern crate proc_macro2;
extern crate syn;
#[macro_use]
extern crate quote;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Derive macro to specify a struct that can be written directly into, and read directly from, a
/// DynamoDB item.
///
/// Each named field becomes one attribute of the item, with the field name as the attribute
/// name. The `dynamo` attribute changes this per field:
///
/// - `#[dynamo(attribute = "Name")]` stores the field under a different attribute name.
/// - `#[dynamo(skip)]` leaves the field out of the item. It keeps its current value when
///   the struct is populated from an item.
///
/// Field types must implement `ToAttributeValue` and `FromAttributeValue`. `Option` fields
/// are written as `NULL` when `None`, and read as `None` when the attribute is missing or `NULL`.
///
/// See the documentation of [`PutItemRequest::put_item()`](../dynamodb_rust_sdk/struct.PutItemRequest.html#method.put_item)
/// for example usage of this macro.
#[proc_macro_derive(DynamoItem, attributes(dynamo))]
pub fn to_from_item(input: TokenStream) -> TokenStream {
    // Parse input tokens into a syntax tree
    let input = parse_macro_input!(input as DeriveInput);

    // Build the trait implementation
    match impl_to_from_item(input) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

struct FieldAttribute {
    field: syn::Ident,
    attribute: String,
    skip: bool,
}

fn field_attribute(field: &syn::Field) -> syn::Result<FieldAttribute> {
    let ident = match &field.ident {
        Some(id) => id.clone(),
        None => {
            return Err(syn::Error::new_spanned(
                field,
                "DynamoItem fields must be named",
            ))
        }
    };
    let mut fa = FieldAttribute {
        attribute: ident.to_string(),
        field: ident,
        skip: false,
    };
    for a in &field.attrs {
        if !a.path().is_ident("dynamo") {
            continue;
        }
        a.parse_nested_meta(|meta| {
            if meta.path.is_ident("attribute") {
                let name: LitStr = meta.value()?.parse()?;
                if name.value().is_empty() {
                    return Err(meta.error("attribute name must not be empty"));
                }
                fa.attribute = name.value();
                Ok(())
            } else if meta.path.is_ident("skip") {
                fa.skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `attribute = \"...\"` or `skip`"))
            }
        })?;
    }
    Ok(fa)
}

fn impl_to_from_item(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(d) => match &d.fields {
            Fields::Named(n) => &n.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "DynamoItem only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "DynamoItem only supports Struct datatypes",
            ))
        }
    };

    let mut tbody = TokenStream2::default();
    let mut fbody = TokenStream2::default();
    for f in fields {
        let fa = field_attribute(f)?;
        if fa.skip {
            continue;
        }
        let fname = &fa.field;
        let attr = &fa.attribute;
        tbody.extend(quote! {
            item.put(#attr, &self.#fname);
        });
        fbody.extend(quote! {
            self.#fname = ::dynamodb_rust_sdk::types::FromItemAttribute::from_item_attribute(
                &self.#fname, #attr, item)?;
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::dynamodb_rust_sdk::types::DynamoItem for #name #ty_generics #where_clause {
            fn to_item(&self) -> ::std::result::Result<::dynamodb_rust_sdk::types::Item, ::dynamodb_rust_sdk::DynamoError> {
                let mut item = ::dynamodb_rust_sdk::types::Item::new();
                #tbody
                Ok(item)
            }

            fn from_item(&mut self, item: &::dynamodb_rust_sdk::types::Item) -> ::std::result::Result<(), ::dynamodb_rust_sdk::DynamoError> {
                #fbody
                Ok(())
            }
        }
    })
}
