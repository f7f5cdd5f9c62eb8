use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Ident, LitStr};

/// Struct-level options from `#[list_item(draft = "...", patch = "...")]`.
struct ItemOptions {
    draft: Ident,
    patch: Ident,
}

/// Field-level flags from `#[list_item(id)]` / `#[list_item(skip_patch)]`.
#[derive(Default)]
struct FieldFlags {
    id: bool,
    skip_patch: bool,
}

pub fn derive_list_item(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "ListItem derive: generic structs are not supported",
        ));
    }

    let fields = named_fields(input)?;
    let options = extract_options(input)?;
    let id_field = extract_id_field(&fields)?;
    let id_ident = id_field.ident.clone().expect("named field");
    let id_ty = &id_field.ty;

    let mut draft_fields = Vec::new();
    let mut patch_fields = Vec::new();
    for field in &fields {
        let ident = field.ident.as_ref().expect("named field");
        if *ident == id_ident {
            continue;
        }
        draft_fields.push(field);
        if !field_flags(field)?.skip_patch {
            patch_fields.push(field);
        }
    }

    let draft = &options.draft;
    let patch = &options.patch;

    let draft_decls = draft_fields.iter().map(|f| {
        let fvis = &f.vis;
        let ident = &f.ident;
        let ty = &f.ty;
        quote! { #fvis #ident: #ty }
    });
    let patch_decls = patch_fields.iter().map(|f| {
        let fvis = &f.vis;
        let ident = &f.ident;
        let ty = &f.ty;
        quote! { #fvis #ident: ::core::option::Option<#ty> }
    });
    let draft_moves = draft_fields.iter().map(|f| {
        let ident = &f.ident;
        quote! { #ident: draft.#ident }
    });
    let patch_merges = patch_fields.iter().map(|f| {
        let ident = &f.ident;
        quote! {
            if let ::core::option::Option::Some(value) = patch.#ident {
                self.#ident = value;
            }
        }
    });

    let draft_doc = format!("`{}` without its identity, as passed to `ListCache::add`.", name);
    let patch_doc = format!("Partial `{}` fields; `None` leaves a field untouched.", name);

    Ok(quote! {
        #[doc = #draft_doc]
        #[derive(Clone, Debug)]
        #vis struct #draft {
            #( #draft_decls, )*
        }

        #[doc = #patch_doc]
        #[derive(Clone, Debug, Default)]
        #vis struct #patch {
            #( #patch_decls, )*
        }

        impl optimistic_list::ListItem for #name {
            type Id = #id_ty;
            type Draft = #draft;
            type Patch = #patch;

            fn id(&self) -> &Self::Id {
                &self.#id_ident
            }

            fn from_draft(id: Self::Id, draft: Self::Draft) -> Self {
                Self {
                    #id_ident: id,
                    #( #draft_moves, )*
                }
            }

            #[allow(unused_variables)]
            fn merge(&mut self, patch: Self::Patch) {
                #( #patch_merges )*
            }
        }
    })
}

fn named_fields(input: &DeriveInput) -> syn::Result<Vec<Field>> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            return Ok(fields.named.iter().cloned().collect());
        }
    }
    Err(syn::Error::new_spanned(
        &input.ident,
        "ListItem derive: only structs with named fields are supported",
    ))
}

fn extract_options(input: &DeriveInput) -> syn::Result<ItemOptions> {
    let name = input.ident.to_string();
    let mut draft = format!("{}Draft", name);
    let mut patch = format!("{}Patch", name);

    for attr in &input.attrs {
        if !attr.path().is_ident("list_item") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("draft") {
                let value: LitStr = meta.value()?.parse()?;
                draft = value.value();
                Ok(())
            } else if meta.path.is_ident("patch") {
                let value: LitStr = meta.value()?.parse()?;
                patch = value.value();
                Ok(())
            } else {
                Err(meta.error("expected `draft = \"...\"` or `patch = \"...\"`"))
            }
        })?;
    }

    Ok(ItemOptions {
        draft: Ident::new(&draft, Span::call_site()),
        patch: Ident::new(&patch, Span::call_site()),
    })
}

fn field_flags(field: &Field) -> syn::Result<FieldFlags> {
    let mut flags = FieldFlags::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("list_item") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                flags.id = true;
                Ok(())
            } else if meta.path.is_ident("skip_patch") {
                flags.skip_patch = true;
                Ok(())
            } else {
                Err(meta.error("expected `id` or `skip_patch`"))
            }
        })?;
    }
    Ok(flags)
}

fn extract_id_field(fields: &[Field]) -> syn::Result<Field> {
    for field in fields {
        if field_flags(field)?.id {
            return Ok(field.clone());
        }
    }

    // Default: look for a field named "id"
    fields
        .iter()
        .find(|f| f.ident.as_ref().is_some_and(|ident| ident == "id"))
        .cloned()
        .ok_or_else(|| {
            syn::Error::new(
                Span::call_site(),
                "ListItem derive: no field marked with #[list_item(id)] and no field named `id`",
            )
        })
}
