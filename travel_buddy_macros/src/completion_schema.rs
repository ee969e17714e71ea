use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, ItemStruct, LitStr};

use crate::schema_extraction::{
    collect_doc_comments, collect_field_docs, ensure_named_struct, infer_description,
    infer_schema_name, parse_completion_schema_args, take_required_fields,
};

pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse_completion_schema_args(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut item_struct = parse_macro_input!(item as ItemStruct);

    if let Err(err) = ensure_named_struct(&item_struct) {
        return err.to_compile_error().into();
    }

    if !item_struct.generics.params.is_empty() {
        return syn::Error::new(
            item_struct.generics.span(),
            "`#[completion_schema]` does not support generic structs",
        )
        .to_compile_error()
        .into();
    }

    // Strips the `#[completion(...)]` markers so the re-emitted struct compiles.
    let required_fields = match take_required_fields(&mut item_struct) {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let schema_name = infer_schema_name(&item_struct, args.name.as_ref());
    let struct_docs = collect_doc_comments(&item_struct.attrs);
    let description = infer_description(args.description.as_ref(), struct_docs);

    let description_tokens = description
        .as_ref()
        .map(|lit| quote! { Some(#lit) })
        .unwrap_or_else(|| quote! { None });

    let field_docs = match collect_field_docs(&item_struct) {
        Ok(docs) => docs,
        Err(err) => return err.to_compile_error().into(),
    };

    let field_doc_tokens: Vec<_> = field_docs
        .iter()
        .map(|(field, doc)| {
            let field_lit = LitStr::new(field, Span::call_site());
            let doc_lit = LitStr::new(doc, Span::call_site());
            quote! { (#field_lit, #doc_lit) }
        })
        .collect();

    let required_tokens: Vec<_> = required_fields
        .iter()
        .map(|field| LitStr::new(field, Span::call_site()))
        .collect();

    let type_name = LitStr::new(&item_struct.ident.to_string(), Span::call_site());
    let ident = &item_struct.ident;

    let expanded = quote! {
        #item_struct

        impl travel_buddy::schema::CompletionSchema for #ident {
            fn schema() -> &'static travel_buddy::schema::SchemaHandle {
                static HANDLE: std::sync::OnceLock<travel_buddy::schema::SchemaHandle> = std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    let mut root = schemars::schema_for!(Self);
                    travel_buddy::schema::apply_schema_metadata(
                        &mut root,
                        travel_buddy::schema::SchemaMetadata {
                            title: #schema_name,
                            description: #description_tokens,
                            field_docs: &[#(#field_doc_tokens),*],
                            required: &[#(#required_tokens),*],
                        },
                    );
                    travel_buddy::schema::SchemaHandle::from_root_schema::<Self>(
                        #schema_name,
                        #type_name,
                        root,
                    )
                })
            }
        }
    };

    expanded.into()
}
