use proc_macro2::Span;
use syn::{
    parse::Parser, punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, Fields,
    ItemStruct, Lit, LitStr, MetaNameValue, Token,
};

/// Field marker consumed by `#[completion_schema]`.
const FIELD_ATTR: &str = "completion";

#[derive(Default)]
pub struct CompletionSchemaArgs {
    pub name: Option<LitStr>,
    pub description: Option<LitStr>,
}

pub fn parse_completion_schema_args(
    attr: proc_macro::TokenStream,
) -> syn::Result<CompletionSchemaArgs> {
    if attr.is_empty() {
        return Ok(CompletionSchemaArgs::default());
    }

    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let args = parser.parse(attr)?;

    let mut result = CompletionSchemaArgs::default();

    for nested in args {
        let ident = nested
            .path
            .get_ident()
            .ok_or_else(|| syn::Error::new_spanned(&nested.path, "expected identifier"))?;

        let lit_str = match &nested.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => lit.clone(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected string literal value",
                ));
            }
        };

        match ident.to_string().as_str() {
            "name" => {
                if result.name.is_some() {
                    return Err(syn::Error::new(ident.span(), "duplicate `name` argument"));
                }
                result.name = Some(lit_str);
            }
            "description" => {
                if result.description.is_some() {
                    return Err(syn::Error::new(
                        ident.span(),
                        "duplicate `description` argument",
                    ));
                }
                result.description = Some(lit_str);
            }
            other => {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unsupported argument `{other}`"),
                ));
            }
        }
    }

    Ok(result)
}

pub fn ensure_named_struct(item: &ItemStruct) -> syn::Result<()> {
    match &item.fields {
        Fields::Named(_) => Ok(()),
        _ => Err(syn::Error::new(
            item.struct_token.span(),
            "`#[completion_schema]` only supports structs with named fields",
        )),
    }
}

pub fn collect_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let mut docs = Vec::new();

    for attr in attrs {
        if attr.path().is_ident("doc") {
            if let Ok(lit) = attr.parse_args::<LitStr>() {
                docs.push(lit.value().trim().to_string());
            }
        }
    }

    if docs.is_empty() {
        None
    } else {
        Some(docs.join("\n"))
    }
}

pub fn collect_field_docs(item: &ItemStruct) -> syn::Result<Vec<(String, String)>> {
    let Fields::Named(fields) = &item.fields else {
        return Ok(Vec::new());
    };

    let mut docs = Vec::new();
    for field in &fields.named {
        let (Some(ident), Some(doc)) = (&field.ident, collect_doc_comments(&field.attrs)) else {
            continue;
        };
        let name = serialized_field_name(field)?.unwrap_or_else(|| ident.to_string());
        docs.push((name, doc));
    }

    Ok(docs)
}

/// Removes `#[completion(required)]` markers from the struct's fields and
/// returns the serialized names of the marked fields.
///
/// Marked fields are listed as required in the published schema even when
/// serde fills them with a default on input.
pub fn take_required_fields(item: &mut ItemStruct) -> syn::Result<Vec<String>> {
    let mut required = Vec::new();

    let Fields::Named(fields) = &mut item.fields else {
        return Ok(required);
    };

    for field in fields.named.iter_mut() {
        let mut marked = false;
        let mut kept = Vec::with_capacity(field.attrs.len());

        for attr in field.attrs.drain(..) {
            if !attr.path().is_ident(FIELD_ATTR) {
                kept.push(attr);
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("required") {
                    marked = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported `completion` option, expected `required`"))
                }
            })?;
        }

        field.attrs = kept;

        if marked {
            if let Some(ident) = &field.ident {
                required.push(serialized_field_name(field)?.unwrap_or_else(|| ident.to_string()));
            }
        }
    }

    Ok(required)
}

/// Reads `#[serde(rename = "...")]` so schema keys match the wire names.
///
/// With split names the `deserialize` one is used, matching the property
/// names schemars generates.
fn serialized_field_name(field: &syn::Field) -> syn::Result<Option<String>> {
    let mut renamed = None;

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if meta.input.peek(Token![=]) {
                    let lit: LitStr = meta.value()?.parse()?;
                    renamed = Some(lit.value());
                } else {
                    meta.parse_nested_meta(|inner| {
                        let lit: LitStr = inner.value()?.parse()?;
                        if inner.path.is_ident("deserialize") {
                            renamed = Some(lit.value());
                        }
                        Ok(())
                    })?;
                }
            } else if meta.input.peek(Token![=]) {
                let _: Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let content;
                syn::parenthesized!(content in meta.input);
                let _: proc_macro2::TokenStream = content.parse()?;
            }
            Ok(())
        })?;
    }

    Ok(renamed)
}

pub fn infer_schema_name(item: &ItemStruct, explicit: Option<&LitStr>) -> LitStr {
    if let Some(explicit) = explicit {
        return explicit.clone();
    }

    LitStr::new(&item.ident.to_string(), Span::call_site())
}

pub fn infer_description(explicit: Option<&LitStr>, doc: Option<String>) -> Option<LitStr> {
    if let Some(explicit) = explicit {
        return Some(explicit.clone());
    }

    doc.map(|text| LitStr::new(&text, Span::call_site()))
}
