use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, ItemFn, ItemStruct, Lit, LitStr, MetaNameValue, Token};

use super::derived_trait_names;

/// Expands `#[api_model]`: wire-facing structs pick up `Debug`, `Serialize`
/// and `Deserialize`, a `ToSchema` derive under the `server` feature, and a
/// strict serde policy (camelCase names, unknown fields rejected) unless the
/// struct already pins its own.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    try_expand_model(args, &input).unwrap_or_else(|err| err.to_compile_error())
}

/// Expands `#[api_handler]`: forwards the arguments to `utoipa::path` under
/// the `server` feature and keeps extractor-heavy signatures lint-clean.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = &input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}

fn try_expand_model(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let overrides = Overrides::parse(args)?;
    let existing = SerdePolicy::scan(&input.attrs)?;
    let derives = derived_trait_names(&input.attrs);

    let derive_attr = missing_derives(&derives);
    let schema_attr = (!derives.contains("ToSchema"))
        .then(|| quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] });

    let rename =
        overrides.rename_all.unwrap_or_else(|| LitStr::new("camelCase", Span::call_site()));
    let rename_attr = match &existing.rename_all {
        Some(pinned) if pinned.value() == rename.value() => None,
        Some(pinned) => {
            return Err(syn::Error::new_spanned(
                pinned,
                "serde rename_all conflicts with api_model; keep one of the two",
            ));
        }
        None => Some(quote! { #[serde(rename_all = #rename)] }),
    };

    let deny = overrides.deny_unknown_fields.unwrap_or(true);
    let deny_attr = if existing.deny_unknown_fields {
        if !deny {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "deny_unknown_fields is pinned via serde; remove that attribute before disabling it",
            ));
        }
        None
    } else {
        deny.then(|| quote! { #[serde(deny_unknown_fields)] })
    };

    Ok(quote! {
        #derive_attr
        #schema_attr
        #rename_attr
        #deny_attr
        #input
    })
}

/// Arguments accepted by `#[api_model(...)]` itself.
#[derive(Default)]
struct Overrides {
    rename_all: Option<LitStr>,
    deny_unknown_fields: Option<bool>,
}

impl Overrides {
    fn parse(args: TokenStream) -> syn::Result<Self> {
        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated.parse2(args)?;

        let mut overrides = Self::default();
        for pair in pairs {
            if pair.path.is_ident("rename_all") {
                let value = string_value(&pair)?;
                store_once(&mut overrides.rename_all, value, &pair)?;
            } else if pair.path.is_ident("deny_unknown_fields") {
                let value = bool_value(&pair)?;
                store_once(&mut overrides.deny_unknown_fields, value, &pair)?;
            } else {
                return Err(syn::Error::new_spanned(
                    &pair.path,
                    "unsupported argument; api_model takes rename_all or deny_unknown_fields",
                ));
            }
        }
        Ok(overrides)
    }
}

/// Serde policy the author already wrote on the struct. The expansion never
/// emits a second, conflicting copy of either attribute.
struct SerdePolicy {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

impl SerdePolicy {
    fn scan(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut policy = Self { rename_all: None, deny_unknown_fields: false };

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    policy.rename_all = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("deny_unknown_fields") {
                    policy.deny_unknown_fields = true;
                }
                Ok(())
            })?;
        }

        Ok(policy)
    }
}

fn missing_derives(derives: &FxHashSet<String>) -> Option<TokenStream> {
    let mut add = Vec::new();
    if !derives.contains("Debug") {
        add.push(quote! { Debug });
    }
    if !derives.contains("Serialize") {
        add.push(quote! { ::serde::Serialize });
    }
    if !derives.contains("Deserialize") {
        add.push(quote! { ::serde::Deserialize });
    }
    (!add.is_empty()).then(|| quote! { #[derive(#(#add),*)] })
}

fn store_once<T>(slot: &mut Option<T>, value: T, pair: &MetaNameValue) -> syn::Result<()> {
    if slot.replace(value).is_some() {
        return Err(syn::Error::new_spanned(pair, "argument given twice"));
    }
    Ok(())
}

fn string_value(pair: &MetaNameValue) -> syn::Result<LitStr> {
    if let Expr::Lit(ExprLit { lit: Lit::Str(value), .. }) = &pair.value {
        Ok(value.clone())
    } else {
        Err(syn::Error::new_spanned(&pair.value, "expected a string literal"))
    }
}

fn bool_value(pair: &MetaNameValue) -> syn::Result<bool> {
    if let Expr::Lit(ExprLit { lit: Lit::Bool(value), .. }) = &pair.value {
        Ok(value.value)
    } else {
        Err(syn::Error::new_spanned(&pair.value, "expected a boolean literal"))
    }
}
