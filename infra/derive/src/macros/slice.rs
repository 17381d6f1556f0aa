use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Fields, ItemStruct};

/// Expands `#[atelier_slice]`: the annotated struct becomes `<Name>Inner`,
/// and `<Name>` turns into a cheaply clonable `Arc` handle implementing
/// `FeatureSlice`, so the registry can hold every feature behind one type.
pub fn expand_slice(input: ItemStruct) -> TokenStream {
    try_expand(&input).unwrap_or_else(|err| err.to_compile_error())
}

fn try_expand(input: &ItemStruct) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "atelier_slice handles are registered by concrete type; drop the generics",
        ));
    }
    if !matches!(input.fields, Fields::Named(_)) {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "atelier_slice expects a struct with named fields",
        ));
    }

    let attrs = &input.attrs;
    let vis = &input.vis;
    let ident = &input.ident;
    let fields = &input.fields;
    let inner = format_ident!("{ident}Inner");

    Ok(quote! {
        #(#attrs)*
        #[derive(Debug, Clone)]
        #vis struct #inner #fields

        #[derive(Debug, Clone)]
        #vis struct #ident {
            inner: std::sync::Arc<#inner>,
        }

        impl #ident {
            pub fn new(inner: #inner) -> Self {
                Self { inner: std::sync::Arc::new(inner) }
            }
        }

        #[automatically_derived]
        impl std::ops::Deref for #ident {
            type Target = #inner;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        #[automatically_derived]
        impl ::atelier_kernel::domain::registry::FeatureSlice for #ident {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    })
}
