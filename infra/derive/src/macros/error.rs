use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Field, Fields, FieldsNamed, Ident, Type, Variant};

use super::derived_trait_names;

/// Per-variant facts the expansion cares about.
struct Shape<'a> {
    ident: &'a Ident,
    source: Option<&'a Field>,
    has_context: bool,
    cfg: Vec<&'a syn::Attribute>,
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    try_expand(&input).unwrap_or_else(|err| err.to_compile_error())
}

fn try_expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "atelier_error expects an enum"));
    };

    let shapes = data.variants.iter().map(inspect_variant).collect::<syn::Result<Vec<_>>>()?;

    let name = &input.ident;
    let ext_trait = format_ident!("{name}Ext");

    let derive_attr = missing_derives(input);
    let ext = context_ext(name, &ext_trait, &shapes);
    let from_sources =
        shapes.iter().filter_map(|shape| source_conversions(name, &ext_trait, shape));
    let from_messages = message_conversions(name, &shapes);

    Ok(quote! {
        #[allow(non_shorthand_field_patterns)]
        #derive_attr
        #input

        #ext
        #(#from_sources)*
        #from_messages

        #[allow(dead_code)]
        fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
        }
    })
}

fn inspect_variant(variant: &Variant) -> syn::Result<Shape<'_>> {
    let Fields::Named(fields) = &variant.fields else {
        return Err(syn::Error::new_spanned(
            variant,
            "atelier_error variants use named fields so context wiring stays explicit",
        ));
    };

    let has_context = match context_field(fields) {
        ContextField::Valid => true,
        ContextField::Missing => false,
        ContextField::WrongType(ty) => {
            return Err(syn::Error::new_spanned(ty, "context must be Option<Cow<'static, str>>"));
        }
    };

    let source = fields.named.iter().find(|field| is_source(field));
    if source.is_some() && !has_context {
        return Err(syn::Error::new_spanned(
            &variant.ident,
            "variants wrapping a source also carry `context: Option<Cow<'static, str>>`",
        ));
    }

    Ok(Shape {
        ident: &variant.ident,
        source,
        has_context,
        cfg: variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).collect(),
    })
}

enum ContextField<'a> {
    Valid,
    Missing,
    WrongType(&'a Type),
}

fn context_field(fields: &FieldsNamed) -> ContextField<'_> {
    for field in &fields.named {
        if field.ident.as_ref().is_some_and(|ident| ident == "context") {
            return if is_option_cow_str(&field.ty) {
                ContextField::Valid
            } else {
                ContextField::WrongType(&field.ty)
            };
        }
    }
    ContextField::Missing
}

fn is_source(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|ident| ident == "source")
        || field
            .attrs
            .iter()
            .any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"))
}

/// The `Ext` trait lets callers attach context to a `Result` in flight:
/// `repo.fetch().context("loading the quote pipeline")?`.
fn context_ext(name: &Ident, ext_trait: &Ident, shapes: &[Shape<'_>]) -> TokenStream {
    let arms = shapes.iter().filter(|shape| shape.has_context).map(|shape| {
        let cfg = &shape.cfg;
        let variant = shape.ident;
        quote! { #(#cfg)* #name::#variant { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext_trait<T> {
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext_trait<T> for Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    match &mut err {
                        #( #arms )*
                        _ => {}
                    }
                    err
                })
            }
        }
    }
}

/// `From<SourceTy>` plus an `Ext` impl on `Result<T, SourceTy>`, so `?` and
/// `.context(...)` both lift upstream errors into this enum.
fn source_conversions(name: &Ident, ext_trait: &Ident, shape: &Shape<'_>) -> Option<TokenStream> {
    if shape.ident == "Internal" {
        return None;
    }
    let field = shape.source?;
    let field_ident = field.ident.as_ref()?;
    let source_ty = &field.ty;
    let variant = shape.ident;
    let cfg = &shape.cfg;

    Some(quote! {
        #(#cfg)*
        #[automatically_derived]
        impl From<#source_ty> for #name {
            #[inline]
            fn from(#field_ident: #source_ty) -> Self { Self::#variant { #field_ident, context: None } }
        }

        #(#cfg)*
        impl<T> #ext_trait<T> for std::result::Result<T, #source_ty> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                self.map_err(|#field_ident| #name::#variant { #field_ident, context: Some(context.into()) })
            }
        }
    })
}

/// An `Internal` variant doubles as the `&str`/`String` sink, keeping ad-hoc
/// failures one `.into()` away.
fn message_conversions(name: &Ident, shapes: &[Shape<'_>]) -> Option<TokenStream> {
    let internal = shapes.iter().find(|shape| shape.ident == "Internal")?;
    let cfg = &internal.cfg;

    Some(quote! {
        #(#cfg)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(s: &'static str) -> Self { Self::Internal { message: std::borrow::Cow::Borrowed(s), context: None } }
        }
        #(#cfg)*
        impl From<String> for #name {
            #[inline]
            fn from(s: String) -> Self { Self::Internal { message: std::borrow::Cow::Owned(s), context: None } }
        }
    })
}

fn missing_derives(input: &DeriveInput) -> Option<TokenStream> {
    let present = derived_trait_names(&input.attrs);
    let mut add = Vec::new();
    if !present.contains("Debug") {
        add.push(quote! { Debug });
    }
    if !present.contains("Error") {
        add.push(quote! { ::thiserror::Error });
    }
    (!add.is_empty()).then(|| quote! { #[derive(#(#add),*)] })
}

/// Structurally matches `Option<Cow<'static, str>>`, tolerating qualified
/// paths like `std::borrow::Cow`.
fn is_option_cow_str(ty: &Type) -> bool {
    let Some(option) = last_segment(ty) else {
        return false;
    };
    if option.ident != "Option" {
        return false;
    }
    let Some(inner) = single_type_argument(&option.arguments) else {
        return false;
    };
    let Some(cow) = last_segment(inner) else {
        return false;
    };
    if cow.ident != "Cow" {
        return false;
    }
    cow_args_are_static_str(&cow.arguments)
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) => path.path.segments.last(),
        _ => None,
    }
}

fn single_type_argument(arguments: &syn::PathArguments) -> Option<&Type> {
    let syn::PathArguments::AngleBracketed(args) = arguments else {
        return None;
    };
    match args.args.first() {
        Some(syn::GenericArgument::Type(ty)) if args.args.len() == 1 => Some(ty),
        _ => None,
    }
}

fn cow_args_are_static_str(arguments: &syn::PathArguments) -> bool {
    let syn::PathArguments::AngleBracketed(args) = arguments else {
        return false;
    };
    let mut items = args.args.iter();
    let (Some(first), Some(second), None) = (items.next(), items.next(), items.next()) else {
        return false;
    };
    let syn::GenericArgument::Lifetime(lifetime) = first else {
        return false;
    };
    let syn::GenericArgument::Type(ty) = second else {
        return false;
    };
    lifetime.ident == "static" && last_segment(ty).is_some_and(|segment| segment.ident == "str")
}
