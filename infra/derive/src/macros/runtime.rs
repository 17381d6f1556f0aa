use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Error, Ident, ItemFn, ReturnType, Type};

/// Expands `#[atelier_runtime::main]` into a synchronous `fn main` that
/// builds the requested runtime profile and blocks on the original body.
#[must_use]
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    try_expand(args, &input).unwrap_or_else(|err| err.to_compile_error())
}

fn try_expand(args: TokenStream, input: &ItemFn) -> syn::Result<TokenStream> {
    if input.sig.asyncness.is_none() {
        return Err(Error::new_spanned(
            &input.sig.ident,
            "#[atelier_runtime::main] only wraps async functions",
        ));
    }
    if !returns_result(&input.sig.output) {
        return Err(Error::new_spanned(
            &input.sig.output,
            "#[atelier_runtime::main] needs a Result return type so runtime build errors can propagate",
        ));
    }

    let profile = parse_profile(args)?;

    let attrs = &input.attrs;
    let vis = &input.vis;
    let name = &input.sig.ident;
    let output = &input.sig.output;
    let block = &input.block;

    Ok(quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let runtime = ::atelier_runtime::Profile::#profile.build()?;
            runtime.block_on(async move #block)
        }
    })
}

fn parse_profile(args: TokenStream) -> syn::Result<Ident> {
    if args.is_empty() {
        return Ok(format_ident!("Standard"));
    }

    let ident: Ident = syn::parse2(args)?;
    let variant = match ident.to_string().as_str() {
        "standard" => "Standard",
        "high_performance" => "HighPerformance",
        "low_latency" => "LowLatency",
        _ => {
            return Err(Error::new_spanned(
                ident,
                "unknown runtime profile; expected standard, high_performance, or low_latency",
            ));
        }
    };
    Ok(format_ident!("{}", variant))
}

fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Path(path) => {
                path.path.segments.last().is_some_and(|segment| segment.ident == "Result")
            }
            _ => false,
        },
        ReturnType::Default => false,
    }
}
