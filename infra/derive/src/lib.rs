#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! Attribute macros gluing the workspace together: runtime bootstrap, error
//! enums with context wiring, API transfer models, documented handlers, and
//! feature-slice handles.
//!
//! Every macro here expands to plain code against the sibling infra crates;
//! nothing is registered at runtime. Doc examples are `ignore`d because this
//! crate cannot depend on its own consumers; the real exercising lives in
//! those consumers and in `tests/ui/`.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Turns an `async fn main` into a synchronous one running on a vetted
/// Tokio profile.
///
/// # Arguments
///
/// * `standard` (or no argument) - balanced defaults for tools.
/// * `high_performance` - full worker pool with larger stacks, for the API
///   server.
/// * `low_latency` - half-size pool recycled quickly, for interactive side
///   processes.
///
/// # Example
///
/// ```rust,ignore
/// #[atelier_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
/// # Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares a wire-facing transfer model with the platform's serde policy.
///
/// # Injected behaviors
///
/// * Adds `Debug`, `Serialize` and `Deserialize` derives when missing.
/// * Adds `utoipa::ToSchema` behind the consuming crate's `server` feature.
/// * Applies `rename_all = "camelCase"` and `deny_unknown_fields` unless the
///   struct already pins its own serde policy; a conflicting pin is a
///   compile error rather than a silent override.
///
/// # Arguments
///
/// * `rename_all = "..."` - a different case convention for this model.
/// * `deny_unknown_fields = false` - accept unknown fields, e.g. for
///   payloads a browser extension may decorate.
///
/// # Example
///
/// ```rust,ignore
/// use atelier_derive::api_model;
///
/// #[api_model(deny_unknown_fields = false)]
/// pub struct LeadDigest {
///     pub id: String,
///     pub full_name: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Marks an Axum handler and registers its `OpenAPI` metadata.
///
/// Arguments pass straight to `utoipa::path` (method, `path = "..."`,
/// `responses(...)`, `tag = "..."`), gated behind the consuming crate's
/// `server` feature so client builds skip the documentation machinery. The
/// expansion also allows `clippy::unused_async`, which otherwise fires on
/// handlers whose extractors demand an async signature.
///
/// # Example
///
/// ```rust,ignore
/// use atelier_derive::api_handler;
///
/// #[api_handler(
///     get,
///     path = "/api/leads/stats",
///     responses((status = OK, body = LeadStats)),
///     tag = "Leads"
/// )]
/// pub async fn stats_handler() -> Result<(), ()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Declares a domain error enum wired into the platform's error handling.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` when missing.
/// * A `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and to
///   `Result<T, SourceError>` for every variant wrapping a source.
/// * `From<SourceError>` for variants with a `source` field (or a field
///   marked `#[source]`/`#[from]`), so `?` lifts upstream errors directly.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant
///   exists, keeping ad-hoc failures one `.into()` away.
/// * A module-scoped `format_context` helper the `#[error(...)]` format
///   strings call to render the optional context suffix.
///
/// # Requirements
///
/// 1. The item is an enum; variants use named fields.
/// 2. A variant carrying a source also carries
///    `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use atelier_derive::atelier_error;
/// use std::borrow::Cow;
///
/// #[atelier_error]
/// pub enum LeadsError {
///     #[error("Lead query failed{}: {source}", format_context(.context))]
///     Storage {
///         #[source]
///         source: surrealdb::Error,
///         context: Option<Cow<'static, str>>,
///     },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn recent() -> Result<Vec<String>, LeadsError> {
///     list_query().context("listing the newest leads")
/// }
/// ```
#[proc_macro_attribute]
pub fn atelier_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Declares a feature-slice handle.
///
/// The annotated struct is renamed to `<Name>Inner` and `<Name>` becomes an
/// `Arc` wrapper with `Deref` access and a `FeatureSlice` impl, which is the
/// shape the kernel registry stores.
///
/// # Example
///
/// ```rust,ignore
/// #[atelier_derive::atelier_slice]
/// pub struct LeadsSlice {
///     pub repository: LeadRepository,
/// }
///
/// fn init(repository: LeadRepository) -> LeadsSlice {
///     LeadsSlice::new(LeadsSliceInner { repository })
/// }
/// ```
#[proc_macro_attribute]
pub fn atelier_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
