pub mod api;
pub mod error;
pub mod runtime;
pub mod slice;

use fxhash::FxHashSet;
use syn::Attribute;

/// Trait names already listed in `#[derive(...)]` attributes, so an
/// expansion never adds a derive the author wrote themselves.
pub fn derived_trait_names(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();

    for attr in attrs {
        if !attr.path().is_ident("derive") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    traits
}
