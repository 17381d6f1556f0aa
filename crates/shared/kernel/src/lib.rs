//! Shared kernel: the glue every slice crate leans on.
//!
//! Config loading, per-visitor session flags, record-id hygiene, and the
//! HTTP surface (behind the `server` feature) live here so feature crates
//! stay focused on their own domain. The kernel also mints record ids:
//!
//! ```rust
//! # use atelier_kernel::safe_nanoid;
//! let lead_id = safe_nanoid!();
//! assert_eq!(lead_id.len(), 12);
//! ```
//!
//! Lead and staff ids get read aloud and pasted into dashboards, so the
//! alphabet drops every glyph pair that collides at a glance.

#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod prelude;
pub mod security;
#[cfg(feature = "server")]
pub mod server;
pub mod session;

/// Id alphabet without `0`/`O`/`o`, `1`/`I`/`l`/`i`.
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', // digits that read as digits
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T',
    'U', 'V', 'W', 'X', 'Y', 'Z', // uppercase minus I and O
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u',
    'v', 'w', 'x', 'y', 'z', // lowercase minus i, l, o
];

pub use atelier_domain as domain;
pub use nanoid::nanoid;

/// Mints a record id from [`SAFE_ALPHABET`], 12 characters unless sized.
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
