//! Atelier public site: the Dioxus web client.
//!
//! Everything the browser runs lives here: the route table and pages
//! ([`app`], [`pages`]), the shared chrome and choreography surfaces
//! ([`ui`]), the API client ([`api`]) and the two pieces that tie the
//! Rust side to the page itself - the motion loop ([`motion`]) and the
//! JS bridge it drives ([`bridge`]).

pub mod api;
pub mod app;
pub mod bridge;
pub mod error;
pub mod motion;
pub mod pages;
pub mod ui;

/// Mounts the application onto the page.
pub fn launch() {
    dioxus::launch(app::App);
}
