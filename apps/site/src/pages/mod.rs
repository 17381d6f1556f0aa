//! Route pages.

pub mod admin;
pub mod home;
pub mod quote;
pub mod studio;
