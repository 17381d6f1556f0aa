//! Server glue shared by all slices: the state registry, system routes, and
//! the API error body.

pub mod auth;
pub mod content;
pub mod health;
pub mod problem;
pub mod router;
pub mod state;

pub use auth::{RequireSession, SessionClaims};
pub use problem::Problem;
pub use state::{ApiState, ApiStateBuilder, ApiStateError};
