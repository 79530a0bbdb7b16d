//! HTTP surface: response envelope, health probes and router assembly.
//!
//! Auth handlers live in `auth::api`; this module wires them to paths.

pub mod health;
pub mod response;
pub mod routes;

pub use response::ApiResponse;
pub use routes::create_router;
