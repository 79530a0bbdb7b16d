//! MediaVault Backend Library
//!
//! Password login, signed identity tokens and owner-only access checks for the
//! media catalog service, plus the HTTP surface that exposes them.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
