//! General-purpose HTTP middleware.
//!
//! Currently request logging with latency tracking.

pub mod logging;

pub use logging::request_logging;
