//! Request handler module
//!
//! Responsible for request dispatch: health probes first, then the static route
//! table, then the 404 fallback.

pub mod health;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
