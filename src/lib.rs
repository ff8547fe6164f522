//! Building blocks for a small web-serving utility:
//! - [`query`]: single-use adapters over executed database statements
//! - [`routing`]: exact-match static routes served from a validated route table
//!
//! The remaining modules make up the server binary that ties them together.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod query;
pub mod routing;
pub mod server;

pub use error::{Error, Result};
