//! Static routing module
//!
//! Exact-match routes that serve a single file:
//! - `RouteBuilder` collects the request path, the file and an optional header
//! - `Route` is the validated, immutable result of `RouteBuilder::build`
//! - `RouteTable` evaluates routes in registration order, first match wins

mod route;
mod sink;
mod table;

pub use route::{Route, RouteBuilder, RouteHeader};
pub use sink::{BufferedResponse, ResponseSink};
pub use table::{Dispatch, RouteTable};
