//! Route table
//!
//! Holds built routes in registration order and dispatches a request path to the
//! first one that matches. Dispatch never halts anything itself: a `Served`
//! outcome tells the request entry point to stop processing.

use super::{ResponseSink, Route};
use crate::config::RouteConfig;
use crate::error::Result;
use crate::logger;
use std::path::Path;

/// Outcome of evaluating a request path against the table
#[derive(Debug, Clone, Copy)]
pub enum Dispatch<'a> {
    /// This route matched and its file was written to the sink
    Served(&'a Route),
    /// No route matched; the sink was not touched
    NotMatched,
}

impl Dispatch<'_> {
    pub const fn is_served(&self) -> bool {
        matches!(self, Self::Served(_))
    }
}

/// Ordered collection of built routes. Duplicate request paths are allowed;
/// the earlier registration always wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Build every configured route, stopping at the first invalid one
    pub fn from_config(web_root: &Path, routes: &[RouteConfig]) -> Result<Self> {
        let mut table = Self::new();
        for config in routes {
            let mut builder = Route::builder()
                .web_root(web_root)
                .when_requested(&config.request)
                .provide(&config.provide);
            if let Some(header) = &config.header {
                builder = builder.with_header(header);
            }
            let route = builder.build()?;
            logger::log_route_registered(&route);
            table.push(route);
        }
        Ok(table)
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    /// First route matching `requested`, without serving it
    pub fn find(&self, requested: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(requested))
    }

    /// Serve the first route matching `requested` into `sink`.
    ///
    /// Routes after the first match are never evaluated.
    pub fn dispatch<S: ResponseSink + ?Sized>(
        &self,
        requested: &str,
        sink: &mut S,
    ) -> Result<Dispatch<'_>> {
        for route in &self.routes {
            if route.navigate(requested, sink)? {
                return Ok(Dispatch::Served(route));
            }
        }
        Ok(Dispatch::NotMatched)
    }
}

impl FromIterator<Route> for RouteTable {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
