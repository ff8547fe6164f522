//! Route builder and validated route
//!
//! A `RouteBuilder` is consumed by `build`, so a `Route` only exists once its file
//! has been confirmed on disk and can never be reconfigured afterwards.

use super::ResponseSink;
use crate::error::{Error, Result};
use hyper::header::{HeaderName, HeaderValue, CONTENT_LENGTH};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A single `Name: value` response header attached to a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHeader {
    name: HeaderName,
    value: HeaderValue,
}

impl RouteHeader {
    /// Parse a raw `Name: value` line
    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| format!("header '{raw}' is not of the form 'Name: value'"))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| format!("invalid header name in '{raw}': {e}"))?;
        if name == CONTENT_LENGTH {
            return Err(format!("header '{raw}' is set by the server from the file size"));
        }
        let value = HeaderValue::from_str(value.trim())
            .map_err(|e| format!("invalid header value in '{raw}': {e}"))?;
        Ok(Self { name, value })
    }

    pub const fn name(&self) -> &HeaderName {
        &self.name
    }

    pub const fn value(&self) -> &HeaderValue {
        &self.value
    }
}

impl fmt::Display for RouteHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.name,
            String::from_utf8_lossy(self.value.as_bytes())
        )
    }
}

/// Collects route settings before validation
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    web_root: PathBuf,
    request: Option<String>,
    resolve: Option<String>,
    header: Option<String>,
}

impl Default for RouteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self {
            web_root: PathBuf::from("."),
            request: None,
            resolve: None,
            header: None,
        }
    }

    /// Directory that `provide` paths are relative to
    #[must_use]
    pub fn web_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.web_root = root.into();
        self
    }

    /// Request path that activates this route, without leading or trailing slash
    #[must_use]
    pub fn when_requested(mut self, path: impl Into<String>) -> Self {
        self.request = Some(path.into());
        self
    }

    /// File to serve, relative to the web root. Parent segments (`../`) are allowed.
    #[must_use]
    pub fn provide(mut self, file_path: impl Into<String>) -> Self {
        self.resolve = Some(file_path.into());
        self
    }

    /// Single optional header sent with the file, e.g. `Content-Type: text/css`
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Validate the settings and produce an immutable [`Route`]
    pub fn build(self) -> Result<Route> {
        let request_path = self.request.ok_or(Error::InvalidState(
            "route has no request path; call when_requested first",
        ))?;
        let provide = self.resolve.ok_or(Error::InvalidState(
            "route has no file to provide; call provide first",
        ))?;

        let resolve_path = self.web_root.join(provide);
        if !resolve_path.is_file() {
            return Err(Error::configuration(resolve_path, "file does not exist"));
        }

        let header = match self.header {
            Some(raw) if !raw.trim().is_empty() => Some(
                RouteHeader::parse(&raw)
                    .map_err(|reason| Error::configuration(&resolve_path, reason))?,
            ),
            _ => None,
        };

        Ok(Route {
            request_path,
            resolve_path,
            header,
        })
    }
}

/// An exact-match static route whose file existed when it was built
#[derive(Debug, Clone)]
pub struct Route {
    request_path: String,
    resolve_path: PathBuf,
    header: Option<RouteHeader>,
}

impl Route {
    pub fn builder() -> RouteBuilder {
        RouteBuilder::new()
    }

    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    pub fn resolve_path(&self) -> &Path {
        &self.resolve_path
    }

    pub const fn header(&self) -> Option<&RouteHeader> {
        self.header.as_ref()
    }

    /// Exact string comparison, no normalization
    pub fn matches(&self, requested: &str) -> bool {
        self.request_path == requested
    }

    /// Emit the header (if any) followed by the file contents.
    ///
    /// The file is read before anything is emitted, so a read failure leaves the
    /// sink untouched.
    pub fn serve<S: ResponseSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        let body = fs::read(&self.resolve_path)?;
        if let Some(header) = &self.header {
            sink.emit_header(header);
        }
        sink.emit_body(body);
        Ok(())
    }

    /// Serve this route if it matches `requested`. Returns whether it was served.
    pub fn navigate<S: ResponseSink + ?Sized>(&self, requested: &str, sink: &mut S) -> Result<bool> {
        if !self.matches(requested) {
            return Ok(false);
        }
        self.serve(sink)?;
        Ok(true)
    }
}
