//! Response sink
//!
//! Where a matched route writes its header and file contents.

use super::RouteHeader;

/// Receives the output of a served route
pub trait ResponseSink {
    fn emit_header(&mut self, header: &RouteHeader);
    fn emit_body(&mut self, body: Vec<u8>);
}

/// Sink that keeps everything in memory until the HTTP response is built
#[derive(Debug, Default)]
pub struct BufferedResponse {
    headers: Vec<RouteHeader>,
    body: Vec<u8>,
}

impl BufferedResponse {
    pub fn headers(&self) -> &[RouteHeader] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_parts(self) -> (Vec<RouteHeader>, Vec<u8>) {
        (self.headers, self.body)
    }
}

impl ResponseSink for BufferedResponse {
    fn emit_header(&mut self, header: &RouteHeader) {
        self.headers.push(header.clone());
    }

    fn emit_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }
}
