//! HTTP response building module
//!
//! Provides builders for the status codes the server emits.

use crate::routing::BufferedResponse;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, SERVER};
use hyper::{Response, StatusCode};

/// Route lookup key for a URI path: exactly one leading slash is removed,
/// everything else is kept verbatim.
pub fn request_key(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Build the response for a served route.
///
/// Server defaults are set first; a route header with the same name replaces the
/// default instead of being sent alongside it.
pub fn build_route_response(
    served: BufferedResponse,
    default_content_type: &str,
    server_name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let (headers, body) = served.into_parts();
    let content_length = body.len();

    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(body)
    };

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(SERVER, server_name)
        .header(CONTENT_LENGTH, content_length)
        .header(CONTENT_TYPE, default_content_type)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        });

    for header in headers {
        response
            .headers_mut()
            .insert(header.name().clone(), header.value().clone());
    }
    response
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("500 Internal Server Error")))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(Full::new(Bytes::from("500 Internal Server Error")))
        })
}

/// Build health probe response with a JSON body
pub fn build_health_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
