//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! health probes and static route dispatch.

use crate::config::AppState;
use crate::error::Error;
use crate::handler::health;
use crate::http;
use crate::logger;
use crate::routing::{BufferedResponse, Dispatch, RouteTable};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;
    drop(req);

    if state.access_log() {
        logger::log_request(&method, &path);
    }

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(&method) {
        return Ok(resp);
    }

    // 2. Health check endpoints
    let probes = &state.config.health;
    if probes.enabled {
        if path == probes.liveness_path {
            return Ok(health::liveness());
        }
        if path == probes.readiness_path {
            return Ok(health::readiness(state.database.clone()).await);
        }
    }

    // 3. Static routes; a served route ends request processing here
    let response = match serve_static(http::request_key(&path), &state).await {
        Ok(Some(served)) => http::build_route_response(
            served,
            &state.config.http.default_content_type,
            &state.config.http.server_name,
            is_head,
        ),
        Ok(None) => {
            if state.access_log() {
                logger::log_not_found(&path);
            }
            http::build_404_response()
        }
        Err(e) => {
            logger::log_error(&format!("Failed to serve '{path}': {e}"));
            http::build_500_response()
        }
    };
    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Evaluate the route table off the async runtime.
///
/// Returns the buffered response of the first matching route, or `None`.
async fn serve_static(key: &str, state: &AppState) -> Result<Option<BufferedResponse>, Error> {
    let routes = Arc::clone(&state.routes);
    let key = key.to_string();
    let access_log = state.access_log();

    let task = tokio::task::spawn_blocking(move || dispatch_route(&routes, &key, access_log));

    task.await.map_err(|e| Error::Io(std::io::Error::other(e)))?
}

/// Run the route table against `key`, logging the served route when `access_log` is set
fn dispatch_route(
    routes: &RouteTable,
    key: &str,
    access_log: bool,
) -> Result<Option<BufferedResponse>, Error> {
    let mut sink = BufferedResponse::default();
    match routes.dispatch(key, &mut sink)? {
        Dispatch::Served(route) => {
            if access_log {
                logger::log_route_served(route, sink.body().len());
            }
            Ok(Some(sink))
        }
        Dispatch::NotMatched => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::routing::Route;
    use std::io;
    use std::sync::Mutex;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::fs;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> Arc<AppState> {
        fs::write(dir.path().join("first.html"), "<h1>first</h1>").unwrap();
        fs::write(dir.path().join("second.html"), "<h1>second</h1>").unwrap();
        fs::write(dir.path().join("feed.xml"), "<rss/>").unwrap();

        let build = |request: &str, file: &str| {
            Route::builder()
                .web_root(dir.path())
                .when_requested(request)
                .provide(file)
        };
        let routes: RouteTable = vec![
            build("a/b", "first.html").build().unwrap(),
            build("a/b", "second.html").build().unwrap(),
            build("feed", "feed.xml")
                .with_header("Content-Type: application/rss+xml")
                .build()
                .unwrap(),
        ]
        .into_iter()
        .collect();

        let mut config = Config::load_from(dir.path().join("absent").to_str().unwrap()).unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::new(config, routes, None))
    }

    fn request(method: Method, path: &str) -> Request<()> {
        Request::builder().method(method).uri(path).body(()).unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_first_registered_route_is_served() {
        let dir = tempfile::tempdir().unwrap();
        let resp = handle_request(request(Method::GET, "/a/b"), state(&dir))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        assert_eq!(body_of(resp).await, "<h1>first</h1>");
    }

    #[tokio::test]
    async fn test_route_header_is_sent() {
        let dir = tempfile::tempdir().unwrap();
        let resp = handle_request(request(Method::GET, "/feed"), state(&dir))
            .await
            .unwrap();
        assert_eq!(resp.headers()["content-type"], "application/rss+xml");
        assert_eq!(body_of(resp).await, "<rss/>");
    }

    #[tokio::test]
    async fn test_unmatched_paths_are_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        for path in ["/missing", "/a/b/", "/A/B"] {
            let resp = handle_request(request(Method::GET, path), Arc::clone(&state))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }

    #[tokio::test]
    async fn test_head_omits_body() {
        let dir = tempfile::tempdir().unwrap();
        let resp = handle_request(request(Method::HEAD, "/a/b"), state(&dir))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_method_checks() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        let resp = handle_request(request(Method::POST, "/a/b"), Arc::clone(&state))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let resp = handle_request(request(Method::OPTIONS, "/a/b"), state)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_health_probes() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        let resp = handle_request(request(Method::GET, "/healthz"), Arc::clone(&state))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = handle_request(request(Method::GET, "/readyz"), state)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_vanished_file_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        fs::remove_file(dir.path().join("feed.xml")).unwrap();
        let resp = handle_request(request(Method::GET, "/feed"), state)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn served_log_lines(access_log: bool) -> String {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir);
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let served = tracing::subscriber::with_default(subscriber, || {
            dispatch_route(&state.routes, "feed", access_log).unwrap()
        });
        assert!(served.is_some());

        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_route_served_log_follows_access_log() {
        assert!(served_log_lines(true).contains("route served"));
        assert!(!served_log_lines(false).contains("route served"));
    }
}
