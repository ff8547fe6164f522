//! Health probes
//!
//! Liveness always answers; readiness also checks the database with a trivial
//! query when one is configured.

use crate::query::sqlite::{self, SqliteDatabase};
use crate::{http, logger};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde_json::json;
use std::sync::Arc;

/// Liveness probe response
pub fn liveness() -> Response<Full<Bytes>> {
    http::build_health_response(StatusCode::OK, &json!({ "status": "ok" }))
}

/// Readiness probe response
pub async fn readiness(database: Option<Arc<SqliteDatabase>>) -> Response<Full<Bytes>> {
    let ready = match database {
        Some(db) => tokio::task::spawn_blocking(move || database_ready(&db))
            .await
            .unwrap_or_else(|e| {
                logger::log_error(&format!("Readiness check panicked: {e}"));
                false
            }),
        None => true,
    };

    if ready {
        http::build_health_response(StatusCode::OK, &json!({ "status": "ok" }))
    } else {
        http::build_health_response(
            StatusCode::SERVICE_UNAVAILABLE,
            &json!({ "status": "unavailable" }),
        )
    }
}

/// Whether `SELECT 1` round-trips through the connection
pub fn database_ready(db: &SqliteDatabase) -> bool {
    let probe = db
        .with_connection(|conn| sqlite::execute(conn, "SELECT 1", [])?.scalar_or_null())
        .and_then(|result| result);

    match probe {
        Ok(value) => value.as_deref() == Some("1"),
        Err(e) => {
            logger::log_warning(&format!("Database readiness check failed: {e}"));
            false
        }
    }
}
