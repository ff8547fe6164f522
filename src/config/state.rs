// Application state module
// Shared, read-only state handed to every connection

use std::sync::Arc;

use super::types::Config;
use crate::query::sqlite::SqliteDatabase;
use crate::routing::RouteTable;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Built once at startup, never written afterwards
    pub routes: Arc<RouteTable>,
    pub database: Option<Arc<SqliteDatabase>>,
}

impl AppState {
    pub fn new(config: Config, routes: RouteTable, database: Option<SqliteDatabase>) -> Self {
        Self {
            config,
            routes: Arc::new(routes),
            database: database.map(Arc::new),
        }
    }

    pub fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
