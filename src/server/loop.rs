// Server loop module
// Accepts connections until a shutdown signal arrives

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::shutdown_signal;
use crate::config::AppState;
use crate::logger;

/// Accept connections on `listener` until SIGTERM/SIGINT.
///
/// Returns as soon as the signal arrives; in-flight connections are cancelled
/// when the runtime shuts down.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            result = &mut shutdown => {
                result?;
                logger::log_shutdown();
                return Ok(());
            }
        }
    }
}
