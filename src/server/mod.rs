//! HTTP host for the dispatcher

pub mod router;

use crate::dispatcher::Dispatcher;
use crate::error::{Result, SkillError};

/// Serve `POST /directive` and `GET /health` until the process exits
pub async fn start(dispatcher: Dispatcher, host: &str, port: u16) -> Result<()> {
    let bind_addr = format!("{}:{}", host, port);
    let app = router::build(dispatcher);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| SkillError::Server(format!("Failed to bind to {bind_addr}: {e}")))?;

    tracing::info!("Server listening on {bind_addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| SkillError::Server(format!("Server error: {e}")))?;

    Ok(())
}
