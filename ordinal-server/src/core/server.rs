use std::net::SocketAddr;

use crate::core::{Config, ServerState};
use crate::routes::build_app;
use crate::utils::AppError;

pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_app().with_state(state);
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!("HTTP server listening on {addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| AppError::Internal(format!("HTTP server error: {e}")))?;

        Ok(())
    }
}
