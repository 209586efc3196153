//! Server execution logic.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tandem_shared::time::Clock;
use tokio::{net::TcpListener, sync::watch};
use tower_http::trace::TraceLayer;

use crate::{
    domain::{MessagePusher, RoomRepository},
    usecase::{DEFAULT_ROOM_IDLE_TIMEOUT, SweepRoomsUseCase},
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
    sweeper::spawn_sweeper,
};

/// Runtime settings of the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty rooms older than this are reclaimed by the sweeper
    pub room_idle_timeout: Duration,
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            room_idle_timeout: DEFAULT_ROOM_IDLE_TIMEOUT,
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Multiplayer session coordinator server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(ServerConfig::default(), repository, message_pusher, clock);
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    app_state: Arc<AppState>,
    /// SweepRoomsUseCase（空ルーム回収のユースケース）
    sweep_rooms_usecase: Arc<SweepRoomsUseCase>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `config` - Bind address and sweeper settings
    /// * `repository` - Room Store
    /// * `message_pusher` - Connection Registry's send side
    /// * `clock` - Time source for timestamps and the sweep threshold
    pub fn new(
        config: ServerConfig,
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let sweep_rooms_usecase = Arc::new(SweepRoomsUseCase::new(
            repository.clone(),
            clock.clone(),
            config.room_idle_timeout,
        ));
        let app_state = Arc::new(AppState::new(repository, message_pusher, clock));

        Self {
            config,
            app_state,
            sweep_rooms_usecase,
        }
    }

    /// Build the HTTP/WebSocket router
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Bind to the configured address and serve until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Coordinator listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// The room sweeper runs alongside and is stopped with the server.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();

        let (stop_tx, stop_rx) = watch::channel(false);
        let sweeper = spawn_sweeper(
            self.sweep_rooms_usecase.clone(),
            self.config.sweep_interval,
            stop_rx,
        );

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        let _ = stop_tx.send(true);
        if let Err(e) = sweeper.await {
            tracing::warn!("Room sweeper task failed: {}", e);
        }
        result
    }
}
