use crate::config::CandidateConfig;
use crate::handlers;
use crate::services::{CandidateStore, CredentialProvider, InstanceId, MongoCandidateStore};
use axum::{middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared by every request. Holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CandidateStore>,
    pub instance_id: InstanceId,
}

impl AppState {
    pub fn new(store: Arc<dyn CandidateStore>, instance_id: InstanceId) -> Self {
        Self { store, instance_id }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::invalid_request))
        .route("/gtg", get(handlers::gtg))
        .route(
            "/candidate/:name",
            get(handlers::get_candidate).post(handlers::post_candidate),
        )
        .route("/candidates", get(handlers::list_candidates))
        .route("/metrics", get(handlers::metrics))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
    state: AppState,
}

impl Application {
    /// Wires the MongoDB-API store with the credential `credentials`
    /// resolves, then does the startup instance id lookup.
    pub async fn build(
        config: CandidateConfig,
        credentials: &dyn CredentialProvider,
    ) -> Result<Self, AppError> {
        let credential = credentials.resolve().await?;

        let store = MongoCandidateStore::connect(&config.store, credential)
            .await
            .map_err(|e| {
                tracing::error!("Failed to initialize document store: {}", e);
                e
            })?;

        // The service starts even if the store is down; reads will 404 and
        // writes will 500 until it comes back.
        if let Err(e) = store.ping().await {
            tracing::warn!(kind = e.kind(), "Document store not reachable at startup: {}", e);
        }

        let instance_id = InstanceId::resolve(config.instance_id.as_deref()).await;

        Self::build_with_state(&config, AppState::new(Arc::new(store), instance_id)).await
    }

    pub async fn build_with_state(
        config: &CandidateConfig,
        state: AppState,
    ) -> Result<Self, AppError> {
        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            instance_id = %state.instance_id,
            "Candidate service listening"
        );

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::pin(server.into_future()),
            state,
        })
    }

    pub fn store(&self) -> Arc<dyn CandidateStore> {
        self.state.store.clone()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
