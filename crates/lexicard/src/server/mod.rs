//! HTTP API over a [`CardRepository`].
//!
//! Routes:
//! - `GET /cards?userId=` list an owner's cards, newest first
//! - `POST /cards` create a batch (`{cards, userId?}`), 201 on success
//! - `PUT /cards/{id}` merge a partial card
//! - `DELETE /cards/{id}` remove a card
//! - `GET /settings` client settings (search debounce, default owner)
//! - `GET /healthz` liveness
//!
//! Every response is a JSON envelope; see [`response`].

mod handlers;
pub mod response;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, put};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::card::{resolve_owner, DEFAULT_OWNER};
use crate::error::Result;
use crate::repository::CardRepository;
use crate::search::DEFAULT_DEBOUNCE;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    repo: Arc<dyn CardRepository>,
    default_owner: String,
    debounce: Duration,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("default_owner", &self.default_owner)
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State using the built-in default owner.
    pub fn new(repo: impl CardRepository + 'static) -> Self {
        Self {
            repo: Arc::new(repo),
            default_owner: DEFAULT_OWNER.to_string(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Override the owner used when a request names none.
    #[must_use]
    pub fn with_default_owner(mut self, owner: impl Into<String>) -> Self {
        self.default_owner = owner.into();
        self
    }

    /// Search debounce advertised to clients.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// The requested owner, or the default if it is absent or blank.
    #[must_use]
    pub fn resolve_owner(&self, requested: Option<&str>) -> String {
        resolve_owner(requested, &self.default_owner)
    }
}

/// Build the API router with request tracing and permissive CORS.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/cards",
            get(handlers::list_cards).post(handlers::create_cards),
        )
        .route(
            "/cards/{id}",
            put(handlers::update_card).delete(handlers::delete_card),
        )
        .route("/settings", get(handlers::settings))
        .route("/healthz", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Serving card API on http://{}", addr);
    }
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Card API stopped");
    Ok(())
}

/// Bind `addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    run(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
