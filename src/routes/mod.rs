use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    ops::Deref,
    sync::{Arc, Mutex},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{RecommendationProvider, SearchSession},
};

pub mod search;

type SessionMap = HashMap<String, Arc<SearchSession>>;

/// Shared application state
pub struct AppState {
    pub provider: Arc<dyn RecommendationProvider>,
    /// Last-request-wins sessions keyed by the `x-client-id` header.
    /// Only clients with a search in flight have an entry.
    sessions: Mutex<SessionMap>,
}

impl AppState {
    pub fn new(provider: Arc<dyn RecommendationProvider>) -> Self {
        Self {
            provider,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the session for a client, creating it on first use.
    /// The entry is removed once the last lease on it is dropped.
    pub fn session(&self, client_id: &str) -> SessionLease<'_> {
        let session = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(client_id.to_string())
            .or_default()
            .clone();

        SessionLease {
            sessions: &self.sessions,
            client_id: client_id.to_string(),
            session,
        }
    }

    /// Number of clients with a search in flight
    pub fn active_sessions(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// A handler's hold on a client's session
pub struct SessionLease<'a> {
    sessions: &'a Mutex<SessionMap>,
    client_id: String,
    session: Arc<SearchSession>,
}

impl Deref for SessionLease<'_> {
    type Target = SearchSession;

    fn deref(&self) -> &SearchSession {
        &self.session
    }
}

impl Drop for SessionLease<'_> {
    fn drop(&mut self) {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // New leases are only handed out under this lock, so a count of two
        // (map plus this lease) means no other request holds the session
        let idle = sessions
            .get(&self.client_id)
            .is_some_and(|entry| Arc::ptr_eq(entry, &self.session))
            && Arc::strong_count(&self.session) == 2;

        if idle {
            sessions.remove(&self.client_id);
            tracing::debug!(client_id = %self.client_id, "Released idle search session");
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/search", post(search::search))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
