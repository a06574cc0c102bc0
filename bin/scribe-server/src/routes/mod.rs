//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - Middleware layers (CORS, panic recovery, per-request trace-ID injection)
//! - Optional OpenAPI document (disable with `SCRIBE_ENABLE_DOCS=false`)
//! - Health route and the chat page at `/`
//! - The JSON API under `/api`

mod api;
pub mod doc;
mod health;
mod index;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router, middleware};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::panic_response;
use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(index::router())
        .nest("/api", api::router());

    if state.config.enable_docs {
        let api_doc = doc::get_docs();
        app = app.route(
            "/api-docs/openapi.json",
            get(move || {
                let doc = api_doc.clone();
                async move { Json(doc) }
            }),
        );
    }

    app
        .layer(
            ServiceBuilder::new()
                .layer(cors::cors_layer(&state))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
