//! HTTP service exposing the Carteira timeline resources.
//!
//! The router wires three surfaces behind one bearer-token gate:
//! `/v1/timelines` and `/v1/events` CRUD, plus `/v1/clients`, which runs
//! raw client timeline rows through the deduplication engine.

pub mod auth;
pub mod error;
pub mod memory;
pub mod repository;
pub mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use auth::{cors_layer, enforce_auth, SharedResolver};
use repository::TimelineStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TimelineStore>,
    pub resolver: SharedResolver,
}

/// Builds the service router. `/health` stays public; everything else
/// passes through the authentication middleware. The CORS layer sits
/// outside the gate so OPTIONS preflights are answered unauthenticated.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/timelines",
            get(routes::list_timelines).post(routes::create_timeline),
        )
        .route(
            "/v1/timelines/:id",
            get(routes::get_timeline)
                .put(routes::update_timeline)
                .delete(routes::delete_timeline),
        )
        .route(
            "/v1/events",
            get(routes::list_events).post(routes::create_event),
        )
        .route(
            "/v1/events/:id",
            get(routes::get_event)
                .put(routes::update_event)
                .delete(routes::delete_event),
        )
        .route("/v1/clients", get(routes::list_clients))
        .route_layer(middleware::from_fn_with_state(state.clone(), enforce_auth))
        .route("/health", get(routes::health_check))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
