//! URL routing.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::handlers;
use crate::session::attach_session;

/// Build the site router around a shared application context.
pub fn routes(app: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/about", get(handlers::about))
        .route("/generals-quarters", get(handlers::generals))
        .route("/majors-suite", get(handlers::majors))
        .route(
            "/search-availability",
            get(handlers::availability).post(handlers::post_availability),
        )
        .route("/search-availability-json", post(handlers::availability_json))
        .route("/contact", get(handlers::contact))
        .route(
            "/make-reservation",
            get(handlers::reservation).post(handlers::post_reservation),
        )
        .route("/reservation-summary", get(handlers::reservation_summary))
        .nest_service("/static", ServeDir::new(&app.config.static_dir))
        .layer(middleware::from_fn_with_state(app.clone(), attach_session))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
