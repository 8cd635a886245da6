//! Route tables and the assembled application router.

mod common;
mod places;
mod users;

pub use common::common_routes;
pub use places::place_routes;
pub use users::user_routes;

use crate::handlers::route_not_found;
use crate::state::AppState;
use axum::http::{header, HeaderName, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Open CORS for the browser client.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE])
}

/// Full API: common routes, `/api/places`, `/api/users`, JSON 404 fallback.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api/places", place_routes(state.clone()))
        .nest("/api/users", user_routes(state))
        .fallback(route_not_found)
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
