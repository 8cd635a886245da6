//! User routes, mounted under `/api/users`.

use crate::handlers::users::{get_users, login, signup};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_users))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .with_state(state)
}
