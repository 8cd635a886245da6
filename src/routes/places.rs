//! Place routes, mounted under `/api/places`.

use crate::handlers::places::{create_place, delete_place, get_place_by_id, get_places_by_user_id, update_place};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn place_routes(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_place))
        .route("/user/:uid", get(get_places_by_user_id))
        .route(
            "/:pid",
            get(get_place_by_id).patch(update_place).put(update_place).delete(delete_place),
        )
        .with_state(state)
}
