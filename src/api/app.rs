use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{fetch_blocks, get_blocks, get_transfers};
use crate::api::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/blocks", get(get_blocks))
        .route("/api/fetch-blocks", post(fetch_blocks))
        .route("/api/transfers", get(get_transfers))
        .with_state(state)
}
