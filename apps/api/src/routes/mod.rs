pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extract::MAX_UPLOAD_BYTES;
use crate::letter::handlers::handle_letter_from_url;
use crate::profile::handlers::handle_cv_auto_fill;
use crate::state::AppState;

/// Multipart framing allowance on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/cv/auto-fill",
            post(handle_cv_auto_fill)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .route("/letter/from-url", post(handle_letter_from_url))
        .with_state(state)
}
