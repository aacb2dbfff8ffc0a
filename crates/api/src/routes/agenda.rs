//! Route definitions for the `/agenda` resource.
//!
//! All endpoints require a session.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::agenda;
use crate::state::AppState;

/// Routes mounted at `/agenda`.
///
/// ```text
/// GET    /                          -> agenda
/// GET    /link                      -> share_link
/// POST   /entries/{id}/order        -> reorder
/// POST   /entries/{id}/cancel       -> cancel
/// POST   /entries/{id}/complete     -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(agenda::agenda))
        .route("/link", get(agenda::share_link))
        .route("/entries/{id}/order", post(agenda::reorder))
        .route("/entries/{id}/cancel", post(agenda::cancel))
        .route("/entries/{id}/complete", post(agenda::complete))
}
