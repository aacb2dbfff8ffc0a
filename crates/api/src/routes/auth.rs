//! Route definitions for signing in and out.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// GET    /login                     -> login_view
/// POST   /login                     -> login
/// POST   /logout                    -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_view).post(auth::login))
        .route("/logout", post(auth::logout))
}
