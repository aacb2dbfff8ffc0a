//! Route definitions for the public queue page.
//!
//! The auth guard skips everything under `/fila/`.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/fila`.
///
/// ```text
/// GET    /{whatsapp}                -> public_queue
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{whatsapp}", get(public::public_queue))
}
