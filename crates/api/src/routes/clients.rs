//! Route definitions for the `/clientes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::clients;
use crate::state::AppState;

/// Routes mounted at `/clientes`.
///
/// ```text
/// GET    /?q=                       -> list_clients
/// POST   /                          -> create_client
/// POST   /{id}/fila                 -> enqueue_client
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(clients::list_clients).post(clients::create_client))
        .route("/{id}/fila", post(clients::enqueue_client))
}
