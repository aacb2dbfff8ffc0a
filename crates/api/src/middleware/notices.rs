//! Records the notice a response carries on the provider's channel.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use fila_client::SessionPayload;

use crate::notifications::PendingNotice;
use crate::state::AppState;

/// Enqueue the [`PendingNotice`] of the response, if any, for the session
/// that made the request. Requests without a session record nothing.
pub async fn record_notices(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let channel = request
        .extensions()
        .get::<SessionPayload>()
        .map(SessionPayload::channel);

    let mut response = next.run(request).await;

    if let (Some(channel), Some(notice)) = (channel, response.extensions_mut().remove::<PendingNotice>()) {
        state
            .notifications
            .enqueue(&channel, notice.kind, notice.message)
            .await;
    }
    response
}
