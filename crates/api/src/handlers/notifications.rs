//! Handlers for the `/notifications` resource.
//!
//! The UI is the single consumer: it renders the front notice and dismisses
//! it, one at a time.

use axum::extract::State;
use axum::Json;

use crate::middleware::auth::ProviderSession;
use crate::notifications::Notice;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /notifications
///
/// Pending notices of the signed-in provider, front first.
pub async fn list_notifications(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
) -> Json<DataResponse<Vec<Notice>>> {
    let pending = state.notifications.pending(&session.channel()).await;
    Json(DataResponse { data: pending })
}

/// POST /notifications/dismiss
///
/// Removes the front notice and returns it, `null` when nothing was pending.
pub async fn dismiss(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
) -> Json<DataResponse<Option<Notice>>> {
    let dismissed = state.notifications.dismiss_front(&session.channel()).await;
    Json(DataResponse { data: dismissed })
}
