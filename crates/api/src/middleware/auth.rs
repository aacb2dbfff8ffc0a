//! Session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fila_client::SessionPayload;
use fila_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// The signed-in provider's session, as unsealed by the auth guard.
///
/// Use this as an extractor parameter in any handler that requires a session:
///
/// ```ignore
/// async fn my_handler(ProviderSession(session): ProviderSession) -> AppResult<Json<()>> {
///     tracing::info!(channel = %session.channel(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ProviderSession(pub SessionPayload);

impl FromRequestParts<AppState> for ProviderSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionPayload>()
            .cloned()
            .map(ProviderSession)
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Sessão inválida. Faça login novamente.".into(),
                ))
            })
    }
}
