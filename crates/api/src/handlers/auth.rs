//! Handlers for signing in and out of the console.
//!
//! The login form is the only console page reachable without a session. A
//! successful login seals the backend's login body into the `auth_session`
//! cookie; logout removes it.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use fila_client::models::Credentials;
use fila_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ProviderSession;
use crate::middleware::guard::{LANDING_PATH, LOGIN_PATH};
use crate::notifications::NoticeKind;
use crate::response::{Ack, DataResponse};
use crate::session::{removal_cookie, seal_session, session_cookie};
use crate::state::AppState;

const LOGIN_SUCCESS: &str =
    "Login realizado com sucesso! Você será redirecionado em alguns instantes...";
const LOGIN_FAILED: &str = "Erro inesperado ao tentar fazer login.";

// ---- DTOs ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub support_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// ---- Handlers ----

/// GET /login
pub async fn login_view(State(state): State<AppState>) -> Json<DataResponse<LoginView>> {
    Json(DataResponse {
        data: LoginView {
            support_link: state.config.support_link.clone(),
        },
    })
}

/// POST /login
///
/// Authenticates against the backend and stores the sealed login body in
/// the session cookie. The success notice goes straight to the new
/// session's channel since the request itself carried no session.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginRequest>,
) -> AppResult<(CookieJar, Ack)> {
    let email = input.email.trim();
    if email.is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Informe seu e-mail e sua senha.".into(),
        )));
    }

    let credentials = Credentials {
        email: email.to_string(),
        password: input.password,
    };
    let session = state
        .backend
        .login(&credentials)
        .await
        .map_err(AppError::backend(LOGIN_FAILED))?;

    let sealed = seal_session(state.sealer.as_ref(), &session, &state.config.session)
        .map_err(|e| AppError::InternalError(format!("Failed to seal session: {e}")))?;

    state
        .notifications
        .enqueue(&session.channel(), NoticeKind::Success, LOGIN_SUCCESS)
        .await;
    tracing::info!(channel = %session.channel(), "Provider signed in");

    Ok((
        jar.add(session_cookie(sealed, &state.config.session)),
        Ack::redirect(LOGIN_SUCCESS, LANDING_PATH).silent(),
    ))
}

/// POST /logout
pub async fn logout(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Ack) {
    let cleared = state.notifications.clear(&session.channel()).await;
    tracing::info!(channel = %session.channel(), cleared, "Provider signed out");

    (
        jar.remove(removal_cookie()),
        Ack::redirect("Sessão encerrada.", LOGIN_PATH).silent(),
    )
}
