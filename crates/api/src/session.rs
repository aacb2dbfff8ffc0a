//! The `auth_session` cookie.
//!
//! The cookie value is the backend's login body sealed with the server's
//! session password. It is the only state the console keeps on the client.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use fila_client::SessionPayload;
use fila_core::seal::{seal_json, unseal_json, SealError, SessionSealer};

use crate::config::SessionConfig;

pub const SESSION_COOKIE: &str = "auth_session";

/// Seal `payload` into a cookie value.
pub fn seal_session(
    sealer: &dyn SessionSealer,
    payload: &SessionPayload,
    config: &SessionConfig,
) -> Result<String, SealError> {
    seal_json(sealer, payload, Duration::seconds(config.ttl_secs), Utc::now())
}

/// Read and unseal the session cookie.
///
/// A missing, tampered, or expired cookie all read as no session.
pub fn read_session(jar: &CookieJar, sealer: &dyn SessionSealer) -> Option<SessionPayload> {
    let cookie = jar.get(SESSION_COOKIE)?;
    match unseal_json(sealer, cookie.value(), Utc::now()) {
        Ok(payload) => Some(payload),
        Err(err) => {
            tracing::debug!(error = %err, "Ignoring unreadable session cookie");
            None
        }
    }
}

/// The cookie set at login.
pub fn session_cookie(value: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.cookie_secure)
        .path("/")
        .max_age(time::Duration::seconds(config.ttl_secs))
        .build()
}

/// Cookie whose removal clears the session.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
