//! Navigation guard.
//!
//! Runs once per request, before any handler. Requests without a session are
//! sent to the login page; signed-in providers hitting the site root or the
//! login page are sent to the agenda. Static assets and the public queue
//! page skip the guard entirely.

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::session::{read_session, removal_cookie, SESSION_COOKIE};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/agenda";

const BYPASS_EXACT: &[&str] = &[
    "/favicon.ico",
    "/manifest.webmanifest",
    "/robots.txt",
    "/sitemap.xml",
    "/logo.png",
    "/health",
];

const BYPASS_PREFIXES: &[&str] = &["/assets/", "/fila/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Not subject to the guard.
    Bypass,
    Proceed,
    RedirectToLogin,
    RedirectToLanding,
}

fn is_login_path(path: &str) -> bool {
    path == LOGIN_PATH
        || path
            .strip_prefix(LOGIN_PATH)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Classify a request by path and session presence.
pub fn decide(path: &str, has_session: bool) -> GuardDecision {
    if BYPASS_EXACT.contains(&path) || BYPASS_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return GuardDecision::Bypass;
    }

    let login = is_login_path(path);
    match (has_session, login) {
        (false, false) => GuardDecision::RedirectToLogin,
        (true, true) => GuardDecision::RedirectToLanding,
        (true, false) if path == "/" => GuardDecision::RedirectToLanding,
        _ => GuardDecision::Proceed,
    }
}

/// Whether the response already sets or removes the session cookie.
fn touches_session_cookie(response: &Response) -> bool {
    let prefix = format!("{SESSION_COOKIE}=");
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with(&prefix))
}

/// Axum middleware applying [`decide`].
///
/// Redirects are `303 See Other` so a redirected form post is followed with
/// a GET. On `Proceed` the unsealed session is stored in the request
/// extensions for [`ProviderSession`](crate::middleware::auth::ProviderSession).
/// A session cookie that cannot be unsealed is removed from any guarded
/// response that does not replace it.
pub async fn auth_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if decide(&path, false) == GuardDecision::Bypass {
        return next.run(request).await;
    }

    let session = read_session(&jar, state.sealer.as_ref());
    let stale = session.is_none() && jar.get(SESSION_COOKIE).is_some();

    let response = match decide(&path, session.is_some()) {
        GuardDecision::RedirectToLogin => {
            tracing::debug!(%path, stale, "No session, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        GuardDecision::RedirectToLanding => Redirect::to(LANDING_PATH).into_response(),
        GuardDecision::Proceed | GuardDecision::Bypass => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
    };

    if stale && !touches_session_cookie(&response) {
        (jar.remove(removal_cookie()), response).into_response()
    } else {
        response
    }
}
