//! Route definitions for the dashboard and the report tabs.

use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// ```text
/// GET    /dashboard?date=                     -> dashboard
/// GET    /relatorios/{period}?date=           -> report
/// GET    /relatorios/{period}/export?date=    -> export
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(reports::dashboard))
        .route("/relatorios/{period}", get(reports::report))
        .route("/relatorios/{period}/export", get(reports::export))
}
