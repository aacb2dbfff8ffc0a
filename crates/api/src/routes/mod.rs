pub mod agenda;
pub mod auth;
pub mod clients;
pub mod health;
pub mod notifications;
pub mod public;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the console route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                                   login view, sign in (no session)
/// /logout                                  sign out
///
/// /agenda                                  today's waiting line
/// /agenda/link                             public page link to share
/// /agenda/entries/{id}/order               move up or down (POST)
/// /agenda/entries/{id}/cancel              cancel (POST)
/// /agenda/entries/{id}/complete            complete with a price (POST)
///
/// /clientes                                list/search, create
/// /clientes/{id}/fila                      add to today's queue (POST)
///
/// /dashboard                               daily report
/// /relatorios/{period}                     diario | mensal | anual
/// /relatorios/{period}/export              CSV attachment
///
/// /fila/{whatsapp}                         public queue page (no session)
///
/// /notifications                           pending notices
/// /notifications/dismiss                   dismiss the front notice (POST)
/// ```
///
/// `/health` is merged separately by the router builder.
pub fn console_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/agenda", agenda::router())
        .nest("/clientes", clients::router())
        .merge(reports::router())
        .nest("/fila", public::router())
        .nest("/notifications", notifications::router())
}
