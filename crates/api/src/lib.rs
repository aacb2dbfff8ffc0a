//! Fila console server.
//!
//! Serves the provider console (agenda, clients, reports) behind a sealed
//! session cookie and the public queue page, delegating every queue
//! operation to the remote backend through [`fila_client::Backend`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
