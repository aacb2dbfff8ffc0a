use std::sync::Arc;

use fila_client::Backend;
use fila_core::seal::SessionSealer;

use crate::config::ServerConfig;
use crate::notifications::NotificationCenter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Remote queue backend.
    pub backend: Arc<dyn Backend>,
    /// Seals and unseals the session cookie.
    pub sealer: Arc<dyn SessionSealer>,
    /// Pending operator notices, one channel per provider.
    pub notifications: Arc<NotificationCenter>,
}
