//! The remote queue backend as seen by the console.

use async_trait::async_trait;
use fila_core::client::Client;
use fila_core::entry::QueueEntry;
use fila_core::report::ReportWindow;

use crate::error::BackendError;
use crate::models::{
    AddToQueueRequest, CancelEntryRequest, CompleteEntryRequest, CreateClientRequest,
    Credentials, Provider, PublicQueue, ReorderRequest, SessionPayload,
};

/// Operations the console issues against the backend.
///
/// Authenticated calls take the bearer token stored in the session. Each
/// call is a single request: implementations never retry.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /provider/login`
    async fn login(&self, credentials: &Credentials) -> Result<SessionPayload, BackendError>;

    /// `GET /providers`
    async fn provider_profile(&self, token: &str) -> Result<Provider, BackendError>;

    /// `GET /clients/list`
    async fn list_clients(&self, token: &str) -> Result<Vec<Client>, BackendError>;

    /// `POST /clients/create`
    async fn create_client(
        &self,
        token: &str,
        request: &CreateClientRequest,
    ) -> Result<(), BackendError>;

    /// `GET /queues/list`. Without a window the backend returns today's queue.
    async fn list_queue(
        &self,
        token: &str,
        window: Option<&ReportWindow>,
    ) -> Result<Vec<QueueEntry>, BackendError>;

    /// `POST /queues/add`
    async fn add_to_queue(&self, token: &str, request: &AddToQueueRequest)
        -> Result<(), BackendError>;

    /// `PATCH /queues/edit/order`
    async fn reorder_entry(&self, token: &str, request: &ReorderRequest)
        -> Result<(), BackendError>;

    /// `DELETE /queues/entry/cancel`
    async fn cancel_entry(&self, token: &str, request: &CancelEntryRequest)
        -> Result<(), BackendError>;

    /// `PATCH /queues/entry/complete`
    async fn complete_entry(
        &self,
        token: &str,
        request: &CompleteEntryRequest,
    ) -> Result<(), BackendError>;

    /// `GET /provider/queue/{whatsappNumber}`, unauthenticated.
    async fn public_queue(&self, whatsapp_number: &str) -> Result<PublicQueue, BackendError>;
}
