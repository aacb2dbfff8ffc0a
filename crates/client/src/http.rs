//! [`Backend`] over HTTP using [`reqwest`].

use async_trait::async_trait;
use fila_core::client::Client;
use fila_core::entry::QueueEntry;
use fila_core::report::ReportWindow;
use reqwest::RequestBuilder;
use serde_json::Value;

use crate::backend::Backend;
use crate::envelope::{check_response, data};
use crate::error::BackendError;
use crate::models::{
    AddToQueueRequest, CancelEntryRequest, CompleteEntryRequest, CreateClientRequest,
    Credentials, Provider, PublicQueue, QueueListing, ReorderRequest, SessionPayload,
};

/// HTTP client for the queue backend.
///
/// Auth and client-registry calls go to `base_url`; queue calls go to
/// `api_url`. Both usually point at the same host.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    api_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_url)
    }

    /// Reuse an existing [`reqwest::Client`] and its connection pool.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn base(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn api(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    // ---- private helpers ----

    /// Send the request and run the body through the envelope decoder.
    async fn send(request: RequestBuilder) -> Result<Value, BackendError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let result = check_response(status, &body);
        if let Err(err) = &result {
            tracing::debug!(status, error = %err, "Backend call failed");
        }
        result
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<SessionPayload, BackendError> {
        let value = Self::send(self.client.post(self.base("/provider/login")).json(credentials))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn provider_profile(&self, token: &str) -> Result<Provider, BackendError> {
        let value = Self::send(self.client.get(self.api("/providers")).bearer_auth(token)).await?;
        data(value)
    }

    async fn list_clients(&self, token: &str) -> Result<Vec<Client>, BackendError> {
        let value =
            Self::send(self.client.get(self.base("/clients/list")).bearer_auth(token)).await?;
        data(value)
    }

    async fn create_client(
        &self,
        token: &str,
        request: &CreateClientRequest,
    ) -> Result<(), BackendError> {
        Self::send(
            self.client
                .post(self.base("/clients/create"))
                .bearer_auth(token)
                .json(request),
        )
        .await?;
        Ok(())
    }

    async fn list_queue(
        &self,
        token: &str,
        window: Option<&ReportWindow>,
    ) -> Result<Vec<QueueEntry>, BackendError> {
        let mut request = self.client.get(self.api("/queues/list")).bearer_auth(token);
        if let Some(window) = window {
            request = request.query(&window.query_params());
        }
        let listing: QueueListing = data(Self::send(request).await?)?;
        Ok(listing.entries)
    }

    async fn add_to_queue(
        &self,
        token: &str,
        request: &AddToQueueRequest,
    ) -> Result<(), BackendError> {
        Self::send(
            self.client
                .post(self.api("/queues/add"))
                .bearer_auth(token)
                .json(request),
        )
        .await?;
        Ok(())
    }

    async fn reorder_entry(
        &self,
        token: &str,
        request: &ReorderRequest,
    ) -> Result<(), BackendError> {
        Self::send(
            self.client
                .patch(self.api("/queues/edit/order"))
                .bearer_auth(token)
                .json(request),
        )
        .await?;
        Ok(())
    }

    async fn cancel_entry(
        &self,
        token: &str,
        request: &CancelEntryRequest,
    ) -> Result<(), BackendError> {
        Self::send(
            self.client
                .delete(self.api("/queues/entry/cancel"))
                .bearer_auth(token)
                .json(request),
        )
        .await?;
        Ok(())
    }

    async fn complete_entry(
        &self,
        token: &str,
        request: &CompleteEntryRequest,
    ) -> Result<(), BackendError> {
        Self::send(
            self.client
                .patch(self.api("/queues/entry/complete"))
                .bearer_auth(token)
                .json(request),
        )
        .await?;
        Ok(())
    }

    async fn public_queue(&self, whatsapp_number: &str) -> Result<PublicQueue, BackendError> {
        let digits = fila_core::contact::digits(whatsapp_number);
        let value = Self::send(
            self.client
                .get(self.api(&format!("/provider/queue/{digits}"))),
        )
        .await?;
        data(value)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use fila_core::entry::Direction;
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn backend(server: &MockServer) -> HttpBackend {
        HttpBackend::new(server.uri(), format!("{}/", server.uri()))
    }

    #[tokio::test]
    async fn login_posts_credentials_and_returns_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provider/login"))
            .and(body_json(json!({ "email": "a@b.com", "password": "secret" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": "token-1",
                "provider": { "id": 1, "name": "Barbearia" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = backend(&server)
            .login(&Credentials {
                email: "a@b.com".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
        assert_eq!(session.token(), "token-1");
        assert_eq!(session.provider.unwrap().name, "Barbearia");
    }

    #[tokio::test]
    async fn login_rejection_surfaces_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/provider/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "errorMessage": "Senha inválida." })),
            )
            .mount(&server)
            .await;

        let err = backend(&server)
            .login(&Credentials {
                email: "a@b.com".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::Rejected(m) if m == "Senha inválida.");
    }

    #[tokio::test]
    async fn list_queue_sends_bearer_and_window() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/queues/list"))
            .and(header("authorization", "Bearer tok"))
            .and(query_param("startDate", "2025-03-01"))
            .and(query_param("endDate", "2025-03-31"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "entries": [{
                    "id": 1,
                    "queueId": "q-1",
                    "clientId": 2,
                    "order": 1,
                    "joinedAt": "2025-03-10T13:00:00Z",
                    "note": null,
                    "price": 40,
                    "status": "COMPLETED"
                }] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let window =
            ReportWindow::month_of(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()).unwrap();
        let entries = backend(&server).list_queue("tok", Some(&window)).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].price, Some(Decimal::new(40, 0)));
    }

    #[tokio::test]
    async fn nested_error_envelope_is_a_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/queues/edit/order"))
            .and(body_json(json!({ "queueId": "q-1", "clientId": 3, "direction": "UP" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "errorMessage": "Cliente já é o primeiro da fila." }
            })))
            .mount(&server)
            .await;

        let err = backend(&server)
            .reorder_entry(
                "tok",
                &ReorderRequest {
                    queue_id: "q-1".into(),
                    client_id: 3,
                    direction: Direction::Up,
                },
            )
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::Rejected(m) if m == "Cliente já é o primeiro da fila.");
    }

    #[tokio::test]
    async fn cancel_uses_delete_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/queues/entry/cancel"))
            .and(body_json(json!({ "entryId": 7 })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        backend(&server)
            .cancel_entry("tok", &CancelEntryRequest { entry_id: 7 })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_client_accepts_201() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/clients/create"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": { "id": 5 } })))
            .expect(1)
            .mount(&server)
            .await;

        let request = CreateClientRequest {
            name: "Maria".into(),
            whatsapp_number: String::new(),
            add_to_queue: false,
            note: None,
        };
        backend(&server).create_client("tok", &request).await.unwrap();
    }

    #[tokio::test]
    async fn public_queue_needs_no_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/provider/queue/11977776666"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "providerName": "Barbearia",
                    "serializedEntries": [
                        { "id": 1, "order": 1, "clientId": 9, "name": "Maria", "whatsappNumber": "" }
                    ]
                }
            })))
            .mount(&server)
            .await;

        let queue = backend(&server).public_queue("(11) 97777-6666").await.unwrap();
        assert_eq!(queue.provider_name, "Barbearia");
        assert_eq!(queue.serialized_entries[0].name, "Maria");
    }

    #[tokio::test]
    async fn server_error_without_envelope_is_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clients/list"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = backend(&server).list_clients("tok").await.unwrap_err();
        assert_matches!(err, BackendError::UnexpectedStatus { status: 503, .. });
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_request_error() {
        // Nothing listens on port 9 of localhost.
        let backend = HttpBackend::new("http://127.0.0.1:9", "http://127.0.0.1:9");
        let err = backend.list_clients("tok").await.unwrap_err();
        assert_matches!(err, BackendError::Request(_));
    }
}
