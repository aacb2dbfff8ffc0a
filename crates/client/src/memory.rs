//! In-process [`Backend`] that enforces the queue contract.
//!
//! Keeps providers, clients, and one [`Queue`] per provider and day behind a
//! single [`RwLock`]. The console's integration tests run against it.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use fila_core::client::Client;
use fila_core::contact::digits;
use fila_core::entry::QueueEntry;
use fila_core::report::ReportWindow;
use fila_core::types::{DbId, Timestamp};
use fila_core::Queue;
use tokio::sync::RwLock;

use crate::backend::Backend;
use crate::error::BackendError;
use crate::models::{
    AddToQueueRequest, CancelEntryRequest, CompleteEntryRequest, CreateClientRequest,
    Credentials, Provider, PublicEntry, PublicQueue, ReorderRequest, SessionPayload,
};

const INVALID_CREDENTIALS: &str = "E-mail ou senha inválidos.";
const INVALID_TOKEN: &str = "Sessão expirada. Faça login novamente.";

struct Account {
    provider: Provider,
    email: String,
    password: String,
}

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    /// Bearer token -> provider id.
    tokens: HashMap<String, DbId>,
    clients: Vec<Client>,
    /// Queue id -> (owning provider, queue).
    queues: HashMap<String, (DbId, Queue)>,
    next_provider_id: DbId,
    next_client_id: DbId,
    next_entry_id: DbId,
    frozen_now: Option<Timestamp>,
}

impl State {
    fn now(&self) -> Timestamp {
        self.frozen_now.unwrap_or_else(Utc::now)
    }

    fn authorize(&self, token: &str) -> Result<DbId, BackendError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| BackendError::Rejected(INVALID_TOKEN.into()))
    }

    fn client_mut(&mut self, provider_id: DbId, client_id: DbId) -> Result<&mut Client, BackendError> {
        self.clients
            .iter_mut()
            .find(|c| c.id == client_id && c.provider_id == provider_id)
            .ok_or_else(|| BackendError::Rejected("Cliente não encontrado.".into()))
    }

    fn queue_of_entry(&mut self, provider_id: DbId, entry_id: DbId) -> Result<&mut Queue, BackendError> {
        self.queues
            .values_mut()
            .find(|(owner, queue)| *owner == provider_id && queue.get(entry_id).is_some())
            .map(|(_, queue)| queue)
            .ok_or_else(|| BackendError::Rejected("Atendimento não encontrado.".into()))
    }

    /// Entries of one provider with the owning client embedded.
    fn entries_of(&self, provider_id: DbId) -> impl Iterator<Item = QueueEntry> + '_ {
        self.queues
            .values()
            .filter(move |(owner, _)| *owner == provider_id)
            .flat_map(|(_, queue)| queue.entries().iter().cloned())
            .map(move |mut entry| {
                entry.client = self.clients.iter().find(|c| c.id == entry.client_id).cloned();
                entry
            })
    }

    fn enqueue(
        &mut self,
        provider_id: DbId,
        client_id: DbId,
        note: Option<String>,
        day: NaiveDate,
    ) -> Result<(), BackendError> {
        let now = self.now();
        self.client_mut(provider_id, client_id)?;

        let queue_id = queue_id(provider_id, day);
        let entry_id = self.next_entry_id + 1;
        let (_, queue) = self
            .queues
            .entry(queue_id.clone())
            .or_insert_with(|| (provider_id, Queue::new(queue_id)));
        queue.enqueue(entry_id, client_id, note, now)?;
        self.next_entry_id = entry_id;

        self.client_mut(provider_id, client_id)?.last_entry = Some(now);
        Ok(())
    }
}

fn queue_id(provider_id: DbId, day: NaiveDate) -> String {
    format!("{provider_id}-{}", day.format("%Y%m%d"))
}

/// Contract double of the remote backend.
pub struct InMemoryBackend {
    state: RwLock<State>,
    offset: FixedOffset,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Days are counted in UTC.
    pub fn new() -> Self {
        Self::with_offset(Utc.fix())
    }

    /// Days (queue instances and report windows) are counted in `offset`.
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            state: RwLock::new(State::default()),
            offset,
        }
    }

    /// Add a provider account that can log in.
    pub async fn register_provider(
        &self,
        name: &str,
        email: &str,
        password: &str,
        whatsapp_number: &str,
    ) -> Provider {
        let mut state = self.state.write().await;
        state.next_provider_id += 1;
        let provider = Provider {
            id: state.next_provider_id,
            name: name.to_string(),
            whatsapp_number: Some(digits(whatsapp_number)),
        };
        state.accounts.push(Account {
            provider: provider.clone(),
            email: email.to_string(),
            password: password.to_string(),
        });
        provider
    }

    /// Pin the clock. Every subsequent write is stamped with `now`.
    pub async fn set_now(&self, now: DateTime<Utc>) {
        self.state.write().await.frozen_now = Some(now);
    }

    fn local_day(&self, at: Timestamp) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn login(&self, credentials: &Credentials) -> Result<SessionPayload, BackendError> {
        let mut state = self.state.write().await;
        let provider = state
            .accounts
            .iter()
            .find(|a| a.email == credentials.email.trim() && a.password == credentials.password)
            .map(|a| a.provider.clone())
            .ok_or_else(|| BackendError::Rejected(INVALID_CREDENTIALS.into()))?;

        let token = uuid::Uuid::new_v4().to_string();
        state.tokens.insert(token.clone(), provider.id);
        tracing::debug!(provider_id = provider.id, "In-memory login");
        Ok(SessionPayload {
            data: token,
            provider: Some(provider),
        })
    }

    async fn provider_profile(&self, token: &str) -> Result<Provider, BackendError> {
        let state = self.state.read().await;
        let provider_id = state.authorize(token)?;
        state
            .accounts
            .iter()
            .find(|a| a.provider.id == provider_id)
            .map(|a| a.provider.clone())
            .ok_or_else(|| BackendError::Rejected(INVALID_TOKEN.into()))
    }

    async fn list_clients(&self, token: &str) -> Result<Vec<Client>, BackendError> {
        let state = self.state.read().await;
        let provider_id = state.authorize(token)?;
        Ok(state
            .clients
            .iter()
            .filter(|c| c.provider_id == provider_id)
            .cloned()
            .collect())
    }

    async fn create_client(
        &self,
        token: &str,
        request: &CreateClientRequest,
    ) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        let provider_id = state.authorize(token)?;
        if request.name.trim().is_empty() {
            return Err(BackendError::Rejected("O nome do cliente é obrigatório.".into()));
        }

        let now = state.now();
        state.next_client_id += 1;
        let client_id = state.next_client_id;
        state.clients.push(Client {
            id: client_id,
            provider_id,
            name: request.name.trim().to_string(),
            whatsapp_number: request.whatsapp_number.trim().to_string(),
            created_at: now,
            updated_at: None,
            last_entry: None,
        });

        if request.add_to_queue {
            let day = self.local_day(now);
            state.enqueue(provider_id, client_id, request.note.clone(), day)?;
        }
        Ok(())
    }

    async fn list_queue(
        &self,
        token: &str,
        window: Option<&ReportWindow>,
    ) -> Result<Vec<QueueEntry>, BackendError> {
        let state = self.state.read().await;
        let provider_id = state.authorize(token)?;
        let today = ReportWindow::day(self.local_day(state.now()));
        let window = window.copied().unwrap_or(today);

        let mut entries: Vec<QueueEntry> = state
            .entries_of(provider_id)
            .filter(|e| window.contains(self.local_day(e.joined_at)))
            .collect();
        entries.sort_by_key(|e| (e.joined_at, e.id));
        Ok(entries)
    }

    async fn add_to_queue(
        &self,
        token: &str,
        request: &AddToQueueRequest,
    ) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        let provider_id = state.authorize(token)?;
        let day = self.local_day(state.now());
        state.enqueue(provider_id, request.client_id, request.note.clone(), day)
    }

    async fn reorder_entry(
        &self,
        token: &str,
        request: &ReorderRequest,
    ) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        let provider_id = state.authorize(token)?;
        let (_, queue) = state
            .queues
            .get_mut(&request.queue_id)
            .filter(|(owner, _)| *owner == provider_id)
            .ok_or_else(|| BackendError::Rejected("Fila não encontrada.".into()))?;
        queue.move_client(request.client_id, request.direction)?;
        Ok(())
    }

    async fn cancel_entry(
        &self,
        token: &str,
        request: &CancelEntryRequest,
    ) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        let provider_id = state.authorize(token)?;
        state
            .queue_of_entry(provider_id, request.entry_id)?
            .cancel(request.entry_id)?;
        Ok(())
    }

    async fn complete_entry(
        &self,
        token: &str,
        request: &CompleteEntryRequest,
    ) -> Result<(), BackendError> {
        let mut state = self.state.write().await;
        let provider_id = state.authorize(token)?;
        state
            .queue_of_entry(provider_id, request.entry_id)?
            .complete(request.entry_id, request.entry_price)?;
        Ok(())
    }

    async fn public_queue(&self, whatsapp_number: &str) -> Result<PublicQueue, BackendError> {
        let state = self.state.read().await;
        let wanted = digits(whatsapp_number);
        let provider = state
            .accounts
            .iter()
            .map(|a| &a.provider)
            .find(|p| !wanted.is_empty() && p.whatsapp_number.as_deref() == Some(wanted.as_str()))
            .ok_or_else(|| BackendError::Rejected("Prestador não encontrado.".into()))?;

        let today = queue_id(provider.id, self.local_day(state.now()));
        let serialized_entries = match state.queues.get(&today) {
            Some((_, queue)) => queue
                .waiting()
                .into_iter()
                .map(|e| {
                    let client = state.clients.iter().find(|c| c.id == e.client_id);
                    PublicEntry {
                        id: e.id,
                        order: e.order,
                        client_id: e.client_id,
                        name: client.map(|c| c.name.clone()).unwrap_or_default(),
                        whatsapp_number: client
                            .map(|c| c.whatsapp_number.clone())
                            .unwrap_or_default(),
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        Ok(PublicQueue {
            provider_name: provider.name.clone(),
            serialized_entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use fila_core::entry::{Direction, EntryStatus};
    use rust_decimal::Decimal;

    use super::*;

    async fn signed_in() -> (InMemoryBackend, String) {
        let backend = InMemoryBackend::new();
        backend
            .set_now(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap())
            .await;
        backend
            .register_provider("Barbearia", "dono@barbearia.com", "senha", "11977776666")
            .await;
        let session = backend
            .login(&Credentials {
                email: "dono@barbearia.com".into(),
                password: "senha".into(),
            })
            .await
            .unwrap();
        (backend, session.data)
    }

    async fn add_client(backend: &InMemoryBackend, token: &str, name: &str, queue: bool) {
        backend
            .create_client(
                token,
                &CreateClientRequest {
                    name: name.into(),
                    whatsapp_number: String::new(),
                    add_to_queue: queue,
                    note: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let (backend, _) = signed_in().await;
        let err = backend
            .login(&Credentials {
                email: "dono@barbearia.com".into(),
                password: "errada".into(),
            })
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::Rejected(_));
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let (backend, _) = signed_in().await;
        assert_matches!(backend.list_clients("nope").await, Err(BackendError::Rejected(_)));
    }

    #[tokio::test]
    async fn create_with_queue_appends_entry() {
        let (backend, token) = signed_in().await;
        add_client(&backend, &token, "Maria", true).await;
        add_client(&backend, &token, "João", true).await;

        let entries = backend.list_queue(&token, None).await.unwrap();
        let orders: Vec<(&str, i32)> = entries.iter().map(|e| (e.client_name(), e.order)).collect();
        assert_eq!(orders, vec![("Maria", 1), ("João", 2)]);

        let clients = backend.list_clients(&token).await.unwrap();
        assert!(clients.iter().all(|c| c.last_entry.is_some()));
    }

    #[tokio::test]
    async fn reorder_past_the_front_is_rejected_unchanged() {
        let (backend, token) = signed_in().await;
        add_client(&backend, &token, "Maria", true).await;
        add_client(&backend, &token, "João", true).await;
        let entries = backend.list_queue(&token, None).await.unwrap();
        let first = &entries[0];

        let err = backend
            .reorder_entry(
                &token,
                &ReorderRequest {
                    queue_id: first.queue_id.clone(),
                    client_id: first.client_id,
                    direction: Direction::Up,
                },
            )
            .await
            .unwrap_err();
        assert_matches!(err, BackendError::Rejected(m) if m == "Cliente já é o primeiro da fila.");

        let after = backend.list_queue(&token, None).await.unwrap();
        assert_eq!(after[0].order, 1);
        assert_eq!(after[1].order, 2);
    }

    #[tokio::test]
    async fn completed_entries_are_terminal() {
        let (backend, token) = signed_in().await;
        add_client(&backend, &token, "Maria", true).await;
        let entry_id = backend.list_queue(&token, None).await.unwrap()[0].id;

        backend
            .complete_entry(
                &token,
                &CompleteEntryRequest {
                    entry_id,
                    entry_price: Decimal::new(50, 0),
                },
            )
            .await
            .unwrap();
        let entry = &backend.list_queue(&token, None).await.unwrap()[0];
        assert_eq!(entry.status, EntryStatus::Completed);

        assert_matches!(
            backend.cancel_entry(&token, &CancelEntryRequest { entry_id }).await,
            Err(BackendError::Rejected(_))
        );
    }

    #[tokio::test]
    async fn windows_filter_by_day() {
        let (backend, token) = signed_in().await;
        add_client(&backend, &token, "Maria", true).await;

        backend
            .set_now(Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap())
            .await;
        assert!(backend.list_queue(&token, None).await.unwrap().is_empty());

        let day = ReportWindow::day(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(backend.list_queue(&token, Some(&day)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn public_queue_lists_waiting_clients() {
        let (backend, token) = signed_in().await;
        add_client(&backend, &token, "Maria", true).await;
        add_client(&backend, &token, "João", true).await;
        let entry_id = backend.list_queue(&token, None).await.unwrap()[0].id;
        backend
            .cancel_entry(&token, &CancelEntryRequest { entry_id })
            .await
            .unwrap();

        let public = backend.public_queue("(11) 97777-6666").await.unwrap();
        assert_eq!(public.provider_name, "Barbearia");
        assert_eq!(public.serialized_entries.len(), 1);
        assert_eq!(public.serialized_entries[0].name, "João");
        assert_eq!(public.serialized_entries[0].order, 1);

        assert_matches!(backend.public_queue("000").await, Err(BackendError::Rejected(_)));
    }
}
