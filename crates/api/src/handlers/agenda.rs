//! Handlers for the agenda: today's waiting line and the actions on it.
//!
//! Every mutation loads the live queue first and runs the same checks the
//! backend enforces (neighbour exists, transition allowed, price positive),
//! so an impossible action is refused without a backend round trip. The
//! backend stays the source of truth: handlers answer with an [`Ack`] and
//! the UI refetches after `reloadAfterMs`.

use axum::extract::{Path, State};
use axum::Json;
use fila_client::models::{CancelEntryRequest, CompleteEntryRequest, ReorderRequest};
use fila_client::SessionPayload;
use fila_core::contact::{digits, turn_reminder_link};
use fila_core::entry::state_machine::validate_transition;
use fila_core::entry::{validate_price, Direction, EntryStatus, QueueEntry};
use fila_core::error::CoreError;
use fila_core::types::{DbId, Money, Timestamp};
use fila_core::Queue;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ProviderSession;
use crate::notifications::NoticeKind;
use crate::response::{Ack, DataResponse};
use crate::state::AppState;

const LOAD_FAILED: &str = "Erro inesperado ao obter os clientes.";
const REORDER_FAILED: &str = "Ocorreu um erro ao alterar a ordem do cliente. Se o erro persistir entre em contato com nosso suporte.";
const CANCEL_FAILED: &str = "Ocorreu um erro ao cancelar o atendimento deste cliente. Se o erro persistir entre em contato com nosso suporte.";
const COMPLETE_FAILED: &str = "Ocorreu um erro ao finalizar o atendimento deste cliente. Se o erro persistir entre em contato com nosso suporte.";

// ---- DTOs ----

/// One waiting client as shown on the agenda carousel.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaCard {
    pub entry_id: DbId,
    pub client_id: DbId,
    pub order: i32,
    pub name: String,
    pub whatsapp_number: String,
    pub note: Option<String>,
    pub joined_at: Timestamp,
    /// WhatsApp link telling the client their turn is near.
    pub reminder_link: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaView {
    pub queue_id: Option<String>,
    pub total_waiting: usize,
    /// Entry opened in the detail panel: the front of the queue.
    pub selected: Option<DbId>,
    pub entries: Vec<AgendaCard>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderInput {
    pub direction: Direction,
}

#[derive(Debug, Deserialize)]
pub struct CompleteInput {
    /// Missing is treated like zero and rejected.
    #[serde(default)]
    pub price: Option<Money>,
}

#[derive(Debug, Serialize)]
pub struct ShareLink {
    pub link: String,
}

impl From<&QueueEntry> for AgendaCard {
    fn from(entry: &QueueEntry) -> Self {
        let client = entry.client.as_ref();
        Self {
            entry_id: entry.id,
            client_id: entry.client_id,
            order: entry.order,
            name: entry.client_name().to_string(),
            whatsapp_number: client.map(|c| c.whatsapp_number.clone()).unwrap_or_default(),
            note: entry.note_text().map(str::to_string),
            joined_at: entry.joined_at,
            reminder_link: client.and_then(turn_reminder_link),
        }
    }
}

/// Load today's queue instance that holds `entry_id`.
async fn load_queue_of(
    state: &AppState,
    session: &SessionPayload,
    entry_id: DbId,
    fallback: &'static str,
) -> AppResult<Queue> {
    let entries = state
        .backend
        .list_queue(session.token(), None)
        .await
        .map_err(AppError::backend(fallback))?;

    let queue_id = entries
        .iter()
        .find(|e| e.id == entry_id)
        .map(|e| e.queue_id.clone())
        .ok_or(CoreError::NotFound {
            entity: "Atendimento",
            id: entry_id,
        })?;

    Ok(Queue::from_entries(queue_id, entries))
}

fn find_entry(queue: &Queue, entry_id: DbId) -> AppResult<&QueueEntry> {
    queue.get(entry_id).ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Atendimento",
            id: entry_id,
        })
    })
}

// ---- Handlers ----

/// GET /agenda
pub async fn agenda(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AgendaView>>> {
    let entries = state
        .backend
        .list_queue(session.token(), None)
        .await
        .map_err(AppError::backend(LOAD_FAILED))?;

    let mut waiting: Vec<&QueueEntry> = entries.iter().filter(|e| e.is_waiting()).collect();
    waiting.sort_by_key(|e| e.order);

    let cards: Vec<AgendaCard> = waiting.iter().copied().map(AgendaCard::from).collect();
    let view = AgendaView {
        queue_id: waiting.first().map(|e| e.queue_id.clone()),
        total_waiting: cards.len(),
        selected: cards.first().map(|c| c.entry_id),
        entries: cards,
    };
    Ok(Json(DataResponse { data: view }))
}

/// POST /agenda/entries/{id}/order
pub async fn reorder(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
    Json(input): Json<ReorderInput>,
) -> AppResult<Ack> {
    let queue = load_queue_of(&state, &session, entry_id, REORDER_FAILED).await?;
    queue.neighbor(entry_id, input.direction)?;
    let client_id = find_entry(&queue, entry_id)?.client_id;

    let request = ReorderRequest {
        queue_id: queue.id().to_string(),
        client_id,
        direction: input.direction,
    };
    state
        .backend
        .reorder_entry(session.token(), &request)
        .await
        .map_err(AppError::backend(REORDER_FAILED))?;

    tracing::info!(entry_id, direction = ?input.direction, "Entry reordered");
    Ok(Ack::reload(
        "Ordem alterada com sucesso! Atualizando a fila...",
        state.config.reload_delay_ms,
    ))
}

/// POST /agenda/entries/{id}/cancel
pub async fn cancel(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
) -> AppResult<Ack> {
    let queue = load_queue_of(&state, &session, entry_id, CANCEL_FAILED).await?;
    validate_transition(find_entry(&queue, entry_id)?.status, EntryStatus::Removed)?;

    state
        .backend
        .cancel_entry(session.token(), &CancelEntryRequest { entry_id })
        .await
        .map_err(AppError::backend(CANCEL_FAILED))?;

    tracing::info!(entry_id, "Entry cancelled");
    Ok(Ack::reload(
        "Atendimento cancelado com sucesso! Atualizando a fila...",
        state.config.reload_delay_ms,
    ))
}

/// POST /agenda/entries/{id}/complete
///
/// The price is checked before anything is sent to the backend.
pub async fn complete(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
    Json(input): Json<CompleteInput>,
) -> AppResult<Ack> {
    let price = validate_price(input.price.unwrap_or(Decimal::ZERO))?;

    let queue = load_queue_of(&state, &session, entry_id, COMPLETE_FAILED).await?;
    validate_transition(find_entry(&queue, entry_id)?.status, EntryStatus::Completed)?;

    let request = CompleteEntryRequest {
        entry_id,
        entry_price: price,
    };
    state
        .backend
        .complete_entry(session.token(), &request)
        .await
        .map_err(AppError::backend(COMPLETE_FAILED))?;

    tracing::info!(entry_id, %price, "Entry completed");
    Ok(Ack::reload(
        "Atendimento concluido com sucesso! Atualizando a fila...",
        state.config.reload_delay_ms,
    ))
}

/// GET /agenda/link
///
/// The public queue page address to share with clients.
pub async fn share_link(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ShareLink>>> {
    let origin = state.config.public_url.trim_end_matches('/');
    let fallback = format!(
        "Ocorreu um erro ao tentar copiar o link para a área de transferência. \
         Por favor, envie o link manualmente para o cliente no seguinte formato: {origin}/fila/{{seu-whatsapp}}."
    );

    let provider = state
        .backend
        .provider_profile(session.token())
        .await
        .map_err(AppError::backend(fallback.clone()))?;

    let number = provider
        .whatsapp_number
        .as_deref()
        .map(digits)
        .filter(|n| !n.is_empty())
        .ok_or(AppError::Core(CoreError::Validation(fallback)))?;

    state
        .notifications
        .enqueue(
            &session.channel(),
            NoticeKind::Success,
            "Link copiado para a área de transferência.",
        )
        .await;

    Ok(Json(DataResponse {
        data: ShareLink {
            link: format!("{origin}/fila/{number}"),
        },
    }))
}
