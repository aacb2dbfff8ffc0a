//! Handlers for the `/clientes` registry.

use axum::extract::{Path, Query, State};
use axum::Json;
use fila_client::models::{AddToQueueRequest, CreateClientRequest};
use fila_core::client::NewClient;
use fila_core::search::{search_clients, SearchOutcome};
use fila_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ProviderSession;
use crate::middleware::guard::LANDING_PATH;
use crate::query::SearchParams;
use crate::response::{Ack, DataResponse};
use crate::state::AppState;

const LOAD_FAILED: &str = "Erro inesperado ao obter os clientes.";
const SCHEDULE_FAILED: &str =
    "Ocorreu um erro ao agendar o cliente. Se o erro persistir entre em contato com nosso suporte.";
const SCHEDULED: &str = "Cliente agendado com sucesso!";

// ---- DTOs ----

#[derive(Debug, Default, Deserialize)]
pub struct EnqueueInput {
    #[serde(default)]
    pub note: Option<String>,
}

// ---- Handlers ----

/// GET /clientes?q=
///
/// A blank query lists every client; otherwise the search outcome tells a
/// match apart from "nothing found".
pub async fn list_clients(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<SearchOutcome>>> {
    let clients = state
        .backend
        .list_clients(session.token())
        .await
        .map_err(AppError::backend(LOAD_FAILED))?;

    Ok(Json(DataResponse {
        data: search_clients(&clients, &params.q),
    }))
}

/// POST /clientes
///
/// The form is validated before anything is sent. With `addToQueue` the
/// backend also places the client at the end of today's queue.
pub async fn create_client(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
    Json(input): Json<NewClient>,
) -> AppResult<Ack> {
    input.check()?;

    let request = CreateClientRequest::from(&input);
    state
        .backend
        .create_client(session.token(), &request)
        .await
        .map_err(AppError::backend(SCHEDULE_FAILED))?;

    tracing::info!(add_to_queue = request.add_to_queue, "Client created");
    let message = if request.add_to_queue {
        SCHEDULED
    } else {
        "Cliente cadastrado com sucesso!"
    };
    Ok(Ack::redirect(message, LANDING_PATH))
}

/// POST /clientes/{id}/fila
pub async fn enqueue_client(
    ProviderSession(session): ProviderSession,
    State(state): State<AppState>,
    Path(client_id): Path<DbId>,
    input: Option<Json<EnqueueInput>>,
) -> AppResult<Ack> {
    let note = input
        .and_then(|Json(i)| i.note)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    state
        .backend
        .add_to_queue(session.token(), &AddToQueueRequest { client_id, note })
        .await
        .map_err(AppError::backend(SCHEDULE_FAILED))?;

    tracing::info!(client_id, "Client added to queue");
    Ok(Ack::redirect(SCHEDULED, LANDING_PATH))
}
