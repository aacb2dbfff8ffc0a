//! Handler for the public queue page, reachable without a session.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use fila_client::models::PublicEntry;
use fila_core::contact::join_queue_link;
use fila_core::types::Timestamp;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---- DTOs ----

/// A waiting client as shown to the public: name and position only.
#[derive(Debug, Serialize)]
pub struct PublicSlot {
    pub order: i32,
    pub name: String,
}

impl From<&PublicEntry> for PublicSlot {
    fn from(entry: &PublicEntry) -> Self {
        Self {
            order: entry.order,
            name: entry.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQueueView {
    pub provider_name: String,
    pub total_in_queue: usize,
    /// The client being served (order 1).
    pub current: Option<PublicSlot>,
    pub upcoming: Vec<PublicSlot>,
    /// WhatsApp link for joining the queue, `None` for a number without digits.
    pub join_link: Option<String>,
    pub last_updated: Timestamp,
}

// ---- Handlers ----

/// GET /fila/{whatsapp}
pub async fn public_queue(
    State(state): State<AppState>,
    Path(whatsapp): Path<String>,
) -> AppResult<Json<DataResponse<PublicQueueView>>> {
    let queue = state
        .backend
        .public_queue(&whatsapp)
        .await
        .map_err(AppError::backend("Erro inesperado ao obter a fila."))?;

    let entries = &queue.serialized_entries;
    let mut upcoming: Vec<&PublicEntry> = entries.iter().filter(|e| e.order > 1).collect();
    upcoming.sort_by_key(|e| e.order);

    let view = PublicQueueView {
        provider_name: queue.provider_name.clone(),
        total_in_queue: entries.len(),
        current: entries.iter().find(|e| e.order == 1).map(PublicSlot::from),
        upcoming: upcoming.into_iter().map(PublicSlot::from).collect(),
        join_link: join_queue_link(&whatsapp),
        last_updated: Utc::now(),
    };
    Ok(Json(DataResponse { data: view }))
}
