//! Queue entries and their lifecycle.
//!
//! An entry starts `WAITING` and ends either `COMPLETED` (served and priced)
//! or `REMOVED` (cancelled). Both end states are terminal: entries are never
//! deleted, so history stays available for reporting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::CoreError;
use crate::types::{DbId, Money, Timestamp};

// ---------------------------------------------------------------------------
// Status / direction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Waiting,
    Completed,
    Removed,
}

impl EntryStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, EntryStatus::Waiting)
    }

    /// Label used by the console and the CSV export.
    pub fn label(self) -> &'static str {
        match self {
            EntryStatus::Waiting => "Aguardando",
            EntryStatus::Completed => "Concluído",
            EntryStatus::Removed => "Removido",
        }
    }
}

/// Direction of an order swap. `Up` moves an entry towards the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One client's participation in a queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub id: DbId,
    pub queue_id: String,
    pub client_id: DbId,
    /// 1-based position; only meaningful while `WAITING`.
    pub order: i32,
    pub joined_at: Timestamp,
    #[serde(default)]
    pub note: Option<String>,
    /// Set when the entry is completed.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Money>,
    pub status: EntryStatus,
    /// Embedded by the backend on listing endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
}

impl QueueEntry {
    pub fn is_waiting(&self) -> bool {
        self.status == EntryStatus::Waiting
    }

    /// Display name of the owning client, empty when the backend did not embed it.
    pub fn client_name(&self) -> &str {
        self.client.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    /// The note, or `None` when blank.
    pub fn note_text(&self) -> Option<&str> {
        self.note.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Earnings contributed by this entry: its price when completed, else zero.
    pub fn earnings(&self) -> Money {
        match self.status {
            EntryStatus::Completed => self.price.unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }
}

/// Reject a completion price that is zero or negative.
///
/// Runs before anything is sent to the backend.
pub fn validate_price(price: Money) -> Result<Money, CoreError> {
    if price <= Decimal::ZERO {
        return Err(CoreError::Validation(
            "Por favor, informe o valor do atendimento.".into(),
        ));
    }
    Ok(price)
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

pub mod state_machine {
    use super::EntryStatus;
    use crate::error::CoreError;

    /// Statuses reachable from `from`. Terminal states return an empty slice.
    pub fn valid_transitions(from: EntryStatus) -> &'static [EntryStatus] {
        match from {
            EntryStatus::Waiting => &[EntryStatus::Completed, EntryStatus::Removed],
            EntryStatus::Completed | EntryStatus::Removed => &[],
        }
    }

    pub fn can_transition(from: EntryStatus, to: EntryStatus) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a transition, returning a [`CoreError::Conflict`] for invalid ones.
    pub fn validate_transition(from: EntryStatus, to: EntryStatus) -> Result<(), CoreError> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Atendimento já está {} e não pode passar para {}.",
                from.label().to_lowercase(),
                to.label().to_lowercase()
            )))
        }
    }
}
