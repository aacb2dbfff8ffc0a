//! Request and response bodies exchanged with the queue backend.
//!
//! Field names follow the backend's camelCase JSON.

use fila_core::client::{Client, NewClient};
use fila_core::entry::{Direction, QueueEntry};
use fila_core::types::{DbId, Money};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ---- Envelopes ----

/// Success body of the form `{ "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueListing {
    #[serde(default)]
    pub entries: Vec<QueueEntry>,
}

// ---- Auth ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The signed-in provider as described by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Provider {
    pub id: DbId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
}

/// Login response body, sealed verbatim into the session cookie.
///
/// `data` is the bearer token sent on every authenticated call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
}

impl SessionPayload {
    pub fn token(&self) -> &str {
        &self.data
    }

    /// Key that scopes per-provider state such as pending notices.
    ///
    /// Without a provider in the login body the key is derived from a digest
    /// of the token. The token itself never leaves this struct.
    pub fn channel(&self) -> String {
        match &self.provider {
            Some(provider) => format!("provider:{}", provider.id),
            None => {
                let digest = Sha256::digest(self.data.as_bytes());
                format!("session:{digest:x}")
            }
        }
    }
}

// ---- Clients ----

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub name: String,
    /// Empty when the operator confirmed the client has no contact.
    pub whatsapp_number: String,
    pub add_to_queue: bool,
    #[serde(default)]
    pub note: Option<String>,
}

impl From<&NewClient> for CreateClientRequest {
    fn from(input: &NewClient) -> Self {
        Self {
            name: input.name.trim().to_string(),
            whatsapp_number: input.contact().unwrap_or_default().to_string(),
            add_to_queue: input.add_to_queue,
            note: input.note().map(str::to_string),
        }
    }
}

pub type ClientList = DataEnvelope<Vec<Client>>;

// ---- Queue ----

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToQueueRequest {
    pub client_id: DbId,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub queue_id: String,
    pub client_id: DbId,
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelEntryRequest {
    pub entry_id: DbId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteEntryRequest {
    pub entry_id: DbId,
    #[serde(with = "rust_decimal::serde::float")]
    pub entry_price: Money,
}

// ---- Public page ----

/// One waiting client as exposed on the public queue page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicEntry {
    pub id: DbId,
    pub order: i32,
    pub client_id: DbId,
    pub name: String,
    #[serde(default)]
    pub whatsapp_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQueue {
    pub provider_name: String,
    #[serde(default)]
    pub serialized_entries: Vec<PublicEntry>,
}
