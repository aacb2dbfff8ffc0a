//! Client registry model.
//!
//! A client belongs to exactly one provider. The contact number is not a
//! unique key (a client may be registered without one), so `id` is the only
//! reliable identity.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Message shown when a client is submitted without a contact number and
/// without the explicit "continue without contact" confirmation.
pub const MISSING_CONTACT_MESSAGE: &str =
    "Por favor, confirme o contato do cliente ou marque a opção de continuar sem contato.";

/// A customer known to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: DbId,
    pub provider_id: DbId,
    pub name: String,
    /// Empty when the client was registered without a contact.
    #[serde(default)]
    pub whatsapp_number: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    /// Most recent queue participation, maintained by the backend.
    #[serde(default)]
    pub last_entry: Option<Timestamp>,
}

impl Client {
    /// Whether the client has a usable contact number.
    pub fn has_contact(&self) -> bool {
        !self.whatsapp_number.trim().is_empty()
    }
}

/// Input for registering a new client from the console.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    #[validate(length(min = 1, max = 120, message = "Informe o nome do cliente."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "Número de WhatsApp inválido."))]
    pub whatsapp_number: Option<String>,
    /// The operator confirmed that the client has no contact number.
    #[serde(default)]
    pub confirm_no_contact: bool,
    /// Also place the client at the end of today's queue.
    #[serde(default)]
    pub add_to_queue: bool,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewClient {
    /// Validate the form before anything is sent to the backend.
    ///
    /// The name must be non-blank. A blank contact number is accepted only
    /// when the operator confirmed it explicitly.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(|errors| {
            let message = errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Dados do cliente inválidos.".to_string());
            CoreError::Validation(message)
        })?;

        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("Informe o nome do cliente.".into()));
        }

        if self.contact().is_none() && !self.confirm_no_contact {
            return Err(CoreError::Validation(MISSING_CONTACT_MESSAGE.into()));
        }

        Ok(())
    }

    /// The trimmed contact number, if one was given.
    pub fn contact(&self) -> Option<&str> {
        self.whatsapp_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// The trimmed note, if one was given.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn form(name: &str, number: Option<&str>, confirm: bool) -> NewClient {
        NewClient {
            name: name.to_string(),
            whatsapp_number: number.map(str::to_string),
            confirm_no_contact: confirm,
            ..Default::default()
        }
    }

    #[test]
    fn accepts_client_with_contact() {
        assert!(form("Maria", Some("11999990000"), false).check().is_ok());
    }

    #[test]
    fn blank_contact_requires_confirmation() {
        let err = form("Maria", Some("   "), false).check().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == MISSING_CONTACT_MESSAGE);
    }

    #[test]
    fn confirmed_missing_contact_is_accepted() {
        assert!(form("Maria", Some(""), true).check().is_ok());
        assert!(form("Maria", None, true).check().is_ok());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_matches!(
            form("", Some("11999990000"), false).check(),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            form("   ", Some("11999990000"), false).check(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn contact_and_note_are_trimmed() {
        let mut input = form("João", Some(" 11988887777 "), false);
        input.note = Some("  ".into());
        assert_eq!(input.contact(), Some("11988887777"));
        assert_eq!(input.note(), None);
    }

    #[test]
    fn client_deserializes_backend_shape() {
        let json = serde_json::json!({
            "id": 7,
            "providerId": 1,
            "name": "Maria",
            "whatsappNumber": "11999990000",
            "createdAt": "2025-03-01T12:00:00Z",
            "updatedAt": null
        });
        let client: Client = serde_json::from_value(json).unwrap();
        assert_eq!(client.id, 7);
        assert!(client.has_contact());
        assert!(client.last_entry.is_none());
    }
}
