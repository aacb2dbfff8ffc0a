//! Domain errors.
//!
//! Messages carried by `Validation`, `Conflict`, and `Unauthorized` are
//! operator-facing Portuguese text and are shown as-is.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input refused before any backend call.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The action does not fit the current queue state.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A broken invariant or I/O failure; never shown verbatim.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The message without the variant prefix, suitable for showing to an operator.
    pub fn detail(&self) -> String {
        match self {
            CoreError::NotFound { entity, id } => format!("{entity} {id} não encontrado."),
            CoreError::Validation(msg)
            | CoreError::Conflict(msg)
            | CoreError::Unauthorized(msg)
            | CoreError::Internal(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_drops_the_variant_prefix() {
        let err = CoreError::Conflict("Cliente já está na fila.".into());
        assert_eq!(err.to_string(), "Conflict: Cliente já está na fila.");
        assert_eq!(err.detail(), "Cliente já está na fila.");
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = CoreError::NotFound {
            entity: "Atendimento",
            id: 7,
        };
        assert_eq!(err.detail(), "Atendimento 7 não encontrado.");
    }
}
