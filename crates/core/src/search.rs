//! Client search over the provider's registry.

use serde::Serialize;

use crate::client::Client;

/// Result of a client search.
///
/// `NotFound` is deliberately distinct from an empty match list so callers
/// can tell "nothing matched" apart from "no filter applied".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "clients", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The query was blank; every client is returned.
    Unfiltered(Vec<Client>),
    Found(Vec<Client>),
    NotFound,
}

impl SearchOutcome {
    pub fn clients(&self) -> &[Client] {
        match self {
            SearchOutcome::Unfiltered(c) | SearchOutcome::Found(c) => c,
            SearchOutcome::NotFound => &[],
        }
    }
}

/// Filter `clients` by `query`.
///
/// Name matching is a case-insensitive substring test. Contact matching
/// compares trimmed values. When both produce results, the name matches win.
pub fn search_clients(clients: &[Client], query: &str) -> SearchOutcome {
    if query.trim().is_empty() {
        return SearchOutcome::Unfiltered(clients.to_vec());
    }

    let needle = query.to_lowercase();
    let by_name: Vec<Client> = clients
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    if !by_name.is_empty() {
        return SearchOutcome::Found(by_name);
    }

    let number = query.trim();
    let by_number: Vec<Client> = clients
        .iter()
        .filter(|c| c.whatsapp_number.trim().contains(number))
        .cloned()
        .collect();
    if !by_number.is_empty() {
        return SearchOutcome::Found(by_number);
    }

    SearchOutcome::NotFound
}
