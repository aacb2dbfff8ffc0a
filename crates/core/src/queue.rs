//! Ordered queue of entries for one queue instance.
//!
//! Invariant: the `order` values of the `WAITING` entries are exactly
//! `1..=n`. Every mutation either keeps that true or fails without touching
//! any entry. Entries that leave `WAITING` stay in the queue (history) with
//! their last order; the waiting entries behind them move up one place.

use crate::entry::{state_machine, validate_price, Direction, EntryStatus, QueueEntry};
use crate::error::CoreError;
use crate::types::{DbId, Money, Timestamp};

#[derive(Debug, Clone, Default)]
pub struct Queue {
    id: String,
    entries: Vec<QueueEntry>,
}

impl Queue {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
        }
    }

    /// Build a queue from entries as listed by the backend.
    ///
    /// Entries belonging to other queue instances are ignored.
    pub fn from_entries(id: impl Into<String>, entries: impl IntoIterator<Item = QueueEntry>) -> Self {
        let id = id.into();
        let entries = entries.into_iter().filter(|e| e.queue_id == id).collect();
        Self { id, entries }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// All entries, including finished ones, in insertion order.
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Waiting entries, front of the queue first.
    pub fn waiting(&self) -> Vec<&QueueEntry> {
        let mut waiting: Vec<&QueueEntry> = self.entries.iter().filter(|e| e.is_waiting()).collect();
        waiting.sort_by_key(|e| e.order);
        waiting
    }

    /// The entry currently being served (order 1).
    pub fn current(&self) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.is_waiting() && e.order == 1)
    }

    pub fn len_waiting(&self) -> usize {
        self.entries.iter().filter(|e| e.is_waiting()).count()
    }

    pub fn get(&self, entry_id: DbId) -> Option<&QueueEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    /// The waiting entry of a client, if the client is in the queue.
    pub fn waiting_for_client(&self, client_id: DbId) -> Option<&QueueEntry> {
        self.entries
            .iter()
            .find(|e| e.is_waiting() && e.client_id == client_id)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Append a new waiting entry at the back of the queue.
    pub fn enqueue(
        &mut self,
        entry_id: DbId,
        client_id: DbId,
        note: Option<String>,
        joined_at: Timestamp,
    ) -> Result<&QueueEntry, CoreError> {
        if self.entries.iter().any(|e| e.id == entry_id) {
            return Err(CoreError::Conflict(format!(
                "Atendimento {entry_id} já existe na fila."
            )));
        }
        if self.waiting_for_client(client_id).is_some() {
            return Err(CoreError::Conflict("Cliente já está na fila.".into()));
        }

        let order = self.len_waiting() as i32 + 1;
        self.entries.push(QueueEntry {
            id: entry_id,
            queue_id: self.id.clone(),
            client_id,
            order,
            joined_at,
            note: note.filter(|n| !n.trim().is_empty()),
            price: None,
            status: EntryStatus::Waiting,
            client: None,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Check that `entry_id` can swap with its neighbour in `direction`,
    /// returning the neighbour's id. Nothing is mutated.
    pub fn neighbor(&self, entry_id: DbId, direction: Direction) -> Result<DbId, CoreError> {
        let entry = self.waiting_entry(entry_id)?;
        let target = match direction {
            Direction::Up => entry.order - 1,
            Direction::Down => entry.order + 1,
        };
        self.entries
            .iter()
            .find(|e| e.is_waiting() && e.order == target)
            .map(|e| e.id)
            .ok_or_else(|| {
                CoreError::Conflict(match direction {
                    Direction::Up => "Cliente já é o primeiro da fila.".to_string(),
                    Direction::Down => "Cliente já é o último da fila.".to_string(),
                })
            })
    }

    /// Swap `order` with the immediate waiting neighbour in `direction`.
    pub fn move_entry(&mut self, entry_id: DbId, direction: Direction) -> Result<(), CoreError> {
        let neighbor_id = self.neighbor(entry_id, direction)?;
        let a = self.index_of(entry_id)?;
        let b = self.index_of(neighbor_id)?;
        let order_a = self.entries[a].order;
        self.entries[a].order = self.entries[b].order;
        self.entries[b].order = order_a;
        Ok(())
    }

    /// Same as [`Queue::move_entry`], addressing the entry by its client.
    pub fn move_client(&mut self, client_id: DbId, direction: Direction) -> Result<(), CoreError> {
        let entry_id = self
            .waiting_for_client(client_id)
            .map(|e| e.id)
            .ok_or(CoreError::NotFound {
                entity: "Cliente na fila",
                id: client_id,
            })?;
        self.move_entry(entry_id, direction)
    }

    /// Finish an entry with a price. The price must be positive.
    pub fn complete(&mut self, entry_id: DbId, price: Money) -> Result<&QueueEntry, CoreError> {
        let price = validate_price(price)?;
        let idx = self.transition(entry_id, EntryStatus::Completed)?;
        self.entries[idx].price = Some(price);
        Ok(&self.entries[idx])
    }

    /// Cancel an entry. Removed entries never count towards earnings.
    pub fn cancel(&mut self, entry_id: DbId) -> Result<&QueueEntry, CoreError> {
        let idx = self.transition(entry_id, EntryStatus::Removed)?;
        Ok(&self.entries[idx])
    }

    /// Verify the ordering invariant over the waiting entries.
    pub fn check_invariants(&self) -> Result<(), CoreError> {
        for (expected, entry) in (1..).zip(self.waiting()) {
            if entry.order != expected {
                return Err(CoreError::Internal(format!(
                    "queue {} has order {} where {} was expected",
                    self.id, entry.order, expected
                )));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn index_of(&self, entry_id: DbId) -> Result<usize, CoreError> {
        self.entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(CoreError::NotFound {
                entity: "Atendimento",
                id: entry_id,
            })
    }

    fn waiting_entry(&self, entry_id: DbId) -> Result<&QueueEntry, CoreError> {
        let entry = &self.entries[self.index_of(entry_id)?];
        if !entry.is_waiting() {
            return Err(CoreError::Conflict(format!(
                "Atendimento já está {}.",
                entry.status.label().to_lowercase()
            )));
        }
        Ok(entry)
    }

    /// Move an entry out of `WAITING` and close the gap it leaves.
    fn transition(&mut self, entry_id: DbId, to: EntryStatus) -> Result<usize, CoreError> {
        let idx = self.index_of(entry_id)?;
        state_machine::validate_transition(self.entries[idx].status, to)?;

        let vacated = self.entries[idx].order;
        self.entries[idx].status = to;
        for entry in self.entries.iter_mut().filter(|e| e.is_waiting()) {
            if entry.order > vacated {
                entry.order -= 1;
            }
        }
        Ok(idx)
    }
}
