//! Domain logic of the Fila queue console.
//!
//! Pure, I/O-free building blocks shared by the backend client and the
//! HTTP console:
//!
//! - [`queue::Queue`]: the per-day waiting line and its ordering rules.
//! - [`entry`]: entry statuses and the lifecycle state machine.
//! - [`client`] / [`search`]: client registration and lookup.
//! - [`report`] / [`export`]: earnings projections and CSV exports.
//! - [`seal`]: encrypted, expiring session tokens.

pub mod client;
pub mod contact;
pub mod entry;
pub mod error;
pub mod export;
pub mod money;
pub mod queue;
pub mod report;
pub mod search;
pub mod seal;
pub mod types;

pub use error::CoreError;
pub use queue::Queue;
