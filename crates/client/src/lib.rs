//! Client for the remote queue backend.
//!
//! [`Backend`] is the seam the console depends on. [`HttpBackend`] talks to
//! the real service; [`InMemoryBackend`] implements the same contract in
//! process. Both report failures through [`BackendError`], decoded by the
//! single envelope decoder in [`envelope`].

pub mod backend;
pub mod envelope;
pub mod error;
pub mod http;
pub mod memory;
pub mod models;

pub use backend::Backend;
pub use error::BackendError;
pub use http::HttpBackend;
pub use memory::InMemoryBackend;
pub use models::{Provider, SessionPayload};
