//! Session middleware and extractors.
//!
//! - [`guard::auth_guard`] -- Redirects navigations based on session presence.
//! - [`notices::record_notices`] -- Turns response notices into pending operator notices.
//! - [`auth::ProviderSession`] -- Extracts the session stored by the guard.

pub mod auth;
pub mod guard;
pub mod notices;
