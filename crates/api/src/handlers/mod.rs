pub mod agenda;
pub mod auth;
pub mod clients;
pub mod notifications;
pub mod public;
pub mod reports;
