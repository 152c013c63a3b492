//! # concierge_core
//!
//! Core domain logic for Concierge: session tokens, the Notion client,
//! inquiry handling, mail delivery and the client-side state models.

pub mod cache;
pub mod clock;
pub mod editing;
pub mod envelope;
pub mod i18n;
pub mod inquiry;
pub mod mail;
pub mod notion;
pub mod preferences;
pub mod session;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
