//! Request handlers.

pub mod health;
pub mod inquiry;
pub mod notion;
pub mod session;
pub mod site;
pub mod workspace;
