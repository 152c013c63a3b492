//! Business operations behind the handlers.

pub mod cookies;
pub mod inquiry;
pub mod notion;
pub mod session;
