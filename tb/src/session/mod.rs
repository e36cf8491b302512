//! Session state with actor pattern
//!
//! SessionManager owns progress, the log sink, the rejection counter and the
//! scheduler flag, and processes messages via channels.

mod manager;
mod messages;

pub use manager::{DEFAULT_REJECTION_WARNING, SessionEvent, SessionManager};
pub use messages::{SessionCommand, SessionError, SessionResponse, SessionSnapshot, TaskProgress};
