//! Session module - Page gate state and user profile persistence

mod profile;
mod state;

pub use profile::ProfileStore;
pub use state::{GateState, SessionError, SessionState};
