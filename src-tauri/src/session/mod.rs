//! Client-side session state: the controller-owned state machine plus the
//! pure helpers it uses.

pub mod similar;
pub mod state;

pub use state::{Session, SessionError, SessionSnapshot, Stage};

use std::sync::{Mutex, MutexGuard};

/// Managed Tauri state wrapping the session behind a mutex.
///
/// Commands lock, transition, and drop the guard before awaiting any
/// network call; responses are applied under a fresh lock with the
/// generation token deciding whether they are still current.
pub struct SessionState(Mutex<Session>);

impl SessionState {
    pub fn new() -> Self {
        Self(Mutex::new(Session::new()))
    }

    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.0.lock().unwrap()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
