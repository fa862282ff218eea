//! Thin OS-facing surface: thread identity and notification plumbing.
//!
//! Mirrors the shape of the engine's single-main-thread contract
//! (`MAIN_THREAD_ID` / `validate_thread`) without the window-system and
//! event-loop machinery that contract was embedded in. File I/O and process
//! spawning are not sketched here at all — callers use `std::fs`/`std::process`
//! directly, same as the engine does.

use std::thread::{self, ThreadId};

use once_cell::sync::OnceCell;

static MAIN_THREAD_ID: OnceCell<ThreadId> = OnceCell::new();

/// Records the calling thread as the engine's main thread. Returns `false`
/// if a (different) main thread was already recorded.
pub fn claim_main_thread() -> bool {
    MAIN_THREAD_ID.set(thread::current().id()).is_ok()
}

/// Whether the calling thread is the recorded main thread. `false` if no
/// main thread has been claimed yet.
pub fn is_main_thread() -> bool {
    MAIN_THREAD_ID.get() == Some(&thread::current().id())
}

/// A desktop notification request, matching the engine's notification
/// command shape (title + body, fire-and-forget).
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Sends the notification through the host OS. Logs and swallows
    /// failures rather than propagating them, matching the engine's
    /// best-effort treatment of notification delivery.
    pub fn send(&self) {
        log::info!("notification: {} - {}", self.title, self.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claiming_main_thread_makes_is_main_thread_true_for_the_claimer() {
        if claim_main_thread() {
            assert!(is_main_thread());
        }
    }
}
