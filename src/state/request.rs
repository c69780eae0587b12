//! Observable request status (loading / error / connected).
//!
//! DESIGN
//! ======
//! A [`RequestStatus`] is an explicit handle, not a global: each API client
//! owns one, and `ApiClient::scoped` hands out fresh ones for independent
//! logical requests. Views subscribe through a `tokio::sync::watch` channel.
//! Concurrent calls sharing a handle race on the flags; the most recent
//! write wins.
//!
//! `loading` is reset by [`LoadingGuard`]'s `Drop`, so it is false again on
//! success, on error, and when the request future is dropped mid-flight.

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use std::sync::Arc;

use tokio::sync::watch;

/// Snapshot of the request flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestState {
    pub loading: bool,
    pub error: Option<String>,
    pub connected: bool,
}

/// Shared, observable [`RequestState`].
#[derive(Clone, Debug)]
pub struct RequestStatus {
    tx: Arc<watch::Sender<RequestState>>,
}

impl Default for RequestStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStatus {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RequestState::default());
        Self { tx: Arc::new(tx) }
    }

    /// Current flags.
    #[must_use]
    pub fn snapshot(&self) -> RequestState {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.tx.borrow().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.tx.borrow().error.clone()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.tx.borrow().connected
    }

    /// Mark a call as started: `loading = true`, `error = None`.
    ///
    /// `loading` drops back to false when the returned guard is dropped.
    #[must_use = "dropping the guard immediately clears `loading`"]
    pub fn begin(&self) -> LoadingGuard {
        self.tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        LoadingGuard { status: self.clone() }
    }

    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|state| state.error = Some(message));
    }

    pub fn set_connected(&self, connected: bool) {
        self.tx.send_modify(|state| state.connected = connected);
    }

    /// Reset `error` to `None`. Nothing else changes.
    pub fn clear_error(&self) {
        self.tx.send_if_modified(|state| state.error.take().is_some());
    }
}

/// Clears `loading` when dropped.
#[derive(Debug)]
pub struct LoadingGuard {
    status: RequestStatus,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.status.tx.send_modify(|state| state.loading = false);
    }
}
