//! UI store: toasts, sidebar and dialog state
//!
//! Purely local; nothing here talks to the network.

use std::sync::Mutex;

use tracing::debug;

use super::lock;
use crate::api::ApiError;

/// Toasts beyond this count push out the oldest
pub const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    pub toasts: Vec<Toast>,
    pub sidebar_open: bool,
    pub active_dialog: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    state: UiState,
    next_toast_id: u64,
}

#[derive(Debug, Default)]
pub struct UiStore {
    inner: Mutex<Inner>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> UiState {
        lock(&self.inner).state.clone()
    }

    /// Queue a toast and return its id
    pub fn notify(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let mut inner = lock(&self.inner);
        inner.next_toast_id += 1;
        let id = inner.next_toast_id;

        let toast = Toast {
            id,
            kind,
            message: message.into(),
        };
        debug!("Toast {}: {:?} {}", id, toast.kind, toast.message);

        let toasts = &mut inner.state.toasts;
        toasts.push(toast);
        if toasts.len() > MAX_TOASTS {
            let overflow = toasts.len() - MAX_TOASTS;
            toasts.drain(..overflow);
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(ToastKind::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.notify(ToastKind::Info, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(ToastKind::Error, message)
    }

    /// Error toast for a failed store action
    pub fn report(&self, error: &ApiError, fallback: &str) -> u64 {
        self.error(error.user_message(fallback))
    }

    pub fn dismiss(&self, id: u64) {
        lock(&self.inner).state.toasts.retain(|toast| toast.id != id);
    }

    pub fn toggle_sidebar(&self) -> bool {
        let mut inner = lock(&self.inner);
        inner.state.sidebar_open = !inner.state.sidebar_open;
        inner.state.sidebar_open
    }

    pub fn set_sidebar(&self, open: bool) {
        lock(&self.inner).state.sidebar_open = open;
    }

    pub fn open_dialog(&self, name: impl Into<String>) {
        lock(&self.inner).state.active_dialog = Some(name.into());
    }

    pub fn close_dialog(&self) {
        lock(&self.inner).state.active_dialog = None;
    }

    pub fn reset(&self) {
        *lock(&self.inner) = Inner::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_queue_is_capped() {
        let ui = UiStore::new();
        let ids: Vec<u64> = (0..MAX_TOASTS + 2)
            .map(|i| ui.info(format!("toast {}", i)))
            .collect();

        let toasts = ui.state().toasts;
        assert_eq!(toasts.len(), MAX_TOASTS);
        assert_eq!(toasts[0].id, ids[2]);
        assert_eq!(toasts.last().map(|t| t.id), ids.last().copied());
    }

    #[test]
    fn test_report_uses_server_message() {
        let ui = UiStore::new();
        let err = ApiError::Status {
            status: 409,
            message: Some("Slug already taken".to_string()),
        };
        let id = ui.report(&err, "Failed to create wedding");

        let state = ui.state();
        assert_eq!(state.toasts[0].kind, ToastKind::Error);
        assert_eq!(state.toasts[0].message, "Slug already taken");

        ui.dismiss(id);
        assert!(ui.state().toasts.is_empty());
    }

    #[test]
    fn test_sidebar_and_dialog() {
        let ui = UiStore::new();
        assert!(ui.toggle_sidebar());
        assert!(!ui.toggle_sidebar());

        ui.open_dialog("add-guest");
        assert_eq!(ui.state().active_dialog.as_deref(), Some("add-guest"));
        ui.close_dialog();
        assert_eq!(ui.state(), UiState::default());
    }
}
