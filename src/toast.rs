//! Toast collaborator: the sink trait the history component reports through,
//! and a plain in-memory queue for hosts that want one. Presentation (and
//! auto-dismiss timers) stay with the host.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

/// Default toast lifetime handed to the presentation layer.
pub const DEFAULT_TOAST_DURATION_MS: u32 = 4000;

/// Where undo/redo outcome messages go.
pub trait ToastSink {
    fn show_success(&mut self, message: &str);
    fn show_error(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// One queued toast.
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u32,
}

/// Ordered toast queue with monotonically increasing ids.
#[derive(Debug, Clone, Default)]
pub struct ToastState {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl ToastState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[Toast] {
        &self.toasts
    }

    /// Queue a toast and return its id.
    pub fn add(&mut self, message: impl Into<String>, kind: ToastKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            kind,
            duration_ms: DEFAULT_TOAST_DURATION_MS,
        });
        id
    }

    /// Drop a toast by id (manual dismissal or timer expiry).
    pub fn remove(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn show_warning(&mut self, message: &str) {
        self.add(message, ToastKind::Warning);
    }

    pub fn show_info(&mut self, message: &str) {
        self.add(message, ToastKind::Info);
    }
}

impl ToastSink for ToastState {
    fn show_success(&mut self, message: &str) {
        self.add(message, ToastKind::Success);
    }

    fn show_error(&mut self, message: &str) {
        self.add(message, ToastKind::Error);
    }
}
