//! # Transient notifications.
//!
//! [`Notifier`] is the outbound "show a short message" capability. It is
//! fire-and-forget: there is no result, and implementations must not panic when
//! the host surface is already gone (the call simply becomes a no-op).
//!
//! Built-in implementations:
//! - [`TracingNotifier`]: writes each notification as an `info` record (headless hosts).
//! - [`MemoryNotifier`]: records notifications for later inspection.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Display duration class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastDuration {
    /// Brief display.
    Short,
    /// Extended display.
    #[default]
    Long,
}

impl fmt::Display for ToastDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastDuration::Short => f.write_str("short"),
            ToastDuration::Long => f.write_str("long"),
        }
    }
}

/// A notification as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Message shown.
    pub text: String,
    /// Display duration class.
    pub duration: ToastDuration,
}

/// Capability to show a transient message.
pub trait Notifier: Send + Sync + 'static {
    /// Shows `text` for `duration`. Must not panic.
    fn show(&self, text: &str, duration: ToastDuration);
}

/// Writes notifications to the `tracing` pipeline.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier {
    tag: Option<Arc<str>>,
}

impl TracingNotifier {
    /// Notifier without a log tag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a log tag to every record.
    #[must_use]
    pub fn with_tag(tag: impl Into<Arc<str>>) -> Self {
        Self {
            tag: Some(tag.into()),
        }
    }
}

impl Notifier for TracingNotifier {
    fn show(&self, text: &str, duration: ToastDuration) {
        let tag = self.tag.as_deref().unwrap_or_default();
        tracing::info!(tag, %duration, text, "toast");
    }
}

/// Records every notification in memory.
///
/// Clones share the same record, so a clone can be handed to a dispatcher while
/// the original is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    shown: Arc<Mutex<Vec<Toast>>>,
}

impl MemoryNotifier {
    /// Empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every notification so far, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Texts of every notification so far, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.toasts().into_iter().map(|t| t.text).collect()
    }

    /// Number of notifications shown so far.
    pub fn len(&self) -> usize {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing was shown yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every recorded notification.
    pub fn clear(&self) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Notifier for MemoryNotifier {
    fn show(&self, text: &str, duration: ToastDuration) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Toast {
                text: text.to_string(),
                duration,
            });
    }
}
