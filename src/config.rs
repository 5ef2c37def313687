//! # Receiver configuration.
//!
//! Provides [`Config`], the settings shared by the [`Dispatcher`](crate::Dispatcher),
//! the [`SubscriptionManager`](crate::SubscriptionManager) and the in-process
//! [`Bus`](crate::Bus).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by [`Config::bus_capacity_clamped`]

use std::sync::Arc;

use crate::platform::ToastDuration;

/// Log tag used when none is configured.
pub const DEFAULT_TAG: &str = "Empfaenger";

/// Configuration for the receiver and its lifecycle.
///
/// ## Field semantics
/// - `tag`: Log tag attached as the `tag` field on every record this crate emits
/// - `toast_duration`: Display duration class for every notification
/// - `bus_capacity`: Ring buffer size of the in-process bus (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Log tag.
    ///
    /// Held per instance rather than as a global constant, so several receivers
    /// can log under different tags.
    pub tag: Arc<str>,

    /// Display duration for notifications.
    pub toast_duration: ToastDuration,

    /// Capacity of the in-process bus broadcast channel.
    ///
    /// Workers that lag more than `bus_capacity` broadcasts behind skip the oldest
    /// ones and log how many were lost.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Replaces the log tag.
    pub fn with_tag(mut self, tag: impl Into<Arc<str>>) -> Self {
        self.tag = tag.into();
        self
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `tag = "Empfaenger"`
    /// - `toast_duration = ToastDuration::Long`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            tag: Arc::from(DEFAULT_TAG),
            toast_duration: ToastDuration::Long,
            bus_capacity: 256,
        }
    }
}
