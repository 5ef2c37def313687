//! Outbound host capabilities.
//!
//! The dispatcher never talks to the platform directly; it goes through these
//! traits so any host binding (or a test double) can stand in.
//!
//! ## Contents
//! - [`Notifier`] show a transient message ([`TracingNotifier`], [`MemoryNotifier`])
//! - [`SystemState`] query the active network and battery ([`FixedState`])
//! - [`Connectivity`] classification of the active network

mod notifier;
mod state;

pub use notifier::{MemoryNotifier, Notifier, Toast, ToastDuration, TracingNotifier};
pub use state::{
    BatteryStatus, Connectivity, FixedState, NetworkCapabilities, SystemState, Transport,
};
