//! # receptor
//!
//! **receptor** receives host system broadcasts (battery, power, clock, package
//! installs, connectivity) and turns each one into a single transient notification
//! for the user, for exactly as long as a host component is alive.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  Host component
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │ SubscriptionManager                                          │
//!  │   on_create  ─► Dispatcher::new ─► register × SubscriptionSet│
//!  │   on_destroy ─► unregister(dispatcher)                       │
//!  └───────────────────────────┬──────────────────────────────────┘
//!                              │ register / unregister
//!                              ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                 EventBus (host) / Bus (in-process)                │
//! │   publish(Event) ──► one worker per registration ──► filter       │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                     Dispatcher::handle(&Event)
//!                     ├─► tracing info (+ warn on unknown / malformed)
//!                     ├─► SystemState (connectivity, battery)
//!                     └─► Notifier::show(text, duration)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Broadcasts**    | Closed set of host actions plus payload                      | [`Event`], [`EventKind`], [`EventFilter`]   |
//! | **Bus**           | Host bus capability and an in-process implementation         | [`EventBus`], [`Bus`]                       |
//! | **Dispatch**      | Broadcast → notification mapping                             | [`Receiver`], [`Dispatcher`]                |
//! | **Lifecycle**     | Paired registration/deregistration                           | [`SubscriptionManager`], [`SubscriptionSet`]|
//! | **Platform**      | Outbound notification and state queries                      | [`Notifier`], [`SystemState`]               |
//! | **Errors**        | Typed errors, resolved locally                               | [`DispatchError`], [`SubscriptionError`]    |
//! | **Configuration** | Log tag, toast duration, bus capacity                        | [`Config`]                                  |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use receptor::{
//!     Bus, Config, Event, EventKind, FixedState, MemoryNotifier, SubscriptionManager, Transport,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let bus = Bus::from_config(&config);
//!     let notifier = MemoryNotifier::new();
//!     let state = FixedState::offline().with_transport(Transport::Wifi);
//!
//!     let mut manager =
//!         SubscriptionManager::new(bus.clone(), config, Arc::new(notifier.clone()), Arc::new(state));
//!     manager.on_create();
//!
//!     bus.publish(Event::new(EventKind::ConnectivityChanged));
//!     while notifier.is_empty() {
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!     }
//!     assert_eq!(notifier.texts(), vec!["Connectivity changed: WiFi"]);
//!
//!     manager.deactivate()?;
//!     assert_eq!(bus.registrations(), 0);
//!     Ok(())
//! }
//! ```
mod config;
mod error;
mod events;
mod platform;
mod receivers;
mod subscription;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use config::{Config, DEFAULT_TAG};
pub use error::{BusError, DispatchError, SubscriptionError};
pub use events::{Bus, Event, EventBus, EventFilter, EventKind, RegistrationId};
pub use platform::{
    BatteryStatus, Connectivity, FixedState, MemoryNotifier, NetworkCapabilities, Notifier,
    SystemState, Toast, ToastDuration, TracingNotifier, Transport,
};
pub use receivers::{Dispatcher, Receiver, INVALID_BATTERY_TEXT, INVALID_PACKAGE_TEXT};
pub use subscription::{SubscriptionManager, SubscriptionSet};
