//! # Broadcast receivers.
//!
//! This module provides the [`Receiver`] trait and the built-in [`Dispatcher`].
//!
//! ## Architecture
//! ```text
//! Host ── publish(Event) ──► Bus ──► worker (filter) ──► Receiver::handle(&Event)
//!                                                              │
//!                                                         Dispatcher
//!                                                              ├──► tracing (info / warn)
//!                                                              ├──► SystemState (live query)
//!                                                              └──► Notifier::show(text)
//! ```

mod dispatcher;
mod receiver;

pub use dispatcher::{Dispatcher, INVALID_BATTERY_TEXT, INVALID_PACKAGE_TEXT};
pub use receiver::Receiver;
