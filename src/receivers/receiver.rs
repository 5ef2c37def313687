//! # Core receiver trait
//!
//! `Receiver` is the capability a host bus delivers broadcasts to. It has a
//! single required method, [`Receiver::handle`]; any host binding can adapt its
//! native callback mechanism to it.
//!
//! ## Contract
//! - The bus may call `handle` from any worker task, concurrently with itself
//!   and with lifecycle transitions. Implementations must be `Send + Sync` and
//!   should hold no mutable state across calls.
//! - `handle` has no return value: the host bus cannot report errors back to the
//!   publisher, so implementations resolve failures locally.
//!
//! ## Example (skeleton)
//! ```rust
//! use receptor::{Event, Receiver};
//!
//! struct Audit;
//!
//! #[async_trait::async_trait]
//! impl Receiver for Audit {
//!     async fn handle(&self, event: &Event) {
//!         let _ = event.kind;
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for broadcast receivers.
#[async_trait]
pub trait Receiver: Send + Sync + 'static {
    /// Handle a single broadcast.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn handle(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
