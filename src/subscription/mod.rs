//! Lifecycle-scoped subscription.
//!
//! - [`SubscriptionSet`] the ordered filters a dispatcher is registered against
//! - [`SubscriptionManager`] pairs registration with a host component's creation
//!   and destruction

mod manager;
mod set;

pub use manager::SubscriptionManager;
pub use set::SubscriptionSet;
