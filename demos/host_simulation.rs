//! # Example: host_simulation
//!
//! Plays the role of a host platform: creates the component, fires a burst of
//! system broadcasts at the in-process bus, and destroys the component again.
//!
//! ## Flow
//! ```text
//! on_create()  ─► Dispatcher registered for 7 broadcasts
//! publish(...) ─► Dispatcher::handle ─► TracingNotifier ("toast" records)
//! on_destroy() ─► every registration removed
//! on_destroy() ─► reported (nothing registered), no panic
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example host_simulation
//! ```

use std::sync::Arc;
use std::time::Duration;

use receptor::{
    Bus, Config, Event, EventKind, FixedState, NetworkCapabilities, SubscriptionManager,
    TracingNotifier, Transport,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::default();
    let bus = Bus::from_config(&config);
    let state = FixedState::offline()
        .with_network(
            NetworkCapabilities::new()
                .with_transport(Transport::Wifi)
                .with_transport(Transport::Vpn),
        )
        .with_battery(42, 100);
    let notifier = TracingNotifier::with_tag(config.tag.clone());

    let mut component =
        SubscriptionManager::new(bus.clone(), config, Arc::new(notifier), Arc::new(state));
    component.on_create();

    let broadcasts = [
        Event::new(EventKind::PowerConnected),
        Event::battery_changed(87, 100),
        Event::new(EventKind::BatteryChanged),
        Event::battery_changed(87, 0),
        Event::new(EventKind::TimeChanged),
        Event::package_added("org.example.notes"),
        Event::new(EventKind::ConnectivityChanged),
        Event::new(EventKind::PowerDisconnected),
        Event::new(EventKind::BatteryLow),
        Event::from_action("android.intent.action.AIRPLANE_MODE"),
    ];
    for ev in broadcasts {
        bus.publish(ev);
    }

    tokio::time::sleep(Duration::from_millis(100)).await;

    component.on_destroy();
    component.on_destroy();
}
