//! # tuyabled — tuyable daemon
//!
//! Composition root that wires the configured devices to their entities.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Install the tracing subscriber
//! - Check the built-in catalog and report table problems
//! - Construct one transport per configured device and register it through
//!   the entry service (coordinator + entities)
//! - Log entity states on every update and every host event
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context as _;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use tuyable_adapter_memory::InMemoryTransport;
use tuyable_app::coordinator::CoordinatorEvent;
use tuyable_app::event_bus::InProcessEventBus;
use tuyable_app::services::{Entry, EntryService};
use tuyable_domain::catalog;

use crate::config::Config;

type Bus = Arc<InProcessEventBus>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_new(&config.logging.filter)
        .unwrap_or_else(|_| EnvFilter::new("tuyabled=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Err(problems) = catalog::validate() {
        for problem in problems {
            tracing::warn!(%problem, "catalog problem");
        }
    }

    let event_bus: Bus = Arc::new(InProcessEventBus::new(256));
    let service = EntryService::new(Arc::clone(&event_bus), config.disconnect_delay());

    let mut events = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    tracing::info!(event_type = %event.event_type, data = %event.data, "event");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    for device in config.device_identities()? {
        let transport = Arc::new(InMemoryTransport::new());
        let entry = service.setup_entry(device, Arc::clone(&transport));
        spawn_state_logger(&entry);
        transport.connect();
    }

    tracing::info!(entries = service.entries().len(), "tuyabled running");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    tracing::info!("shutting down");
    service.shutdown();
    Ok(())
}

/// Log every entity of `entry` whenever its coordinator reports something.
fn spawn_state_logger(entry: &Arc<Entry<InMemoryTransport, Bus>>) {
    let mut updates = entry.coordinator().subscribe();
    let entry = Arc::clone(entry);
    tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(CoordinatorEvent::ConnectionChanged { connected }) => {
                    tracing::info!(title = %entry.title(), connected, "connection changed");
                    log_states(&entry);
                }
                Ok(CoordinatorEvent::Updated(_)) => log_states(&entry),
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn log_states(entry: &Entry<InMemoryTransport, Bus>) {
    let entities = entry.entities();
    for sensor in &entities.sensors {
        tracing::info!(
            entity = sensor.entity().unique_id(),
            available = sensor.entity().is_available(),
            value = ?sensor.value(),
            "sensor"
        );
    }
    for select in &entities.selects {
        tracing::info!(
            entity = select.entity().unique_id(),
            available = select.entity().is_available(),
            option = ?select.current_option(),
            "select"
        );
    }
    for button in &entities.buttons {
        tracing::info!(
            entity = button.entity().unique_id(),
            available = button.entity().is_available(),
            "button"
        );
    }
}
