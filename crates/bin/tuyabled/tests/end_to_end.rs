//! End-to-end tests for the full tuyabled stack.
//!
//! Each test wires the real pieces together (in-memory transport, event bus,
//! entry service, coordinator, entities) the way the daemon does, and drives
//! them through the transport like a device would.

use std::sync::Arc;
use std::time::Duration;

use tuyable_adapter_memory::InMemoryTransport;
use tuyable_app::coordinator::CoordinatorEvent;
use tuyable_app::event_bus::InProcessEventBus;
use tuyable_app::ports::DeviceTransport;
use tuyable_app::services::EntryService;
use tuyable_domain::datapoint::{DatapointId, DatapointValue};
use tuyable_domain::device::DeviceIdentity;
use tuyable_domain::entity::EntityValue;
use tuyable_domain::event::EventType;

const DELAY: Duration = Duration::from_secs(600);

type Service = EntryService<InMemoryTransport, Arc<InProcessEventBus>>;

fn stack() -> (Service, Arc<InProcessEventBus>) {
    let bus = Arc::new(InProcessEventBus::new(64));
    (EntryService::new(Arc::clone(&bus), DELAY), bus)
}

fn identity(category: &str, product_id: &str) -> DeviceIdentity {
    DeviceIdentity::builder()
        .address("dc:23:4d:5b:0e:df")
        .device_id("bf1234")
        .category(category)
        .product_id(product_id)
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Fingerbot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_physical_press_but_not_own_writes() {
    let (service, bus) = stack();
    let transport = Arc::new(
        InMemoryTransport::new()
            .with_datapoint(2, DatapointValue::Bool(false))
            .with_datapoint(8, DatapointValue::Enum(0)),
    );
    let entry = service.setup_entry(identity("szjqr", "blliqpsj"), Arc::clone(&transport));
    let mut coordinator_events = entry.coordinator().subscribe();
    let mut events = bus.subscribe();

    transport.connect();
    assert_eq!(
        coordinator_events.recv().await.unwrap(),
        CoordinatorEvent::ConnectionChanged { connected: true }
    );
    assert_eq!(events.recv().await.unwrap().event_type, EventType::ConnectionChanged);

    // pressing the entity writes dp 2 and the echo is not a physical press
    let push = &entry.entities().buttons[0];
    assert!(push.entity().is_available());
    push.press().await.unwrap();
    assert_eq!(
        coordinator_events.recv().await.unwrap(),
        CoordinatorEvent::Updated(vec![DatapointId::new(2)])
    );

    // the device reports a press of its own
    transport.inject_update([(2, DatapointValue::Bool(false))]);
    assert_eq!(
        coordinator_events.recv().await.unwrap(),
        CoordinatorEvent::Updated(vec![DatapointId::new(2)])
    );

    let pressed = events.recv().await.unwrap();
    assert_eq!(pressed.event_type, EventType::FingerbotButtonPressed);
    assert_eq!(
        pressed.data,
        serde_json::json!({ "address": "DC:23:4D:5B:0E:DF", "device_id": "bf1234" })
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn should_write_selected_mode_and_read_it_back() {
    let (service, _) = stack();
    let transport = Arc::new(InMemoryTransport::new().with_datapoint(8, DatapointValue::Enum(0)));
    let entry = service.setup_entry(identity("szjqr", "blliqpsj"), Arc::clone(&transport));
    let mut coordinator_events = entry.coordinator().subscribe();
    transport.connect();
    coordinator_events.recv().await.unwrap();

    let mode = &entry.entities().selects[0];
    mode.select_option("switch").unwrap().await.unwrap();

    assert_eq!(
        transport.get(DatapointId::new(8)).map(|cell| cell.value),
        Some(DatapointValue::Enum(1))
    );
    assert_eq!(mode.current_option(), Some(EntityValue::Text("switch".to_owned())));
    // outside push mode the push button goes away
    assert!(!entry.entities().buttons[0].entity().is_available());
}

// ---------------------------------------------------------------------------
// Connection debounce
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_keep_entities_available_through_short_flaps() {
    let (service, _) = stack();
    let transport = Arc::new(InMemoryTransport::new().with_datapoint(15, DatapointValue::Value(80)));
    let entry = service.setup_entry(identity("co2bj", "59s19z5m"), Arc::clone(&transport));
    let mut coordinator_events = entry.coordinator().subscribe();
    let battery = entry
        .entities()
        .sensors
        .iter()
        .find(|sensor| sensor.descriptor().meta.key == "battery")
        .unwrap();

    transport.connect();
    coordinator_events.recv().await.unwrap();
    assert!(battery.entity().is_available());

    transport.disconnect();
    tokio::time::sleep(DELAY / 2).await;
    transport.connect();
    tokio::time::sleep(DELAY).await;
    assert!(battery.entity().is_available());
    assert_eq!(battery.value(), Some(EntityValue::Int(80)));

    transport.disconnect();
    assert_eq!(
        coordinator_events.recv().await.unwrap(),
        CoordinatorEvent::ConnectionChanged { connected: false }
    );
    assert!(!battery.entity().is_available());
}

#[tokio::test]
async fn should_stop_following_transport_after_unload() {
    let (service, _) = stack();
    let transport = Arc::new(InMemoryTransport::new());
    let entry = service.setup_entry(identity("ms", "okkyfgfs"), Arc::clone(&transport));

    assert!(service.unload_entry(entry.id()));
    transport.connect();
    tokio::task::yield_now().await;

    assert!(!entry.coordinator().is_connected());
}
