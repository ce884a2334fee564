//! # tuyable-adapter-memory
//!
//! In-memory [`DeviceTransport`] that simulates one Tuya BLE device.
//!
//! The store behaves like a real device link: writes are refused while
//! disconnected, accepted writes are echoed back as an update (not marked as
//! device-originated), and [`InMemoryTransport::inject_update`] plays the part
//! of the device reporting new values on its own.
//!
//! ## Dependency rule
//!
//! Depends on `tuyable-app` (port traits) and `tuyable-domain` only.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use tuyable_app::ports::{DeviceTransport, TransportError, TransportEvent};
use tuyable_domain::datapoint::{Datapoint, DatapointId, DatapointType, DatapointValue};

const EVENT_CAPACITY: usize = 64;

#[derive(Default)]
struct State {
    cells: BTreeMap<DatapointId, Datapoint>,
    connected: bool,
    rssi: Option<i16>,
}

/// Simulated device link keeping every datapoint cell in memory.
pub struct InMemoryTransport {
    state: Mutex<State>,
    events: broadcast::Sender<TransportEvent>,
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(State::default()),
            events,
        }
    }
}

impl InMemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a cell before the transport is shared, as if the device had
    /// reported it during pairing.
    #[must_use]
    pub fn with_datapoint(self, id: u8, value: DatapointValue) -> Self {
        let id = DatapointId::new(id);
        self.lock_state()
            .cells
            .insert(id, Datapoint::new(id, value, true));
        self
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.lock_state().connected
    }

    pub fn connect(&self) {
        self.lock_state().connected = true;
        tracing::debug!("simulated device connected");
        self.emit(TransportEvent::Connected);
    }

    pub fn disconnect(&self) {
        self.lock_state().connected = false;
        tracing::debug!("simulated device disconnected");
        self.emit(TransportEvent::Disconnected);
    }

    pub fn set_rssi(&self, rssi: i16) {
        self.lock_state().rssi = Some(rssi);
    }

    /// The device reports new values on its own, e.g. after a physical
    /// button press. Cells are created on first report.
    pub fn inject_update(&self, values: impl IntoIterator<Item = (u8, DatapointValue)>) {
        let updates: Vec<Datapoint> = {
            let mut state = self.lock_state();
            values
                .into_iter()
                .map(|(id, value)| {
                    let id = DatapointId::new(id);
                    let cell = Datapoint::new(id, value, true);
                    state.cells.insert(id, cell.clone());
                    cell
                })
                .collect()
        };
        self.emit(TransportEvent::Updated(updates));
    }

    fn emit(&self, event: TransportEvent) {
        // nobody listening yet is fine
        let _ = self.events.send(event);
    }

    fn store(&self, id: DatapointId, value: DatapointValue) -> Result<Datapoint, TransportError> {
        let mut state = self.lock_state();
        if !state.connected {
            return Err(TransportError::NotConnected);
        }
        let cell = state
            .cells
            .get_mut(&id)
            .ok_or(TransportError::UnknownDatapoint(id))?;
        cell.value = value
            .coerce(cell.kind())
            .map_err(|source| TransportError::Coercion { dp_id: id, source })?;
        cell.changed_by_device = false;
        Ok(cell.clone())
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceTransport for InMemoryTransport {
    fn get(&self, id: DatapointId) -> Option<Datapoint> {
        self.lock_state().cells.get(&id).cloned()
    }

    fn has_id(&self, id: DatapointId, kind: Option<DatapointType>) -> bool {
        self.lock_state()
            .cells
            .get(&id)
            .is_some_and(|cell| kind.is_none_or(|kind| cell.kind() == kind))
    }

    fn get_or_create(&self, id: DatapointId, value: DatapointValue) -> Datapoint {
        self.lock_state()
            .cells
            .entry(id)
            .or_insert_with(|| Datapoint::new(id, value, false))
            .clone()
    }

    fn set_value(
        &self,
        id: DatapointId,
        value: DatapointValue,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        let result = self.store(id, value).map(|cell| {
            tracing::debug!(dp_id = %id, value = ?cell.value, "datapoint written");
            self.emit(TransportEvent::Updated(vec![cell]));
        });
        async { result }
    }

    fn rssi(&self) -> Option<i16> {
        self.lock_state().rssi
    }

    fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.events.subscribe()
    }
}
