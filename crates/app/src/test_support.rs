//! Shared fakes for unit tests.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;

use tokio::sync::broadcast;

use tuyable_domain::datapoint::{Datapoint, DatapointId, DatapointType, DatapointValue};
use tuyable_domain::device::DeviceIdentity;

use crate::ports::{DeviceTransport, TransportError, TransportEvent};

/// Transport keeping cells in memory and recording every write.
pub(crate) struct FakeTransport {
    cells: Mutex<BTreeMap<DatapointId, Datapoint>>,
    writes: Mutex<Vec<(DatapointId, DatapointValue)>>,
    rssi: Mutex<Option<i16>>,
    events: broadcast::Sender<TransportEvent>,
}

impl Default for FakeTransport {
    fn default() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            cells: Mutex::new(BTreeMap::new()),
            writes: Mutex::new(Vec::new()),
            rssi: Mutex::new(None),
            events,
        }
    }
}

impl FakeTransport {
    pub(crate) fn with(self, id: u8, value: DatapointValue) -> Self {
        let id = DatapointId::new(id);
        self.cells
            .lock()
            .unwrap()
            .insert(id, Datapoint::new(id, value, true));
        self
    }

    pub(crate) fn set_rssi(&self, rssi: i16) {
        *self.rssi.lock().unwrap() = Some(rssi);
    }

    pub(crate) fn writes(&self) -> Vec<(DatapointId, DatapointValue)> {
        self.writes.lock().unwrap().clone()
    }

    pub(crate) fn emit(&self, event: TransportEvent) {
        self.events.send(event).unwrap();
    }
}

impl DeviceTransport for FakeTransport {
    fn get(&self, id: DatapointId) -> Option<Datapoint> {
        self.cells.lock().unwrap().get(&id).cloned()
    }

    fn has_id(&self, id: DatapointId, kind: Option<DatapointType>) -> bool {
        self.get(id)
            .is_some_and(|cell| kind.is_none_or(|kind| cell.kind() == kind))
    }

    fn get_or_create(&self, id: DatapointId, value: DatapointValue) -> Datapoint {
        self.cells
            .lock()
            .unwrap()
            .entry(id)
            .or_insert_with(|| Datapoint::new(id, value, false))
            .clone()
    }

    fn set_value(
        &self,
        id: DatapointId,
        value: DatapointValue,
    ) -> impl Future<Output = Result<(), TransportError>> + Send {
        self.writes.lock().unwrap().push((id, value.clone()));
        let result = {
            let mut cells = self.cells.lock().unwrap();
            match cells.get_mut(&id) {
                Some(cell) => value
                    .coerce(cell.kind())
                    .map(|value| cell.value = value)
                    .map_err(|source| TransportError::Coercion { dp_id: id, source }),
                None => Err(TransportError::UnknownDatapoint(id)),
            }
        };
        async { result }
    }

    fn rssi(&self) -> Option<i16> {
        *self.rssi.lock().unwrap()
    }

    fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.events.subscribe()
    }
}

pub(crate) fn device(category: &str, product_id: &str) -> DeviceIdentity {
    DeviceIdentity::builder()
        .address("DC:23:4D:5B:0E:DF")
        .device_id("bf1234")
        .category(category)
        .product_id(product_id)
        .name("TY")
        .build()
        .unwrap()
}
