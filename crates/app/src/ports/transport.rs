//! Device transport port — the datapoint store of one device.
//!
//! A transport owns the connection to a single BLE device. It keeps the last
//! known value of every datapoint cell, sends writes to the device, and
//! reports connection changes and datapoint updates as [`TransportEvent`]s.
//!
//! Reads are synchronous snapshots of the local store; only writes reach the
//! device and are therefore async.

use std::future::Future;

use tokio::sync::broadcast;

use tuyable_domain::datapoint::{Datapoint, DatapointId, DatapointType, DatapointValue};
use tuyable_domain::error::CoercionError;

/// Notification raised by a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    /// A batch of datapoints changed, reported by the device or echoed back
    /// after a local write.
    Updated(Vec<Datapoint>),
}

/// Errors raised by a transport write.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("datapoint {0} does not exist")]
    UnknownDatapoint(DatapointId),

    #[error("value does not fit datapoint {dp_id}")]
    Coercion {
        dp_id: DatapointId,
        #[source]
        source: CoercionError,
    },

    #[error("device is not connected")]
    NotConnected,
}

/// Datapoint store and connection of one device.
pub trait DeviceTransport: Send + Sync {
    /// Current snapshot of a cell, if the device has reported it.
    fn get(&self, id: DatapointId) -> Option<Datapoint>;

    /// Whether a cell exists, optionally with the given type.
    fn has_id(&self, id: DatapointId, kind: Option<DatapointType>) -> bool;

    /// Return the cell, creating it with `value` (and its type) when missing.
    ///
    /// An existing cell keeps its type and value.
    fn get_or_create(&self, id: DatapointId, value: DatapointValue) -> Datapoint;

    /// Store `value` in an existing cell, coerced to the cell's type, and
    /// send it to the device.
    fn set_value(
        &self,
        id: DatapointId,
        value: DatapointValue,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Last received signal strength in dBm.
    fn rssi(&self) -> Option<i16>;

    /// Receive events published *after* the subscription is created.
    fn subscribe(&self) -> broadcast::Receiver<TransportEvent>;
}
