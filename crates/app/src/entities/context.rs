//! Device context shared by every entity of one entry.

use std::sync::Arc;

use tokio::sync::watch;

use tuyable_domain::datapoint::{DatapointId, DatapointValue};
use tuyable_domain::device::{DeviceIdentity, DeviceInfo};
use tuyable_domain::product::ProductInfo;

use crate::ports::DeviceTransport;

/// Everything an entity needs to know about its device.
pub struct DeviceContext<T> {
    device: DeviceIdentity,
    product: Option<&'static ProductInfo>,
    info: DeviceInfo,
    transport: Arc<T>,
    connection: watch::Receiver<bool>,
}

impl<T: DeviceTransport> DeviceContext<T> {
    /// `connection` is the coordinator's debounced connection state.
    #[must_use]
    pub fn new(
        device: DeviceIdentity,
        product: Option<&'static ProductInfo>,
        transport: Arc<T>,
        connection: watch::Receiver<bool>,
    ) -> Self {
        let info = DeviceInfo::new(&device, product);
        Self {
            device,
            product,
            info,
            transport,
            connection,
        }
    }

    #[must_use]
    pub fn device(&self) -> &DeviceIdentity {
        &self.device
    }

    #[must_use]
    pub fn product(&self) -> Option<&'static ProductInfo> {
        self.product
    }

    #[must_use]
    pub fn device_info(&self) -> &DeviceInfo {
        &self.info
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        *self.connection.borrow()
    }

    /// Current value of a cell.
    #[must_use]
    pub fn value_of(&self, id: DatapointId) -> Option<DatapointValue> {
        self.transport.get(id).map(|cell| cell.value)
    }
}
