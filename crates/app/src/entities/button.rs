//! Button entities.

use std::sync::Arc;

use tokio::task::JoinHandle;

use tuyable_domain::catalog::ButtonDescriptor;
use tuyable_domain::datapoint::DatapointValue;

use crate::ports::DeviceTransport;

use super::{BleEntity, DeviceContext};

/// A button writing a boolean command datapoint.
pub struct BleButton<T> {
    entity: BleEntity<T>,
    descriptor: &'static ButtonDescriptor,
}

impl<T: DeviceTransport + 'static> BleButton<T> {
    #[must_use]
    pub fn new(context: Arc<DeviceContext<T>>, descriptor: &'static ButtonDescriptor) -> Self {
        Self {
            entity: BleEntity::new(context, descriptor.meta, descriptor.availability),
            descriptor,
        }
    }

    #[must_use]
    pub fn entity(&self) -> &BleEntity<T> {
        &self.entity
    }

    #[must_use]
    pub fn descriptor(&self) -> &'static ButtonDescriptor {
        self.descriptor
    }

    /// Locks always receive `true`; every other product toggles the current value.
    pub fn press(&self) -> JoinHandle<()> {
        let context = self.entity.context();
        let cell = context
            .transport()
            .get_or_create(self.descriptor.dp_id, DatapointValue::Bool(false));
        let value = context
            .product()
            .is_some_and(|product| product.lock)
            || !cell.value.is_truthy();
        self.entity
            .write(self.descriptor.dp_id, DatapointValue::Bool(value))
    }
}
