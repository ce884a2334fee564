//! Select entities.

use std::sync::Arc;

use tokio::task::JoinHandle;

use tuyable_domain::catalog::SelectDescriptor;
use tuyable_domain::datapoint::DatapointValue;
use tuyable_domain::entity::{Availability, EntityValue};

use crate::error::EntityError;
use crate::ports::DeviceTransport;

use super::{BleEntity, DeviceContext, option_label};

/// A select over an enum datapoint whose raw value indexes the options.
pub struct BleSelect<T> {
    entity: BleEntity<T>,
    descriptor: &'static SelectDescriptor,
}

impl<T: DeviceTransport + 'static> BleSelect<T> {
    #[must_use]
    pub fn new(context: Arc<DeviceContext<T>>, descriptor: &'static SelectDescriptor) -> Self {
        Self {
            entity: BleEntity::new(context, descriptor.meta, Availability::Always),
            descriptor,
        }
    }

    #[must_use]
    pub fn entity(&self) -> &BleEntity<T> {
        &self.entity
    }

    #[must_use]
    pub fn descriptor(&self) -> &'static SelectDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn options(&self) -> &'static [&'static str] {
        self.descriptor.options
    }

    /// The selected label, or the raw value when it indexes no option.
    #[must_use]
    pub fn current_option(&self) -> Option<EntityValue> {
        let cell = self.entity.context().transport().get(self.descriptor.dp_id)?;
        Some(match option_label(self.descriptor.options, &cell.value) {
            Some(label) => EntityValue::Text(label.to_owned()),
            None => EntityValue::from(cell.value),
        })
    }

    /// Write the index of `option` to the enum datapoint.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnknownOption`] when `option` is not one of
    /// [`options`](Self::options); nothing is written then.
    pub fn select_option(&self, option: &str) -> Result<JoinHandle<()>, EntityError> {
        let index = self
            .descriptor
            .index_of(option)
            .and_then(|index| u32::try_from(index).ok())
            .ok_or_else(|| EntityError::UnknownOption {
                key: self.descriptor.meta.key,
                option: option.to_owned(),
            })?;

        let value = DatapointValue::Enum(index);
        self.entity
            .context()
            .transport()
            .get_or_create(self.descriptor.dp_id, value.clone());
        Ok(self.entity.write(self.descriptor.dp_id, value))
    }
}
