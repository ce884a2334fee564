//! Sensor entities.

use std::sync::Arc;

use tuyable_domain::catalog::{SensorDescriptor, ValueSource};
use tuyable_domain::datapoint::DatapointValue;
use tuyable_domain::entity::EntityValue;

use crate::ports::DeviceTransport;

use super::{BleEntity, DeviceContext, option_index, option_label};

/// A read-only sensor rendering one datapoint (or the signal strength).
pub struct BleSensor<T> {
    entity: BleEntity<T>,
    descriptor: &'static SensorDescriptor,
}

impl<T: DeviceTransport + 'static> BleSensor<T> {
    #[must_use]
    pub fn new(context: Arc<DeviceContext<T>>, descriptor: &'static SensorDescriptor) -> Self {
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
    pub fn descriptor(&self) -> &'static SensorDescriptor {
        self.descriptor
    }

    /// Rendered value, `None` while the device has not reported it.
    ///
    /// Enum cells map to their option label (raw value when out of range),
    /// numeric cells are divided by the coefficient, anything else passes
    /// through unchanged.
    #[must_use]
    pub fn value(&self) -> Option<EntityValue> {
        let context = self.entity.context();
        match self.descriptor.source {
            ValueSource::SignalStrength => context
                .transport()
                .rssi()
                .map(|rssi| EntityValue::Int(i64::from(rssi))),
            ValueSource::EnumScaled { dp_id, factor } => context
                .value_of(dp_id)?
                .as_f64()
                .map(|level| EntityValue::Float(level * factor)),
            ValueSource::Datapoint(dp_id) => Some(self.render(context.value_of(dp_id)?)),
        }
    }

    /// Per-option icon for enum cells, else the descriptor's icon.
    #[must_use]
    pub fn icon(&self) -> Option<&'static str> {
        let from_value = match self.descriptor.source {
            ValueSource::Datapoint(dp_id) if !self.descriptor.icons.is_empty() => self
                .entity
                .context()
                .value_of(dp_id)
                .filter(|value| matches!(value, DatapointValue::Enum(_)))
                .and_then(|value| option_index(self.descriptor.icons, &value))
                .map(|index| self.descriptor.icons[index]),
            _ => None,
        };
        from_value.or(self.descriptor.meta.icon)
    }

    fn render(&self, value: DatapointValue) -> EntityValue {
        match value {
            DatapointValue::Enum(_) => match option_label(self.descriptor.options, &value) {
                Some(label) => EntityValue::Text(label.to_owned()),
                None => EntityValue::from(value),
            },
            DatapointValue::Value(raw) => match self.descriptor.coefficient {
                Some(coefficient) => EntityValue::Float(f64::from(raw) / coefficient),
                None => EntityValue::Int(i64::from(raw)),
            },
            other => EntityValue::from(other),
        }
    }
}
