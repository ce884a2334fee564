//! Entity adapters — turn catalog descriptors into live buttons, selects and
//! sensors bound to one device.

mod base;
mod button;
mod context;
mod select;
mod sensor;

use std::sync::Arc;

use tuyable_domain::catalog::{self, Buttons, Descriptor, Selects, Sensors};
use tuyable_domain::datapoint::DatapointValue;

use crate::ports::DeviceTransport;

pub use base::BleEntity;
pub use button::BleButton;
pub use context::DeviceContext;
pub use select::BleSelect;
pub use sensor::BleSensor;

/// Every entity created for one device.
pub struct Entities<T> {
    pub buttons: Vec<BleButton<T>>,
    pub selects: Vec<BleSelect<T>>,
    pub sensors: Vec<BleSensor<T>>,
}

impl<T: DeviceTransport + 'static> Entities<T> {
    /// Instantiate the entities resolved for the device's product.
    ///
    /// A descriptor is kept when it is force-added or its datapoint already
    /// exists with the expected type. The signal strength sensor always comes
    /// first.
    #[must_use]
    pub fn setup(context: &Arc<DeviceContext<T>>) -> Self {
        let device = context.device();
        let transport = context.transport().as_ref();

        let buttons = catalog::resolve::<Buttons>(&device.category, &device.product_id)
            .iter()
            .filter(|descriptor| should_add(*descriptor, transport))
            .map(|descriptor| BleButton::new(Arc::clone(context), descriptor))
            .collect();

        let selects = catalog::resolve::<Selects>(&device.category, &device.product_id)
            .iter()
            .filter(|descriptor| should_add(*descriptor, transport))
            .map(|descriptor| BleSelect::new(Arc::clone(context), descriptor))
            .collect();

        let sensors = std::iter::once(catalog::signal_strength_sensor())
            .chain(
                catalog::resolve::<Sensors>(&device.category, &device.product_id)
                    .iter()
                    .filter(|descriptor| should_add(*descriptor, transport)),
            )
            .map(|descriptor| BleSensor::new(Arc::clone(context), descriptor))
            .collect();

        Self {
            buttons,
            selects,
            sensors,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buttons.len() + self.selects.len() + self.sensors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unique ids of every entity, in setup order.
    pub fn unique_ids(&self) -> impl Iterator<Item = &str> {
        self.buttons
            .iter()
            .map(|button| button.entity().unique_id())
            .chain(self.selects.iter().map(|select| select.entity().unique_id()))
            .chain(self.sensors.iter().map(|sensor| sensor.entity().unique_id()))
    }
}

fn should_add<D: Descriptor, T: DeviceTransport>(descriptor: &D, transport: &T) -> bool {
    descriptor.force_add()
        || descriptor
            .dp_id()
            .is_some_and(|dp_id| transport.has_id(dp_id, descriptor.dp_type()))
}

/// Index into `list` addressed by a numeric cell value.
fn option_index(list: &[&'static str], value: &DatapointValue) -> Option<usize> {
    let index = usize::try_from(value.as_i64()?).ok()?;
    (index < list.len()).then_some(index)
}

fn option_label(options: &[&'static str], value: &DatapointValue) -> Option<&'static str> {
    option_index(options, value).map(|index| options[index])
}
