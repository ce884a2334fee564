//! Button mappings.

use std::sync::LazyLock;

use crate::datapoint::{DatapointId, DatapointType};
use crate::entity::{Availability, DeviceClass, EntityCategory, EntityMeta};

use super::{Descriptor, MappingTable};

/// Binds a boolean command datapoint to a button entity.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonDescriptor {
    pub dp_id: DatapointId,
    pub meta: EntityMeta,
    /// Create the entity even before the device has reported the datapoint.
    pub force_add: bool,
    pub dp_type: Option<DatapointType>,
    pub availability: Availability,
}

impl ButtonDescriptor {
    #[must_use]
    pub fn new(dp_id: u8, meta: EntityMeta) -> Self {
        Self {
            dp_id: DatapointId::new(dp_id),
            meta,
            force_add: true,
            dp_type: None,
            availability: Availability::Always,
        }
    }

    /// The fingerbot "push" button, only usable while in push mode.
    #[must_use]
    pub fn fingerbot_push(dp_id: u8) -> Self {
        Self {
            availability: Availability::FingerbotPushMode,
            ..Self::new(dp_id, EntityMeta::new("push"))
        }
    }

    #[must_use]
    pub fn expect_type(mut self, dp_type: DatapointType) -> Self {
        self.dp_type = Some(dp_type);
        self
    }
}

impl Descriptor for ButtonDescriptor {
    fn key(&self) -> &'static str {
        self.meta.key
    }

    fn dp_id(&self) -> Option<DatapointId> {
        Some(self.dp_id)
    }

    fn force_add(&self) -> bool {
        self.force_add
    }

    fn dp_type(&self) -> Option<DatapointType> {
        self.dp_type
    }
}

pub(super) static TABLE: LazyLock<MappingTable<ButtonDescriptor>> = LazyLock::new(|| {
    MappingTable::builder()
        .products(
            "dcb",
            &["ajrhf1aj", "z5ztlw3k"],
            &[
                ButtonDescriptor::new(
                    115,
                    EntityMeta::new("battery_finder")
                        .icon("mdi:find-replace")
                        .category(EntityCategory::Diagnostic),
                ),
                ButtonDescriptor::new(
                    162,
                    EntityMeta::new("factory_data_reset")
                        .device_class(DeviceClass::Restart)
                        .icon("mdi:restore")
                        .category(EntityCategory::Config),
                )
                .expect_type(DatapointType::Raw),
            ],
        )
        .products(
            "szjqr",
            &["3yqdo5yt", "xhf790if"],
            &[ButtonDescriptor::fingerbot_push(1)],
        )
        .products(
            "szjqr",
            &[
                "blliqpsj", "ndvkgsrm", "riecov42", "yiihr7zh", "neq16kgd", "6jcvqwh0", "h8kdwywx",
            ],
            &[ButtonDescriptor::fingerbot_push(2)],
        )
        .products(
            "szjqr",
            &[
                "ltak7e1p", "y6kttvd6", "yrnk7mnn", "nvr2rocq", "bnt7wajf", "rvdceqjh", "5xhbk964",
            ],
            &[ButtonDescriptor::fingerbot_push(2)],
        )
        .products(
            "kg",
            &["mknd4lci", "riecov42", "bs3ubslo"],
            &[ButtonDescriptor::fingerbot_push(108)],
        )
        .product(
            "znhsb",
            "cdlandip",
            vec![ButtonDescriptor::new(
                109,
                EntityMeta::new("bright_lid_screen"),
            )],
        )
        // Opens the lock, same as holding the centre button while connected.
        .product(
            "jtmspro",
            "hc7n0urm",
            vec![ButtonDescriptor::new(
                71,
                EntityMeta::new("bluetooth_unlock").icon("mdi:lock-open-variant-outline"),
            )],
        )
        .products(
            "ms",
            &["okkyfgfs", "k53ok3u9"],
            &[ButtonDescriptor::new(6, EntityMeta::new("bluetooth_unlock"))],
        )
        .build()
});
