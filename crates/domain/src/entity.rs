//! Entities — the host-facing view of one datapoint.
//!
//! An entity is a button, select or sensor bound to a single datapoint of a
//! single device. This module holds the display metadata shared by every
//! kind, the rendered value type, and the availability strategies.

mod availability;
mod meta;
mod value;

use std::fmt;

use serde::Serialize;

pub use availability::{Availability, CO2_ALARM_SWITCH_DP};
pub use meta::{DeviceClass, EntityCategory, EntityMeta, StateClass, Unit};
pub use value::EntityValue;

/// The host capability an entity implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Button,
    Select,
    Sensor,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Button => "button",
            Self::Select => "select",
            Self::Sensor => "sensor",
        })
    }
}

/// Build the stable unique id of an entity: `"{device_id}-{key}"`.
#[must_use]
pub fn unique_id(device_id: &str, key: &str) -> String {
    format!("{device_id}-{key}")
}
