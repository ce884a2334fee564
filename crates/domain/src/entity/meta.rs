//! Display metadata attached to every entity descriptor.

use serde::Serialize;

/// Host device class of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Battery,
    CarbonDioxide,
    Current,
    Duration,
    Enum,
    Humidity,
    Moisture,
    Restart,
    SignalStrength,
    Temperature,
    Voltage,
    Water,
}

/// Where the host groups an entity in its UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Config,
    Diagnostic,
}

/// How the host records sensor history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    TotalIncreasing,
}

/// Native unit of a sensor value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Percentage,
    Celsius,
    Fahrenheit,
    PartsPerMillion,
    Milliampere,
    Millivolt,
    Seconds,
    Minutes,
    Milliliters,
    DecibelsMilliwatt,
}

impl Unit {
    /// Display symbol of the unit.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Percentage => "%",
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
            Self::PartsPerMillion => "ppm",
            Self::Milliampere => "mA",
            Self::Millivolt => "mV",
            Self::Seconds => "s",
            Self::Minutes => "min",
            Self::Milliliters => "mL",
            Self::DecibelsMilliwatt => "dBm",
        }
    }
}

/// Display metadata of one entity.
///
/// Built with chained setters:
///
/// ```
/// use tuyable_domain::entity::{DeviceClass, EntityCategory, EntityMeta};
///
/// let meta = EntityMeta::new("battery")
///     .device_class(DeviceClass::Battery)
///     .category(EntityCategory::Diagnostic);
/// assert_eq!(meta.key, "battery");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityMeta {
    /// Translation key, also the suffix of the entity's unique id.
    pub key: &'static str,
    pub icon: Option<&'static str>,
    pub device_class: Option<DeviceClass>,
    pub entity_category: Option<EntityCategory>,
    pub unit: Option<Unit>,
    pub state_class: Option<StateClass>,
    pub enabled_by_default: bool,
}

impl EntityMeta {
    #[must_use]
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            icon: None,
            device_class: None,
            entity_category: None,
            unit: None,
            state_class: None,
            enabled_by_default: true,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    #[must_use]
    pub fn device_class(mut self, device_class: DeviceClass) -> Self {
        self.device_class = Some(device_class);
        self
    }

    #[must_use]
    pub fn category(mut self, category: EntityCategory) -> Self {
        self.entity_category = Some(category);
        self
    }

    #[must_use]
    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub fn state_class(mut self, state_class: StateClass) -> Self {
        self.state_class = Some(state_class);
        self
    }

    /// Register the entity disabled until the user turns it on.
    #[must_use]
    pub fn disabled_by_default(mut self) -> Self {
        self.enabled_by_default = false;
        self
    }
}
