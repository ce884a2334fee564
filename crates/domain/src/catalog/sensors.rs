//! Sensor mappings.

use std::sync::LazyLock;

use crate::datapoint::{DatapointId, DatapointType};
use crate::entity::{Availability, DeviceClass, EntityCategory, EntityMeta, StateClass, Unit};

use super::{Descriptor, MappingTable};

const BATTERY_STATES: &[&str] = &["low", "normal", "high"];
const BATTERY_STATE_ICONS: &[&str] = &["mdi:battery-alert", "mdi:battery-50", "mdi:battery-check"];
const BATTERY_CHARGING: &[&str] = &["not_charging", "charging", "charged"];
const BATTERY_CHARGING_ICONS: &[&str] = &["mdi:battery", "mdi:power-plug-battery", "mdi:battery-check"];
const LOCK_ALARMS: &[&str] = &[
    "wrong_finger",
    "wrong_password",
    "wrong_card",
    "wrong_face",
    "tongue_bad",
    "too_hot",
    "unclosed_time",
    "tongue_not_out",
    "pry",
    "key_in",
    "low_battery",
    "power_off",
    "shock",
];
const LOCK_ALARMS_WITH_DEFENSE: &[&str] = &[
    "wrong_finger",
    "wrong_password",
    "wrong_card",
    "wrong_face",
    "tongue_bad",
    "too_hot",
    "unclosed_time",
    "tongue_not_out",
    "pry",
    "key_in",
    "low_battery",
    "power_off",
    "shock",
    "defense",
];

/// Where a sensor reads its value from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueSource {
    /// The bound datapoint, rendered through options or coefficient.
    Datapoint(DatapointId),
    /// A level datapoint multiplied into a float, e.g. battery steps of 20 %.
    EnumScaled { dp_id: DatapointId, factor: f64 },
    /// The device's received signal strength, not a datapoint.
    SignalStrength,
}

impl ValueSource {
    #[must_use]
    pub fn dp_id(self) -> Option<DatapointId> {
        match self {
            Self::Datapoint(dp_id) | Self::EnumScaled { dp_id, .. } => Some(dp_id),
            Self::SignalStrength => None,
        }
    }
}

/// Binds a datapoint (or a computed source) to a read-only sensor entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorDescriptor {
    pub source: ValueSource,
    pub meta: EntityMeta,
    pub force_add: bool,
    pub dp_type: Option<DatapointType>,
    /// Divisor applied to numeric cells.
    pub coefficient: Option<f64>,
    /// Labels of an enum cell, indexed by raw value.
    pub options: &'static [&'static str],
    /// Icons of an enum cell, indexed by raw value.
    pub icons: &'static [&'static str],
    pub availability: Availability,
}

impl SensorDescriptor {
    #[must_use]
    pub fn new(dp_id: u8, meta: EntityMeta) -> Self {
        Self::with_source(ValueSource::Datapoint(DatapointId::new(dp_id)), meta)
    }

    #[must_use]
    pub fn with_source(source: ValueSource, meta: EntityMeta) -> Self {
        Self {
            source,
            meta,
            force_add: true,
            dp_type: None,
            coefficient: None,
            options: &[],
            icons: &[],
            availability: Availability::Always,
        }
    }

    /// Battery level in percent.
    #[must_use]
    pub fn battery(dp_id: u8) -> Self {
        Self::new(dp_id, battery_meta("battery"))
    }

    #[must_use]
    pub fn battery_percentage(dp_id: u8) -> Self {
        Self::new(dp_id, battery_meta("battery_percentage"))
    }

    #[must_use]
    pub fn temperature(dp_id: u8) -> Self {
        Self::new(dp_id, measurement("temperature", DeviceClass::Temperature, Unit::Celsius))
    }

    /// Enum sensor whose raw value indexes `options`.
    #[must_use]
    pub fn enumeration(dp_id: u8, meta: EntityMeta, options: &'static [&'static str]) -> Self {
        Self::new(dp_id, meta.device_class(DeviceClass::Enum)).options(options)
    }

    #[must_use]
    pub fn work_state(dp_id: u8) -> Self {
        Self::enumeration(dp_id, EntityMeta::new("work_state"), &["auto", "manual", "idle"])
    }

    #[must_use]
    pub fn duration(dp_id: u8, key: &'static str, unit: Unit) -> Self {
        Self::new(dp_id, measurement(key, DeviceClass::Duration, unit))
    }

    /// Diagnostic event counter.
    #[must_use]
    pub fn counter(dp_id: u8, key: &'static str) -> Self {
        Self::new(
            dp_id,
            EntityMeta::new(key)
                .icon("mdi:counter")
                .state_class(StateClass::TotalIncreasing)
                .category(EntityCategory::Diagnostic),
        )
    }

    #[must_use]
    pub fn coefficient(mut self, coefficient: f64) -> Self {
        self.coefficient = Some(coefficient);
        self
    }

    #[must_use]
    pub fn options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn icons(mut self, icons: &'static [&'static str]) -> Self {
        self.icons = icons;
        self
    }

    #[must_use]
    pub fn availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    #[must_use]
    pub fn diagnostic(mut self) -> Self {
        self.meta = self.meta.category(EntityCategory::Diagnostic);
        self
    }
}

impl Descriptor for SensorDescriptor {
    fn key(&self) -> &'static str {
        self.meta.key
    }

    fn dp_id(&self) -> Option<DatapointId> {
        self.source.dp_id()
    }

    fn force_add(&self) -> bool {
        self.force_add
    }

    fn dp_type(&self) -> Option<DatapointType> {
        self.dp_type
    }

    fn has_required_options(&self) -> bool {
        self.meta.device_class != Some(DeviceClass::Enum) || !self.options.is_empty()
    }
}

fn battery_meta(key: &'static str) -> EntityMeta {
    measurement(key, DeviceClass::Battery, Unit::Percentage).category(EntityCategory::Diagnostic)
}

fn measurement(key: &'static str, device_class: DeviceClass, unit: Unit) -> EntityMeta {
    EntityMeta::new(key)
        .device_class(device_class)
        .unit(unit)
        .state_class(StateClass::Measurement)
}

fn battery_state(dp_id: u8) -> SensorDescriptor {
    SensorDescriptor::enumeration(
        dp_id,
        EntityMeta::new("battery_state").icon("mdi:battery"),
        BATTERY_STATES,
    )
    .diagnostic()
    .icons(BATTERY_STATE_ICONS)
}

fn diagnostic(dp_id: u8, key: &'static str) -> SensorDescriptor {
    SensorDescriptor::new(dp_id, EntityMeta::new(key)).diagnostic()
}

pub(super) static SIGNAL_STRENGTH: LazyLock<SensorDescriptor> = LazyLock::new(|| {
    SensorDescriptor::with_source(
        ValueSource::SignalStrength,
        measurement(
            "signal_strength",
            DeviceClass::SignalStrength,
            Unit::DecibelsMilliwatt,
        )
        .category(EntityCategory::Diagnostic)
        .disabled_by_default(),
    )
});

pub(super) static TABLE: LazyLock<MappingTable<SensorDescriptor>> = LazyLock::new(|| {
    MappingTable::builder()
        .product(
            "co2bj",
            "59s19z5m",
            vec![
                SensorDescriptor::enumeration(
                    1,
                    EntityMeta::new("carbon_dioxide_alarm").icon("mdi:molecule-co2"),
                    &["alarm", "normal"],
                )
                .availability(Availability::Co2AlarmEnabled),
                SensorDescriptor::new(
                    2,
                    measurement(
                        "carbon_dioxide",
                        DeviceClass::CarbonDioxide,
                        Unit::PartsPerMillion,
                    ),
                ),
                SensorDescriptor::battery(15),
                SensorDescriptor::temperature(18),
                SensorDescriptor::new(
                    19,
                    measurement("humidity", DeviceClass::Humidity, Unit::Percentage),
                ),
            ],
        )
        .products(
            "ms",
            &[
                "ludzroix", "isk2p555", "gumrixyt", "uamrw6h3", "okkyfgfs", "bvclwu9b", "k53ok3u9",
            ],
            &[
                SensorDescriptor::enumeration(21, EntityMeta::new("alarm_lock"), LOCK_ALARMS),
                SensorDescriptor::battery(8),
                SensorDescriptor::enumeration(
                    40,
                    EntityMeta::new("lock_door_status"),
                    &["door_status_unknown", "door_status_open", "door_status_closed"],
                )
                .diagnostic(),
            ],
        )
        .product(
            "jtmspro",
            "hc7n0urm",
            vec![
                SensorDescriptor::enumeration(
                    21,
                    EntityMeta::new("alarm_lock").icon("mdi:alarm-light-outline"),
                    LOCK_ALARMS_WITH_DEFENSE,
                ),
                // last fingerprint, card and code used
                SensorDescriptor::new(12, EntityMeta::new("unlock_fingerprint").icon("mdi:fingerprint")),
                SensorDescriptor::new(15, EntityMeta::new("unlock_card").icon("mdi:nfc-variant")),
                SensorDescriptor::new(13, EntityMeta::new("unlock_password").icon("mdi:keyboard-outline")),
                SensorDescriptor::battery(8),
            ],
        )
        .products(
            "szjqr",
            &["3yqdo5yt", "xhf790if", "okkyfgfs"],
            &[
                SensorDescriptor::enumeration(7, EntityMeta::new("battery_charging"), BATTERY_CHARGING)
                    .diagnostic()
                    .icons(BATTERY_CHARGING_ICONS),
                SensorDescriptor::battery(8),
            ],
        )
        .products(
            "szjqr",
            &[
                "blliqpsj", "ndvkgsrm", "yiihr7zh", "neq16kgd", "6jcvqwh0", "riecov42", "h8kdwywx",
                "ltak7e1p", "y6kttvd6", "yrnk7mnn", "nvr2rocq", "bnt7wajf", "rvdceqjh", "5xhbk964",
            ],
            &[SensorDescriptor::battery(12)],
        )
        .products("kg", &["mknd4lci", "riecov42"], &[SensorDescriptor::battery(105)])
        .product(
            "wsdcg",
            "ojzlzzsw",
            vec![
                SensorDescriptor::temperature(1).coefficient(10.0),
                SensorDescriptor::new(
                    2,
                    measurement("moisture", DeviceClass::Moisture, Unit::Percentage),
                ),
                battery_state(3),
                SensorDescriptor::battery(4),
            ],
        )
        .products(
            "wsdcg",
            &["iv7hudlj", "jm6iasmb"],
            &[
                SensorDescriptor::new(
                    1,
                    measurement("va_temperature", DeviceClass::Temperature, Unit::Celsius),
                )
                .coefficient(10.0),
                SensorDescriptor::new(
                    2,
                    measurement("va_moisture", DeviceClass::Moisture, Unit::Percentage),
                ),
                SensorDescriptor::battery_percentage(4),
            ],
        )
        .product(
            "wsdcg",
            "tv6peegl",
            vec![
                SensorDescriptor::temperature(101),
                SensorDescriptor::new(
                    102,
                    measurement("moisture", DeviceClass::Moisture, Unit::Percentage),
                ),
            ],
        )
        .product(
            "wsdcg",
            "vlzqwckk",
            vec![
                SensorDescriptor::new(
                    1,
                    measurement("va_temperature", DeviceClass::Temperature, Unit::Celsius),
                )
                .coefficient(10.0),
                SensorDescriptor::new(
                    2,
                    measurement("va_humidity", DeviceClass::Humidity, Unit::Percentage),
                ),
                SensorDescriptor::battery_percentage(4),
            ],
        )
        .products("dcb", &["z5ztlw3k", "ajrhf1aj"], &smart_battery())
        .product(
            "zwjcy",
            "gvygg3m8",
            vec![
                SensorDescriptor::new(
                    5,
                    measurement("temp_current", DeviceClass::Temperature, Unit::Celsius),
                )
                .coefficient(10.0),
                SensorDescriptor::new(
                    3,
                    measurement("humidity", DeviceClass::Humidity, Unit::Percentage),
                ),
                battery_state(14),
                SensorDescriptor::battery_percentage(15),
            ],
        )
        .product(
            "znhsb",
            "cdlandip",
            vec![
                SensorDescriptor::temperature(101),
                SensorDescriptor::new(
                    102,
                    measurement("water_intake", DeviceClass::Water, Unit::Milliliters),
                ),
                // reports a 0..=5 level instead of a percentage
                SensorDescriptor::with_source(
                    ValueSource::EnumScaled {
                        dp_id: DatapointId::new(104),
                        factor: 20.0,
                    },
                    battery_meta("battery"),
                ),
            ],
        )
        .product(
            "ggq",
            "6pahkcau",
            vec![
                SensorDescriptor::battery(11),
                SensorDescriptor::duration(6, "time_left", Unit::Minutes),
            ],
        )
        .products(
            "ggq",
            &["hfgdqhho", "qycalacn", "fnlw6npo", "jjqi2syk"],
            &[
                SensorDescriptor::battery(11),
                SensorDescriptor::duration(111, "use_time_z1", Unit::Seconds),
                SensorDescriptor::duration(110, "use_time_z2", Unit::Seconds),
            ],
        )
        .product(
            "sfkzq",
            "0axr5s0b",
            vec![
                SensorDescriptor::battery(7),
                SensorDescriptor::duration(11, "time_left", Unit::Seconds),
            ],
        )
        // dp 11 is the battery on this model, so there is no time_left sensor
        .product("sfkzq", "hfgdqhho", vec![SensorDescriptor::battery(11)])
        .products(
            "sfkzq",
            &["46zia2nz", "1fcnd8xk", "nxquc5lb", "svhikeyq"],
            &[
                SensorDescriptor::battery(7),
                SensorDescriptor::work_state(12),
                SensorDescriptor::duration(15, "use_time_one", Unit::Seconds),
                SensorDescriptor::duration(9, "time_use", Unit::Seconds),
            ],
        )
        .products(
            "cl",
            &["4pbr8eig", "qqdxfdht", "kcy0x4pi", "vlwf3ud6"],
            &[
                SensorDescriptor::battery(13),
                SensorDescriptor::enumeration(
                    7,
                    EntityMeta::new("cover_work_state"),
                    &["STANDBY", "SUCCESS", "LEARNING"],
                )
                .diagnostic(),
            ],
        )
        .build()
});

/// PARKSIDE smart battery packs.
fn smart_battery() -> Vec<SensorDescriptor> {
    vec![
        SensorDescriptor::battery(16),
        SensorDescriptor::temperature(11),
        SensorDescriptor::new(
            172,
            measurement("battery_temp_current", DeviceClass::Temperature, Unit::Celsius),
        ),
        SensorDescriptor::enumeration(
            102,
            EntityMeta::new("battery_status"),
            &["Ready", "Charging", "Discharging", "Full", "Sleep", "Error"],
        ),
        SensorDescriptor::new(
            2,
            measurement("charge_current", DeviceClass::Current, Unit::Milliampere),
        )
        .diagnostic(),
        SensorDescriptor::new(
            3,
            measurement("charge_voltage", DeviceClass::Voltage, Unit::Millivolt),
        )
        .diagnostic(),
        SensorDescriptor::new(
            101,
            measurement("discharging_current", DeviceClass::Current, Unit::Milliampere),
        ),
        SensorDescriptor::duration(103, "charge_to_full_time", Unit::Minutes).diagnostic(),
        SensorDescriptor::duration(104, "discharge_to_empty_time", Unit::Seconds).diagnostic(),
        SensorDescriptor::counter(8, "charge_times"),
        SensorDescriptor::counter(9, "discharge_times"),
        SensorDescriptor::duration(14, "use_time", Unit::Minutes).diagnostic(),
        SensorDescriptor::new(
            15,
            EntityMeta::new("runtime_total")
                .device_class(DeviceClass::Duration)
                .unit(Unit::Minutes)
                .state_class(StateClass::TotalIncreasing)
                .category(EntityCategory::Diagnostic),
        ),
        SensorDescriptor::counter(10, "peak_current_times"),
        SensorDescriptor::new(21, EntityMeta::new("fault").icon("mdi:alert-circle-outline"))
            .diagnostic(),
        SensorDescriptor::counter(107, "over_voltage_times"),
        SensorDescriptor::counter(108, "under_voltage_times"),
        SensorDescriptor::counter(109, "overtemp_discharge_times"),
        SensorDescriptor::counter(110, "overtemp_charge_times"),
        SensorDescriptor::counter(111, "undertemp_discharge_times"),
        SensorDescriptor::counter(112, "undertemp_charge_times"),
        SensorDescriptor::counter(113, "short_circuit_times"),
        SensorDescriptor::counter(114, "over_current_times"),
        diagnostic(19, "product_type"),
        diagnostic(150, "tool_product_type"),
        SensorDescriptor::new(
            152,
            EntityMeta::new("tool_rotation_speed")
                .icon("mdi:rotate-3d-variant")
                .state_class(StateClass::Measurement),
        )
        .diagnostic(),
        SensorDescriptor::new(
            153,
            EntityMeta::new("tool_torque")
                .icon("mdi:screw-lag")
                .state_class(StateClass::Measurement),
        )
        .diagnostic(),
        SensorDescriptor::new(
            154,
            EntityMeta::new("tool_runtime_total")
                .device_class(DeviceClass::Duration)
                .unit(Unit::Minutes)
                .state_class(StateClass::TotalIncreasing),
        )
        .diagnostic(),
        SensorDescriptor::new(
            156,
            EntityMeta::new("tool_fault").icon("mdi:alert-circle-outline"),
        )
        .diagnostic(),
        SensorDescriptor::new(
            157,
            EntityMeta::new("tools_current")
                .device_class(DeviceClass::Current)
                .state_class(StateClass::Measurement),
        )
        .diagnostic(),
        total(158, "tool_ot_times"),
        total(159, "tool_locked_times"),
        total(160, "tool_oc_times"),
    ]
}

fn total(dp_id: u8, key: &'static str) -> SensorDescriptor {
    SensorDescriptor::new(
        dp_id,
        EntityMeta::new(key).state_class(StateClass::TotalIncreasing),
    )
    .diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_not_bind_signal_strength_to_a_datapoint() {
        assert_eq!(SIGNAL_STRENGTH.dp_id(), None);
        assert!(!SIGNAL_STRENGTH.meta.enabled_by_default);
        assert_eq!(SIGNAL_STRENGTH.meta.unit, Some(Unit::DecibelsMilliwatt));
    }

    #[test]
    fn should_bind_scaled_battery_to_its_level_datapoint() {
        let sensors = TABLE.resolve("znhsb", "cdlandip");
        let battery = sensors.iter().find(|s| s.meta.key == "battery").unwrap();
        assert_eq!(battery.dp_id(), Some(DatapointId::new(104)));
        assert!(matches!(
            battery.source,
            ValueSource::EnumScaled { factor, .. } if (factor - 20.0).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn should_keep_icons_aligned_with_options() {
        for (_, _, list) in TABLE.lists() {
            for sensor in list.iter().filter(|s| !s.icons.is_empty()) {
                assert_eq!(sensor.icons.len(), sensor.options.len(), "{}", sensor.meta.key);
            }
        }
    }

    #[test]
    fn should_require_options_for_enum_sensors() {
        let bare = SensorDescriptor::new(3, EntityMeta::new("state").device_class(DeviceClass::Enum));
        assert!(!bare.has_required_options());
        assert!(SensorDescriptor::battery(3).has_required_options());
    }

    #[test]
    fn should_gate_co2_alarm_on_alarm_switch() {
        let alarm = &TABLE.resolve("co2bj", "59s19z5m")[0];
        assert_eq!(alarm.meta.key, "carbon_dioxide_alarm");
        assert_eq!(alarm.availability, Availability::Co2AlarmEnabled);
    }

    #[test]
    fn should_declare_coefficient_for_decimal_temperature() {
        let temperature = &TABLE.resolve("wsdcg", "ojzlzzsw")[0];
        assert_eq!(temperature.coefficient, Some(10.0));
    }
}
