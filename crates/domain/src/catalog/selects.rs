//! Select mappings.

use std::sync::LazyLock;

use crate::datapoint::{DatapointId, DatapointType};
use crate::entity::{EntityCategory, EntityMeta};

use super::{Descriptor, MappingTable};

pub const FINGERBOT_MODES: &[&str] = &["push", "switch", "program"];
pub const TEMPERATURE_UNITS: &[&str] = &["°C", "°F"];
pub const WEATHER_DELAYS_SHORT: &[&str] = &["cancel", "24h", "48h", "72h"];
pub const WEATHER_DELAYS: &[&str] = &[
    "cancel", "24h", "48h", "72h", "96h", "120h", "144h", "168h",
];
pub const SMART_WEATHER: &[&str] = &["sunny", "cloudy", "rainy"];
const WORK_MODES: &[&str] = &["Performance", "Balanced", "Eco", "Expert"];

/// Binds an enum datapoint to a select entity; the raw value is the index
/// of the option.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectDescriptor {
    pub dp_id: DatapointId,
    pub meta: EntityMeta,
    pub force_add: bool,
    pub dp_type: Option<DatapointType>,
    pub options: &'static [&'static str],
}

impl SelectDescriptor {
    #[must_use]
    pub fn new(dp_id: u8, meta: EntityMeta, options: &'static [&'static str]) -> Self {
        Self {
            dp_id: DatapointId::new(dp_id),
            meta,
            force_add: true,
            dp_type: None,
            options,
        }
    }

    /// A configuration select.
    #[must_use]
    pub fn config(dp_id: u8, key: &'static str, options: &'static [&'static str]) -> Self {
        Self::new(
            dp_id,
            EntityMeta::new(key).category(EntityCategory::Config),
            options,
        )
    }

    #[must_use]
    pub fn temperature_unit(dp_id: u8) -> Self {
        Self::new(
            dp_id,
            EntityMeta::new("temperature_unit")
                .icon("mdi:thermometer")
                .category(EntityCategory::Config),
            TEMPERATURE_UNITS,
        )
    }

    #[must_use]
    pub fn fingerbot_mode(dp_id: u8) -> Self {
        Self::config(dp_id, "fingerbot_mode", FINGERBOT_MODES)
    }

    #[must_use]
    pub fn weather_delay(dp_id: u8) -> Self {
        Self::config(dp_id, "weather_delay", WEATHER_DELAYS)
    }

    #[must_use]
    pub fn smart_weather(dp_id: u8) -> Self {
        Self::config(dp_id, "smart_weather", SMART_WEATHER)
    }

    #[must_use]
    pub fn disabled_by_default(mut self) -> Self {
        self.meta = self.meta.disabled_by_default();
        self
    }

    /// Index of `option` in the option list.
    #[must_use]
    pub fn index_of(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|candidate| *candidate == option)
    }
}

impl Descriptor for SelectDescriptor {
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

    fn has_required_options(&self) -> bool {
        !self.options.is_empty()
    }
}

pub(super) static TABLE: LazyLock<MappingTable<SelectDescriptor>> = LazyLock::new(|| {
    MappingTable::builder()
        .products(
            "sfkzq",
            &["46zia2nz", "1fcnd8xk", "0axr5s0b"],
            &[
                SelectDescriptor::config(10, "weather_delay", WEATHER_DELAYS_SHORT),
                SelectDescriptor::config(12, "work_state", &["auto", "manual", "idle"]),
            ],
        )
        // SOP10 smart water timer
        .product(
            "sfkzq",
            "nxquc5lb",
            vec![
                SelectDescriptor::weather_delay(10),
                SelectDescriptor::smart_weather(13),
            ],
        )
        .product(
            "sfkzq",
            "svhikeyq",
            vec![
                SelectDescriptor::config(10, "weather_delay", WEATHER_DELAYS_SHORT),
                SelectDescriptor::smart_weather(13),
            ],
        )
        .product(
            "co2bj",
            "59s19z5m",
            vec![SelectDescriptor::temperature_unit(101)],
        )
        .products(
            "dcb",
            &["ajrhf1aj", "z5ztlw3k"],
            &[
                SelectDescriptor::new(
                    105,
                    EntityMeta::new("battery_work_mode")
                        .icon("mdi:leaf-circle-outline")
                        .category(EntityCategory::Config),
                    WORK_MODES,
                ),
                SelectDescriptor::new(
                    174,
                    EntityMeta::new("pack_work_mode")
                        .icon("mdi:leaf-circle-outline")
                        .category(EntityCategory::Config),
                    WORK_MODES,
                ),
            ],
        )
        .products(
            "ms",
            &["ludzroix", "isk2p555", "gumrixyt", "uamrw6h3", "okkyfgfs"],
            &[SelectDescriptor::config(
                31,
                "beep_volume",
                &["mute", "low", "normal", "high"],
            )],
        )
        .product(
            "jtmspro",
            "hc7n0urm",
            vec![
                SelectDescriptor::config(31, "beep_volume", &["Mute", "Low", "Normal", "High"]),
                SelectDescriptor::config(
                    28,
                    "language",
                    &[
                        "Chinese Simplified",
                        "English",
                        "Arabic",
                        "Indonesian",
                        "Portuguese",
                    ],
                ),
            ],
        )
        .products(
            "szjqr",
            &["3yqdo5yt", "xhf790if", "yn4x5fa7"],
            &[SelectDescriptor::fingerbot_mode(2)],
        )
        .products(
            "szjqr",
            &[
                "blliqpsj", "ndvkgsrm", "yiihr7zh", "neq16kgd", "6jcvqwh0", "riecov42", "h8kdwywx",
                "ltak7e1p", "y6kttvd6", "yrnk7mnn", "nvr2rocq", "bnt7wajf", "rvdceqjh", "5xhbk964",
            ],
            &[SelectDescriptor::fingerbot_mode(8)],
        )
        .products(
            "kg",
            &["mknd4lci", "riecov42", "bs3ubslo"],
            &[SelectDescriptor::fingerbot_mode(101)],
        )
        .products(
            "wsdcg",
            &["ojzlzzsw", "iv7hudlj", "jm6iasmb", "vlzqwckk"],
            &[SelectDescriptor::temperature_unit(9).disabled_by_default()],
        )
        .product(
            "znhsb",
            "cdlandip",
            vec![
                SelectDescriptor::temperature_unit(106),
                SelectDescriptor::config(
                    107,
                    "reminder_mode",
                    &["interval_reminder", "alarm_reminder"],
                ),
            ],
        )
        .build()
});
