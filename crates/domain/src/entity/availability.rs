//! Availability strategies.
//!
//! On top of the device being connected, some entities are only meaningful
//! while another datapoint holds a given value. Each such rule is a named
//! variant evaluated against a datapoint lookup; a rule whose dependency is
//! missing always reports the entity as available.

use serde::Serialize;

use crate::datapoint::{DatapointId, DatapointValue};
use crate::product::ProductInfo;

/// Datapoint that enables the carbon dioxide alarm on CO2 detectors.
pub const CO2_ALARM_SWITCH_DP: DatapointId = DatapointId::new(13);

/// Extra availability rule of an entity descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Always,
    /// Only while the fingerbot's mode datapoint is `0` (push).
    FingerbotPushMode,
    /// Only while the CO2 alarm switch datapoint is set.
    Co2AlarmEnabled,
}

impl Availability {
    /// Evaluate the rule for `product`, reading dependencies through `lookup`.
    ///
    /// Devices missing from the product catalog have no fingerbot profile.
    pub fn evaluate<F>(self, product: Option<&ProductInfo>, lookup: F) -> bool
    where
        F: Fn(DatapointId) -> Option<DatapointValue>,
    {
        match self {
            Self::Always => true,
            Self::FingerbotPushMode => product
                .and_then(|product| product.fingerbot)
                .and_then(|fingerbot| lookup(fingerbot.mode))
                .is_none_or(|mode| mode.as_i64() == Some(0)),
            Self::Co2AlarmEnabled => {
                lookup(CO2_ALARM_SWITCH_DP).is_none_or(|value| value.is_truthy())
            }
        }
    }
}
