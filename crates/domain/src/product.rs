//! Products — catalog metadata of one vendor SKU.
//!
//! Some products carry a sub-profile describing how one physical capability
//! is laid out across several datapoints (a fingerbot's switch, mode and
//! positions, a water valve's countdown and weather settings).

use serde::Serialize;

use crate::datapoint::DatapointId;

/// Manufacturer reported when a product does not declare its own.
pub const DEFAULT_MANUFACTURER: &str = "Tuya";

/// Datapoint layout of a mechanical single-finger actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FingerbotInfo {
    pub switch: DatapointId,
    pub mode: DatapointId,
    pub up_position: DatapointId,
    pub down_position: DatapointId,
    pub hold_time: DatapointId,
    pub reverse_positions: DatapointId,
    /// Datapoint reporting presses of the physical button, when the product has one.
    pub manual_control: Option<DatapointId>,
    pub program: Option<DatapointId>,
}

impl FingerbotInfo {
    #[must_use]
    pub fn new(
        switch: u8,
        mode: u8,
        up_position: u8,
        down_position: u8,
        hold_time: u8,
        reverse_positions: u8,
    ) -> Self {
        Self {
            switch: DatapointId::new(switch),
            mode: DatapointId::new(mode),
            up_position: DatapointId::new(up_position),
            down_position: DatapointId::new(down_position),
            hold_time: DatapointId::new(hold_time),
            reverse_positions: DatapointId::new(reverse_positions),
            manual_control: None,
            program: None,
        }
    }

    #[must_use]
    pub fn manual_control(mut self, dp_id: u8) -> Self {
        self.manual_control = Some(DatapointId::new(dp_id));
        self
    }

    #[must_use]
    pub fn program(mut self, dp_id: u8) -> Self {
        self.program = Some(DatapointId::new(dp_id));
        self
    }
}

/// Datapoint layout of an irrigation valve controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaterValveInfo {
    pub switch: DatapointId,
    pub countdown: DatapointId,
    pub weather_delay: DatapointId,
    pub smart_weather: DatapointId,
    pub use_time: DatapointId,
}

impl WaterValveInfo {
    #[must_use]
    pub fn new(switch: u8, countdown: u8, weather_delay: u8, smart_weather: u8, use_time: u8) -> Self {
        Self {
            switch: DatapointId::new(switch),
            countdown: DatapointId::new(countdown),
            weather_delay: DatapointId::new(weather_delay),
            smart_weather: DatapointId::new(smart_weather),
            use_time: DatapointId::new(use_time),
        }
    }
}

/// Catalog entry for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductInfo {
    pub name: &'static str,
    pub manufacturer: &'static str,
    pub fingerbot: Option<FingerbotInfo>,
    pub water_valve: Option<WaterValveInfo>,
    /// Lock products treat `true` as "trigger" on their command datapoints.
    pub lock: bool,
}

impl ProductInfo {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            manufacturer: DEFAULT_MANUFACTURER,
            fingerbot: None,
            water_valve: None,
            lock: false,
        }
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: &'static str) -> Self {
        self.manufacturer = manufacturer;
        self
    }

    #[must_use]
    pub fn fingerbot(mut self, fingerbot: FingerbotInfo) -> Self {
        self.fingerbot = Some(fingerbot);
        self
    }

    #[must_use]
    pub fn water_valve(mut self, water_valve: WaterValveInfo) -> Self {
        self.water_valve = Some(water_valve);
        self
    }

    #[must_use]
    pub fn lock(mut self) -> Self {
        self.lock = true;
        self
    }

    /// The fingerbot layout, if this product reports physical button presses.
    #[must_use]
    pub fn manual_fingerbot(&self) -> Option<FingerbotInfo> {
        self.fingerbot
            .filter(|fingerbot| fingerbot.manual_control.is_some())
    }
}
