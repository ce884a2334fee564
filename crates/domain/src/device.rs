//! Device — one registered BLE device and the registry record derived from it.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::product::{DEFAULT_MANUFACTURER, ProductInfo};

/// Firmware and model details reported by the device, when known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceVersions {
    pub product_model: Option<String>,
    pub hardware_version: Option<String>,
    pub device_version: Option<String>,
    pub protocol_version: Option<String>,
}

/// Identity of a registered device; the join key into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Bluetooth address, normalised to upper-case `AA:BB:CC:DD:EE:FF`.
    pub address: String,
    /// Cloud-assigned device id.
    pub device_id: String,
    /// Vendor category code (e.g. `"szjqr"`).
    pub category: String,
    /// Vendor product id within the category.
    pub product_id: String,
    /// Name the device advertises or the cloud reports.
    pub name: String,
    pub versions: DeviceVersions,
}

impl DeviceIdentity {
    /// Start building an identity.
    #[must_use]
    pub fn builder() -> DeviceIdentityBuilder {
        DeviceIdentityBuilder::default()
    }

    /// Last three address octets, e.g. `"5B0EDF"`.
    #[must_use]
    pub fn short_address(&self) -> String {
        short_address(&self.address)
    }

    /// Human readable name: catalog name (or advertised name) plus short address.
    #[must_use]
    pub fn readable_name(&self, product: Option<&ProductInfo>) -> String {
        let name = product.map_or(self.name.as_str(), |p| p.name);
        format!("{name} {}", self.short_address())
    }
}

/// Builder for [`DeviceIdentity`].
#[derive(Debug, Default)]
pub struct DeviceIdentityBuilder {
    address: Option<String>,
    device_id: Option<String>,
    category: Option<String>,
    product_id: Option<String>,
    name: Option<String>,
    versions: DeviceVersions,
}

impl DeviceIdentityBuilder {
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn versions(mut self, versions: DeviceVersions) -> Self {
        self.versions = versions;
        self
    }

    /// Validate and build the identity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] when a required field is
    /// missing or blank, and [`ValidationError::InvalidAddress`] when the
    /// address is not six hex octets.
    pub fn build(self) -> Result<DeviceIdentity, ValidationError> {
        let address = normalize_address(&required(self.address, "address")?)?;
        let device_id = required(self.device_id, "device_id")?;
        let category = required(self.category, "category")?;
        let product_id = required(self.product_id, "product_id")?;
        let name = self.name.unwrap_or_else(|| device_id.clone());

        Ok(DeviceIdentity {
            address,
            device_id,
            category,
            product_id,
            name,
            versions: self.versions,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::EmptyField(field))
}

/// Normalise `aa-bb-cc-dd-ee-ff` or `aa:bb:…` into `AA:BB:CC:DD:EE:FF`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAddress`] unless the input is six
/// two-digit hex octets.
pub fn normalize_address(address: &str) -> Result<String, ValidationError> {
    let octets: Vec<String> = address
        .split([':', '-'])
        .map(str::to_ascii_uppercase)
        .collect();
    let valid = octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(octets.join(":"))
    } else {
        Err(ValidationError::InvalidAddress(address.to_owned()))
    }
}

/// Last three octets of an address without separators, e.g. `"5B0EDF"`.
#[must_use]
pub fn short_address(address: &str) -> String {
    let normalized = address.replace('-', ":").to_ascii_uppercase();
    let octets: Vec<&str> = normalized.split(':').collect();
    let tail = octets[octets.len().saturating_sub(3)..].concat();
    let skip = tail.chars().count().saturating_sub(6);
    tail.chars().skip(skip).collect()
}

/// Device-registry record the host shows for a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Registry identifier: the bluetooth address.
    pub identifier: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub hw_version: Option<String>,
    pub sw_version: Option<String>,
}

impl DeviceInfo {
    /// Derive the registry record from a device and its catalog entry.
    #[must_use]
    pub fn new(device: &DeviceIdentity, product: Option<&ProductInfo>) -> Self {
        let product_name = product.map_or(device.name.as_str(), |p| p.name);
        let model_name = device
            .versions
            .product_model
            .as_deref()
            .unwrap_or(product_name);
        let sw_version = device.versions.device_version.as_ref().map(|version| {
            match &device.versions.protocol_version {
                Some(protocol) => format!("{version} (protocol {protocol})"),
                None => version.clone(),
            }
        });

        Self {
            identifier: device.address.clone(),
            name: device.readable_name(product),
            manufacturer: product
                .map_or(DEFAULT_MANUFACTURER, |p| p.manufacturer)
                .to_owned(),
            model: format!("{model_name} ({})", device.product_id),
            hw_version: device.versions.hardware_version.clone(),
            sw_version,
        }
    }
}
