//! The device catalog: product database and per-kind entity mapping tables.
//!
//! Tables are keyed by category code, then by product id. Resolution is an
//! exact match with one fallback level: product list, then the category's
//! default list, then nothing. Unknown categories or products are not an
//! error, they simply expose no entities.
//!
//! ```
//! use tuyable_domain::catalog::{self, Selects};
//!
//! let selects = catalog::resolve::<Selects>("ms", "okkyfgfs");
//! assert_eq!(selects[0].meta.key, "beep_volume");
//! assert!(catalog::resolve::<Selects>("unknown", "whatever").is_empty());
//! ```

mod buttons;
mod products;
mod selects;
mod sensors;
mod table;

use std::fmt;

use serde::Serialize;

use crate::datapoint::{DatapointId, DatapointType};
use crate::entity::EntityKind;
use crate::error::CatalogError;
use crate::product::ProductInfo;

pub use buttons::ButtonDescriptor;
pub use products::ProductCatalog;
pub use selects::SelectDescriptor;
pub use sensors::{SensorDescriptor, ValueSource};
pub use table::{CategoryMapping, MappingTable, MappingTableBuilder};

/// Which list of a category a mapping comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MappingScope {
    Product(&'static str),
    /// The category-wide fallback list.
    Default,
}

impl fmt::Display for MappingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product(product_id) => f.write_str(product_id),
            Self::Default => f.write_str("*"),
        }
    }
}

/// Common surface of every entity descriptor.
pub trait Descriptor {
    /// Translation key of the entity.
    fn key(&self) -> &'static str;

    /// Datapoint the entity is bound to, if any.
    fn dp_id(&self) -> Option<DatapointId>;

    /// Whether the entity is created before the device reports the datapoint.
    fn force_add(&self) -> bool;

    /// Cell type the datapoint must have for the entity to be created.
    fn dp_type(&self) -> Option<DatapointType>;

    /// Whether the descriptor declares the options its kind requires.
    fn has_required_options(&self) -> bool {
        true
    }
}

/// An entity kind together with its descriptor type and table.
pub trait Platform {
    const KIND: EntityKind;
    type Descriptor: Descriptor + 'static;

    fn table() -> &'static MappingTable<Self::Descriptor>;
}

/// Button entities.
pub struct Buttons;

/// Select entities.
pub struct Selects;

/// Sensor entities.
pub struct Sensors;

impl Platform for Buttons {
    const KIND: EntityKind = EntityKind::Button;
    type Descriptor = ButtonDescriptor;

    fn table() -> &'static MappingTable<ButtonDescriptor> {
        &buttons::TABLE
    }
}

impl Platform for Selects {
    const KIND: EntityKind = EntityKind::Select;
    type Descriptor = SelectDescriptor;

    fn table() -> &'static MappingTable<SelectDescriptor> {
        &selects::TABLE
    }
}

impl Platform for Sensors {
    const KIND: EntityKind = EntityKind::Sensor;
    type Descriptor = SensorDescriptor;

    fn table() -> &'static MappingTable<SensorDescriptor> {
        &sensors::TABLE
    }
}

/// Descriptors of kind `P` that apply to a product.
#[must_use]
pub fn resolve<P: Platform>(category: &str, product_id: &str) -> &'static [P::Descriptor] {
    P::table().resolve(category, product_id)
}

/// Catalog entry of a product, falling back to the category-wide entry.
#[must_use]
pub fn product_info(category: &str, product_id: &str) -> Option<&'static ProductInfo> {
    products::CATALOG.get(category, product_id)
}

/// The signal-strength sensor every device exposes regardless of its product.
#[must_use]
pub fn signal_strength_sensor() -> &'static SensorDescriptor {
    &sensors::SIGNAL_STRENGTH
}

/// Check every built-in table, returning all problems found.
///
/// # Errors
///
/// Returns the list of [`CatalogError`]s when any table breaks an invariant.
pub fn validate() -> Result<(), Vec<CatalogError>> {
    let mut problems = Buttons::table().problems(Buttons::KIND);
    problems.extend(Selects::table().problems(Selects::KIND));
    problems.extend(Sensors::table().problems(Sensors::KIND));
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}
