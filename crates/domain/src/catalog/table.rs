//! Generic category → product → descriptor-list table.

use std::collections::{BTreeMap, HashSet};

use crate::entity::EntityKind;
use crate::error::CatalogError;

use super::{Descriptor, MappingScope};

/// Mappings declared for one category.
#[derive(Debug, Clone)]
pub struct CategoryMapping<T> {
    products: BTreeMap<&'static str, Vec<T>>,
    default: Option<Vec<T>>,
}

impl<T> Default for CategoryMapping<T> {
    fn default() -> Self {
        Self {
            products: BTreeMap::new(),
            default: None,
        }
    }
}

impl<T> CategoryMapping<T> {
    fn resolve(&self, product_id: &str) -> Option<&[T]> {
        self.products
            .get(product_id)
            .or(self.default.as_ref())
            .map(Vec::as_slice)
    }

    fn lists(&self) -> impl Iterator<Item = (MappingScope, &[T])> {
        self.products
            .iter()
            .map(|(product_id, list)| (MappingScope::Product(*product_id), list.as_slice()))
            .chain(
                self.default
                    .iter()
                    .map(|list| (MappingScope::Default, list.as_slice())),
            )
    }
}

/// Immutable, key-ordered mapping table for one entity kind.
#[derive(Debug, Clone)]
pub struct MappingTable<T> {
    categories: BTreeMap<&'static str, CategoryMapping<T>>,
}

impl<T> MappingTable<T> {
    #[must_use]
    pub fn builder() -> MappingTableBuilder<T> {
        MappingTableBuilder {
            categories: BTreeMap::new(),
        }
    }

    /// Descriptors for a product: exact product list, else the category
    /// default, else empty.
    #[must_use]
    pub fn resolve(&self, category: &str, product_id: &str) -> &[T] {
        self.categories
            .get(category)
            .and_then(|mapping| mapping.resolve(product_id))
            .unwrap_or(&[])
    }

    /// Every declared list with its category and scope.
    pub fn lists(&self) -> impl Iterator<Item = (&'static str, MappingScope, &[T])> {
        self.categories.iter().flat_map(|(category, mapping)| {
            mapping
                .lists()
                .map(move |(scope, list)| (*category, scope, list))
        })
    }
}

impl<T: Descriptor> MappingTable<T> {
    /// All invariant violations in the table.
    ///
    /// A list must not bind the same datapoint twice, and descriptors must
    /// declare the options their kind needs.
    #[must_use]
    pub fn problems(&self, kind: EntityKind) -> Vec<CatalogError> {
        let mut problems = Vec::new();
        for (category, scope, list) in self.lists() {
            let mut seen = HashSet::new();
            for descriptor in list {
                if let Some(dp_id) = descriptor.dp_id() {
                    if !seen.insert(dp_id) {
                        problems.push(CatalogError::DuplicateDatapoint {
                            kind,
                            category,
                            scope,
                            dp_id,
                        });
                    }
                }
                if !descriptor.has_required_options() {
                    problems.push(CatalogError::MissingOptions {
                        kind,
                        category,
                        scope,
                        key: descriptor.key(),
                    });
                }
            }
        }
        problems
    }
}

/// Builder for [`MappingTable`].
///
/// Declaring the same product twice replaces the earlier list.
#[derive(Debug)]
pub struct MappingTableBuilder<T> {
    categories: BTreeMap<&'static str, CategoryMapping<T>>,
}

impl<T: Clone> MappingTableBuilder<T> {
    /// Declare the list of one product.
    #[must_use]
    pub fn product(mut self, category: &'static str, product_id: &'static str, list: Vec<T>) -> Self {
        self.categories
            .entry(category)
            .or_default()
            .products
            .insert(product_id, list);
        self
    }

    /// Declare the same list for several products.
    #[must_use]
    pub fn products(
        mut self,
        category: &'static str,
        product_ids: &[&'static str],
        list: &[T],
    ) -> Self {
        let mapping = self.categories.entry(category).or_default();
        for product_id in product_ids {
            mapping.products.insert(*product_id, list.to_vec());
        }
        self
    }

    /// Declare the category-wide fallback list.
    #[must_use]
    pub fn category_default(mut self, category: &'static str, list: Vec<T>) -> Self {
        self.categories.entry(category).or_default().default = Some(list);
        self
    }

    #[must_use]
    pub fn build(self) -> MappingTable<T> {
        MappingTable {
            categories: self.categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapoint::{DatapointId, DatapointType};

    #[derive(Debug, Clone, PartialEq)]
    struct Fake {
        key: &'static str,
        dp: u8,
    }

    impl Descriptor for Fake {
        fn key(&self) -> &'static str {
            self.key
        }

        fn dp_id(&self) -> Option<DatapointId> {
            Some(DatapointId::new(self.dp))
        }

        fn force_add(&self) -> bool {
            true
        }

        fn dp_type(&self) -> Option<DatapointType> {
            None
        }

        fn has_required_options(&self) -> bool {
            !self.key.is_empty()
        }
    }

    fn fake(key: &'static str, dp: u8) -> Fake {
        Fake { key, dp }
    }

    fn table() -> MappingTable<Fake> {
        MappingTable::builder()
            .product("dd", "nvfrtxlq", vec![fake("strip", 1)])
            .category_default("dd", vec![fake("light", 20)])
            .products("ms", &["ludzroix", "isk2p555"], &[fake("beep", 31)])
            .build()
    }

    #[test]
    fn should_return_exact_product_list() {
        assert_eq!(table().resolve("dd", "nvfrtxlq"), [fake("strip", 1)]);
    }

    #[test]
    fn should_fall_back_to_category_default() {
        assert_eq!(table().resolve("dd", "umzu0c2y"), [fake("light", 20)]);
    }

    #[test]
    fn should_return_empty_for_unknown_product_without_default() {
        assert!(table().resolve("ms", "okkyfgfs").is_empty());
    }

    #[test]
    fn should_return_empty_for_unknown_category() {
        assert!(table().resolve("wk", "drlajpqc").is_empty());
    }

    #[test]
    fn should_share_list_between_products() {
        let table = table();
        assert_eq!(table.resolve("ms", "ludzroix"), table.resolve("ms", "isk2p555"));
    }

    #[test]
    fn should_replace_list_when_product_is_declared_twice() {
        let table = MappingTable::builder()
            .product("kg", "riecov42", vec![fake("old", 1)])
            .products("kg", &["riecov42"], &[fake("new", 2)])
            .build();
        assert_eq!(table.resolve("kg", "riecov42"), [fake("new", 2)]);
    }

    #[test]
    fn should_report_duplicate_datapoint_in_one_list() {
        let table = MappingTable::builder()
            .product("sfkzq", "hfgdqhho", vec![fake("battery", 11), fake("time_left", 11)])
            .build();
        assert_eq!(
            table.problems(EntityKind::Sensor),
            [CatalogError::DuplicateDatapoint {
                kind: EntityKind::Sensor,
                category: "sfkzq",
                scope: MappingScope::Product("hfgdqhho"),
                dp_id: DatapointId::new(11),
            }]
        );
    }

    #[test]
    fn should_allow_same_datapoint_across_lists() {
        assert!(table().problems(EntityKind::Button).is_empty());
    }

    #[test]
    fn should_report_missing_options() {
        let table = MappingTable::builder()
            .category_default("dd", vec![fake("", 3)])
            .build();
        assert!(matches!(
            table.problems(EntityKind::Select).as_slice(),
            [CatalogError::MissingOptions {
                scope: MappingScope::Default,
                ..
            }]
        ));
    }
}
