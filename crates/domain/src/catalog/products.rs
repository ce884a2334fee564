//! Product database.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::product::{FingerbotInfo, ProductInfo, WaterValveInfo};

/// Products of one category plus an optional category-wide entry.
#[derive(Debug, Clone, Default)]
struct CategoryInfo {
    products: BTreeMap<&'static str, ProductInfo>,
    info: Option<ProductInfo>,
}

/// Catalog of known products keyed by category then product id.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    categories: BTreeMap<&'static str, CategoryInfo>,
}

impl ProductCatalog {
    /// Product entry, else the category-wide entry, else `None`.
    #[must_use]
    pub fn get(&self, category: &str, product_id: &str) -> Option<&ProductInfo> {
        let category = self.categories.get(category)?;
        category
            .products
            .get(product_id)
            .or(category.info.as_ref())
    }

    fn insert(mut self, category: &'static str, product_ids: &[&'static str], info: &ProductInfo) -> Self {
        let entry = self.categories.entry(category).or_default();
        for product_id in product_ids {
            entry.products.insert(*product_id, info.clone());
        }
        self
    }

    fn category_info(mut self, category: &'static str, info: ProductInfo) -> Self {
        self.categories.entry(category).or_default().info = Some(info);
        self
    }
}

const FINGERBOT_PLUS_SZJQR: &[&str] = &[
    "blliqpsj", "ndvkgsrm", "yiihr7zh", "neq16kgd", "6jcvqwh0", "riecov42", "h8kdwywx",
];
const FINGERBOT_SZJQR: &[&str] = &[
    "ltak7e1p", "y6kttvd6", "yrnk7mnn", "nvr2rocq", "bnt7wajf", "rvdceqjh", "5xhbk964",
];

pub(super) static CATALOG: LazyLock<ProductCatalog> = LazyLock::new(|| {
    let cubetouch = FingerbotInfo::new(1, 2, 5, 6, 3, 4);

    ProductCatalog::default()
        .insert("co2bj", &["59s19z5m"], &ProductInfo::new("CO2 Detector"))
        .insert(
            "ms",
            &["ludzroix", "isk2p555", "gumrixyt", "uamrw6h3"],
            &ProductInfo::new("Smart Lock"),
        )
        .insert(
            "ms",
            &["okkyfgfs"],
            &ProductInfo::new("TEKXDD Fingerprint Smart Lock").lock(),
        )
        .insert(
            "ms",
            &["k53ok3u9"],
            &ProductInfo::new("Fingerprint Smart Lock").lock(),
        )
        .insert("dcb", &["z5ztlw3k"], &ProductInfo::new("PARKSIDE Smart battery 4Ah"))
        .insert("dcb", &["ajrhf1aj"], &ProductInfo::new("PARKSIDE Smart battery 8Ah"))
        .insert("jtmspro", &["hc7n0urm"], &ProductInfo::new("A1 Ultra-JM"))
        .insert("jtmspro", &["ebd5e0uauqx0vfsp"], &ProductInfo::new("CentralAcesso"))
        .insert(
            "szjqr",
            &["3yqdo5yt"],
            &ProductInfo::new("CUBETOUCH 1s").fingerbot(cubetouch),
        )
        .insert(
            "szjqr",
            &["xhf790if"],
            &ProductInfo::new("CubeTouch II").fingerbot(cubetouch),
        )
        .insert(
            "szjqr",
            FINGERBOT_PLUS_SZJQR,
            &ProductInfo::new("Fingerbot Plus").fingerbot(
                FingerbotInfo::new(2, 8, 15, 9, 10, 11)
                    .manual_control(17)
                    .program(121),
            ),
        )
        .insert(
            "szjqr",
            FINGERBOT_SZJQR,
            &ProductInfo::new("Fingerbot")
                .fingerbot(FingerbotInfo::new(2, 8, 15, 9, 10, 11).program(121)),
        )
        .insert(
            "szjqr",
            &["yn4x5fa7"],
            &ProductInfo::new("Nedis SmartLife Finger Robot")
                .fingerbot(FingerbotInfo::new(1, 2, 4, 5, 3, 6)),
        )
        .insert(
            "kg",
            &["mknd4lci", "riecov42", "bs3ubslo"],
            &ProductInfo::new("Fingerbot Plus").fingerbot(
                FingerbotInfo::new(1, 101, 106, 102, 103, 104)
                    .manual_control(107)
                    .program(109),
            ),
        )
        .insert(
            "wk",
            &["drlajpqc", "nhj2j7su", "zmachryv"],
            &ProductInfo::new("Thermostatic Radiator Valve"),
        )
        .insert("wsdcg", &["ojzlzzsw"], &ProductInfo::new("Soil moisture sensor"))
        .insert(
            "wsdcg",
            &["iv7hudlj", "jm6iasmb"],
            &ProductInfo::new("Bluetooth Temperature Humidity Sensor"),
        )
        .insert("wsdcg", &["tv6peegl"], &ProductInfo::new("Soil Thermo-Hygrometer"))
        .insert("wsdcg", &["vlzqwckk"], &ProductInfo::new("Temperature Humidity Sensor"))
        .insert("znhsb", &["cdlandip"], &ProductInfo::new("Smart water bottle"))
        .insert(
            "sfkzq",
            &["6pahkcau", "hfgdqhho", "qycalacn", "fnlw6npo", "jjqi2syk"],
            &ProductInfo::new("Irrigation computer"),
        )
        .insert(
            "sfkzq",
            &["svhikeyq", "0axr5s0b"],
            &ProductInfo::new("Valve controller").water_valve(WaterValveInfo::new(1, 11, 10, 13, 15)),
        )
        .insert(
            "sfkzq",
            &["nxquc5lb", "46zia2nz", "1fcnd8xk"],
            &ProductInfo::new("Water valve controller")
                .water_valve(WaterValveInfo::new(1, 8, 10, 13, 9)),
        )
        .insert(
            "ggq",
            &["6pahkcau", "hfgdqhho"],
            &ProductInfo::new("Irrigation computer"),
        )
        .insert(
            "dd",
            &["nvfrtxlq"],
            &ProductInfo::new("LGB102 Magic Strip Lights").manufacturer("Magiacous"),
        )
        .insert(
            "dd",
            &["umzu0c2y"],
            &ProductInfo::new("Floor Lamp").manufacturer("Magiacous"),
        )
        .insert(
            "dd",
            &["6jxcdae1"],
            &ProductInfo::new("Sunset Lamp").manufacturer("Comfamoli"),
        )
        .category_info("dd", ProductInfo::new("Lights"))
        .insert(
            "cl",
            &["4pbr8eig", "vlwf3ud6"],
            &ProductInfo::new("Blind Controller"),
        )
        .insert("cl", &["kcy0x4pi"], &ProductInfo::new("Curtain Controller"))
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapoint::DatapointId;

    #[test]
    fn should_share_fingerbot_layout_across_product_ids() {
        for product_id in FINGERBOT_PLUS_SZJQR {
            let info = CATALOG.get("szjqr", product_id).unwrap();
            let fingerbot = info.fingerbot.unwrap();
            assert_eq!(fingerbot.manual_control, Some(DatapointId::new(17)));
            assert_eq!(fingerbot.mode, DatapointId::new(8));
        }
    }

    #[test]
    fn should_not_report_manual_control_for_plain_fingerbot() {
        let info = CATALOG.get("szjqr", "ltak7e1p").unwrap();
        assert!(info.manual_fingerbot().is_none());
    }

    #[test]
    fn should_carry_water_valve_layout() {
        let info = CATALOG.get("sfkzq", "nxquc5lb").unwrap();
        let valve = info.water_valve.unwrap();
        assert_eq!(valve.countdown, DatapointId::new(8));
        assert_eq!(valve.use_time, DatapointId::new(9));
    }

    #[test]
    fn should_keep_same_product_id_apart_across_categories() {
        assert_eq!(CATALOG.get("kg", "riecov42").unwrap().fingerbot.unwrap().mode, DatapointId::new(101));
        assert_eq!(CATALOG.get("szjqr", "riecov42").unwrap().fingerbot.unwrap().mode, DatapointId::new(8));
    }
}
