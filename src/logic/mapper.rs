use crate::models::Category;

/// Flat input key → (category, rule-document parameter).
const PARAMETER_TABLE: &[(&str, Category, &str)] = &[
    ("temperature", Category::Climate, "mean_annual_temp_c"),
    ("rainfall", Category::Climate, "annual_precipitation_mm"),
    (
        "humidity",
        Category::Climate,
        "mean_relative_humidity_driest_month_pct",
    ),
    ("dry_season", Category::Climate, "dry_season_months"),
    ("slope", Category::Topography, "slope_pct"),
    ("drainage", Category::Wetness, "drainage"),
    ("flooding", Category::Wetness, "flooding"),
    ("texture", Category::PhysicalSoil, "texture"),
    ("soil_depth", Category::PhysicalSoil, "soil_depth_cm"),
    ("coarse_fragments", Category::PhysicalSoil, "coarse_fragments_pct"),
    ("caco3", Category::PhysicalSoil, "caco3_pct"),
    ("gypsum", Category::PhysicalSoil, "gypsum_pct"),
    ("ph", Category::SoilFertility, "ph_h2o"),
    ("organic_carbon", Category::SoilFertility, "organic_carbon_pct"),
    ("base_saturation", Category::SoilFertility, "base_saturation_pct"),
    (
        "sum_basic_cations",
        Category::SoilFertility,
        "sum_basic_cations_cmol_kg",
    ),
    ("cec", Category::SoilFertility, "apparent_cec_cmol_kg_clay"),
    ("ec", Category::SalinityAlkalinity, "ece_ds_m"),
    ("esp", Category::SalinityAlkalinity, "esp_pct"),
];

/// Where a recognized input key is looked up in a crop profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedParameter {
    pub category: Category,
    pub parameter: &'static str,
}

pub struct ParameterMapper;

impl ParameterMapper {
    /// `None` for keys the engine does not evaluate.
    pub fn map(key: &str) -> Option<MappedParameter> {
        PARAMETER_TABLE
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, category, parameter)| MappedParameter {
                category: *category,
                parameter: *parameter,
            })
    }

    pub fn is_recognized(key: &str) -> bool {
        Self::map(key).is_some()
    }

    pub fn keys() -> impl Iterator<Item = &'static str> {
        PARAMETER_TABLE.iter().map(|(k, _, _)| *k)
    }
}
