use serde::{Deserialize, Serialize};

/// Requirement categories of a crop profile, in FAO subclass order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Climate,
    Topography,
    Wetness,
    PhysicalSoil,
    SoilFertility,
    SalinityAlkalinity,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Climate,
        Category::Topography,
        Category::Wetness,
        Category::PhysicalSoil,
        Category::SoilFertility,
        Category::SalinityAlkalinity,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Climate => "climate",
            Category::Topography => "topography",
            Category::Wetness => "wetness",
            Category::PhysicalSoil => "physical_soil",
            Category::SoilFertility => "soil_fertility",
            Category::SalinityAlkalinity => "salinity_alkalinity",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Climate => "Climate",
            Category::Topography => "Topography",
            Category::Wetness => "Wetness",
            Category::PhysicalSoil => "Physical Soil",
            Category::SoilFertility => "Soil Fertility",
            Category::SalinityAlkalinity => "Salinity/Alkalinity",
        }
    }

    /// Single-letter limiting factor code.
    pub fn subclass_code(&self) -> char {
        match self {
            Category::Climate => 'c',
            Category::Topography => 't',
            Category::Wetness => 'w',
            Category::PhysicalSoil => 's',
            Category::SoilFertility => 'f',
            Category::SalinityAlkalinity => 'n',
        }
    }

    pub fn from_subclass_code(code: char) -> Option<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.subclass_code() == code)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Land suitability class (FAO 1976).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SuitabilityClass {
    S1,
    S2,
    S3,
    N,
}

impl SuitabilityClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuitabilityClass::S1 => "S1",
            SuitabilityClass::S2 => "S2",
            SuitabilityClass::S3 => "S3",
            SuitabilityClass::N => "N",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SuitabilityClass::S1 => "Highly Suitable",
            SuitabilityClass::S2 => "Moderately Suitable",
            SuitabilityClass::S3 => "Marginally Suitable",
            SuitabilityClass::N => "Not Suitable",
        }
    }

    /// Normalizes a classification key from a rule document.
    /// Split keys like `S2_low` or `S3_minus` collapse to their class.
    pub fn from_key(key: &str) -> Option<Self> {
        if key.starts_with("S1") {
            Some(SuitabilityClass::S1)
        } else if key.starts_with("S2") {
            Some(SuitabilityClass::S2)
        } else if key.starts_with("S3") {
            Some(SuitabilityClass::S3)
        } else if key.starts_with('N') {
            Some(SuitabilityClass::N)
        } else {
            None
        }
    }

    /// Tier for a land suitability index. Lower bounds are inclusive.
    pub fn from_lsi(lsi: f64) -> Self {
        if lsi >= 75.0 {
            SuitabilityClass::S1
        } else if lsi >= 50.0 {
            SuitabilityClass::S2
        } else if lsi >= 25.0 {
            SuitabilityClass::S3
        } else {
            SuitabilityClass::N
        }
    }
}

impl std::fmt::Display for SuitabilityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rating of one measured parameter against a crop requirement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRating {
    pub rating: f64,
    pub class: SuitabilityClass,
    pub subclass: char,
}

impl ParameterRating {
    /// Rating used when nothing in the rule store applies to a value.
    pub const FALLBACK_RATING: f64 = 0.25;

    pub fn new(rating: f64, class: SuitabilityClass, category: Category) -> Self {
        Self {
            rating,
            class,
            subclass: category.subclass_code(),
        }
    }

    pub fn not_suitable(category: Category) -> Self {
        Self::new(Self::FALLBACK_RATING, SuitabilityClass::N, category)
    }

    pub fn category(&self) -> Option<Category> {
        Category::from_subclass_code(self.subclass)
    }
}
