use super::{Category, MeasuredValue, SuitabilityClass};
use crate::error::{Result, SoilWiseError};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parameter name → requirement, for one category of a crop.
pub type CategoryRequirements = BTreeMap<String, ParameterRequirement>;

/// Matching rule of a classification entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Inclusive bounds; `None` is unbounded on that side.
    Range { min: Option<f64>, max: Option<f64> },
    /// Accepted categorical values, e.g. texture classes.
    Values(Vec<String>),
}

impl Criterion {
    pub fn matches(&self, value: &MeasuredValue) -> bool {
        match self {
            Criterion::Range { min, max } => match value.as_f64() {
                Some(v) => {
                    min.map_or(true, |lo| lo <= v) && max.map_or(true, |hi| v <= hi)
                }
                None => false,
            },
            Criterion::Values(accepted) => {
                let value = value.to_string();
                accepted.iter().any(|a| *a == value)
            }
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Range { min, max } => {
                let lo = min.map_or("-inf".to_string(), |v| v.to_string());
                let hi = max.map_or("+inf".to_string(), |v| v.to_string());
                write!(f, "[{}, {}]", lo, hi)
            }
            Criterion::Values(values) => write!(f, "{{{}}}", values.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationEntry {
    /// Key as written in the rule document (`S2_low`, `N`, ...).
    pub key: String,
    pub class: SuitabilityClass,
    pub criterion: Criterion,
    pub rating: f64,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    range: Option<Vec<Option<f64>>>,
    #[serde(default)]
    values: Option<Vec<String>>,
    rating: f64,
}

impl ClassificationEntry {
    fn from_raw(key: String, raw: RawEntry) -> std::result::Result<Self, String> {
        let class = SuitabilityClass::from_key(&key)
            .ok_or_else(|| format!("unknown classification key '{}'", key))?;

        if !(raw.rating > 0.0 && raw.rating <= 1.0) {
            return Err(format!(
                "{}: rating {} is outside (0, 1]",
                key, raw.rating
            ));
        }

        let criterion = match (raw.range, raw.values) {
            (Some(range), None) => {
                if range.len() != 2 {
                    return Err(format!(
                        "{}: range must have exactly two bounds, got {}",
                        key,
                        range.len()
                    ));
                }
                let (min, max) = (range[0], range[1]);
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(format!("{}: range lower bound {} exceeds upper bound {}", key, lo, hi));
                    }
                }
                Criterion::Range { min, max }
            }
            (None, Some(values)) => Criterion::Values(values),
            _ => {
                return Err(format!(
                    "{}: entry must define exactly one of 'range' or 'values'",
                    key
                ))
            }
        };

        Ok(Self {
            key,
            class,
            criterion,
            rating: raw.rating,
        })
    }
}

/// Ordered classification entries for one parameter. The first matching
/// entry decides the rating, so document order is significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationSpec {
    entries: Vec<ClassificationEntry>,
}

impl ClassificationSpec {
    pub fn new(entries: Vec<ClassificationEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ClassificationEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first_match(&self, value: &MeasuredValue) -> Option<&ClassificationEntry> {
        self.entries.iter().find(|e| e.criterion.matches(value))
    }
}

struct SpecVisitor;

impl<'de> Visitor<'de> for SpecVisitor {
    type Value = ClassificationSpec;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of classification keys to range/values entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut entries = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            let raw: RawEntry = map.next_value()?;
            entries.push(ClassificationEntry::from_raw(key, raw).map_err(de::Error::custom)?);
        }
        if entries.is_empty() {
            return Err(de::Error::custom("classification spec has no entries"));
        }
        Ok(ClassificationSpec::new(entries))
    }
}

impl<'de> Deserialize<'de> for ClassificationSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(SpecVisitor)
    }
}

/// Which nested slope classification to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlopeLevel {
    #[default]
    Level1,
    Level2,
    Level3,
}

/// Three nested slope classifications; level1 is the most granular.
#[derive(Debug, Clone, PartialEq)]
pub struct SlopeLevels {
    pub level1: ClassificationSpec,
    pub level2: Option<ClassificationSpec>,
    pub level3: Option<ClassificationSpec>,
}

impl SlopeLevels {
    /// Falls back to level1 when the requested level is not defined.
    pub fn get(&self, level: SlopeLevel) -> &ClassificationSpec {
        match level {
            SlopeLevel::Level1 => &self.level1,
            SlopeLevel::Level2 => self.level2.as_ref().unwrap_or(&self.level1),
            SlopeLevel::Level3 => self.level3.as_ref().unwrap_or(&self.level1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterRequirement {
    Classes(ClassificationSpec),
    Leveled(SlopeLevels),
}

impl ParameterRequirement {
    pub fn spec(&self, level: SlopeLevel) -> &ClassificationSpec {
        match self {
            ParameterRequirement::Classes(spec) => spec,
            ParameterRequirement::Leveled(levels) => levels.get(level),
        }
    }
}

struct RequirementVisitor;

impl<'de> Visitor<'de> for RequirementVisitor {
    type Value = ParameterRequirement;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a classification spec or a map of level1/level2/level3 specs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut entries = Vec::new();
        let mut level1 = None;
        let mut level2 = None;
        let mut level3 = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "level1" => level1 = Some(map.next_value::<ClassificationSpec>()?),
                "level2" => level2 = Some(map.next_value::<ClassificationSpec>()?),
                "level3" => level3 = Some(map.next_value::<ClassificationSpec>()?),
                other if other.starts_with("level") => {
                    return Err(de::Error::custom(format!("unknown slope level '{}'", other)));
                }
                _ => {
                    let raw: RawEntry = map.next_value()?;
                    entries.push(ClassificationEntry::from_raw(key, raw).map_err(de::Error::custom)?);
                }
            }
        }

        let has_levels = level1.is_some() || level2.is_some() || level3.is_some();
        match (entries.is_empty(), has_levels) {
            (false, false) => Ok(ParameterRequirement::Classes(ClassificationSpec::new(entries))),
            (true, true) => {
                let level1 = level1.ok_or_else(|| de::Error::custom("slope levels require 'level1'"))?;
                Ok(ParameterRequirement::Leveled(SlopeLevels {
                    level1,
                    level2,
                    level3,
                }))
            }
            (false, true) => Err(de::Error::custom(
                "requirement mixes classification entries with slope levels",
            )),
            (true, false) => Err(de::Error::custom("requirement has no classification entries")),
        }
    }
}

impl<'de> Deserialize<'de> for ParameterRequirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(RequirementVisitor)
    }
}

/// A growing season of a seasonal crop. Each season carries its own climate
/// requirements; all other categories are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Season {
    pub code: String,
    pub climate: Option<CategoryRequirements>,
}

#[derive(Deserialize)]
struct RawSeason {
    #[serde(default, alias = "climate_requirements")]
    climate: Option<CategoryRequirements>,
}

/// Accepts either a list of season codes or an ordered map of season code to
/// season-specific requirements.
struct SeasonList(Vec<Season>);

struct SeasonListVisitor;

impl<'de> Visitor<'de> for SeasonListVisitor {
    type Value = SeasonList;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a list of season codes or a map of seasons")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let mut seasons = Vec::new();
        while let Some(code) = seq.next_element::<String>()? {
            seasons.push(Season { code, climate: None });
        }
        Ok(SeasonList(seasons))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut seasons = Vec::new();
        while let Some(code) = map.next_key::<String>()? {
            let raw: RawSeason = map.next_value()?;
            seasons.push(Season {
                code,
                climate: raw.climate,
            });
        }
        Ok(SeasonList(seasons))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(SeasonList(Vec::new()))
    }
}

impl<'de> Deserialize<'de> for SeasonList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(SeasonListVisitor)
    }
}

#[derive(Deserialize)]
struct RawProfile {
    #[serde(default)]
    crop_name: Option<String>,
    #[serde(default)]
    scientific_name: Option<String>,
    #[serde(default)]
    seasonal: bool,
    #[serde(default)]
    seasons: Option<SeasonList>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default, alias = "climate_requirements")]
    climate: CategoryRequirements,
    #[serde(default, alias = "topography_requirements")]
    topography: CategoryRequirements,
    #[serde(default, alias = "wetness_requirements")]
    wetness: CategoryRequirements,
    #[serde(default, alias = "physical_soil_requirements")]
    physical_soil: CategoryRequirements,
    #[serde(default, alias = "soil_fertility_requirements")]
    soil_fertility: CategoryRequirements,
    #[serde(default, alias = "salinity_alkalinity_requirements")]
    salinity_alkalinity: CategoryRequirements,
}

/// Requirements of one crop, loaded from a single rule document.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRequirementProfile {
    pub crop_name: String,
    pub scientific_name: Option<String>,
    pub seasonal: bool,
    pub seasons: Vec<Season>,
    pub requirements: BTreeMap<Category, CategoryRequirements>,
    pub notes: Option<String>,
}

impl CropRequirementProfile {
    /// Parses and validates a JSON rule document. `document` names the
    /// source in error messages.
    pub fn from_json(document: &str, json: &str) -> Result<Self> {
        let invalid = |reason: String| SoilWiseError::InvalidRule {
            document: document.to_string(),
            reason,
        };

        let raw: RawProfile = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;

        let crop_name = raw
            .crop_name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| invalid("missing required field 'crop_name'".into()))?;

        let seasons = raw.seasons.map(|s| s.0).unwrap_or_default();
        if raw.seasonal && seasons.is_empty() {
            return Err(invalid(format!(
                "{} is marked seasonal but declares no seasons",
                crop_name
            )));
        }

        let requirements = [
            (Category::Climate, raw.climate),
            (Category::Topography, raw.topography),
            (Category::Wetness, raw.wetness),
            (Category::PhysicalSoil, raw.physical_soil),
            (Category::SoilFertility, raw.soil_fertility),
            (Category::SalinityAlkalinity, raw.salinity_alkalinity),
        ]
        .into_iter()
        .filter(|(_, reqs)| !reqs.is_empty())
        .collect();

        Ok(Self {
            crop_name,
            scientific_name: raw.scientific_name,
            seasonal: raw.seasonal,
            seasons,
            requirements,
            notes: raw.notes.filter(|n| !n.is_empty()),
        })
    }

    pub fn season_codes(&self) -> Vec<String> {
        self.seasons.iter().map(|s| s.code.clone()).collect()
    }

    pub fn has_season(&self, code: &str) -> bool {
        self.seasons.iter().any(|s| s.code == code)
    }

    pub fn category(&self, category: Category) -> Option<&CategoryRequirements> {
        self.requirements.get(&category)
    }

    /// Requirement for `(category, parameter)`. Climate requirements of a
    /// seasonal crop come from the selected season only; a parameter the
    /// season does not declare has no requirement.
    pub fn requirement(
        &self,
        category: Category,
        parameter: &str,
        season: Option<&str>,
    ) -> Option<&ParameterRequirement> {
        if self.seasonal && category == Category::Climate {
            return season
                .and_then(|code| self.seasons.iter().find(|s| s.code == code))
                .and_then(|s| s.climate.as_ref())
                .and_then(|climate| climate.get(parameter));
        }
        self.category(category)?.get(parameter)
    }
}
