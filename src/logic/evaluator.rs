use super::advice::AdviceEngine;
use super::calculations::{
    classify, identify_limiting_factors, land_suitability_index, limiting_parameters, LsiMethod,
};
use super::mapper::ParameterMapper;
use super::repository::RuleRepository;
use super::resolver::ParameterRatingResolver;
use crate::config::Config;
use crate::error::{Result, SoilWiseError};
use crate::models::{
    CropInfo, CropOutcome, CropRequirementProfile, EvaluationResult,
    LimitingFactorDetail, ParameterRating, SlopeLevel, SoilData, SuitabilityClass,
};
use chrono::Utc;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Evaluates measured site data against crop requirement profiles.
///
/// The repository is shared and read-only, so one evaluator can serve any
/// number of threads.
pub struct SuitabilityEvaluator {
    repository: Arc<RuleRepository>,
    method: LsiMethod,
    slope_level: SlopeLevel,
    parallel: bool,
    advice: AdviceEngine,
}

impl SuitabilityEvaluator {
    pub fn new(repository: Arc<RuleRepository>) -> Self {
        Self {
            repository,
            method: LsiMethod::default(),
            slope_level: SlopeLevel::default(),
            parallel: true,
            advice: AdviceEngine::new(),
        }
    }

    /// Loads the rule store named by `config` (or the override) and applies
    /// the configured calculation settings.
    pub fn from_config(config: &Config, rules_dir_override: Option<&PathBuf>) -> Result<Self> {
        let repository = RuleRepository::load(config.rules_dir(rules_dir_override))?;
        Ok(Self::new(Arc::new(repository))
            .with_method(config.lsi_method)
            .with_slope_level(config.slope_level)
            .with_parallel(config.parallel))
    }

    pub fn with_method(mut self, method: LsiMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_slope_level(mut self, level: SlopeLevel) -> Self {
        self.slope_level = level;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn repository(&self) -> &RuleRepository {
        &self.repository
    }

    pub fn method(&self) -> LsiMethod {
        self.method
    }

    /// Evaluates one crop.
    ///
    /// Fails when the crop is unknown, or when a seasonal crop is evaluated
    /// without one of its seasons. Keys the mapper does not recognize are
    /// skipped. When nothing could be rated the result is `N` with an LSI of
    /// zero.
    pub fn evaluate(
        &self,
        soil: &SoilData,
        crop: &str,
        season: Option<&str>,
    ) -> Result<EvaluationResult> {
        let profile = self.repository.profile(crop).ok_or_else(|| {
            tracing::error!(crop, "Crop not found in knowledge base");
            SoilWiseError::CropNotFound(crop.to_string())
        })?;

        validate_season(profile, season)?;

        tracing::info!(
            crop,
            season = season.unwrap_or("N/A"),
            parameters = soil.len(),
            "Starting suitability evaluation"
        );

        let parameter_ratings = self.rate_parameters(soil, crop, season);
        let season = season.map(str::to_string);

        let mut result = if parameter_ratings.is_empty() {
            tracing::warn!(crop, "No input parameter could be rated");
            EvaluationResult::degenerate(crop, season)
        } else {
            let ratings: Vec<f64> = parameter_ratings.values().map(|r| r.rating).collect();
            let lsi = land_suitability_index(&ratings, self.method);
            let lsc = classify(lsi);
            let limiting_factors = identify_limiting_factors(&parameter_ratings);

            EvaluationResult {
                crop_name: crop.to_string(),
                lsi,
                lsc,
                full_classification: format!("{}{}", lsc.as_str(), limiting_factors),
                limiting_factors,
                parameter_ratings,
                season,
                scientific_name: None,
                limiting_factors_detailed: Vec::new(),
                recommendations: Vec::new(),
                interpretation: String::new(),
                notes: None,
                evaluated_at: Utc::now(),
            }
        };

        self.enrich(&mut result, profile, soil);

        tracing::info!(
            crop,
            lsi = result.lsi,
            classification = %result.full_classification,
            rated = result.parameter_ratings.len(),
            "Evaluation complete"
        );
        Ok(result)
    }

    fn rate_parameters(
        &self,
        soil: &SoilData,
        crop: &str,
        season: Option<&str>,
    ) -> BTreeMap<String, ParameterRating> {
        let resolver =
            ParameterRatingResolver::new(&self.repository).with_slope_level(self.slope_level);

        soil.iter()
            .filter_map(|(key, value)| {
                let Some(mapped) = ParameterMapper::map(key) else {
                    tracing::debug!(key = %key, "Skipping unrecognized parameter");
                    return None;
                };
                let rating =
                    resolver.rate(crop, mapped.category, mapped.parameter, value, season);
                tracing::debug!(
                    key = %key,
                    %value,
                    rating = rating.rating,
                    class = rating.class.as_str(),
                    subclass = %rating.subclass,
                    "Rated parameter"
                );
                Some((key.clone(), rating))
            })
            .collect()
    }

    fn enrich(&self, result: &mut EvaluationResult, profile: &CropRequirementProfile, soil: &SoilData) {
        result.scientific_name = profile.scientific_name.clone();
        result.notes = profile.notes.clone();
        result.limiting_factors_detailed = limiting_details(&result.parameter_ratings, soil);
        result.recommendations = self
            .advice
            .recommend(result.lsc, &result.limiting_factors, soil);
        result.interpretation = interpretation(result.lsc, result.lsi);
    }

    /// One outcome per requested crop, in request order. `None` evaluates
    /// every crop in the repository.
    pub fn evaluate_batch(
        &self,
        soil: &SoilData,
        crops: Option<&[String]>,
        season: Option<&str>,
    ) -> Vec<CropOutcome> {
        let crops: Vec<String> = match crops {
            Some(crops) => crops.to_vec(),
            None => self.available_crops(),
        };

        tracing::info!(count = crops.len(), parallel = self.parallel, "Evaluating multiple crops");

        let evaluate_one = |crop: &String| match self.evaluate(soil, crop, season) {
            Ok(result) => CropOutcome::Evaluated(result),
            Err(e) => {
                tracing::error!(crop = %crop, "Failed to evaluate crop: {}", e);
                CropOutcome::Failed {
                    crop_name: crop.clone(),
                    reason: e.to_string(),
                }
            }
        };

        if self.parallel {
            crops.par_iter().map(evaluate_one).collect()
        } else {
            crops.iter().map(evaluate_one).collect()
        }
    }

    /// Successful evaluations sorted by LSI descending, then crop name.
    /// Crops that fail are logged and left out.
    pub fn evaluate_many(
        &self,
        soil: &SoilData,
        crops: Option<&[String]>,
        season: Option<&str>,
    ) -> Vec<EvaluationResult> {
        let outcomes = self.evaluate_batch(soil, crops, season);
        let requested = outcomes.len();

        let mut results: Vec<EvaluationResult> =
            outcomes.into_iter().filter_map(CropOutcome::into_result).collect();
        sort_by_suitability(&mut results);

        tracing::info!(
            evaluated = results.len(),
            failed = requested - results.len(),
            "Multiple crop evaluation complete"
        );
        results
    }

    /// Crop names in ascending order.
    pub fn available_crops(&self) -> Vec<String> {
        self.repository.names().into_iter().map(str::to_string).collect()
    }

    pub fn crop_info(&self, name: &str) -> Option<CropInfo> {
        self.repository.profile(name).map(|p| CropInfo {
            name: p.crop_name.clone(),
            scientific_name: p.scientific_name.clone(),
            seasonal: p.seasonal,
            seasons: p.season_codes(),
            notes: p.notes.clone(),
        })
    }
}

fn validate_season(profile: &CropRequirementProfile, season: Option<&str>) -> Result<()> {
    if !profile.seasonal {
        return Ok(());
    }

    match season {
        None => Err(SoilWiseError::SeasonRequired {
            crop: profile.crop_name.clone(),
            seasons: profile.season_codes(),
        }),
        Some(code) if !profile.has_season(code) => Err(SoilWiseError::UnknownSeason {
            crop: profile.crop_name.clone(),
            season: code.to_string(),
            seasons: profile.season_codes(),
        }),
        Some(_) => Ok(()),
    }
}

/// Sorts by LSI descending; equal indices fall back to crop name ascending.
pub fn sort_by_suitability(results: &mut [EvaluationResult]) {
    results.sort_by(|a, b| {
        b.lsi
            .total_cmp(&a.lsi)
            .then_with(|| a.crop_name.cmp(&b.crop_name))
    });
}

/// Details of the limiting parameters. Empty when every rating is perfect,
/// even though the subclass codes still name those categories.
fn limiting_details(
    ratings: &BTreeMap<String, ParameterRating>,
    soil: &SoilData,
) -> Vec<LimitingFactorDetail> {
    let min_rating = ratings.values().map(|r| r.rating).reduce(f64::min);
    if min_rating.map_or(true, |min| min >= 1.0) {
        return Vec::new();
    }

    limiting_parameters(ratings)
        .into_iter()
        .filter_map(|key| {
            let rating = ratings.get(key)?;
            Some(LimitingFactorDetail {
                parameter: key.to_string(),
                actual_value: soil.get(key).cloned(),
                rating: rating.rating,
                classification: rating.class,
                subclass: rating.subclass,
                description: parameter_description(key),
                category: rating
                    .category()
                    .map(|c| c.as_str().to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
            })
        })
        .collect()
}

/// Display name for an input key.
pub fn parameter_description(key: &str) -> String {
    let known = match key {
        "temperature" => "Mean Annual Temperature",
        "rainfall" => "Annual Precipitation",
        "humidity" => "Relative Humidity",
        "dry_season" => "Dry Season Length",
        "ph" => "Soil pH",
        "organic_carbon" => "Organic Carbon Content",
        "organic_matter" => "Organic Matter Content",
        "base_saturation" => "Base Saturation",
        "sum_basic_cations" => "Sum of Basic Cations",
        "cec" => "Cation Exchange Capacity",
        "texture" => "Soil Texture",
        "soil_depth" => "Soil Depth",
        "coarse_fragments" => "Coarse Fragments",
        "caco3" => "Calcium Carbonate Content",
        "gypsum" => "Gypsum Content",
        "drainage" => "Drainage Condition",
        "flooding" => "Flooding Risk",
        "slope" => "Slope Percentage",
        "ec" => "Electrical Conductivity",
        "esp" => "Exchangeable Sodium Percentage",
        _ => return title_case(key),
    };
    known.to_string()
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Interpretation text for a class, with the index to two decimals.
pub fn interpretation(lsc: SuitabilityClass, lsi: f64) -> String {
    let detail = match lsc {
        SuitabilityClass::S1 => {
            "Land has no significant limitations for sustained application of the given use. \
             Expected yields are high with minimal inputs."
        }
        SuitabilityClass::S2 => {
            "Land has limitations that reduce productivity or require increased inputs. \
             Expected yields are moderate with proper management."
        }
        SuitabilityClass::S3 => {
            "Land has severe limitations that reduce productivity or require intensive \
             management. Expected yields are low even with inputs."
        }
        SuitabilityClass::N => {
            "Land has limitations so severe that they preclude successful sustained use. \
             Cultivation is not recommended."
        }
    };
    format!("{} (LSI: {:.2}). {}", lsc.description(), lsi, detail)
}
