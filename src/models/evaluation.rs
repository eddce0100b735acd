use super::{MeasuredValue, ParameterRating, SuitabilityClass};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parameter tied to the worst rating of an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitingFactorDetail {
    pub parameter: String,
    pub actual_value: Option<MeasuredValue>,
    pub rating: f64,
    pub classification: SuitabilityClass,
    pub subclass: char,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub crop_name: String,
    /// Land suitability index, 0-100.
    pub lsi: f64,
    pub lsc: SuitabilityClass,
    /// `lsc` followed by the limiting subclass codes, e.g. `S2f`.
    pub full_classification: String,
    pub limiting_factors: String,
    pub parameter_ratings: BTreeMap<String, ParameterRating>,
    pub season: Option<String>,
    pub scientific_name: Option<String>,
    pub limiting_factors_detailed: Vec<LimitingFactorDetail>,
    pub recommendations: Vec<String>,
    pub interpretation: String,
    pub notes: Option<String>,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationResult {
    /// Result of an evaluation in which no input parameter could be rated.
    pub fn degenerate(crop_name: impl Into<String>, season: Option<String>) -> Self {
        Self {
            crop_name: crop_name.into(),
            lsi: 0.0,
            lsc: SuitabilityClass::N,
            full_classification: SuitabilityClass::N.as_str().to_string(),
            limiting_factors: String::new(),
            parameter_ratings: BTreeMap::new(),
            season,
            scientific_name: None,
            limiting_factors_detailed: Vec::new(),
            recommendations: Vec::new(),
            interpretation: String::new(),
            notes: None,
            evaluated_at: Utc::now(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.parameter_ratings.is_empty()
    }

    pub fn has_limiting_factors(&self) -> bool {
        !self.limiting_factors.is_empty()
    }
}

/// Per-crop outcome of a batch evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CropOutcome {
    Evaluated(EvaluationResult),
    Failed { crop_name: String, reason: String },
}

impl CropOutcome {
    pub fn crop_name(&self) -> &str {
        match self {
            CropOutcome::Evaluated(result) => &result.crop_name,
            CropOutcome::Failed { crop_name, .. } => crop_name,
        }
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        match self {
            CropOutcome::Evaluated(result) => Some(result),
            CropOutcome::Failed { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<EvaluationResult> {
        match self {
            CropOutcome::Evaluated(result) => Some(result),
            CropOutcome::Failed { .. } => None,
        }
    }
}

/// Summary of a crop in the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropInfo {
    pub name: String,
    pub scientific_name: Option<String>,
    pub seasonal: bool,
    pub seasons: Vec<String>,
    pub notes: Option<String>,
}
