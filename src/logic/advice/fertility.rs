use super::Advisor;
use crate::models::{numeric, Category, SoilData};

/// Liming, acidification and organic matter advice.
///
/// pH below 5.5 is treated as strongly acidic and above 7.5 as alkaline.
/// Organic carbon below 1.5% (or organic matter below 2.0% when organic
/// carbon was not measured low) calls for organic amendments.
pub struct FertilityAdvisor;

const ACIDIC_PH: f64 = 5.5;
const ALKALINE_PH: f64 = 7.5;
const LOW_ORGANIC_CARBON_PCT: f64 = 1.5;
const LOW_ORGANIC_MATTER_PCT: f64 = 2.0;

impl Advisor for FertilityAdvisor {
    fn id(&self) -> &'static str {
        "fertility"
    }

    fn category(&self) -> Category {
        Category::SoilFertility
    }

    fn advise(&self, soil: &SoilData) -> Vec<String> {
        let mut advice = Vec::new();

        if let Some(ph) = numeric(soil, "ph") {
            if ph < ACIDIC_PH {
                advice.push(format!(
                    "• Soil is strongly acidic (pH {:.2}). Apply lime to raise pH to 6.0-6.5.",
                    ph
                ));
            } else if ph > ALKALINE_PH {
                advice.push(format!(
                    "• Soil is alkaline (pH {:.2}). Consider sulfur application to lower pH.",
                    ph
                ));
            }
        }

        match numeric(soil, "organic_carbon") {
            Some(oc) if oc < LOW_ORGANIC_CARBON_PCT => advice.push(format!(
                "• Organic carbon is low ({:.2}%). Incorporate compost, manure, or \
                 green manure to improve soil health.",
                oc
            )),
            _ => {
                if let Some(om) = numeric(soil, "organic_matter").filter(|om| *om < LOW_ORGANIC_MATTER_PCT) {
                    advice.push(format!(
                        "• Organic matter is low ({:.2}%). Incorporate compost, manure, or \
                         green manure to improve soil health.",
                        om
                    ));
                }
            }
        }

        advice
    }
}
