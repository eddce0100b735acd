use super::Advisor;
use crate::models::{Category, SoilData};

pub struct SalinityAdvisor;

impl Advisor for SalinityAdvisor {
    fn id(&self) -> &'static str {
        "salinity"
    }

    fn category(&self) -> Category {
        Category::SalinityAlkalinity
    }

    fn advise(&self, _soil: &SoilData) -> Vec<String> {
        vec![
            "• Salinity/alkalinity is limiting. Consider leaching, \
             gypsum application, or salt-tolerant varieties."
                .to_string(),
        ]
    }
}
