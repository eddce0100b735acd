use super::{
    climate::ClimateAdvisor, fertility::FertilityAdvisor, physical_soil::PhysicalSoilAdvisor,
    salinity::SalinityAdvisor, topography::TopographyAdvisor, wetness::WetnessAdvisor, Advisor,
};
use crate::models::{SoilData, SuitabilityClass};

pub struct AdviceEngine {
    advisors: Vec<Box<dyn Advisor>>,
}

impl AdviceEngine {
    pub fn new() -> Self {
        let advisors: Vec<Box<dyn Advisor>> = vec![
            Box::new(FertilityAdvisor),
            Box::new(ClimateAdvisor),
            Box::new(WetnessAdvisor),
            Box::new(PhysicalSoilAdvisor),
            Box::new(TopographyAdvisor),
            Box::new(SalinityAdvisor),
        ];

        Self { advisors }
    }

    /// Recommendations for an evaluation: a general statement for the class
    /// followed by advice from every advisor whose subclass code appears in
    /// `limiting_factors`.
    pub fn recommend(
        &self,
        lsc: SuitabilityClass,
        limiting_factors: &str,
        soil: &SoilData,
    ) -> Vec<String> {
        if lsc == SuitabilityClass::S1 && limiting_factors.is_empty() {
            return vec![
                "✓ This crop is highly suitable for the given soil conditions with no \
                 limiting factors. Standard cultivation practices are recommended for \
                 optimal yields."
                    .to_string(),
            ];
        }

        let mut recommendations = vec![general_statement(lsc).to_string()];
        recommendations.extend(
            self.advisors
                .iter()
                .filter(|a| limiting_factors.contains(a.category().subclass_code()))
                .flat_map(|a| a.advise(soil)),
        );

        tracing::debug!(
            lsc = lsc.as_str(),
            limiting_factors,
            count = recommendations.len(),
            "Generated recommendations"
        );
        recommendations
    }

    pub fn advise_for(&self, advisor_id: &str, soil: &SoilData) -> Option<Vec<String>> {
        self.advisors
            .iter()
            .find(|a| a.id() == advisor_id)
            .map(|advisor| advisor.advise(soil))
    }

    pub fn list_advisors(&self) -> Vec<(&'static str, char)> {
        self.advisors
            .iter()
            .map(|a| (a.id(), a.category().subclass_code()))
            .collect()
    }
}

impl Default for AdviceEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn general_statement(lsc: SuitabilityClass) -> &'static str {
    match lsc {
        SuitabilityClass::S1 => {
            "✓ This crop is highly suitable for the given soil conditions. \
             Standard cultivation practices are recommended."
        }
        SuitabilityClass::S2 => {
            "⚠ This crop is moderately suitable. Some management interventions \
             are needed to address limiting factors."
        }
        SuitabilityClass::S3 => {
            "⚠ This crop is marginally suitable. Significant management \
             interventions are required. Consider alternative crops."
        }
        SuitabilityClass::N => {
            "✗ This crop is not suitable for the given conditions. \
             Strongly recommend selecting alternative crops."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasuredValue;

    fn soil() -> SoilData {
        [
            ("ph".to_string(), MeasuredValue::from(4.5)),
            ("organic_carbon".to_string(), MeasuredValue::from(0.9)),
            ("drainage".to_string(), MeasuredValue::from("poor")),
            ("slope".to_string(), MeasuredValue::from(12.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn perfect_site_gets_single_positive_statement() {
        let recs = AdviceEngine::new().recommend(SuitabilityClass::S1, "", &soil());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("no limiting factors"));
    }

    #[test]
    fn general_statement_comes_first() {
        let engine = AdviceEngine::new();
        let recs = engine.recommend(SuitabilityClass::S2, "t", &soil());
        assert!(recs[0].contains("moderately suitable"));
        assert_eq!(recs.len(), 2);
        assert!(recs[1].contains("Slope is limiting"));

        let recs = engine.recommend(SuitabilityClass::N, "", &soil());
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("not suitable"));
    }

    #[test]
    fn advice_follows_fixed_category_order() {
        // codes are sorted alphabetically but fertility advice leads
        let recs = AdviceEngine::new().recommend(SuitabilityClass::S3, "fw", &soil());
        assert_eq!(recs.len(), 4);
        assert!(recs[0].contains("marginally suitable"));
        assert!(recs[1].contains("lime"));
        assert!(recs[2].contains("Organic carbon"));
        assert!(recs[3].contains("Poor drainage"));
    }

    #[test]
    fn s1_with_limiting_factors_still_gets_advice() {
        let recs = AdviceEngine::new().recommend(SuitabilityClass::S1, "c", &soil());
        assert_eq!(recs.len(), 2);
        assert!(recs[1].contains("Climate conditions"));
    }

    #[test]
    fn advise_for_single_advisor() {
        let engine = AdviceEngine::new();
        let recs = engine.advise_for("salinity", &soil()).unwrap();
        assert_eq!(recs.len(), 1);
        assert!(engine.advise_for("irrigation", &soil()).is_none());
    }

    #[test]
    fn lists_all_advisors() {
        let advisors = AdviceEngine::default().list_advisors();
        let codes: String = advisors.iter().map(|(_, code)| *code).collect();
        assert_eq!(codes, "fcwstn");
    }
}
