use super::Advisor;
use crate::models::{text, Category, SoilData};

/// Drainage and flooding advice.
pub struct WetnessAdvisor;

impl Advisor for WetnessAdvisor {
    fn id(&self) -> &'static str {
        "wetness"
    }

    fn category(&self) -> Category {
        Category::Wetness
    }

    fn advise(&self, soil: &SoilData) -> Vec<String> {
        let mut advice = Vec::new();

        if matches!(text(soil, "drainage"), Some("poor" | "poor_not_drainable")) {
            advice.push(
                "• Poor drainage detected. Install drainage systems or \
                 raise beds to improve water management."
                    .to_string(),
            );
        }

        // Fo = no flooding
        if text(soil, "flooding").is_some_and(|f| !f.is_empty() && f != "Fo") {
            advice.push(
                "• Flooding risk present. Implement flood protection measures \
                 or select flood-tolerant varieties."
                    .to_string(),
            );
        }

        advice
    }
}
