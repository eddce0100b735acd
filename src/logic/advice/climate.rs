use super::Advisor;
use crate::models::{Category, SoilData};

pub struct ClimateAdvisor;

impl Advisor for ClimateAdvisor {
    fn id(&self) -> &'static str {
        "climate"
    }

    fn category(&self) -> Category {
        Category::Climate
    }

    fn advise(&self, _soil: &SoilData) -> Vec<String> {
        vec![
            "• Climate conditions are limiting. Consider protected cultivation \
             or select more climate-adapted varieties."
                .to_string(),
        ]
    }
}
