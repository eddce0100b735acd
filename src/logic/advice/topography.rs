use super::Advisor;
use crate::models::{Category, SoilData};

pub struct TopographyAdvisor;

impl Advisor for TopographyAdvisor {
    fn id(&self) -> &'static str {
        "topography"
    }

    fn category(&self) -> Category {
        Category::Topography
    }

    fn advise(&self, _soil: &SoilData) -> Vec<String> {
        vec![
            "• Slope is limiting. Implement soil conservation measures \
             such as terracing or contour farming."
                .to_string(),
        ]
    }
}
