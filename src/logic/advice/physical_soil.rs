use super::Advisor;
use crate::models::{numeric, text, Category, SoilData};

/// Texture and rooting depth advice.
pub struct PhysicalSoilAdvisor;

const SANDY_TEXTURES: [&str; 3] = ["S", "LS", "fS"];
const HEAVY_CLAY_TEXTURES: [&str; 3] = ["C", "SiC", "Cm"];
const SHALLOW_DEPTH_CM: f64 = 50.0;

impl Advisor for PhysicalSoilAdvisor {
    fn id(&self) -> &'static str {
        "physical_soil"
    }

    fn category(&self) -> Category {
        Category::PhysicalSoil
    }

    fn advise(&self, soil: &SoilData) -> Vec<String> {
        let mut advice = Vec::new();

        match text(soil, "texture") {
            Some(t) if SANDY_TEXTURES.contains(&t) => advice.push(
                "• Sandy texture limits water retention. Increase irrigation frequency \
                 and add organic matter to improve water-holding capacity."
                    .to_string(),
            ),
            Some(t) if HEAVY_CLAY_TEXTURES.contains(&t) => advice.push(
                "• Heavy clay texture limits drainage and root penetration. \
                 Add organic matter and practice deep tillage to improve structure."
                    .to_string(),
            ),
            _ => {}
        }

        if let Some(depth) = numeric(soil, "soil_depth").filter(|d| *d < SHALLOW_DEPTH_CM) {
            advice.push(format!(
                "• Shallow soil depth ({}cm) limits root growth. \
                 Consider raised beds or select shallow-rooted crops.",
                depth
            ));
        }

        advice
    }
}
