pub mod climate;
pub mod engine;
pub mod fertility;
pub mod physical_soil;
pub mod salinity;
pub mod topography;
pub mod wetness;

pub use engine::AdviceEngine;

use crate::models::{Category, SoilData};

/// Management advice for one limiting category.
pub trait Advisor: Send + Sync {
    /// Unique identifier for this advisor
    fn id(&self) -> &'static str;

    /// Category whose subclass code triggers this advisor
    fn category(&self) -> Category;

    /// Recommendations for the measured site conditions. May be empty when
    /// the measurements do not point at a specific intervention.
    fn advise(&self, soil: &SoilData) -> Vec<String>;
}
