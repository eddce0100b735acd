//! Crop land suitability evaluation by the FAO Square Root Method.

pub mod config;
pub mod error;
pub mod logic;
pub mod models;

pub use config::Config;
pub use error::{Result, SoilWiseError};
pub use logic::{LsiMethod, RuleRepository, SuitabilityEvaluator};
