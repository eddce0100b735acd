use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoilWiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Crop '{0}' not found in knowledge base")]
    CropNotFound(String),

    #[error("Crop requirements directory not found: {}", .0.display())]
    RuleStoreMissing(PathBuf),

    #[error("Invalid crop requirement document {document}: {reason}")]
    InvalidRule { document: String, reason: String },

    #[error("{crop} is a seasonal crop. Please specify season: {}", .seasons.join(", "))]
    SeasonRequired { crop: String, seasons: Vec<String> },

    #[error("Season '{season}' not found for {crop}. Available: {}", .seasons.join(", "))]
    UnknownSeason {
        crop: String,
        season: String,
        seasons: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SoilWiseError {
    /// Unknown crops, missing or malformed rule stores.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SoilWiseError::Config(_)
                | SoilWiseError::CropNotFound(_)
                | SoilWiseError::RuleStoreMissing(_)
                | SoilWiseError::InvalidRule { .. }
        )
    }

    /// Caller-supplied input that cannot be evaluated as given.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SoilWiseError::SeasonRequired { .. } | SoilWiseError::UnknownSeason { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SoilWiseError>;
