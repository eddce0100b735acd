pub mod crop_profile;
pub mod evaluation;
pub mod soil_data;
pub mod suitability;

pub use crop_profile::*;
pub use evaluation::*;
pub use soil_data::*;
pub use suitability::*;
