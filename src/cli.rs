use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "soilwise",
    version,
    about = "Crop land suitability evaluation (FAO Square Root Method)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to soilwise.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the crop requirements directory
    #[arg(short, long)]
    pub rules_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List crops in the knowledge base
    Crops,
    /// Evaluate one crop against site measurements
    Evaluate {
        /// Crop name as it appears in `soilwise crops`
        #[arg(long)]
        crop: String,
        /// Season code, required for seasonal crops
        #[arg(long)]
        season: Option<String>,
        /// YAML or JSON map of measurement key to value
        #[arg(short, long)]
        input: PathBuf,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rank crops by suitability for site measurements
    Rank {
        /// Crops to evaluate (repeatable); all crops when omitted
        #[arg(long = "crop")]
        crops: Vec<String>,
        #[arg(long)]
        season: Option<String>,
        #[arg(short, long)]
        input: PathBuf,
        /// Show only the N most suitable crops
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Correct reference-station climate data for site elevation
    Adjust {
        /// Mean annual temperature at the reference station (°C)
        #[arg(long)]
        ref_temp: f64,
        /// Relative humidity at the reference station (%)
        #[arg(long)]
        ref_humidity: f64,
        /// Annual rainfall at the reference station (mm)
        #[arg(long)]
        ref_rainfall: f64,
        /// Reference station elevation (m)
        #[arg(long)]
        ref_elevation: f64,
        /// Site elevation (m)
        #[arg(long)]
        site_elevation: f64,
        #[arg(long)]
        json: bool,
    },
    /// Validate config and the crop requirement documents
    Check,
}
