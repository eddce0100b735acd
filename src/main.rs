mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use soilwise::logic::climate::{adjust_all, adjustment_outlook, ReferenceClimate};
use soilwise::models::{EvaluationResult, SoilData};
use soilwise::{Config, RuleRepository, SuitabilityEvaluator};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Crops => {
            let evaluator = SuitabilityEvaluator::from_config(&config, cli.rules_dir.as_ref())?;
            print_crops(&evaluator);
        }
        Commands::Evaluate {
            crop,
            season,
            input,
            json,
        } => {
            let evaluator = SuitabilityEvaluator::from_config(&config, cli.rules_dir.as_ref())?;
            let soil = read_soil_data(&input)?;
            let result = evaluator.evaluate(&soil, &crop, season.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }
        Commands::Rank {
            crops,
            season,
            input,
            top,
            json,
        } => {
            let evaluator = SuitabilityEvaluator::from_config(&config, cli.rules_dir.as_ref())?;
            let soil = read_soil_data(&input)?;
            let requested = (!crops.is_empty()).then_some(crops.as_slice());
            let mut results = evaluator.evaluate_many(&soil, requested, season.as_deref());
            if let Some(n) = top {
                results.truncate(n);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_ranking(&results);
            }
        }
        Commands::Adjust {
            ref_temp,
            ref_humidity,
            ref_rainfall,
            ref_elevation,
            site_elevation,
            json,
        } => {
            let reference = ReferenceClimate {
                temperature: ref_temp,
                humidity: ref_humidity,
                rainfall: ref_rainfall,
            };
            let adjusted = adjust_all(reference, ref_elevation, site_elevation);
            if json {
                println!("{}", serde_json::to_string_pretty(&adjusted)?);
            } else {
                let outlook = adjustment_outlook(ref_elevation, site_elevation);
                println!(
                    "Elevation difference: {:+.2} m ({})",
                    outlook.elevation_difference_m, outlook.direction
                );
                println!(
                    "Temperature:       {:.2} °C ({:+.2})",
                    adjusted.temperature, adjusted.adjustments.temperature_change
                );
                println!(
                    "Relative humidity: {:.2} % ({:+.2})",
                    adjusted.humidity, adjusted.adjustments.humidity_change
                );
                println!(
                    "Annual rainfall:   {:.2} mm ({:+.2})",
                    adjusted.rainfall, adjusted.adjustments.rainfall_change
                );
            }
        }
        Commands::Check => run_check(&config, cli.rules_dir.as_ref())?,
    }

    Ok(())
}

/// Reads a YAML or JSON map of measurement key to value. YAML is a superset
/// of JSON, so one parser covers both.
fn read_soil_data(path: &Path) -> Result<SoilData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let soil: SoilData = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse measurements in {}", path.display()))?;
    Ok(soil)
}

fn run_check(config: &Config, rules_dir_override: Option<&std::path::PathBuf>) -> Result<()> {
    let rules_dir = config.rules_dir(rules_dir_override);
    println!("Rules directory: {}", rules_dir.display());
    println!("LSI method:      {}", config.lsi_method.as_str());
    println!("Parallel:        {}", config.parallel);

    let repository = RuleRepository::load(&rules_dir)?;
    let report = repository.load_report();
    println!("Loaded {} crop(s)", report.loaded);
    for skipped in &report.skipped {
        println!("  SKIPPED {}: {}", skipped.document, skipped.reason);
    }

    if !report.skipped.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_crops(evaluator: &SuitabilityEvaluator) {
    for name in evaluator.available_crops() {
        let Some(info) = evaluator.crop_info(&name) else {
            continue;
        };
        let scientific = info.scientific_name.as_deref().unwrap_or("-");
        if info.seasonal {
            println!("{:<24} {:<28} seasons: {}", info.name, scientific, info.seasons.join(", "));
        } else {
            println!("{:<24} {}", info.name, scientific);
        }
    }
}

fn print_result(result: &EvaluationResult) {
    match &result.scientific_name {
        Some(sci) => println!("{} ({})", result.crop_name, sci),
        None => println!("{}", result.crop_name),
    }
    if let Some(season) = &result.season {
        println!("Season: {}", season);
    }
    println!("LSI: {:.2}   Class: {}", result.lsi, result.full_classification);
    println!("{}", result.interpretation);

    if !result.parameter_ratings.is_empty() {
        println!();
        println!("Parameter ratings:");
        for (key, rating) in &result.parameter_ratings {
            println!(
                "  {:<20} {:.2}  {}{}",
                key,
                rating.rating,
                rating.class.as_str(),
                rating.subclass
            );
        }
    }

    if !result.limiting_factors_detailed.is_empty() {
        println!();
        println!("Limiting factors:");
        for detail in &result.limiting_factors_detailed {
            let value = detail
                .actual_value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            println!(
                "  {} = {} ({}, rating {:.2})",
                detail.description, value, detail.category, detail.rating
            );
        }
    }

    println!();
    println!("Recommendations:");
    for rec in &result.recommendations {
        println!("  {}", rec);
    }
    if let Some(notes) = &result.notes {
        println!();
        println!("Notes: {}", notes);
    }
}

fn print_ranking(results: &[EvaluationResult]) {
    if results.is_empty() {
        println!("No crops could be evaluated");
        return;
    }
    for (i, result) in results.iter().enumerate() {
        println!(
            "{:>3}. {:<24} LSI {:>6.2}  {}",
            i + 1,
            result.crop_name,
            result.lsi,
            result.full_classification
        );
    }
}
