use approx::assert_relative_eq;
use soilwise::logic::climate::{adjust_all, ReferenceClimate};
use soilwise::models::{CropOutcome, MeasuredValue, SoilData, SuitabilityClass};
use soilwise::{LsiMethod, RuleRepository, SoilWiseError, SuitabilityEvaluator};
use std::path::PathBuf;
use std::sync::Arc;

fn rules_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/crop_requirements")
}

fn repository() -> Arc<RuleRepository> {
    Arc::new(RuleRepository::load(rules_dir()).expect("bundled rule store loads"))
}

fn site(pairs: &[(&str, MeasuredValue)]) -> SoilData {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn banana_site() -> SoilData {
    site(&[
        ("temperature", 25.0.into()),
        ("rainfall", 2000.0.into()),
        ("ph", 6.2.into()),
        ("texture", "L".into()),
        ("soil_depth", 120.0.into()),
        ("drainage", "good".into()),
        ("flooding", "Fo".into()),
        ("slope", 1.5.into()),
    ])
}

/// Arabica Coffee regression site; every parameter maps to a rule.
fn arabica_site() -> SoilData {
    site(&[
        ("rainfall", 1300.0.into()),
        ("temperature", 24.87.into()),
        ("humidity", 73.0.into()),
        ("slope", 3.29.into()),
        ("flooding", "Fo".into()),
        ("drainage", "good".into()),
        ("texture", "SiC".into()),
        ("coarse_fragments", 3.0.into()),
        ("soil_depth", 135.0.into()),
        ("caco3", 0.0.into()),
        ("gypsum", 0.0.into()),
        ("cec", 28.0.into()),
        ("sum_basic_cations", 14.0.into()),
        ("ph", 6.4.into()),
        ("base_saturation", 50.0.into()),
        ("organic_carbon", 3.5.into()),
        ("ec", 0.0.into()),
        ("esp", 2.8.into()),
    ])
}

#[test]
fn bundled_rule_store_loads_cleanly() {
    let repo = repository();
    assert_eq!(repo.names(), vec!["Arabica Coffee", "Banana", "Cabbage", "Maize"]);
    assert!(repo.load_report().skipped.is_empty());
    assert_eq!(
        repo.seasons("Cabbage").unwrap(),
        vec!["january_april", "may_august", "september_december"]
    );
}

#[test]
fn banana_on_good_site_is_highly_suitable() {
    let evaluator = SuitabilityEvaluator::new(repository());
    let result = evaluator.evaluate(&banana_site(), "Banana", None).unwrap();

    assert_eq!(result.lsc, SuitabilityClass::S1);
    assert!(result.lsi >= 75.0);
    assert_relative_eq!(result.lsi, 95.0, epsilon = 1e-9);
    assert_eq!(result.full_classification, "S1t");
    assert_eq!(result.parameter_ratings.len(), 8);
    assert_eq!(result.scientific_name.as_deref(), Some("Musa sp. L."));
    assert!(result.interpretation.starts_with("Highly Suitable (LSI: 95.00)"));
}

#[test]
fn acidic_soil_limits_banana() {
    let mut soil = banana_site();
    soil.insert("ph".to_string(), 4.5.into());

    let evaluator = SuitabilityEvaluator::new(repository());
    let result = evaluator.evaluate(&soil, "Banana", None).unwrap();

    assert!(result.limiting_factors.contains('f'));
    assert!(result.lsi < 75.0);
    assert_relative_eq!(result.lsi, 24.37, epsilon = 1e-9);
    assert_eq!(result.full_classification, "Nf");
    assert!(result.recommendations.iter().any(|r| r.contains("lime")));
}

#[test]
fn arabica_coffee_regression_fixture() {
    let evaluator = SuitabilityEvaluator::new(repository()).with_method(LsiMethod::AllRatings);
    let result = evaluator
        .evaluate(&arabica_site(), "Arabica Coffee", None)
        .unwrap();

    assert_eq!(result.parameter_ratings.len(), 18);
    assert!((result.lsi - 7.42).abs() < 0.015, "lsi = {}", result.lsi);
    assert_eq!(result.full_classification, "Ns");
    assert_eq!(result.limiting_factors_detailed.len(), 1);
    assert_eq!(result.limiting_factors_detailed[0].parameter, "texture");
    assert_eq!(result.limiting_factors_detailed[0].category, "Physical Soil");
}

#[test]
fn arabica_coffee_under_default_method() {
    let evaluator = SuitabilityEvaluator::new(repository());
    let result = evaluator
        .evaluate(&arabica_site(), "Arabica Coffee", None)
        .unwrap();

    assert_relative_eq!(result.lsi, 14.86, epsilon = 1e-9);
    assert_eq!(result.full_classification, "Ns");
}

#[test]
fn unknown_crop_is_rejected() {
    let evaluator = SuitabilityEvaluator::new(repository());
    let err = evaluator
        .evaluate(&banana_site(), "Durian", None)
        .unwrap_err();
    assert!(matches!(err, SoilWiseError::CropNotFound(_)));
    assert!(err.is_configuration());
}

#[test]
fn seasonal_crop_without_season_names_valid_seasons() {
    let evaluator = SuitabilityEvaluator::new(repository());
    let err = evaluator
        .evaluate(&banana_site(), "Cabbage", None)
        .unwrap_err();

    assert!(err.is_validation());
    let message = err.to_string();
    for season in ["january_april", "may_august", "september_december"] {
        assert!(message.contains(season), "{}", message);
    }
}

#[test]
fn ranking_across_the_rule_store() {
    let evaluator = SuitabilityEvaluator::new(repository());
    let results = evaluator.evaluate_many(&banana_site(), None, Some("january_april"));

    let ranking: Vec<(&str, &str)> = results
        .iter()
        .map(|r| (r.crop_name.as_str(), r.full_classification.as_str()))
        .collect();
    assert_eq!(
        ranking,
        vec![
            ("Banana", "S1t"),
            ("Cabbage", "S2c"),
            ("Arabica Coffee", "S2c"),
            ("Maize", "S3c"),
        ]
    );
    assert!(results.windows(2).all(|w| w[0].lsi >= w[1].lsi));
}

#[test]
fn ranking_without_season_drops_seasonal_crops() {
    let evaluator = SuitabilityEvaluator::new(repository());

    let results = evaluator.evaluate_many(&banana_site(), None, None);
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.crop_name != "Cabbage"));

    let outcomes = evaluator.evaluate_batch(&banana_site(), None, None);
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| matches!(o, CropOutcome::Failed { .. }))
        .map(CropOutcome::crop_name)
        .collect();
    assert_eq!(failed, vec!["Cabbage"]);
}

#[test]
fn seasonal_climate_resolves_from_the_season_only() {
    let evaluator = SuitabilityEvaluator::new(repository());
    let soil = site(&[
        ("temperature", 18.0.into()),
        ("rainfall", 500.0.into()),
        ("humidity", 70.0.into()),
    ]);
    let result = evaluator
        .evaluate(&soil, "Cabbage", Some("january_april"))
        .unwrap();

    let ratings = &result.parameter_ratings;
    assert_eq!(ratings["temperature"].rating, 1.0);
    // 500 mm sits on the S3/N boundary of the season's rainfall rules
    assert_eq!(ratings["rainfall"].rating, 0.6);
    assert_eq!(ratings["rainfall"].class, SuitabilityClass::S3);
    // humidity is not declared by the season
    assert_eq!(ratings["humidity"].rating, 0.25);
    assert_eq!(ratings["humidity"].class, SuitabilityClass::N);
    assert_eq!(ratings["humidity"].subclass, 'c');
}

#[test]
fn elevation_adjusted_climate_feeds_evaluation() {
    let adjusted = adjust_all(
        ReferenceClimate {
            temperature: 24.85,
            humidity: 85.42,
            rainfall: 2557.45,
        },
        771.0,
        1119.10,
    );
    let mut soil = banana_site();
    adjusted.apply_to(&mut soil);

    let evaluator = SuitabilityEvaluator::new(repository());
    let result = evaluator.evaluate(&soil, "Banana", None).unwrap();

    // 22.59 °C stays in the S1 temperature band
    assert_eq!(result.parameter_ratings["temperature"].rating, 1.0);
    assert_eq!(result.parameter_ratings["humidity"].rating, 1.0);
    assert_eq!(result.parameter_ratings.len(), 9);
}
