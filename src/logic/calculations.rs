use crate::models::{ParameterRating, SuitabilityClass};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Ratings closer than this to the minimum count as limiting.
pub const LIMITING_TOLERANCE: f64 = 0.001;

/// Product used under the square root of the Square Root Method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LsiMethod {
    /// Rmin times the root of the product of the remaining ratings
    /// (one occurrence of Rmin removed). Khiddir et al. 1986.
    #[default]
    ExcludeMinimum,
    /// Rmin times the root of the product of every rating, Rmin included.
    /// Reproduces the historical SoilWise regression fixtures.
    AllRatings,
}

impl LsiMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            LsiMethod::ExcludeMinimum => "exclude_minimum",
            LsiMethod::AllRatings => "all_ratings",
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Land Suitability Index (0-100) by the Square Root Method.
///
/// An empty rating list yields 0.0. Under [`LsiMethod::ExcludeMinimum`] a
/// list whose ratings all equal the minimum gives exactly `rmin * 100`;
/// [`LsiMethod::AllRatings`] has no such shortcut, so `[0.85]` gives 78.37.
pub fn land_suitability_index(ratings: &[f64], method: LsiMethod) -> f64 {
    let Some(rmin) = ratings.iter().copied().reduce(f64::min) else {
        return 0.0;
    };

    if method == LsiMethod::ExcludeMinimum && ratings.iter().all(|r| *r == rmin) {
        return rmin * 100.0;
    }

    let product: f64 = match method {
        LsiMethod::AllRatings => ratings.iter().product(),
        LsiMethod::ExcludeMinimum => {
            let mut rest = ratings.to_vec();
            if let Some(pos) = rest.iter().position(|r| *r == rmin) {
                rest.remove(pos);
            }
            rest.iter().product()
        }
    };

    let lsi = round2(rmin * product.sqrt() * 100.0);
    tracing::debug!(
        rmin,
        product,
        lsi,
        method = method.as_str(),
        count = ratings.len(),
        "Calculated land suitability index"
    );
    lsi
}

/// Suitability class for an index: >=75 S1, >=50 S2, >=25 S3, else N.
pub fn classify(lsi: f64) -> SuitabilityClass {
    SuitabilityClass::from_lsi(lsi)
}

/// Sorted, deduplicated subclass codes of every parameter rated within
/// [`LIMITING_TOLERANCE`] of the worst rating.
pub fn identify_limiting_factors(ratings: &BTreeMap<String, ParameterRating>) -> String {
    let Some(min_rating) = ratings.values().map(|r| r.rating).reduce(f64::min) else {
        return String::new();
    };

    let codes: BTreeSet<char> = ratings
        .values()
        .filter(|r| (r.rating - min_rating).abs() < LIMITING_TOLERANCE)
        .map(|r| r.subclass)
        .collect();

    codes.into_iter().collect()
}

/// Keys of the parameters tied to the worst rating, in key order.
pub fn limiting_parameters(ratings: &BTreeMap<String, ParameterRating>) -> Vec<&str> {
    let Some(min_rating) = ratings.values().map(|r| r.rating).reduce(f64::min) else {
        return Vec::new();
    };

    ratings
        .iter()
        .filter(|(_, r)| (r.rating - min_rating).abs() < LIMITING_TOLERANCE)
        .map(|(key, _)| key.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use approx::assert_relative_eq;

    const ARABICA_RATINGS: [f64; 18] = [
        0.95, 0.60, 0.85, 0.95, 1.0, 1.0, 0.25, 1.0, 0.85, 1.0, 1.0, 1.0, 1.0, 0.95, 0.95, 1.0,
        1.0, 1.0,
    ];

    fn rating(value: f64, category: Category) -> ParameterRating {
        let class = if value >= 1.0 {
            SuitabilityClass::S1
        } else if value >= 0.85 {
            SuitabilityClass::S2
        } else if value >= 0.6 {
            SuitabilityClass::S3
        } else {
            SuitabilityClass::N
        };
        ParameterRating::new(value, class, category)
    }

    #[test]
    fn empty_ratings_give_zero() {
        assert_eq!(land_suitability_index(&[], LsiMethod::ExcludeMinimum), 0.0);
        assert_eq!(land_suitability_index(&[], LsiMethod::AllRatings), 0.0);
    }

    #[test]
    fn all_equal_ratings_scale_by_hundred() {
        for r in [1.0, 0.95, 0.85, 0.6, 0.25] {
            for n in 1..6 {
                let ratings = vec![r; n];
                assert_eq!(land_suitability_index(&ratings, LsiMethod::ExcludeMinimum), r * 100.0);
            }
        }
    }

    #[test]
    fn all_ratings_method_has_no_equal_ratings_shortcut() {
        assert_relative_eq!(
            land_suitability_index(&[0.85], LsiMethod::AllRatings),
            78.37,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            land_suitability_index(&[0.85, 0.85], LsiMethod::AllRatings),
            72.25,
            epsilon = 1e-9
        );
        assert_eq!(land_suitability_index(&[1.0; 4], LsiMethod::AllRatings), 100.0);
    }

    #[test]
    fn removes_a_single_occurrence_of_the_minimum() {
        // rmin = 0.85; remaining 0.95 * 1.0 * 0.85
        let lsi = land_suitability_index(&[0.85, 0.95, 1.0, 0.85], LsiMethod::ExcludeMinimum);
        assert_relative_eq!(lsi, 76.38, epsilon = 1e-9);

        let lsi = land_suitability_index(&[0.5, 0.8], LsiMethod::ExcludeMinimum);
        assert_relative_eq!(lsi, 44.72, epsilon = 1e-9);

        let lsi = land_suitability_index(&[0.25, 0.85, 1.0], LsiMethod::ExcludeMinimum);
        assert_relative_eq!(lsi, 23.05, epsilon = 1e-9);
        assert_eq!(classify(lsi), SuitabilityClass::N);
    }

    #[test]
    fn all_ratings_method_keeps_the_minimum_in_the_product() {
        let lsi = land_suitability_index(&[0.5, 0.8], LsiMethod::AllRatings);
        assert_relative_eq!(lsi, 31.62, epsilon = 1e-9);
    }

    #[test]
    fn arabica_coffee_regression_fixture() {
        let lsi = land_suitability_index(&ARABICA_RATINGS, LsiMethod::AllRatings);
        assert!((lsi - 7.42).abs() < 0.015, "lsi = {}", lsi);
        assert_eq!(classify(lsi), SuitabilityClass::N);

        let lsi = land_suitability_index(&ARABICA_RATINGS, LsiMethod::ExcludeMinimum);
        assert_relative_eq!(lsi, 14.86, epsilon = 1e-9);
        assert_eq!(classify(lsi), SuitabilityClass::N);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = land_suitability_index(&ARABICA_RATINGS, LsiMethod::ExcludeMinimum);
        let mut reversed = ARABICA_RATINGS;
        reversed.reverse();
        let mut rotated = ARABICA_RATINGS;
        rotated.rotate_left(7);
        assert_eq!(land_suitability_index(&reversed, LsiMethod::ExcludeMinimum), forward);
        assert_eq!(land_suitability_index(&rotated, LsiMethod::ExcludeMinimum), forward);
    }

    #[test]
    fn index_stays_within_bounds() {
        let samples: [&[f64]; 5] = [
            &[1.0, 1.0, 0.25],
            &[0.25; 12],
            &[0.01, 1.0],
            &[1.0, 0.95, 0.85, 0.6, 0.25],
            &[0.999, 1.0],
        ];
        for ratings in samples {
            for method in [LsiMethod::ExcludeMinimum, LsiMethod::AllRatings] {
                let lsi = land_suitability_index(ratings, method);
                assert!((0.0..=100.0).contains(&lsi), "{:?} -> {}", ratings, lsi);
            }
        }
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(classify(75.0), SuitabilityClass::S1);
        assert_eq!(classify(74.99), SuitabilityClass::S2);
        assert_eq!(classify(50.0), SuitabilityClass::S2);
        assert_eq!(classify(49.99), SuitabilityClass::S3);
        assert_eq!(classify(25.0), SuitabilityClass::S3);
        assert_eq!(classify(24.99), SuitabilityClass::N);
    }

    #[test]
    fn limiting_factors_sorted_and_deduplicated() {
        let mut ratings = BTreeMap::new();
        ratings.insert("texture".to_string(), rating(0.6, Category::PhysicalSoil));
        ratings.insert("soil_depth".to_string(), rating(0.6, Category::PhysicalSoil));
        ratings.insert("temperature".to_string(), rating(0.6005, Category::Climate));
        ratings.insert("ph".to_string(), rating(0.6, Category::SoilFertility));
        ratings.insert("slope".to_string(), rating(0.85, Category::Topography));
        ratings.insert("drainage".to_string(), rating(1.0, Category::Wetness));

        assert_eq!(identify_limiting_factors(&ratings), "cfs");
        assert_eq!(
            limiting_parameters(&ratings),
            vec!["ph", "soil_depth", "temperature", "texture"]
        );
    }

    #[test]
    fn limiting_factors_outside_tolerance_are_excluded() {
        let mut ratings = BTreeMap::new();
        ratings.insert("ph".to_string(), rating(0.6, Category::SoilFertility));
        ratings.insert("temperature".to_string(), rating(0.602, Category::Climate));
        assert_eq!(identify_limiting_factors(&ratings), "f");
    }

    #[test]
    fn no_ratings_no_limiting_factors() {
        assert_eq!(identify_limiting_factors(&BTreeMap::new()), "");
        assert!(limiting_parameters(&BTreeMap::new()).is_empty());
    }
}
