use super::repository::RuleRepository;
use crate::models::{
    Category, MeasuredValue, ParameterRating, ParameterRequirement, SlopeLevel,
};

/// Rates measured values against the requirements of a crop.
pub struct ParameterRatingResolver<'a> {
    repository: &'a RuleRepository,
    slope_level: SlopeLevel,
}

impl<'a> ParameterRatingResolver<'a> {
    pub fn new(repository: &'a RuleRepository) -> Self {
        Self {
            repository,
            slope_level: SlopeLevel::default(),
        }
    }

    pub fn with_slope_level(mut self, level: SlopeLevel) -> Self {
        self.slope_level = level;
        self
    }

    /// Rating of `value` for `(category, parameter)` of `crop`.
    ///
    /// Entries are tried in document order and the first match wins. A
    /// parameter with no requirement, or a value no entry accepts, rates
    /// `(0.25, N)`.
    pub fn rate(
        &self,
        crop: &str,
        category: Category,
        parameter: &str,
        value: &MeasuredValue,
        season: Option<&str>,
    ) -> ParameterRating {
        if is_slope(category, parameter) {
            return self.rate_slope(crop, value);
        }

        let Some(requirement) =
            self.repository
                .parameter_requirement(crop, category, parameter, season)
        else {
            tracing::warn!(
                crop,
                category = category.key(),
                parameter,
                "No requirements for parameter, rating as N"
            );
            return ParameterRating::not_suitable(category);
        };

        self.match_requirement(requirement, category, parameter, value)
    }

    fn rate_slope(&self, crop: &str, value: &MeasuredValue) -> ParameterRating {
        let requirement = self.repository.profile(crop).and_then(|p| {
            let topography = p.category(Category::Topography)?;
            topography.get("slope_pct").or_else(|| topography.get("slope"))
        });

        match requirement {
            Some(requirement) => {
                self.match_requirement(requirement, Category::Topography, "slope_pct", value)
            }
            None => {
                tracing::warn!(crop, "No slope requirements found, rating as N");
                ParameterRating::not_suitable(Category::Topography)
            }
        }
    }

    fn match_requirement(
        &self,
        requirement: &ParameterRequirement,
        category: Category,
        parameter: &str,
        value: &MeasuredValue,
    ) -> ParameterRating {
        let spec = requirement.spec(self.slope_level);
        match spec.first_match(value) {
            Some(entry) => {
                tracing::debug!(
                    parameter,
                    %value,
                    key = %entry.key,
                    criterion = %entry.criterion,
                    rating = entry.rating,
                    "Matched classification"
                );
                ParameterRating::new(entry.rating, entry.class, category)
            }
            None => {
                tracing::warn!(parameter, %value, "No classification matched, rating as N");
                ParameterRating::not_suitable(category)
            }
        }
    }
}

fn is_slope(category: Category, parameter: &str) -> bool {
    category == Category::Topography && matches!(parameter, "slope" | "slope_pct")
}
