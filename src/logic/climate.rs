//! Elevation corrections for reference-station climate data.
//!
//! Temperature follows the environmental lapse rate, precipitation the
//! orographic lapse rate, and relative humidity is rescaled by the ratio of
//! saturation vapor pressures (Cramer 1961).

use super::calculations::round2;
use crate::models::{MeasuredValue, SoilData};
use serde::{Deserialize, Serialize};

/// °C per 1000 m of elevation gain.
pub const TEMP_LAPSE_RATE: f64 = 6.5;
/// mm per 100 m of elevation gain.
pub const PRECIP_LAPSE_RATE: f64 = 27.03;

// Magnus formula coefficients
const MAGNUS_A: f64 = 17.67;
const MAGNUS_B: f64 = 243.5;
const MAGNUS_E0_HPA: f64 = 6.112;

/// Temperature at `site_elevation` given the reading at `reference_elevation`.
pub fn adjust_temperature(reference_temp: f64, reference_elevation: f64, site_elevation: f64) -> f64 {
    let diff_km = (site_elevation - reference_elevation) / 1000.0;
    round2(reference_temp - TEMP_LAPSE_RATE * diff_km)
}

/// Saturation vapor pressure in hPa (Magnus formula). Not rounded.
pub fn saturation_vapor_pressure(temperature: f64) -> f64 {
    MAGNUS_E0_HPA * ((MAGNUS_A * temperature) / (temperature + MAGNUS_B)).exp()
}

/// Relative humidity after moving from `reference_temp` to `adjusted_temp`,
/// clamped to 0-100%.
pub fn adjust_humidity(reference_rh: f64, reference_temp: f64, adjusted_temp: f64) -> f64 {
    let ratio = saturation_vapor_pressure(adjusted_temp) / saturation_vapor_pressure(reference_temp);
    round2((reference_rh * ratio).clamp(0.0, 100.0))
}

/// Annual precipitation at `site_elevation`, never negative.
pub fn adjust_rainfall(reference_precip: f64, reference_elevation: f64, site_elevation: f64) -> f64 {
    let diff_100m = (site_elevation - reference_elevation) / 100.0;
    round2((reference_precip + PRECIP_LAPSE_RATE * diff_100m).max(0.0))
}

/// Climate readings at the reference station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceClimate {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateDeltas {
    pub temperature_change: f64,
    pub humidity_change: f64,
    pub rainfall_change: f64,
    pub elevation_difference: f64,
}

/// Site climate after elevation correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustedClimate {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub adjustments: ClimateDeltas,
    pub original: ReferenceClimate,
}

impl AdjustedClimate {
    /// Writes `temperature`, `humidity` and `rainfall` into a measurement
    /// map, replacing any values already there.
    pub fn apply_to(&self, soil: &mut SoilData) {
        soil.insert("temperature".to_string(), MeasuredValue::from(self.temperature));
        soil.insert("humidity".to_string(), MeasuredValue::from(self.humidity));
        soil.insert("rainfall".to_string(), MeasuredValue::from(self.rainfall));
    }
}

/// Adjusts all three parameters. Humidity uses the rounded adjusted
/// temperature.
pub fn adjust_all(
    reference: ReferenceClimate,
    reference_elevation: f64,
    site_elevation: f64,
) -> AdjustedClimate {
    let temperature = adjust_temperature(reference.temperature, reference_elevation, site_elevation);
    let humidity = adjust_humidity(reference.humidity, reference.temperature, temperature);
    let rainfall = adjust_rainfall(reference.rainfall, reference_elevation, site_elevation);

    tracing::debug!(
        reference_elevation,
        site_elevation,
        temperature,
        humidity,
        rainfall,
        "Adjusted climate for elevation"
    );

    AdjustedClimate {
        temperature,
        humidity,
        rainfall,
        adjustments: ClimateDeltas {
            temperature_change: round2(temperature - reference.temperature),
            humidity_change: round2(humidity - reference.humidity),
            rainfall_change: round2(rainfall - reference.rainfall),
            elevation_difference: site_elevation - reference_elevation,
        },
        original: reference,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Uphill,
    Downhill,
    Level,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Uphill => "uphill",
            Direction::Downhill => "downhill",
            Direction::Level => "level",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expected changes for a pair of elevations, before any data is adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentOutlook {
    pub elevation_difference_m: f64,
    pub expected_temperature_change_c: f64,
    pub expected_precipitation_change_mm: f64,
    pub direction: Direction,
}

pub fn adjustment_outlook(reference_elevation: f64, site_elevation: f64) -> AdjustmentOutlook {
    let diff = site_elevation - reference_elevation;
    let direction = if diff > 0.0 {
        Direction::Uphill
    } else if diff < 0.0 {
        Direction::Downhill
    } else {
        Direction::Level
    };

    AdjustmentOutlook {
        elevation_difference_m: diff,
        expected_temperature_change_c: round2(-TEMP_LAPSE_RATE * diff / 1000.0),
        expected_precipitation_change_mm: round2(PRECIP_LAPSE_RATE * diff / 100.0),
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::numeric;
    use approx::assert_relative_eq;

    // Bubong (771 m) reference station, Gacap (1119.10 m) site
    const REF_ELEV: f64 = 771.0;
    const SITE_ELEV: f64 = 1119.10;

    #[test]
    fn temperature_drops_uphill() {
        assert_relative_eq!(adjust_temperature(24.85, REF_ELEV, SITE_ELEV), 22.59);
        assert_relative_eq!(adjust_temperature(20.0, 1000.0, 0.0), 26.5);
        assert_relative_eq!(adjust_temperature(20.0, 500.0, 500.0), 20.0);
    }

    #[test]
    fn saturation_vapor_pressure_magnus() {
        assert_relative_eq!(saturation_vapor_pressure(0.0), 6.112);
        assert_relative_eq!(saturation_vapor_pressure(20.0), 23.3695, epsilon = 1e-3);
    }

    #[test]
    fn humidity_follows_vapor_pressure_and_clamps() {
        assert_relative_eq!(adjust_humidity(85.42, 24.85, 22.59), 74.54);
        assert_eq!(adjust_humidity(95.0, 20.0, 30.0), 100.0);
        assert_eq!(adjust_humidity(0.0, 20.0, 10.0), 0.0);
    }

    #[test]
    fn rainfall_increases_uphill_and_never_negative() {
        assert_relative_eq!(adjust_rainfall(2557.45, REF_ELEV, SITE_ELEV), 2651.54);
        assert_eq!(adjust_rainfall(100.0, 2000.0, 0.0), 0.0);
    }

    #[test]
    fn adjust_all_reports_deltas() {
        let reference = ReferenceClimate {
            temperature: 24.85,
            humidity: 85.42,
            rainfall: 2557.45,
        };
        let adjusted = adjust_all(reference, REF_ELEV, SITE_ELEV);

        assert_relative_eq!(adjusted.temperature, 22.59);
        assert_relative_eq!(adjusted.humidity, 74.54);
        assert_relative_eq!(adjusted.rainfall, 2651.54);
        assert_relative_eq!(adjusted.adjustments.temperature_change, -2.26);
        assert_relative_eq!(adjusted.adjustments.humidity_change, -10.88);
        assert_relative_eq!(adjusted.adjustments.rainfall_change, 94.09);
        assert_relative_eq!(adjusted.adjustments.elevation_difference, 348.1, epsilon = 1e-9);
        assert_eq!(adjusted.original, reference);
    }

    #[test]
    fn apply_to_overwrites_climate_keys() {
        let adjusted = adjust_all(
            ReferenceClimate {
                temperature: 24.85,
                humidity: 85.42,
                rainfall: 2557.45,
            },
            REF_ELEV,
            SITE_ELEV,
        );
        let mut soil = SoilData::new();
        soil.insert("temperature".to_string(), MeasuredValue::from(30.0));
        soil.insert("ph".to_string(), MeasuredValue::from(6.0));
        adjusted.apply_to(&mut soil);

        assert_eq!(soil.len(), 4);
        assert_eq!(numeric(&soil, "temperature"), Some(22.59));
        assert_eq!(numeric(&soil, "rainfall"), Some(2651.54));
        assert_eq!(numeric(&soil, "ph"), Some(6.0));
    }

    #[test]
    fn outlook_direction() {
        let outlook = adjustment_outlook(REF_ELEV, SITE_ELEV);
        assert_eq!(outlook.direction, Direction::Uphill);
        assert_relative_eq!(outlook.expected_temperature_change_c, -2.26);
        assert_relative_eq!(outlook.expected_precipitation_change_mm, 94.09);

        assert_eq!(adjustment_outlook(1000.0, 200.0).direction, Direction::Downhill);
        assert_eq!(adjustment_outlook(300.0, 300.0).direction, Direction::Level);
    }
}
