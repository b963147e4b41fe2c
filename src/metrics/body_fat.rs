//! Body-fat estimation
//!
//! US Navy circumference method. All lengths in centimeters.
//!
//! ```text
//! male:   BF% = 495 / (1.0324  - 0.19077 × log10(waist - neck)        + 0.15456 × log10(height)) - 450
//! female: BF% = 495 / (1.29579 - 0.35004 × log10(waist + hips - neck) + 0.22100 × log10(height)) - 450
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::round2;

/// Lowest body-fat percentage accepted as a plausible result
pub const MIN_PLAUSIBLE_BODY_FAT: f64 = 0.0;

/// Highest body-fat percentage accepted as a plausible result
pub const MAX_PLAUSIBLE_BODY_FAT: f64 = 50.0;

/// Gender used to pick the Navy formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Circumference measurement set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub waist_cm: f64,
    pub neck_cm: f64,
    /// Only used by the female formula
    pub hips_cm: Option<f64>,
    pub gender: Gender,
}

/// Why no body-fat value could be produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyFatUnavailable {
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(&'static str),

    #[error("implausible body fat result: {0:.2}%")]
    ImplausibleResult(f64),

    #[error("numeric fault: {0}")]
    NumericFault(&'static str),
}

/// Estimate body-fat percentage, rounded to 2 decimals
pub fn estimate_body_fat(m: &Measurement) -> Result<f64, BodyFatUnavailable> {
    let inputs = [m.height_cm, m.waist_cm, m.neck_cm];
    if inputs.iter().any(|v| !v.is_finite()) {
        return Err(BodyFatUnavailable::NumericFault("non-finite input"));
    }
    if m.height_cm <= 0.0 {
        return Err(BodyFatUnavailable::InvalidMeasurement("height must be positive"));
    }

    let denominator = match m.gender {
        Gender::Male => {
            if m.waist_cm <= m.neck_cm {
                return Err(BodyFatUnavailable::InvalidMeasurement(
                    "waist must be greater than neck",
                ));
            }
            1.0324 - 0.19077 * (m.waist_cm - m.neck_cm).log10() + 0.15456 * m.height_cm.log10()
        }
        Gender::Female => {
            // A zero hips reading counts as not taken
            let hips = match m.hips_cm {
                Some(h) if !h.is_finite() => {
                    return Err(BodyFatUnavailable::NumericFault("non-finite input"))
                }
                Some(h) if h > 0.0 => h,
                _ => {
                    return Err(BodyFatUnavailable::InvalidMeasurement(
                        "hips measurement is required for women",
                    ))
                }
            };
            let girth = m.waist_cm + hips - m.neck_cm;
            if girth <= 0.0 {
                return Err(BodyFatUnavailable::InvalidMeasurement(
                    "waist plus hips must be greater than neck",
                ));
            }
            1.29579 - 0.35004 * girth.log10() + 0.22100 * m.height_cm.log10()
        }
    };

    if !denominator.is_finite() {
        return Err(BodyFatUnavailable::NumericFault("non-finite formula denominator"));
    }
    if denominator <= 0.0 {
        return Err(BodyFatUnavailable::InvalidMeasurement(
            "formula denominator is not positive",
        ));
    }

    let body_fat = 495.0 / denominator - 450.0;
    if !body_fat.is_finite() {
        return Err(BodyFatUnavailable::NumericFault("non-finite result"));
    }

    // Out-of-range values are discarded, never clamped
    if !(MIN_PLAUSIBLE_BODY_FAT..=MAX_PLAUSIBLE_BODY_FAT).contains(&body_fat) {
        return Err(BodyFatUnavailable::ImplausibleResult(body_fat));
    }

    Ok(round2(body_fat))
}

/// Nullable form of [`estimate_body_fat`] for storage
pub fn body_fat_percentage(m: &Measurement) -> Option<f64> {
    match estimate_body_fat(m) {
        Ok(value) => Some(value),
        Err(reason) => {
            tracing::debug!("Body fat unavailable: {}", reason);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn male(height: f64, waist: f64, neck: f64) -> Measurement {
        Measurement {
            height_cm: height,
            weight_kg: 80.0,
            waist_cm: waist,
            neck_cm: neck,
            hips_cm: None,
            gender: Gender::Male,
        }
    }

    fn female(height: f64, waist: f64, hips: Option<f64>, neck: f64) -> Measurement {
        Measurement {
            height_cm: height,
            weight_kg: 62.0,
            waist_cm: waist,
            neck_cm: neck,
            hips_cm: hips,
            gender: Gender::Female,
        }
    }

    #[test]
    fn test_male_reference_value() {
        // D = 1.0324 - 0.19077 * log10(47) + 0.15456 * log10(180) ≈ 1.06199
        let bf = estimate_body_fat(&male(180.0, 85.0, 38.0)).unwrap();
        assert_eq!(bf, 16.11);
        assert!((0.0..=50.0).contains(&bf));
    }

    #[test]
    fn test_male_other_values() {
        assert_eq!(estimate_body_fat(&male(175.0, 100.0, 37.0)), Ok(27.88));
        assert_eq!(estimate_body_fat(&male(180.0, 80.0, 40.0)), Ok(10.32));
    }

    #[test]
    fn test_male_waist_equal_neck_unavailable() {
        let result = estimate_body_fat(&male(180.0, 38.0, 38.0));
        assert!(matches!(result, Err(BodyFatUnavailable::InvalidMeasurement(_))));
    }

    #[test]
    fn test_male_waist_below_neck_unavailable() {
        assert!(estimate_body_fat(&male(180.0, 30.0, 38.0)).is_err());
    }

    #[test]
    fn test_result_above_range_is_discarded() {
        // Raw value ≈ 51.09, must not be clamped to 50
        let result = estimate_body_fat(&male(180.0, 150.0, 35.0));
        assert!(matches!(result, Err(BodyFatUnavailable::ImplausibleResult(v)) if v > 50.0));
    }

    #[test]
    fn test_result_below_range_is_discarded() {
        // Raw value ≈ -1.15
        let result = estimate_body_fat(&male(190.0, 70.0, 40.0));
        assert!(matches!(result, Err(BodyFatUnavailable::ImplausibleResult(v)) if v < 0.0));
    }

    #[test]
    fn test_female_reference_value() {
        assert_eq!(estimate_body_fat(&female(165.0, 75.0, Some(100.0), 33.0)), Ok(29.43));
        assert_eq!(estimate_body_fat(&female(170.0, 60.0, Some(80.0), 34.0)), Ok(8.43));
    }

    #[test]
    fn test_female_without_hips_unavailable() {
        let result = estimate_body_fat(&female(165.0, 75.0, None, 33.0));
        assert!(matches!(result, Err(BodyFatUnavailable::InvalidMeasurement(_))));
    }

    #[test]
    fn test_female_zero_hips_is_missing() {
        for hips in [Some(0.0), Some(-4.0)] {
            let result = estimate_body_fat(&female(165.0, 75.0, hips, 33.0));
            assert_eq!(
                result,
                Err(BodyFatUnavailable::InvalidMeasurement("hips measurement is required for women"))
            );
        }
    }

    #[test]
    fn test_male_ignores_hips() {
        for hips in [Some(f64::NAN), Some(f64::INFINITY), Some(0.0), Some(96.0)] {
            let m = Measurement { hips_cm: hips, ..male(180.0, 85.0, 38.0) };
            assert_eq!(estimate_body_fat(&m), Ok(16.11));
        }
    }

    #[test]
    fn test_female_implausible_discarded() {
        assert!(estimate_body_fat(&female(165.0, 110.0, Some(130.0), 33.0)).is_err());
    }

    #[test]
    fn test_female_girth_not_positive() {
        assert!(estimate_body_fat(&female(165.0, 10.0, Some(10.0), 33.0)).is_err());
    }

    #[test]
    fn test_non_finite_inputs() {
        let result = estimate_body_fat(&male(f64::NAN, 85.0, 38.0));
        assert!(matches!(result, Err(BodyFatUnavailable::NumericFault(_))));
        assert!(estimate_body_fat(&male(180.0, f64::INFINITY, 38.0)).is_err());
        let result = estimate_body_fat(&female(165.0, 75.0, Some(f64::NAN), 33.0));
        assert!(matches!(result, Err(BodyFatUnavailable::NumericFault(_))));
    }

    #[test]
    fn test_zero_height_unavailable() {
        assert!(estimate_body_fat(&male(0.0, 85.0, 38.0)).is_err());
        assert!(estimate_body_fat(&male(-170.0, 85.0, 38.0)).is_err());
    }

    #[test]
    fn test_male_results_never_negative_or_nan() {
        for height in [150.0, 165.0, 180.0, 200.0] {
            for waist in [60.0, 75.0, 90.0, 110.0, 140.0] {
                for neck in [30.0, 36.0, 42.0, 59.0] {
                    if let Ok(bf) = estimate_body_fat(&male(height, waist, neck)) {
                        assert!(!bf.is_nan());
                        assert!((0.0..=50.0).contains(&bf), "{} out of range", bf);
                    }
                }
            }
        }
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let m = male(180.0, 85.0, 38.0);
        assert_eq!(estimate_body_fat(&m), estimate_body_fat(&m));
        assert_eq!(body_fat_percentage(&m), Some(16.11));
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::from_str("Female"), Some(Gender::Female));
        assert_eq!(Gender::from_str("m"), Some(Gender::Male));
        assert_eq!(Gender::from_str("other"), None);
        assert_eq!(Gender::Female.as_str(), "female");
    }
}
