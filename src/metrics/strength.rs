//! Estimated one-rep max
//!
//! Average of the Epley, Brzycki and Lander predictions. Beyond 15 reps the
//! formulas stop tracking real maxes, so reps are capped there.

use super::aggregator::SetRecord;
use super::round2;

/// Reps above this are treated as this many
pub const MAX_RELIABLE_REPS: u32 = 15;

/// Estimated 1RM in kg for `reps` at `weight_kg`
pub fn estimated_one_rep_max(weight_kg: f64, reps: u32) -> f64 {
    if !weight_kg.is_finite() || weight_kg <= 0.0 || reps == 0 {
        return 0.0;
    }
    if reps == 1 {
        return weight_kg;
    }

    let r = f64::from(reps.min(MAX_RELIABLE_REPS));
    let epley = weight_kg * (1.0 + r / 30.0);
    let brzycki = weight_kg * 36.0 / (37.0 - r);
    let lander = weight_kg * 100.0 / (101.3 - 2.67 * r);

    (epley + brzycki + lander) / 3.0
}

/// Best estimate across the working sets, rounded to 2 decimals
///
/// None when there is no loaded working set.
pub fn best_one_rep_max(sets: &[SetRecord]) -> Option<f64> {
    sets.iter()
        .filter(|s| !s.is_warmup)
        .map(|s| estimated_one_rep_max(s.weight_kg, s.reps))
        .filter(|e| *e > 0.0)
        .fold(None, |best: Option<f64>, e| Some(best.map_or(e, |b| b.max(e))))
        .map(round2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(weight_kg: f64, reps: u32, is_warmup: bool) -> SetRecord {
        SetRecord { is_warmup, weight_kg, reps, rest_seconds: 120 }
    }

    #[test]
    fn test_single_rep_is_the_max() {
        assert_eq!(estimated_one_rep_max(140.0, 1), 140.0);
    }

    #[test]
    fn test_no_load_or_reps() {
        assert_eq!(estimated_one_rep_max(0.0, 5), 0.0);
        assert_eq!(estimated_one_rep_max(-20.0, 5), 0.0);
        assert_eq!(estimated_one_rep_max(100.0, 0), 0.0);
        assert_eq!(estimated_one_rep_max(f64::NAN, 5), 0.0);
    }

    #[test]
    fn test_formula_average() {
        // Epley 116.67, Brzycki 112.5, Lander 113.70
        assert_eq!(round2(estimated_one_rep_max(100.0, 5)), 114.29);
        assert_eq!(round2(estimated_one_rep_max(100.0, 10)), 133.57);
    }

    #[test]
    fn test_reps_capped() {
        assert_eq!(estimated_one_rep_max(50.0, 30), estimated_one_rep_max(50.0, MAX_RELIABLE_REPS));
    }

    #[test]
    fn test_best_skips_warmups() {
        let sets = vec![set(200.0, 3, true), set(100.0, 5, false), set(105.0, 3, false)];
        // 100 × 5 (114.29) edges out 105 × 3 (113.08)
        assert_eq!(best_one_rep_max(&sets), Some(114.29));
    }

    #[test]
    fn test_best_none_without_loaded_sets() {
        assert_eq!(best_one_rep_max(&[]), None);
        assert_eq!(best_one_rep_max(&[set(0.0, 12, false), set(60.0, 8, true)]), None);
    }
}
