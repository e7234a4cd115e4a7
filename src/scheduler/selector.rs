use rand::Rng;

use crate::lesson::WordRecord;
use crate::scheduler::SchedulerError;

/// Draw an index with probability `weight / total`.
///
/// A total of zero falls back to a uniform draw. A total that overflowed is
/// recomputed on weights scaled by the largest one, so the proportions are
/// kept for this draw without touching the records.
pub fn select_index<R: Rng + ?Sized>(
    words: &[WordRecord],
    rng: &mut R,
) -> Result<usize, SchedulerError> {
    if words.is_empty() {
        return Err(SchedulerError::EmptyWorkingSet);
    }

    let weights: Vec<f64> = words.iter().map(|w| usable(w.weight)).collect();
    let mut total: f64 = weights.iter().sum();
    let mut scale = 1.0;

    if !total.is_finite() {
        let largest = weights.iter().copied().fold(0.0, f64::max);
        scale = largest;
        total = weights.iter().map(|w| w / scale).sum();
    }

    if total <= 0.0 {
        return Ok(rng.gen_range(0..words.len()));
    }

    Ok(pick_weighted(&weights, scale, total, rng))
}

fn pick_weighted<R: Rng + ?Sized>(weights: &[f64], scale: f64, total: f64, rng: &mut R) -> usize {
    let mut roll = rng.gen_range(0.0..total);
    let mut last_positive = 0;
    for (idx, raw) in weights.iter().enumerate() {
        let weight = raw / scale;
        if weight <= 0.0 {
            continue;
        }
        if roll < weight {
            return idx;
        }
        roll -= weight;
        last_positive = idx;
    }
    // Rounding can leave a sliver of `roll` past the final weight.
    last_positive
}

/// NaN and negatives carry no probability mass; infinity counts as the largest float.
fn usable(weight: f64) -> f64 {
    if weight.is_nan() || weight < 0.0 {
        0.0
    } else {
        weight.min(f64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn words(weights: &[f64]) -> Vec<WordRecord> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                WordRecord::new(&format!("w{i}"), &format!("t{i}"), "Dutch", "English")
                    .with_weight(w)
            })
            .collect()
    }

    fn histogram(set: &[WordRecord], draws: usize, seed: u64) -> Vec<usize> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut counts = vec![0; set.len()];
        for _ in 0..draws {
            counts[select_index(set, &mut rng).unwrap()] += 1;
        }
        counts
    }

    #[test]
    fn test_empty_working_set_is_an_error() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(select_index(&[], &mut rng), Err(SchedulerError::EmptyWorkingSet));
    }

    #[test]
    fn test_always_returns_member_of_set() {
        let set = words(&[1.0, 0.5, 8.0, 1e-300]);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..2000 {
            assert!(select_index(&set, &mut rng).unwrap() < set.len());
        }
    }

    #[test]
    fn test_draws_follow_weights() {
        let set = words(&[1.0, 3.0]);
        let counts = histogram(&set, 20_000, 42);
        let heavy_share = counts[1] as f64 / 20_000.0;
        assert!(
            (heavy_share - 0.75).abs() < 0.02,
            "expected ~75% for the heavy word, got {heavy_share}"
        );
    }

    #[test]
    fn test_zero_weight_never_drawn_beside_positive() {
        let set = words(&[0.0, 1.0, 0.0]);
        let counts = histogram(&set, 1000, 3);
        assert_eq!(counts[0], 0);
        assert_eq!(counts[2], 0);
        assert_eq!(counts[1], 1000);
    }

    #[test]
    fn test_all_zero_weights_draw_uniformly() {
        let set = words(&[0.0, 0.0, 0.0, 0.0]);
        let counts = histogram(&set, 4000, 9);
        for count in counts {
            assert!(count > 800, "uniform fallback starved a word: {count}");
        }
    }

    #[test]
    fn test_overflowing_total_keeps_proportions() {
        let set = words(&[f64::MAX, f64::MAX, 1.0]);
        let counts = histogram(&set, 4000, 11);
        assert!(counts[0] > 1600);
        assert!(counts[1] > 1600);
        assert_eq!(counts[2], 0);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let set = words(&[1.0, 2.0, 3.0, 4.0]);
        let mut a = SmallRng::seed_from_u64(5);
        let mut b = SmallRng::seed_from_u64(5);
        let seq_a: Vec<usize> = (0..50).map(|_| select_index(&set, &mut a).unwrap()).collect();
        let seq_b: Vec<usize> = (0..50).map(|_| select_index(&set, &mut b).unwrap()).collect();
        assert_eq!(seq_a, seq_b);
    }
}
