use icu_normalizer::ComposingNormalizerBorrowed;

pub const CORRECT_FACTOR: f64 = 0.5;
pub const INCORRECT_FACTOR: f64 = 2.0;

/// Smallest weight a record may hold. Weights never reach zero.
pub const MIN_WEIGHT: f64 = f64::MIN_POSITIVE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    Skipped,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }

    pub fn factor(self) -> f64 {
        match self {
            Verdict::Correct => CORRECT_FACTOR,
            Verdict::Incorrect | Verdict::Skipped => INCORRECT_FACTOR,
        }
    }
}

/// Multiply by the verdict's factor. The result stays within
/// `MIN_WEIGHT..=f64::MAX`.
pub fn next_weight(weight: f64, verdict: Verdict) -> f64 {
    (weight * verdict.factor()).clamp(MIN_WEIGHT, f64::MAX)
}

fn normalize(text: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    nfc.normalize(text.trim()).to_lowercase()
}

/// Trimmed, case-insensitive exact comparison.
pub fn answers_match(answer: &str, expected: &str) -> bool {
    normalize(answer) == normalize(expected)
}

pub fn judge(answer: &str, expected: &str) -> Verdict {
    if answers_match(answer, expected) {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_halves_incorrect_doubles() {
        for w in [1.0, 0.3, 17.0, 1e-200, 1e200] {
            let down = next_weight(w, Verdict::Correct);
            assert_eq!(down, w * 0.5);
            assert!(down < w);

            let up = next_weight(w, Verdict::Incorrect);
            assert_eq!(up, w * 2.0);
            assert!(up > w);

            assert_eq!(next_weight(w, Verdict::Skipped), up);
        }
    }

    #[test]
    fn test_repeated_halving_stays_positive() {
        let mut w = 1.0;
        for _ in 0..5000 {
            w = next_weight(w, Verdict::Correct);
        }
        assert!(w > 0.0);
        assert_eq!(w, MIN_WEIGHT);
    }

    #[test]
    fn test_repeated_doubling_stays_finite() {
        let mut w = 1.0;
        for _ in 0..5000 {
            w = next_weight(w, Verdict::Incorrect);
        }
        assert!(w.is_finite());
    }

    #[test]
    fn test_comparison_ignores_case_and_outer_whitespace() {
        assert!(answers_match("Hond", "hond"));
        assert!(answers_match(" hond ", "hond"));
        assert!(answers_match("dog", "  DOG\t"));
        assert!(!answers_match("hon", "hond"));
        assert!(!answers_match("ho nd", "hond"));
    }

    #[test]
    fn test_comparison_treats_decomposed_accents_as_equal() {
        assert!(answers_match("cafe\u{301}", "café"));
        assert!(answers_match("CAFÉ", "café"));
        assert!(!answers_match("cafe", "café"));
    }

    #[test]
    fn test_judge() {
        assert_eq!(judge("Dog", "dog"), Verdict::Correct);
        assert_eq!(judge("cat", "dog"), Verdict::Incorrect);
    }
}
