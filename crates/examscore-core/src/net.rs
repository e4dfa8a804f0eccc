//! Net score: correct answers minus a quarter point per incorrect answer.

/// Number of incorrect answers that cancel one correct answer.
pub const INCORRECT_PENALTY_DIVISOR: f64 = 4.0;

/// Compute the penalized net score.
///
/// net = correct - incorrect / 4
///
/// The division is exact floating-point; nothing is truncated or rounded.
/// Inputs are unbounded and are not validated here.
pub fn net(correct: u64, incorrect: u64) -> f64 {
    correct as f64 - incorrect as f64 / INCORRECT_PENALTY_DIVISOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_answers() {
        assert_eq!(net(0, 0), 0.0);
    }

    #[test]
    fn quarter_point_penalty() {
        assert_eq!(net(80, 20), 75.0);
        assert_eq!(net(0, 4), -1.0);
    }

    #[test]
    fn fractional_penalty_is_not_truncated() {
        assert_eq!(net(10, 1), 9.75);
        assert_eq!(net(0, 3), -0.75);
    }

    #[test]
    fn large_counts() {
        assert_eq!(net(1_000_000, 400_000), 900_000.0);
    }
}
