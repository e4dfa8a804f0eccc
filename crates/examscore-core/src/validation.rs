//! Checks on raw answer counts before they reach the engine.
//!
//! The engine trusts its inputs. Entry points that accept user input run
//! these checks first.

use crate::error::{CountField, ValidationError};
use crate::model::{ScienceTier, TierCounts};

/// Questions per tier in a standard exam.
pub const DEFAULT_MAX_QUESTIONS_PER_TIER: u32 = 100;

/// Validate one tier's raw counts and convert them to checked counts.
///
/// Rejects negative counts and a correct + incorrect total above `max_questions`.
pub fn validate_tier_counts(
    tier: ScienceTier,
    correct: i64,
    incorrect: i64,
    max_questions: u32,
) -> Result<TierCounts, ValidationError> {
    let correct = non_negative(tier, CountField::Correct, correct)?;
    let incorrect = non_negative(tier, CountField::Incorrect, incorrect)?;

    let total = correct + incorrect;
    if total > u64::from(max_questions) {
        return Err(ValidationError::ExceedsMaximum {
            tier,
            total,
            max: max_questions,
        });
    }

    // Both fit in u32: each is at most max_questions.
    Ok(TierCounts::new(correct as u32, incorrect as u32))
}

fn non_negative(tier: ScienceTier, field: CountField, value: i64) -> Result<u64, ValidationError> {
    u64::try_from(value).map_err(|_| ValidationError::NegativeCount { tier, field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_counts_within_limit() {
        let counts = validate_tier_counts(ScienceTier::Basic, 80, 20, 100).unwrap();
        assert_eq!(counts, TierCounts::new(80, 20));

        let counts = validate_tier_counts(ScienceTier::Clinical, 0, 0, 100).unwrap();
        assert_eq!(counts, TierCounts::default());
    }

    #[test]
    fn rejects_negative_counts() {
        assert_eq!(
            validate_tier_counts(ScienceTier::Basic, -1, 0, 100),
            Err(ValidationError::NegativeCount {
                tier: ScienceTier::Basic,
                field: CountField::Correct,
                value: -1,
            })
        );
        assert!(matches!(
            validate_tier_counts(ScienceTier::Clinical, 5, -7, 100),
            Err(ValidationError::NegativeCount {
                field: CountField::Incorrect,
                ..
            })
        ));
    }

    #[test]
    fn rejects_total_over_maximum() {
        assert_eq!(
            validate_tier_counts(ScienceTier::Clinical, 70, 31, 100),
            Err(ValidationError::ExceedsMaximum {
                tier: ScienceTier::Clinical,
                total: 101,
                max: 100,
            })
        );
    }

    #[test]
    fn custom_maximum() {
        assert!(validate_tier_counts(ScienceTier::Basic, 120, 0, 120).is_ok());
        assert!(validate_tier_counts(ScienceTier::Basic, 120, 1, 120).is_err());
    }

    #[test]
    fn huge_inputs_do_not_overflow() {
        assert!(matches!(
            validate_tier_counts(ScienceTier::Basic, i64::MAX, i64::MAX, 100),
            Err(ValidationError::ExceedsMaximum { .. })
        ));
    }
}
