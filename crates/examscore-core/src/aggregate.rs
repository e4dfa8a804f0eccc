//! Exam-level totals and the placement score formula.

use serde::{Deserialize, Serialize};

use crate::model::{LessonResult, ScienceTier};
use crate::net::net;

/// Base of the placement score formula.
pub const PLACEMENT_BASE: f64 = 45.0;
/// Weight of the basic-science net in the placement score.
pub const PLACEMENT_BASIC_COEFFICIENT: f64 = 0.5;
/// Weight of the clinical-science net in the placement score.
pub const PLACEMENT_CLINICAL_COEFFICIENT: f64 = 0.5;
/// Lowest reachable placement score.
pub const PLACEMENT_MIN: f64 = 0.0;
/// Highest reachable placement score.
pub const PLACEMENT_MAX: f64 = 85.0;

/// Totals of one exam, split by science tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExamTotals {
    pub basic_correct: u64,
    pub basic_incorrect: u64,
    pub basic_net: f64,
    pub clinical_correct: u64,
    pub clinical_incorrect: u64,
    pub clinical_net: f64,
    pub calculated_score: f64,
}

impl ExamTotals {
    /// Combined net across both tiers.
    pub fn total_net(&self) -> f64 {
        self.basic_net + self.clinical_net
    }
}

/// Aggregate lesson results into exam totals.
///
/// Counts are summed per tier first and the net is taken from the sums
/// (aggregate-then-net). Summing per-lesson nets instead can round
/// differently when incorrect counts are not multiples of four.
pub fn compute_totals(results: &[LessonResult]) -> ExamTotals {
    let (mut basic_correct, mut basic_incorrect) = (0u64, 0u64);
    let (mut clinical_correct, mut clinical_incorrect) = (0u64, 0u64);

    for result in results {
        let (correct, incorrect) = match result.tier {
            ScienceTier::Basic => (&mut basic_correct, &mut basic_incorrect),
            ScienceTier::Clinical => (&mut clinical_correct, &mut clinical_incorrect),
        };
        *correct += u64::from(result.correct_count);
        *incorrect += u64::from(result.incorrect_count);
    }

    let basic_net = net(basic_correct, basic_incorrect);
    let clinical_net = net(clinical_correct, clinical_incorrect);

    ExamTotals {
        basic_correct,
        basic_incorrect,
        basic_net,
        clinical_correct,
        clinical_incorrect,
        clinical_net,
        calculated_score: placement_score(basic_net, clinical_net),
    }
}

/// Placement score: 45 + 0.5 * basic net + 0.5 * clinical net, clamped to [0, 85].
pub fn placement_score(basic_net: f64, clinical_net: f64) -> f64 {
    let score = PLACEMENT_BASE
        + basic_net * PLACEMENT_BASIC_COEFFICIENT
        + clinical_net * PLACEMENT_CLINICAL_COEFFICIENT;
    score.clamp(PLACEMENT_MIN, PLACEMENT_MAX)
}
