//! Multi-period standardized scoring.
//!
//! Converts raw answer counts into z-scores against each period's population
//! statistics, then into standard scores (mean 50, spread 10) and the two
//! weighted composites used for placement:
//!
//! - T = 0.7 * basic standard score + 0.3 * clinical standard score
//! - K = 0.3 * basic standard score + 0.7 * clinical standard score

use serde::{Deserialize, Serialize};

use crate::aggregate::ExamTotals;
use crate::error::ScoringError;
use crate::model::{ScienceTier, TierCounts};
use crate::net::net;
use crate::statistics::{PeriodCatalog, PeriodStatistics, TierStatistics};

/// Mean of the standard score scale.
pub const STANDARD_SCORE_MEAN: f64 = 50.0;
/// Points of standard score per standard deviation.
pub const STANDARD_SCORE_SPREAD: f64 = 10.0;
/// Tier weights of the T composite.
pub const COMPOSITE_A_WEIGHTS: CompositeWeights = CompositeWeights {
    basic: 0.7,
    clinical: 0.3,
};
/// Tier weights of the K composite.
pub const COMPOSITE_B_WEIGHTS: CompositeWeights = CompositeWeights {
    basic: 0.3,
    clinical: 0.7,
};
/// Both composites must reach this for placement eligibility.
pub const ELIGIBILITY_THRESHOLD: f64 = 45.0;

/// Weights blending the two tiers' standard scores into a composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeWeights {
    pub basic: f64,
    pub clinical: f64,
}

impl CompositeWeights {
    pub fn apply(&self, basic_standard_score: f64, clinical_standard_score: f64) -> f64 {
        basic_standard_score * self.basic + clinical_standard_score * self.clinical
    }
}

/// Raw answer counts for both tiers of one exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerCounts {
    pub basic_correct: u64,
    pub basic_incorrect: u64,
    pub clinical_correct: u64,
    pub clinical_incorrect: u64,
}

impl AnswerCounts {
    pub fn new(
        basic_correct: u64,
        basic_incorrect: u64,
        clinical_correct: u64,
        clinical_incorrect: u64,
    ) -> Self {
        Self {
            basic_correct,
            basic_incorrect,
            clinical_correct,
            clinical_incorrect,
        }
    }

    pub fn from_tiers(basic: TierCounts, clinical: TierCounts) -> Self {
        Self::new(
            u64::from(basic.correct),
            u64::from(basic.incorrect),
            u64::from(clinical.correct),
            u64::from(clinical.incorrect),
        )
    }
}

impl From<&ExamTotals> for AnswerCounts {
    fn from(totals: &ExamTotals) -> Self {
        Self::new(
            totals.basic_correct,
            totals.basic_incorrect,
            totals.clinical_correct,
            totals.clinical_incorrect,
        )
    }
}

/// Standardized result of one exam against one period. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub period_id: String,
    pub period_name: String,
    pub basic_net: f64,
    pub clinical_net: f64,
    pub basic_standard_score: f64,
    pub clinical_standard_score: f64,
    /// "T" composite, weighted toward basic sciences.
    pub composite_a: f64,
    /// "K" composite, weighted toward clinical sciences.
    pub composite_b: f64,
    pub eligible: bool,
}

/// Scores answer counts against the periods of a catalog.
#[derive(Debug, Clone, Copy)]
pub struct MultiPeriodScorer<'a> {
    catalog: &'a PeriodCatalog,
}

impl<'a> MultiPeriodScorer<'a> {
    pub fn new(catalog: &'a PeriodCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a PeriodCatalog {
        self.catalog
    }

    /// Score against a single period.
    pub fn calculate_score(
        &self,
        counts: AnswerCounts,
        period_id: &str,
    ) -> Result<ScoreResult, ScoringError> {
        let period = self
            .catalog
            .find(period_id)
            .ok_or_else(|| ScoringError::PeriodNotFound(period_id.to_string()))?;
        score_period(period, counts)
    }

    /// Score against every period in catalog order.
    ///
    /// Periods whose statistics cannot normalize a score are left out. The
    /// returned iterator is lazy and can be cloned to run the pass again.
    pub fn calculate_for_all_periods(
        &self,
        counts: AnswerCounts,
    ) -> impl Iterator<Item = ScoreResult> + Clone + 'a {
        self.catalog
            .all_periods()
            .filter_map(move |period| match score_period(period, counts) {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::debug!("omitting period from batch: {e}");
                    None
                }
            })
    }
}

/// Score raw counts against one period's statistics.
pub fn score_period(
    period: &PeriodStatistics,
    counts: AnswerCounts,
) -> Result<ScoreResult, ScoringError> {
    let basic_net = net(counts.basic_correct, counts.basic_incorrect);
    let clinical_net = net(counts.clinical_correct, counts.clinical_incorrect);

    let basic = usable_tier(period, ScienceTier::Basic)?;
    let clinical = usable_tier(period, ScienceTier::Clinical)?;

    let basic_standard_score = standard_score(z_score(basic_net, basic));
    let clinical_standard_score = standard_score(z_score(clinical_net, clinical));

    let composite_a = COMPOSITE_A_WEIGHTS.apply(basic_standard_score, clinical_standard_score);
    let composite_b = COMPOSITE_B_WEIGHTS.apply(basic_standard_score, clinical_standard_score);

    Ok(ScoreResult {
        period_id: period.id.clone(),
        period_name: period.name.clone(),
        basic_net,
        clinical_net,
        basic_standard_score,
        clinical_standard_score,
        composite_a,
        composite_b,
        eligible: composite_a >= ELIGIBILITY_THRESHOLD && composite_b >= ELIGIBILITY_THRESHOLD,
    })
}

fn usable_tier(
    period: &PeriodStatistics,
    tier: ScienceTier,
) -> Result<&TierStatistics, ScoringError> {
    let stats = period.tier(tier);
    if stats.is_usable() {
        Ok(stats)
    } else {
        Err(ScoringError::InvalidStatistics {
            period_id: period.id.clone(),
            tier,
            std_dev: stats.std_dev,
        })
    }
}

/// (value - mean) / standard deviation.
pub fn z_score(value: f64, stats: &TierStatistics) -> f64 {
    (value - stats.mean) / stats.std_dev
}

/// Rescale a z-score to mean 50, spread 10.
pub fn standard_score(z: f64) -> f64 {
    STANDARD_SCORE_MEAN + STANDARD_SCORE_SPREAD * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn period(id: &str, basic: (f64, f64), clinical: (f64, f64)) -> PeriodStatistics {
        PeriodStatistics {
            id: id.into(),
            name: format!("Period {id}"),
            year: 2024,
            period: 1,
            exam_date: String::new(),
            basic: TierStatistics {
                mean: basic.0,
                std_dev: basic.1,
            },
            clinical: TierStatistics {
                mean: clinical.0,
                std_dev: clinical.1,
            },
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn z_score_and_standard_score() {
        let catalog = PeriodCatalog::new(vec![period("p", (60.0, 10.0), (40.0, 20.0))]);
        let scorer = MultiPeriodScorer::new(&catalog);

        let result = scorer
            .calculate_score(AnswerCounts::new(70, 0, 40, 0), "p")
            .unwrap();
        assert_eq!(result.basic_net, 70.0);
        assert_eq!(result.basic_standard_score, 60.0);
        assert_eq!(result.clinical_standard_score, 50.0);
        assert!(approx(result.composite_a, 57.0));
        assert!(approx(result.composite_b, 53.0));
        assert!(result.eligible);
        assert_eq!(result.period_name, "Period p");
    }

    #[test]
    fn nets_use_quarter_penalty() {
        let catalog = PeriodCatalog::new(vec![period("p", (0.0, 1.0), (0.0, 1.0))]);
        let result = MultiPeriodScorer::new(&catalog)
            .calculate_score(AnswerCounts::new(10, 2, 5, 1), "p")
            .unwrap();
        assert_eq!(result.basic_net, 9.5);
        assert_eq!(result.clinical_net, 4.75);
    }

    #[test]
    fn unknown_period_is_not_found() {
        let catalog = PeriodCatalog::new(vec![period("p", (60.0, 10.0), (40.0, 20.0))]);
        let err = MultiPeriodScorer::new(&catalog)
            .calculate_score(AnswerCounts::default(), "missing")
            .unwrap_err();
        assert_eq!(err, ScoringError::PeriodNotFound("missing".into()));
    }

    #[test]
    fn empty_catalog_finds_nothing() {
        let catalog = PeriodCatalog::empty();
        let scorer = MultiPeriodScorer::new(&catalog);
        assert!(matches!(
            scorer.calculate_score(AnswerCounts::default(), "2024-1"),
            Err(ScoringError::PeriodNotFound(_))
        ));
        assert_eq!(scorer.calculate_for_all_periods(AnswerCounts::default()).count(), 0);
    }

    #[test]
    fn zero_std_dev_is_invalid_statistics() {
        let catalog = PeriodCatalog::new(vec![
            period("basic-zero", (60.0, 0.0), (40.0, 20.0)),
            period("clinical-negative", (60.0, 10.0), (40.0, -2.0)),
        ]);
        let scorer = MultiPeriodScorer::new(&catalog);

        match scorer.calculate_score(AnswerCounts::default(), "basic-zero") {
            Err(ScoringError::InvalidStatistics { tier, std_dev, .. }) => {
                assert_eq!(tier, ScienceTier::Basic);
                assert_eq!(std_dev, 0.0);
            }
            other => panic!("expected invalid statistics, got {other:?}"),
        }

        match scorer.calculate_score(AnswerCounts::default(), "clinical-negative") {
            Err(ScoringError::InvalidStatistics { tier, .. }) => {
                assert_eq!(tier, ScienceTier::Clinical)
            }
            other => panic!("expected invalid statistics, got {other:?}"),
        }
    }

    #[test]
    fn eligibility_needs_both_composites() {
        // Basic far above the mean, clinical far below: T passes, K does not.
        let catalog = PeriodCatalog::new(vec![period("p", (50.0, 10.0), (50.0, 10.0))]);
        let result = MultiPeriodScorer::new(&catalog)
            .calculate_score(AnswerCounts::new(80, 0, 20, 0), "p")
            .unwrap();
        assert!(approx(result.composite_a, 0.7 * 80.0 + 0.3 * 20.0));
        assert!(approx(result.composite_b, 0.3 * 80.0 + 0.7 * 20.0));
        assert!(result.composite_a >= 45.0);
        assert!(result.composite_b < 45.0);
        assert!(!result.eligible);
    }

    #[test]
    fn below_threshold_on_both_composites() {
        let catalog = PeriodCatalog::new(vec![period("p", (50.0, 10.0), (50.0, 10.0))]);
        let result = MultiPeriodScorer::new(&catalog)
            .calculate_score(AnswerCounts::new(40, 0, 44, 0), "p")
            .unwrap();
        assert_eq!(result.basic_standard_score, 40.0);
        assert!(result.composite_a < 45.0);
        assert!(result.composite_b < 45.0);
        assert!(!result.eligible);
    }

    #[test]
    fn composite_weights_favor_their_tier() {
        assert!(approx(COMPOSITE_A_WEIGHTS.apply(60.0, 40.0), 54.0));
        assert!(approx(COMPOSITE_B_WEIGHTS.apply(60.0, 40.0), 46.0));
    }

    #[test]
    fn batch_skips_invalid_and_keeps_order() {
        let catalog = PeriodCatalog::new(vec![
            period("a", (40.0, 15.0), (45.0, 20.0)),
            period("bad", (40.0, 0.0), (45.0, 20.0)),
            period("b", (38.0, 16.0), (44.0, 18.0)),
            period("c", (36.0, 17.0), (42.0, 0.0)),
            period("d", (39.0, 18.0), (46.0, 19.0)),
        ]);
        let scorer = MultiPeriodScorer::new(&catalog);
        let results: Vec<ScoreResult> = scorer
            .calculate_for_all_periods(AnswerCounts::new(60, 12, 70, 20))
            .collect();

        let ids: Vec<&str> = results.iter().map(|r| r.period_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d"]);

        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn batch_matches_single_period_results() {
        let catalog = PeriodCatalog::bundled();
        let scorer = MultiPeriodScorer::new(&catalog);
        let counts = AnswerCounts::new(55, 20, 62, 16);

        for result in scorer.calculate_for_all_periods(counts) {
            let single = scorer.calculate_score(counts, &result.period_id).unwrap();
            assert_eq!(single, result);
        }
    }

    #[test]
    fn batch_is_restartable() {
        let catalog = PeriodCatalog::bundled();
        let scorer = MultiPeriodScorer::new(&catalog);
        let batch = scorer.calculate_for_all_periods(AnswerCounts::new(50, 10, 50, 10));

        let first: Vec<ScoreResult> = batch.clone().collect();
        let second: Vec<ScoreResult> = batch.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), catalog.len());
    }

    #[test]
    fn counts_from_exam_totals() {
        let record = crate::model::ExamRecord::quick_entry(
            "x",
            chrono::Utc::now(),
            TierCounts::new(30, 8),
            TierCounts::new(40, 4),
        );
        let counts = AnswerCounts::from(record.totals());
        assert_eq!(counts, AnswerCounts::new(30, 8, 40, 4));
        assert_eq!(
            counts,
            AnswerCounts::from_tiers(TierCounts::new(30, 8), TierCounts::new(40, 4))
        );
    }
}
