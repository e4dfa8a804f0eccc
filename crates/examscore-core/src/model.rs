//! Exam records and per-lesson results.
//!
//! An [`ExamRecord`] owns its ordered lesson results. Its aggregate fields are
//! derived state: every mutation of the result list re-runs
//! [`compute_totals`](crate::aggregate::compute_totals) before the method
//! returns, so a record can never be observed with stale totals.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{compute_totals, ExamTotals};
use crate::error::ValidationError;

/// The two broad subject groupings of the exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScienceTier {
    Basic,
    Clinical,
}

impl ScienceTier {
    pub fn is_basic(self) -> bool {
        matches!(self, ScienceTier::Basic)
    }

    /// Map the persisted `isBasicScience` flag to a tier.
    pub fn from_basic_flag(is_basic: bool) -> Self {
        if is_basic {
            ScienceTier::Basic
        } else {
            ScienceTier::Clinical
        }
    }
}

impl fmt::Display for ScienceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScienceTier::Basic => write!(f, "basic"),
            ScienceTier::Clinical => write!(f, "clinical"),
        }
    }
}

impl FromStr for ScienceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" | "temel" => Ok(ScienceTier::Basic),
            "clinical" | "klinik" => Ok(ScienceTier::Clinical),
            other => Err(format!("unknown science tier: {other}")),
        }
    }
}

/// Correct and incorrect answer counts for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TierCounts {
    pub correct: u32,
    pub incorrect: u32,
}

impl TierCounts {
    pub fn new(correct: u32, incorrect: u32) -> Self {
        Self { correct, incorrect }
    }
}

/// Answers given in one lesson of an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonResult {
    pub id: Uuid,
    pub lesson_name: String,
    #[serde(rename = "isBasicScience", with = "tier_flag")]
    pub tier: ScienceTier,
    pub correct_count: u32,
    pub incorrect_count: u32,
}

impl LessonResult {
    /// Create a lesson result with a fresh id. The name must not be blank.
    pub fn new(
        lesson_name: impl Into<String>,
        tier: ScienceTier,
        correct_count: u32,
        incorrect_count: u32,
    ) -> Result<Self, ValidationError> {
        let lesson_name = lesson_name.into();
        if lesson_name.trim().is_empty() {
            return Err(ValidationError::EmptyLessonName);
        }
        Ok(Self::named(lesson_name, tier, correct_count, incorrect_count))
    }

    fn named(
        lesson_name: String,
        tier: ScienceTier,
        correct_count: u32,
        incorrect_count: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            lesson_name,
            tier,
            correct_count,
            incorrect_count,
        }
    }

    /// Net score of this lesson alone.
    pub fn net(&self) -> f64 {
        crate::net::net(
            u64::from(self.correct_count),
            u64::from(self.incorrect_count),
        )
    }
}

/// Persist [`ScienceTier`] as the boolean `isBasicScience` flag.
mod tier_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::ScienceTier;

    pub fn serialize<S: Serializer>(tier: &ScienceTier, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(tier.is_basic())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<ScienceTier, D::Error> {
        bool::deserialize(deserializer).map(ScienceTier::from_basic_flag)
    }
}

/// Lesson name used for the basic-tier summary row of a quick-entry exam.
pub const QUICK_BASIC_LESSON: &str = "Temel (Genel)";
/// Lesson name used for the clinical-tier summary row of a quick-entry exam.
pub const QUICK_CLINICAL_LESSON: &str = "Klinik (Genel)";

/// One exam sitting with its lesson results and derived totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PersistedExamRecord", into = "PersistedExamRecord")]
pub struct ExamRecord {
    id: Uuid,
    date: DateTime<Utc>,
    name: String,
    results: Vec<LessonResult>,
    totals: ExamTotals,
}

impl ExamRecord {
    /// Create a record and aggregate its results.
    pub fn new(name: impl Into<String>, date: DateTime<Utc>, results: Vec<LessonResult>) -> Self {
        Self::with_id(Uuid::new_v4(), name, date, results)
    }

    /// Create a record with a caller-chosen id.
    pub fn with_id(
        id: Uuid,
        name: impl Into<String>,
        date: DateTime<Utc>,
        results: Vec<LessonResult>,
    ) -> Self {
        let totals = compute_totals(&results);
        Self {
            id,
            date,
            name: name.into(),
            results,
            totals,
        }
    }

    /// Create a record from per-tier totals only, one summary lesson per tier.
    pub fn quick_entry(
        name: impl Into<String>,
        date: DateTime<Utc>,
        basic: TierCounts,
        clinical: TierCounts,
    ) -> Self {
        let results = vec![
            LessonResult::named(
                QUICK_BASIC_LESSON.to_string(),
                ScienceTier::Basic,
                basic.correct,
                basic.incorrect,
            ),
            LessonResult::named(
                QUICK_CLINICAL_LESSON.to_string(),
                ScienceTier::Clinical,
                clinical.correct,
                clinical.incorrect,
            ),
        ];
        Self::new(name, date, results)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lesson results in insertion order.
    pub fn results(&self) -> &[LessonResult] {
        &self.results
    }

    /// Aggregates derived from the current results.
    pub fn totals(&self) -> &ExamTotals {
        &self.totals
    }

    pub fn calculated_score(&self) -> f64 {
        self.totals.calculated_score
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = date;
    }

    /// Append a result at the end of the sequence.
    pub fn push_result(&mut self, result: LessonResult) {
        self.results.push(result);
        self.reaggregate();
    }

    /// Remove a result by id, returning it if it was present.
    pub fn remove_result(&mut self, result_id: Uuid) -> Option<LessonResult> {
        let index = self.results.iter().position(|r| r.id == result_id)?;
        let removed = self.results.remove(index);
        self.reaggregate();
        Some(removed)
    }

    /// Change the counts of one result. Returns `false` if the id is unknown.
    pub fn update_counts(&mut self, result_id: Uuid, correct: u32, incorrect: u32) -> bool {
        let Some(result) = self.results.iter_mut().find(|r| r.id == result_id) else {
            return false;
        };
        result.correct_count = correct;
        result.incorrect_count = incorrect;
        self.reaggregate();
        true
    }

    /// Replace the whole result sequence.
    pub fn replace_results(&mut self, results: Vec<LessonResult>) {
        self.results = results;
        self.reaggregate();
    }

    fn reaggregate(&mut self) {
        self.totals = compute_totals(&self.results);
    }
}

/// Stored shape of an exam record. Aggregates are written for readers of the
/// file but recomputed from `results` when read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedExamRecord {
    id: Uuid,
    date: DateTime<Utc>,
    name: String,
    #[serde(default)]
    results: Vec<LessonResult>,
    #[serde(default)]
    basic_correct: u64,
    #[serde(default)]
    basic_incorrect: u64,
    #[serde(default)]
    basic_net: f64,
    #[serde(default)]
    clinical_correct: u64,
    #[serde(default)]
    clinical_incorrect: u64,
    #[serde(default)]
    clinical_net: f64,
    #[serde(default)]
    calculated_score: f64,
}

impl TryFrom<PersistedExamRecord> for ExamRecord {
    type Error = ValidationError;

    fn try_from(stored: PersistedExamRecord) -> Result<Self, Self::Error> {
        if stored.results.iter().any(|r| r.lesson_name.trim().is_empty()) {
            return Err(ValidationError::EmptyLessonName);
        }
        Ok(ExamRecord::with_id(
            stored.id,
            stored.name,
            stored.date,
            stored.results,
        ))
    }
}

impl From<ExamRecord> for PersistedExamRecord {
    fn from(record: ExamRecord) -> Self {
        let totals = record.totals;
        Self {
            id: record.id,
            date: record.date,
            name: record.name,
            results: record.results,
            basic_correct: totals.basic_correct,
            basic_incorrect: totals.basic_incorrect,
            basic_net: totals.basic_net,
            clinical_correct: totals.clinical_correct,
            clinical_incorrect: totals.clinical_incorrect,
            clinical_net: totals.clinical_net,
            calculated_score: totals.calculated_score,
        }
    }
}

/// A lesson of the standard exam layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardLesson {
    pub name: &'static str,
    pub tier: ScienceTier,
}

const fn standard(name: &'static str, tier: ScienceTier) -> StandardLesson {
    StandardLesson { name, tier }
}

const STANDARD_LESSONS: [StandardLesson; 11] = [
    standard("Anatomi", ScienceTier::Basic),
    standard("Fizyoloji-Histoloji-Embriyoloji", ScienceTier::Basic),
    standard("Biyokimya", ScienceTier::Basic),
    standard("Mikrobiyoloji", ScienceTier::Basic),
    standard("Patoloji", ScienceTier::Basic),
    standard("Farmakoloji", ScienceTier::Basic),
    standard("Dahiliye", ScienceTier::Clinical),
    standard("Pediatri", ScienceTier::Clinical),
    standard("Genel Cerrahi", ScienceTier::Clinical),
    standard("Kadın Doğum", ScienceTier::Clinical),
    standard("Küçük Stajlar", ScienceTier::Clinical),
];

/// Lessons of the detailed entry form, basic sciences first, in exam order.
pub fn standard_lessons() -> &'static [StandardLesson] {
    &STANDARD_LESSONS
}
