//! TOML exam sheet parser.
//!
//! An exam sheet describes one exam lesson by lesson, the detailed
//! counterpart of quick entry:
//!
//! ```toml
//! [exam]
//! name = "Deneme 4"
//! date = "2025-03-09"
//!
//! [[lessons]]
//! name = "Anatomi"
//! tier = "basic"
//! correct = 14
//! incorrect = 3
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::model::{standard_lessons, ExamRecord, LessonResult, ScienceTier};
use crate::validation::validate_tier_counts;

#[derive(Debug, Deserialize)]
struct TomlExamSheet {
    exam: TomlExamHeader,
    #[serde(default)]
    lessons: Vec<TomlLesson>,
}

#[derive(Debug, Deserialize)]
struct TomlExamHeader {
    name: String,
    #[serde(default)]
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct TomlLesson {
    name: String,
    tier: String,
    #[serde(default)]
    correct: i64,
    #[serde(default)]
    incorrect: i64,
}

/// Parse an exam sheet file into a record.
///
/// Sheets without a date are dated `default_date`.
pub fn parse_exam_sheet(
    path: &Path,
    max_questions_per_tier: u32,
    default_date: DateTime<Utc>,
) -> Result<ExamRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam sheet: {}", path.display()))?;

    parse_exam_sheet_str(&content, path, max_questions_per_tier, default_date)
}

/// Parse exam sheet TOML (useful for testing).
pub fn parse_exam_sheet_str(
    content: &str,
    source_path: &Path,
    max_questions_per_tier: u32,
    default_date: DateTime<Utc>,
) -> Result<ExamRecord> {
    let parsed: TomlExamSheet = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    anyhow::ensure!(
        !parsed.exam.name.trim().is_empty(),
        "exam name must not be empty in {}",
        source_path.display()
    );

    let mut tier_totals: HashMap<ScienceTier, (i64, i64)> = HashMap::new();
    let results = parsed
        .lessons
        .into_iter()
        .map(|l| -> Result<LessonResult> {
            let tier: ScienceTier = l
                .tier
                .parse()
                .map_err(|e: String| anyhow::anyhow!("lesson '{}': {}", l.name, e))?;
            let counts = validate_tier_counts(tier, l.correct, l.incorrect, max_questions_per_tier)
                .with_context(|| format!("lesson '{}'", l.name))?;

            let total = tier_totals.entry(tier).or_default();
            total.0 += l.correct;
            total.1 += l.incorrect;

            Ok(LessonResult::new(l.name, tier, counts.correct, counts.incorrect)?)
        })
        .collect::<Result<Vec<_>>>()?;

    for (tier, (correct, incorrect)) in tier_totals {
        validate_tier_counts(tier, correct, incorrect, max_questions_per_tier)
            .with_context(|| format!("exam sheet {}", source_path.display()))?;
    }

    let date = parsed
        .exam
        .date
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or(default_date);

    Ok(ExamRecord::new(parsed.exam.name, date, results))
}

/// A warning from exam sheet validation.
#[derive(Debug, Clone)]
pub struct SheetWarning {
    /// The lesson concerned (if applicable).
    pub lesson: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a parsed exam for unusual but valid content.
pub fn validate_exam(record: &ExamRecord) -> Vec<SheetWarning> {
    let mut warnings = Vec::new();

    if record.results().is_empty() {
        warnings.push(SheetWarning {
            lesson: None,
            message: "exam has no lesson results".into(),
        });
    }

    // Check for duplicate lesson names
    let mut seen = HashSet::new();
    for result in record.results() {
        if !seen.insert(result.lesson_name.as_str()) {
            warnings.push(SheetWarning {
                lesson: Some(result.lesson_name.clone()),
                message: format!("duplicate lesson: {}", result.lesson_name),
            });
        }
    }

    // Check lessons against the standard layout
    let standard: HashMap<&str, ScienceTier> = standard_lessons()
        .iter()
        .map(|l| (l.name, l.tier))
        .collect();
    for result in record.results() {
        match standard.get(result.lesson_name.as_str()) {
            None => warnings.push(SheetWarning {
                lesson: Some(result.lesson_name.clone()),
                message: "not a standard lesson".into(),
            }),
            Some(tier) if *tier != result.tier => warnings.push(SheetWarning {
                lesson: Some(result.lesson_name.clone()),
                message: format!("standard lesson is {tier}, sheet says {}", result.tier),
            }),
            Some(_) => {}
        }
    }

    warnings
}
