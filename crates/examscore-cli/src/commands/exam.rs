//! The `examscore exam` subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use comfy_table::{Cell, Table};
use uuid::Uuid;

use examscore_core::archive::{save_repository, ExamArchive};
use examscore_core::config::ExamscoreConfig;
use examscore_core::model::{ExamRecord, ScienceTier};
use examscore_core::repository::{
    ExamRepository, InMemoryExamRepository, ListOrder, SortDirection, SortKey,
};
use examscore_core::scorer::{AnswerCounts, MultiPeriodScorer, ScoreResult};
use examscore_core::sheet::{parse_exam_sheet, validate_exam};
use examscore_core::validation::validate_tier_counts;

use super::score::score_table;

fn open_repository(settings: &ExamscoreConfig) -> Result<InMemoryExamRepository> {
    ExamArchive::load_or_new(&settings.archive_path)?.into_repository()
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// `quick` holds basic correct, basic incorrect, clinical correct, clinical incorrect.
pub fn add(
    settings: &ExamscoreConfig,
    name: Option<String>,
    date: Option<NaiveDate>,
    sheet: Option<PathBuf>,
    quick: [Option<i64>; 4],
) -> Result<()> {
    let max = settings.max_questions_per_tier;

    let record = match sheet {
        Some(path) => {
            let mut record = parse_exam_sheet(&path, max, Utc::now())?;
            if let Some(name) = name {
                record.set_name(name);
            }
            if let Some(date) = date {
                record.set_date(midnight_utc(date));
            }
            for w in validate_exam(&record) {
                let prefix = w
                    .lesson
                    .as_ref()
                    .map(|l| format!("[{l}] "))
                    .unwrap_or_default();
                println!("{prefix}WARNING: {}", w.message);
            }
            record
        }
        None => {
            let name = name
                .filter(|n| !n.trim().is_empty())
                .context("--name is required when no --sheet is given")?;
            let [bc, bi, cc, ci] = quick.map(|v| v.unwrap_or(0));
            let basic = validate_tier_counts(ScienceTier::Basic, bc, bi, max)?;
            let clinical = validate_tier_counts(ScienceTier::Clinical, cc, ci, max)?;
            let date = date.map(midnight_utc).unwrap_or_else(Utc::now);
            ExamRecord::quick_entry(name, date, basic, clinical)
        }
    };

    let repo = open_repository(settings)?;
    let stored = repo.add(record)?;
    save_repository(&repo, &settings.archive_path)?;

    tracing::info!(
        "saved exam {} to {}",
        stored.id(),
        settings.archive_path.display()
    );
    println!("Added exam '{}' ({})", stored.name(), stored.id());
    println!(
        "Basic net {:.2}, clinical net {:.2}, placement score {:.2}",
        stored.totals().basic_net,
        stored.totals().clinical_net,
        stored.calculated_score()
    );

    Ok(())
}

pub fn list(settings: &ExamscoreConfig, ascending: bool, sort: String) -> Result<()> {
    let key: SortKey = sort.parse().map_err(anyhow::Error::msg)?;
    let direction = if ascending {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };

    let repo = open_repository(settings)?;
    let exams = repo.list(ListOrder::new(key, direction))?;

    if exams.is_empty() {
        println!("No exams recorded. Run `examscore exam add` to record one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Date",
        "Name",
        "Basic net",
        "Clinical net",
        "Score",
    ]);

    for exam in &exams {
        table.add_row(vec![
            Cell::new(exam.id()),
            Cell::new(exam.date().format("%Y-%m-%d")),
            Cell::new(exam.name()),
            Cell::new(format!("{:.2}", exam.totals().basic_net)),
            Cell::new(format!("{:.2}", exam.totals().clinical_net)),
            Cell::new(format!("{:.2}", exam.calculated_score())),
        ]);
    }

    println!("{table}");
    println!("{} exam(s)", exams.len());

    Ok(())
}

pub fn show(settings: &ExamscoreConfig, id: Uuid) -> Result<()> {
    let repo = open_repository(settings)?;
    let exam = repo
        .get(id)?
        .with_context(|| format!("no exam with id {id}"))?;
    let totals = exam.totals();

    println!("{} ({})", exam.name(), exam.date().format("%Y-%m-%d"));
    println!(
        "Basic:    {} correct, {} incorrect, net {:.2}",
        totals.basic_correct, totals.basic_incorrect, totals.basic_net
    );
    println!(
        "Clinical: {} correct, {} incorrect, net {:.2}",
        totals.clinical_correct, totals.clinical_incorrect, totals.clinical_net
    );
    println!("Placement score: {:.2}", exam.calculated_score());

    if !exam.results().is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Lesson", "Tier", "Correct", "Incorrect", "Net"]);
        for r in exam.results() {
            table.add_row(vec![
                Cell::new(&r.lesson_name),
                Cell::new(r.tier),
                Cell::new(r.correct_count),
                Cell::new(r.incorrect_count),
                Cell::new(format!("{:.2}", r.net())),
            ]);
        }
        println!("\n{table}");
    }

    let catalog = settings.catalog();
    let scores: Vec<ScoreResult> = MultiPeriodScorer::new(&catalog)
        .calculate_for_all_periods(AnswerCounts::from(totals))
        .collect();
    if !scores.is_empty() {
        println!("\n{}", score_table(&scores));
    }

    Ok(())
}

pub fn remove(settings: &ExamscoreConfig, id: Uuid) -> Result<()> {
    let repo = open_repository(settings)?;
    let removed = repo.remove(id)?;
    save_repository(&repo, &settings.archive_path)?;

    println!(
        "Removed exam '{}' with {} lesson result(s)",
        removed.name(),
        removed.results().len()
    );

    Ok(())
}
