//! The `examscore score` command.

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use examscore_core::aggregate::placement_score;
use examscore_core::config::ExamscoreConfig;
use examscore_core::model::ScienceTier;
use examscore_core::net::net;
use examscore_core::scorer::{AnswerCounts, MultiPeriodScorer, ScoreResult};
use examscore_core::validation::validate_tier_counts;

/// `raw` holds basic correct, basic incorrect, clinical correct, clinical incorrect.
pub fn execute(
    settings: &ExamscoreConfig,
    raw: [i64; 4],
    period: Option<String>,
    format: String,
) -> Result<()> {
    let [basic_correct, basic_incorrect, clinical_correct, clinical_incorrect] = raw;
    let max = settings.max_questions_per_tier;
    let basic = validate_tier_counts(ScienceTier::Basic, basic_correct, basic_incorrect, max)?;
    let clinical = validate_tier_counts(
        ScienceTier::Clinical,
        clinical_correct,
        clinical_incorrect,
        max,
    )?;
    let counts = AnswerCounts::from_tiers(basic, clinical);

    let catalog = settings.catalog();
    let scorer = MultiPeriodScorer::new(&catalog);

    let results: Vec<ScoreResult> = match &period {
        Some(id) => vec![scorer
            .calculate_score(counts, id)
            .with_context(|| format!("cannot score against period '{id}'"))?],
        None => scorer.calculate_for_all_periods(counts).collect(),
    };

    // clap restricts `format` to "text" and "json"
    match format.as_str() {
        "json" => {
            if period.is_some() {
                println!("{}", serde_json::to_string_pretty(&results[0])?);
            } else {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        _ => {
            let basic_net = net(counts.basic_correct, counts.basic_incorrect);
            let clinical_net = net(counts.clinical_correct, counts.clinical_incorrect);
            println!("Basic net: {basic_net:.2}");
            println!("Clinical net: {clinical_net:.2}");
            println!(
                "Placement score: {:.2}",
                placement_score(basic_net, clinical_net)
            );

            if results.is_empty() {
                println!("\nNo exam periods available for standard scores.");
            } else {
                println!("\n{}", score_table(&results));
            }
        }
    }

    Ok(())
}

/// Render per-period scores as a table.
pub fn score_table(results: &[ScoreResult]) -> comfy_table::Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Period",
        "Basic SP",
        "Clinical SP",
        "T score",
        "K score",
        "Eligible",
    ]);

    for r in results {
        table.add_row(vec![
            Cell::new(&r.period_name),
            Cell::new(format!("{:.2}", r.basic_standard_score)),
            Cell::new(format!("{:.2}", r.clinical_standard_score)),
            Cell::new(format!("{:.2}", r.composite_a)),
            Cell::new(format!("{:.2}", r.composite_b)),
            Cell::new(if r.eligible { "yes" } else { "no" }),
        ]);
    }

    table
}
