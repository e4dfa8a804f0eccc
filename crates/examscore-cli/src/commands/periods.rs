//! The `examscore periods` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use examscore_core::config::ExamscoreConfig;
use examscore_core::statistics::validate_catalog;

pub fn execute(settings: &ExamscoreConfig, check: bool) -> Result<()> {
    let catalog = settings.catalog();

    if catalog.is_empty() {
        println!("No exam periods available.");
    } else {
        let mut table = Table::new();
        table.set_header(vec![
            "ID",
            "Name",
            "Exam date",
            "Basic mean",
            "Basic SD",
            "Clinical mean",
            "Clinical SD",
        ]);

        for period in catalog.all_periods() {
            table.add_row(vec![
                Cell::new(&period.id),
                Cell::new(&period.name),
                Cell::new(&period.exam_date),
                Cell::new(format!("{:.2}", period.basic.mean)),
                Cell::new(format!("{:.2}", period.basic.std_dev)),
                Cell::new(format!("{:.2}", period.clinical.mean)),
                Cell::new(format!("{:.2}", period.clinical.std_dev)),
            ]);
        }

        println!("{table}");
        println!("{} period(s)", catalog.len());
    }

    if check {
        let warnings = validate_catalog(&catalog);
        for w in &warnings {
            let prefix = w
                .period_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }

        if warnings.is_empty() {
            println!("Catalog valid.");
        } else {
            println!("\n{} warning(s) found.", warnings.len());
        }
    }

    Ok(())
}
