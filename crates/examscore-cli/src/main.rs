//! The examscore command-line interface.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use examscore_core::config::ExamscoreConfig;
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(
    name = "examscore",
    version,
    about = "Exam net, placement and multi-period standard score calculator"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Period statistics dataset (overrides the config)
    #[arg(long, global = true)]
    statistics: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the exam periods in the statistics catalog
    Periods {
        /// Report problems in the catalog
        #[arg(long)]
        check: bool,
    },

    /// Score answer counts against one or all exam periods
    Score {
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        basic_correct: i64,

        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        basic_incorrect: i64,

        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        clinical_correct: i64,

        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        clinical_incorrect: i64,

        /// Period id (e.g. "2024-2"); all periods when omitted
        #[arg(long)]
        period: Option<String>,

        /// Output format
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Manage saved exams
    Exam {
        #[command(subcommand)]
        action: ExamCommand,
    },

    /// Create starter config and example exam sheet
    Init,
}

#[derive(Subcommand)]
enum ExamCommand {
    /// Record an exam from a sheet or from per-tier totals
    Add {
        /// Exam name (required without --sheet)
        #[arg(long)]
        name: Option<String>,

        /// Exam date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// TOML exam sheet with per-lesson results
        #[arg(
            long,
            conflicts_with_all = [
                "basic_correct",
                "basic_incorrect",
                "clinical_correct",
                "clinical_incorrect",
            ]
        )]
        sheet: Option<PathBuf>,

        #[arg(long, allow_negative_numbers = true)]
        basic_correct: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        basic_incorrect: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        clinical_correct: Option<i64>,

        #[arg(long, allow_negative_numbers = true)]
        clinical_incorrect: Option<i64>,
    },

    /// List saved exams
    List {
        /// Oldest/lowest first
        #[arg(long)]
        ascending: bool,

        /// Sort key: date, name, score
        #[arg(long, default_value = "date")]
        sort: String,
    },

    /// Show one exam with its lesson results and period scores
    Show {
        #[arg(long)]
        id: Uuid,
    },

    /// Delete an exam and its lesson results
    Remove {
        #[arg(long)]
        id: Uuid,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("examscore=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        command => commands::load_settings(cli.config.as_deref(), cli.statistics)
            .and_then(|settings| run(command, &settings)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Commands, settings: &ExamscoreConfig) -> anyhow::Result<()> {
    match command {
        Commands::Periods { check } => commands::periods::execute(settings, check),
        Commands::Score {
            basic_correct,
            basic_incorrect,
            clinical_correct,
            clinical_incorrect,
            period,
            format,
        } => commands::score::execute(
            settings,
            [
                basic_correct,
                basic_incorrect,
                clinical_correct,
                clinical_incorrect,
            ],
            period,
            format,
        ),
        Commands::Exam { action } => match action {
            ExamCommand::Add {
                name,
                date,
                sheet,
                basic_correct,
                basic_incorrect,
                clinical_correct,
                clinical_incorrect,
            } => commands::exam::add(
                settings,
                name,
                date,
                sheet,
                [
                    basic_correct,
                    basic_incorrect,
                    clinical_correct,
                    clinical_incorrect,
                ],
            ),
            ExamCommand::List { ascending, sort } => {
                commands::exam::list(settings, ascending, sort)
            }
            ExamCommand::Show { id } => commands::exam::show(settings, id),
            ExamCommand::Remove { id } => commands::exam::remove(settings, id),
        },
        Commands::Init => commands::init::execute(),
    }
}
