//! The `examscore init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create examscore.toml
    if std::path::Path::new("examscore.toml").exists() {
        println!("examscore.toml already exists, skipping.");
    } else {
        std::fs::write("examscore.toml", SAMPLE_CONFIG)?;
        println!("Created examscore.toml");
    }

    // Create example exam sheet
    std::fs::create_dir_all("exam-sheets")?;
    let example_path = std::path::Path::new("exam-sheets/example.toml");
    if example_path.exists() {
        println!("exam-sheets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SHEET)?;
        println!("Created exam-sheets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: examscore periods");
    println!("  2. Run: examscore exam add --sheet exam-sheets/example.toml");
    println!("  3. Run: examscore exam list");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examscore configuration

# Period statistics dataset; the bundled dataset is used when unset.
# statistics_path = "${HOME}/.config/examscore/period_statistics.json"

archive_path = "./examscore-data/exams.json"
max_questions_per_tier = 100
"#;

const EXAMPLE_SHEET: &str = r#"[exam]
name = "Example Trial Exam"
date = "2025-03-09"

[[lessons]]
name = "Anatomi"
tier = "basic"
correct = 14
incorrect = 3

[[lessons]]
name = "Fizyoloji-Histoloji-Embriyoloji"
tier = "basic"
correct = 11
incorrect = 4

[[lessons]]
name = "Biyokimya"
tier = "basic"
correct = 12
incorrect = 5

[[lessons]]
name = "Mikrobiyoloji"
tier = "basic"
correct = 13
incorrect = 2

[[lessons]]
name = "Patoloji"
tier = "basic"
correct = 12
incorrect = 3

[[lessons]]
name = "Farmakoloji"
tier = "basic"
correct = 11
incorrect = 4

[[lessons]]
name = "Dahiliye"
tier = "clinical"
correct = 22
incorrect = 5

[[lessons]]
name = "Pediatri"
tier = "clinical"
correct = 17
incorrect = 4

[[lessons]]
name = "Genel Cerrahi"
tier = "clinical"
correct = 15
incorrect = 5

[[lessons]]
name = "Kadın Doğum"
tier = "clinical"
correct = 8
incorrect = 2

[[lessons]]
name = "Küçük Stajlar"
tier = "clinical"
correct = 13
incorrect = 5
"#;
