pub mod exam;
pub mod init;
pub mod periods;
pub mod score;

use std::path::{Path, PathBuf};

use anyhow::Result;
use examscore_core::config::{load_config_from, ExamscoreConfig};

/// Load the config file and apply command-line overrides.
pub fn load_settings(
    config_path: Option<&Path>,
    statistics: Option<PathBuf>,
) -> Result<ExamscoreConfig> {
    let mut settings = load_config_from(config_path)?;
    if let Some(path) = statistics {
        settings.statistics_path = Some(path);
    }
    Ok(settings)
}
