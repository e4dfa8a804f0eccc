//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::statistics::PeriodCatalog;
use crate::validation::DEFAULT_MAX_QUESTIONS_PER_TIER;

/// Top-level examscore configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamscoreConfig {
    /// Statistics dataset to load. The bundled dataset is used when unset.
    #[serde(default)]
    pub statistics_path: Option<PathBuf>,
    /// JSON archive holding saved exam records.
    #[serde(default = "default_archive_path")]
    pub archive_path: PathBuf,
    /// Upper bound on correct + incorrect answers per tier.
    #[serde(default = "default_max_questions")]
    pub max_questions_per_tier: u32,
}

fn default_archive_path() -> PathBuf {
    PathBuf::from("./examscore-data/exams.json")
}
fn default_max_questions() -> u32 {
    DEFAULT_MAX_QUESTIONS_PER_TIER
}

impl Default for ExamscoreConfig {
    fn default() -> Self {
        Self {
            statistics_path: None,
            archive_path: default_archive_path(),
            max_questions_per_tier: default_max_questions(),
        }
    }
}

impl ExamscoreConfig {
    /// Load the configured period catalog.
    ///
    /// A configured dataset that is missing or malformed yields an empty
    /// catalog, as does a broken bundled dataset.
    pub fn catalog(&self) -> PeriodCatalog {
        match &self.statistics_path {
            Some(path) => PeriodCatalog::load_or_empty(path),
            None => PeriodCatalog::bundled(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never scanned again.
fn resolve_env_vars(s: &str, env: &impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        result.push_str(&env(&rest[start + 2..start + end]).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path, env: &impl Fn(&str) -> Option<String>) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy(), env))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examscore.toml` in the current directory
/// 2. `~/.config/examscore/config.toml`
///
/// Environment variable overrides: `EXAMSCORE_STATISTICS`, `EXAMSCORE_ARCHIVE`.
pub fn load_config() -> Result<ExamscoreConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamscoreConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("examscore.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamscoreConfig::default(),
    };

    Ok(finish(config, |key| std::env::var(key).ok()))
}

/// Parse configuration TOML without applying overrides.
pub fn parse_config_str(content: &str) -> Result<ExamscoreConfig> {
    let config: ExamscoreConfig = toml::from_str(content)?;
    anyhow::ensure!(
        config.max_questions_per_tier > 0,
        "max_questions_per_tier must be positive"
    );
    Ok(config)
}

/// Apply env var overrides, then resolve `${VAR}` references in paths.
fn finish(mut config: ExamscoreConfig, env: impl Fn(&str) -> Option<String>) -> ExamscoreConfig {
    if let Some(path) = env("EXAMSCORE_STATISTICS") {
        config.statistics_path = Some(PathBuf::from(path));
    }
    if let Some(path) = env("EXAMSCORE_ARCHIVE") {
        config.archive_path = PathBuf::from(path);
    }

    config.statistics_path = config
        .statistics_path
        .as_deref()
        .map(|path| resolve_path(path, &env));
    config.archive_path = resolve_path(&config.archive_path, &env);
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examscore"))
}
