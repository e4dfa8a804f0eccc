//! Reference population statistics per exam period.
//!
//! The catalog is loaded once and never mutated. A missing or malformed
//! dataset leaves an empty catalog behind instead of failing the caller: every
//! lookup then reports "not found".

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::ScienceTier;

/// Statistics dataset shipped with the crate.
const BUNDLED_DATASET: &str = include_str!("../data/period_statistics.json");

/// Population mean and standard deviation of net scores for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierStatistics {
    #[serde(rename = "ortalama")]
    pub mean: f64,
    #[serde(rename = "standartSapma")]
    pub std_dev: f64,
}

impl TierStatistics {
    /// A tier can normalize scores only with a positive standard deviation.
    pub fn is_usable(&self) -> bool {
        self.std_dev > 0.0
    }
}

/// One historical administration of the exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStatistics {
    /// Unique period identifier (e.g. "2024-1").
    pub id: String,
    /// Display name.
    pub name: String,
    pub year: i32,
    /// Index of the administration within its year.
    pub period: u32,
    #[serde(default)]
    pub exam_date: String,
    #[serde(rename = "temel")]
    pub basic: TierStatistics,
    #[serde(rename = "klinik")]
    pub clinical: TierStatistics,
}

impl PeriodStatistics {
    pub fn tier(&self, tier: ScienceTier) -> &TierStatistics {
        match tier {
            ScienceTier::Basic => &self.basic,
            ScienceTier::Clinical => &self.clinical,
        }
    }
}

/// Human-readable description of the scoring formula, as free text or as
/// named parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormulaDoc {
    Text(String),
    Fields(BTreeMap<String, String>),
}

/// Documentation fields of the dataset. Not used in any computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<FormulaDoc>,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsDataset {
    #[serde(flatten)]
    info: DatasetInfo,
    exam_periods: Vec<PeriodStatistics>,
}

/// Immutable, ordered catalog of period statistics.
#[derive(Debug, Clone, Default)]
pub struct PeriodCatalog {
    periods: Vec<PeriodStatistics>,
    info: DatasetInfo,
}

impl PeriodCatalog {
    /// The degraded catalog: no periods, every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from periods in order. Later duplicates of an id are dropped.
    pub fn new(periods: Vec<PeriodStatistics>) -> Self {
        Self::with_info(periods, DatasetInfo::default())
    }

    pub fn with_info(periods: Vec<PeriodStatistics>, info: DatasetInfo) -> Self {
        let mut seen = HashSet::new();
        let periods = periods
            .into_iter()
            .filter(|p| {
                let first = seen.insert(p.id.clone());
                if !first {
                    tracing::warn!("dropping duplicate exam period '{}'", p.id);
                }
                first
            })
            .collect();
        Self { periods, info }
    }

    /// Parse a statistics dataset document.
    pub fn parse_str(json: &str) -> Result<Self, CatalogError> {
        let dataset: StatisticsDataset =
            serde_json::from_str(json).map_err(|source| CatalogError::Malformed { source })?;
        Ok(Self::with_info(dataset.exam_periods, dataset.info))
    }

    /// Load a dataset file, reporting why it could not be used.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse_str(&content)?;
        tracing::info!(
            "loaded {} exam periods from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Load a dataset file, falling back to the empty catalog on any error.
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("statistics unavailable, continuing with an empty catalog: {e}");
            Self::empty()
        })
    }

    /// The dataset compiled into the crate.
    pub fn bundled() -> Self {
        Self::parse_str(BUNDLED_DATASET).unwrap_or_else(|e| {
            tracing::warn!("bundled statistics unusable, continuing with an empty catalog: {e}");
            Self::empty()
        })
    }

    /// All periods in dataset order. Each call starts a fresh pass.
    pub fn all_periods(&self) -> std::slice::Iter<'_, PeriodStatistics> {
        self.periods.iter()
    }

    /// Look up a period by id.
    pub fn find(&self, period_id: &str) -> Option<&PeriodStatistics> {
        self.periods.iter().find(|p| p.id == period_id)
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }
}

/// A display-level problem found in a catalog.
#[derive(Debug, Clone)]
pub struct CatalogWarning {
    /// The period concerned, if any.
    pub period_id: Option<String>,
    pub message: String,
}

/// Check a catalog for periods that can be listed but not scored.
pub fn validate_catalog(catalog: &PeriodCatalog) -> Vec<CatalogWarning> {
    let mut warnings = Vec::new();

    if catalog.is_empty() {
        warnings.push(CatalogWarning {
            period_id: None,
            message: "catalog has no exam periods".into(),
        });
    }

    for period in catalog.all_periods() {
        if period.name.trim().is_empty() {
            warnings.push(CatalogWarning {
                period_id: Some(period.id.clone()),
                message: "period name is empty".into(),
            });
        }
        for tier in [ScienceTier::Basic, ScienceTier::Clinical] {
            let stats = period.tier(tier);
            if !stats.is_usable() {
                warnings.push(CatalogWarning {
                    period_id: Some(period.id.clone()),
                    message: format!(
                        "{tier} standard deviation {} cannot be used for scoring",
                        stats.std_dev
                    ),
                });
            }
        }
    }

    warnings
}
