//! Exam record storage contract and an in-memory implementation.
//!
//! Records live in an arena keyed by their id. A record owns its lesson
//! results, so removing a record removes its results with it. Readers only
//! ever receive `Arc` snapshots of fully aggregated records.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::error::RepositoryError;
use crate::model::ExamRecord;

// ---------------------------------------------------------------------------
// Storage contract
// ---------------------------------------------------------------------------

/// Storage backend for exam records.
pub trait ExamRepository: Send + Sync {
    /// Store a new record.
    fn add(&self, record: ExamRecord) -> Result<Arc<ExamRecord>, RepositoryError>;

    /// Remove a record and its lesson results.
    fn remove(&self, id: Uuid) -> Result<Arc<ExamRecord>, RepositoryError>;

    /// All records in the requested order.
    fn list(&self, order: ListOrder) -> Result<Vec<Arc<ExamRecord>>, RepositoryError>;

    /// Fetch one record.
    fn get(&self, id: Uuid) -> Result<Option<Arc<ExamRecord>>, RepositoryError>;
}

/// Field records are sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Name,
    Score,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "name" => Ok(SortKey::Name),
            "score" => Ok(SortKey::Score),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Ordering for [`ExamRepository::list`]. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl ListOrder {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Compare two records under this ordering. Ties fall back to id.
    pub fn compare(&self, a: &ExamRecord, b: &ExamRecord) -> Ordering {
        let ordering = match self.key {
            SortKey::Date => a.date().cmp(&b.date()),
            SortKey::Name => a.name().cmp(b.name()),
            SortKey::Score => a.calculated_score().total_cmp(&b.calculated_score()),
        }
        .then_with(|| a.id().cmp(&b.id()));

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Thread-safe in-memory repository.
///
/// Writers are serialized by the lock; readers share immutable snapshots.
#[derive(Debug, Default)]
pub struct InMemoryExamRepository {
    records: RwLock<HashMap<Uuid, Arc<ExamRecord>>>,
}

impl InMemoryExamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from existing records. Later duplicates of an id are rejected.
    pub fn from_records(
        records: impl IntoIterator<Item = ExamRecord>,
    ) -> Result<Self, RepositoryError> {
        let repo = Self::new();
        for record in records {
            repo.add(record)?;
        }
        Ok(repo)
    }

    /// Apply a mutation to a private copy of a record and publish the result.
    ///
    /// Record mutators re-aggregate before returning, so the published
    /// snapshot is always consistent with its results.
    pub fn update<F>(&self, id: Uuid, mutate: F) -> Result<Arc<ExamRecord>, RepositoryError>
    where
        F: FnOnce(&mut ExamRecord),
    {
        let mut records = self.records.write().map_err(|_| RepositoryError::Poisoned)?;
        let current = records.get(&id).ok_or(RepositoryError::NotFound(id))?;

        let mut next = ExamRecord::clone(current);
        mutate(&mut next);

        let next = Arc::new(next);
        records.insert(id, Arc::clone(&next));
        Ok(next)
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self
            .records
            .read()
            .map_err(|_| RepositoryError::Poisoned)?
            .len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        self.len().map(|n| n == 0)
    }
}

impl ExamRepository for InMemoryExamRepository {
    fn add(&self, record: ExamRecord) -> Result<Arc<ExamRecord>, RepositoryError> {
        let mut records = self.records.write().map_err(|_| RepositoryError::Poisoned)?;
        let id = record.id();
        if records.contains_key(&id) {
            return Err(RepositoryError::DuplicateId(id));
        }
        let record = Arc::new(record);
        records.insert(id, Arc::clone(&record));
        tracing::debug!("stored exam record {id}");
        Ok(record)
    }

    fn remove(&self, id: Uuid) -> Result<Arc<ExamRecord>, RepositoryError> {
        let mut records = self.records.write().map_err(|_| RepositoryError::Poisoned)?;
        let removed = records.remove(&id).ok_or(RepositoryError::NotFound(id))?;
        tracing::debug!(
            "removed exam record {id} with {} lesson results",
            removed.results().len()
        );
        Ok(removed)
    }

    fn list(&self, order: ListOrder) -> Result<Vec<Arc<ExamRecord>>, RepositoryError> {
        let records = self.records.read().map_err(|_| RepositoryError::Poisoned)?;
        let mut listed: Vec<Arc<ExamRecord>> = records.values().cloned().collect();
        drop(records);
        listed.sort_by(|a, b| order.compare(a, b));
        Ok(listed)
    }

    fn get(&self, id: Uuid) -> Result<Option<Arc<ExamRecord>>, RepositoryError> {
        let records = self.records.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(records.get(&id).cloned())
    }
}
