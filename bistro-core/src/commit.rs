//! Applying reconciled pantry changes to a store.
//!
//! Deletions go first and must all settle before anything else is issued, so
//! a stale update can never race a delete of the same id. Creates and updates
//! then run concurrently. Every operation is reported on its own; a failure
//! never hides the others.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::error::{CommitError, StoreError};
use crate::reconcile::PantryChanges;
use crate::store::PantryStore;
use crate::types::{Ingredient, IngredientData, IngredientUpdate};

/// A single store operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change {
    Create(IngredientData),
    Update(IngredientUpdate),
    Delete { id: String },
}

impl Change {
    /// Id or, for creates, the ingredient name.
    pub fn target(&self) -> &str {
        match self {
            Change::Create(data) => &data.name,
            Change::Update(update) => &update.id,
            Change::Delete { id } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedOperation {
    pub change: Change,
    pub error: String,
}

/// Outcome of a commit, one entry per operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommitReport {
    pub deleted: Vec<String>,
    pub created: Vec<Ingredient>,
    pub updated: Vec<String>,
    pub failures: Vec<FailedOperation>,
}

impl CommitReport {
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.created.len() + self.updated.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failed subset, ready to be committed again.
    pub fn retry_changes(&self) -> PantryChanges {
        let mut changes = PantryChanges::default();
        for failure in &self.failures {
            match &failure.change {
                Change::Create(data) => changes.to_create.push(data.clone()),
                Change::Update(update) => changes.to_update.push(update.clone()),
                Change::Delete { id } => changes.to_delete.push(id.clone()),
            }
        }
        changes
    }
}

enum Applied {
    Created(Ingredient),
    Updated(String),
    Deleted(String),
}

async fn apply(store: &dyn PantryStore, change: &Change) -> Result<Applied, StoreError> {
    match change {
        Change::Create(data) => store.add(data.clone()).await.map(Applied::Created),
        Change::Update(update) => {
            if store.update(&update.id, &update.data).await? {
                Ok(Applied::Updated(update.id.clone()))
            } else {
                Err(StoreError::NotFound(update.id.clone()))
            }
        }
        Change::Delete { id } => {
            if !store.delete(id).await? {
                tracing::debug!(id = %id, "ingredient already deleted");
            }
            Ok(Applied::Deleted(id.clone()))
        }
    }
}

/// Run `changes` concurrently and wait for all of them.
async fn run_batch(
    store: &Arc<dyn PantryStore>,
    changes: Vec<Change>,
    report: &mut CommitReport,
) {
    let mut pending: BTreeMap<usize, Change> = BTreeMap::new();
    let mut tasks = JoinSet::new();

    for (idx, change) in changes.into_iter().enumerate() {
        let store = Arc::clone(store);
        let task_change = change.clone();
        pending.insert(idx, change);
        tasks.spawn(async move { (idx, apply(store.as_ref(), &task_change).await) });
    }

    let mut outcomes = Vec::with_capacity(pending.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::error!("pantry commit task failed: {}", e),
        }
    }
    outcomes.sort_by_key(|(idx, _)| *idx);

    for (idx, result) in outcomes {
        let Some(change) = pending.remove(&idx) else {
            continue;
        };
        match result {
            Ok(Applied::Created(ingredient)) => report.created.push(ingredient),
            Ok(Applied::Updated(id)) => report.updated.push(id),
            Ok(Applied::Deleted(id)) => report.deleted.push(id),
            Err(e) => {
                tracing::warn!(target_id = change.target(), error = %e, "pantry change failed");
                report.failures.push(FailedOperation {
                    change,
                    error: e.to_string(),
                });
            }
        }
    }

    // Tasks that panicked or were cancelled never reported back
    for (_, change) in pending {
        report.failures.push(FailedOperation {
            change,
            error: "operation did not complete".to_string(),
        });
    }
}

/// Apply `changes` to `store`: all deletions, then creates and updates.
///
/// Returns the report when every operation succeeded, otherwise
/// [`CommitError::Partial`] with the same report, whose
/// [`CommitReport::retry_changes`] names exactly what to retry.
pub async fn commit(
    store: Arc<dyn PantryStore>,
    changes: &PantryChanges,
) -> Result<CommitReport, CommitError> {
    let mut report = CommitReport::default();

    let deletes = changes
        .to_delete
        .iter()
        .map(|id| Change::Delete { id: id.clone() })
        .collect();
    run_batch(&store, deletes, &mut report).await;

    let writes = changes
        .to_create
        .iter()
        .cloned()
        .map(Change::Create)
        .chain(changes.to_update.iter().cloned().map(Change::Update))
        .collect();
    run_batch(&store, writes, &mut report).await;

    if report.is_complete() {
        tracing::info!(
            deleted = report.deleted.len(),
            created = report.created.len(),
            updated = report.updated.len(),
            "pantry changes saved"
        );
        Ok(report)
    } else {
        tracing::warn!(
            failed = report.failures.len(),
            attempted = report.attempted(),
            "pantry changes partially saved"
        );
        Err(CommitError::Partial(report))
    }
}
