//! Bulk pantry editing.
//!
//! A [`PantryDraft`] holds the pantry as loaded plus a working copy the user
//! edits freely. Reconciling the two yields the minimal set of creates,
//! updates and deletes; [`PantryDraft::save`] pushes them to a store.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use crate::commit::{commit, CommitReport};
use crate::error::{CommitError, ValidationError};
use crate::pantry::prepare_ingredient;
use crate::store::PantryStore;
use crate::types::{Ingredient, IngredientData, IngredientUpdate};

/// Identifies a row of the working copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum RowKey {
    /// Edit of a stored ingredient, by its id.
    Existing(String),
    /// Unsaved row, numbered in the order it was added.
    New(u32),
}

/// Working copy rows keyed by [`RowKey`].
pub type WorkingCopy = BTreeMap<RowKey, IngredientData>;

/// What has to be sent to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PantryChanges {
    pub to_create: Vec<IngredientData>,
    pub to_update: Vec<IngredientUpdate>,
    pub to_delete: Vec<String>,
}

impl PantryChanges {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }
}

fn originals_by_id(original: &[Ingredient]) -> HashMap<&str, &Ingredient> {
    original.iter().map(|i| (i.id.as_str(), i)).collect()
}

/// Diff the working copy against the original snapshot.
///
/// - Deleted keys become deletes only if they name a stored ingredient.
/// - New rows that were not deleted become creates.
/// - Existing rows that were not deleted become updates when any field
///   differs from the original.
///
/// Pure: calling it again on the same input gives the same result.
pub fn reconcile(
    original: &[Ingredient],
    working: &WorkingCopy,
    deleted: &BTreeSet<RowKey>,
) -> PantryChanges {
    let by_id = originals_by_id(original);
    let mut changes = PantryChanges::default();

    for key in deleted {
        if let RowKey::Existing(id) = key {
            if by_id.contains_key(id.as_str()) {
                changes.to_delete.push(id.clone());
            }
        }
    }

    for (key, data) in working {
        if deleted.contains(key) {
            continue;
        }
        match key {
            RowKey::New(_) => changes.to_create.push(data.clone()),
            RowKey::Existing(id) => {
                let Some(stored) = by_id.get(id.as_str()) else {
                    tracing::warn!(id = %id, "working row has no original, skipping");
                    continue;
                };
                if !stored.data().same_values(data) {
                    changes.to_update.push(IngredientUpdate {
                        id: id.clone(),
                        data: data.clone(),
                    });
                }
            }
        }
    }

    tracing::debug!(
        creates = changes.to_create.len(),
        updates = changes.to_update.len(),
        deletes = changes.to_delete.len(),
        "reconciled pantry edits"
    );

    changes
}

/// True when saving would do anything: a recorded deletion, an unsaved new
/// row, or an existing row whose values moved away from the original.
pub fn has_changes(
    original: &[Ingredient],
    working: &WorkingCopy,
    deleted: &BTreeSet<RowKey>,
) -> bool {
    if !deleted.is_empty() {
        return true;
    }

    let by_id = originals_by_id(original);
    working.iter().any(|(key, data)| match key {
        RowKey::New(_) => true,
        RowKey::Existing(id) => by_id
            .get(id.as_str())
            .is_some_and(|stored| !stored.data().same_values(data)),
    })
}

/// An editing session over a pantry snapshot.
#[derive(Debug, Clone)]
pub struct PantryDraft {
    original: Vec<Ingredient>,
    working: WorkingCopy,
    deleted: BTreeSet<RowKey>,
    next_new: u32,
}

impl PantryDraft {
    pub fn new(original: Vec<Ingredient>) -> Self {
        let working = original
            .iter()
            .map(|i| (RowKey::Existing(i.id.clone()), i.data()))
            .collect();
        Self {
            original,
            working,
            deleted: BTreeSet::new(),
            next_new: 0,
        }
    }

    pub fn original(&self) -> &[Ingredient] {
        &self.original
    }

    pub fn working(&self) -> &WorkingCopy {
        &self.working
    }

    pub fn deleted(&self) -> &BTreeSet<RowKey> {
        &self.deleted
    }

    pub fn get(&self, key: &RowKey) -> Option<&IngredientData> {
        self.working.get(key)
    }

    /// Key of the first live row whose name equals `name`, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<RowKey> {
        let wanted = name.trim().to_lowercase();
        self.working
            .iter()
            .find(|(_, data)| data.name.to_lowercase() == wanted)
            .map(|(key, _)| key.clone())
    }

    /// Add an unsaved row. The row is normalized like any new ingredient.
    pub fn add(&mut self, data: IngredientData) -> Result<RowKey, ValidationError> {
        let data = prepare_ingredient(data)?;
        let key = RowKey::New(self.next_new);
        self.next_new += 1;
        self.working.insert(key.clone(), data);
        Ok(key)
    }

    /// Flip a row's stock flag. Going out of stock zeroes the quantity and
    /// drops the expiry date right away. Returns false for unknown rows.
    pub fn set_in_stock(&mut self, key: &RowKey, in_stock: bool) -> bool {
        match self.working.get_mut(key) {
            Some(data) => {
                data.set_in_stock(in_stock);
                true
            }
            None => false,
        }
    }

    /// Edit a row in place. An edited row that ends up out of stock is
    /// normalized the same way as [`PantryDraft::set_in_stock`]; the row is
    /// left unchanged if the edit produces an invalid ingredient.
    pub fn edit<F>(&mut self, key: &RowKey, f: F) -> Result<bool, ValidationError>
    where
        F: FnOnce(&mut IngredientData),
    {
        let Some(data) = self.working.get_mut(key) else {
            return Ok(false);
        };
        let mut edited = data.clone();
        f(&mut edited);
        *data = prepare_ingredient(edited)?;
        Ok(true)
    }

    /// Remove a row. Unsaved rows simply disappear; stored rows are
    /// remembered for deletion.
    pub fn delete(&mut self, key: &RowKey) -> bool {
        if self.working.remove(key).is_none() {
            return false;
        }
        if let RowKey::Existing(_) = key {
            self.deleted.insert(key.clone());
        }
        true
    }

    pub fn changes(&self) -> PantryChanges {
        reconcile(&self.original, &self.working, &self.deleted)
    }

    pub fn has_changes(&self) -> bool {
        has_changes(&self.original, &self.working, &self.deleted)
    }

    /// Start over from a fresh snapshot, discarding all edits.
    pub fn rebase(&mut self, fresh: Vec<Ingredient>) {
        *self = PantryDraft::new(fresh);
    }

    /// Push the edits to `store`.
    ///
    /// Does nothing when there are no changes. After a fully successful
    /// commit the pantry is reloaded and the draft rebased onto it; when any
    /// operation fails the draft is kept as is and the error carries the
    /// per-operation report.
    pub async fn save(
        &mut self,
        store: Arc<dyn PantryStore>,
    ) -> Result<CommitReport, CommitError> {
        if !self.has_changes() {
            tracing::debug!("no pantry changes to save");
            return Ok(CommitReport::default());
        }

        let changes = self.changes();
        let report = commit(Arc::clone(&store), &changes).await?;

        let fresh = store.get_all().await.map_err(CommitError::Refresh)?;
        self.rebase(fresh);
        Ok(report)
    }
}
