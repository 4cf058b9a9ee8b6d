use anyhow::{Context, Result};
use bistro_core::pantry::CATEGORIES;
use bistro_core::{
    is_likely_duplicate, pantry_stats, search_pantry, toggle_stock, BistroConfig, Change,
    CommitError, IngredientData, PantryChanges, PantryDraft, PantryStore,
};
use chrono::Utc;
use std::sync::Arc;

use crate::file_store::FilePantryStore;

pub async fn list_pantry(
    config: &BistroConfig,
    store: &FilePantryStore,
    search: Option<&str>,
    category: Option<&str>,
) -> Result<()> {
    if let Some(category) = category {
        if !CATEGORIES.contains(&category) {
            tracing::warn!(category, "not a standard category");
        }
    }

    let pantry = store.get_all().await.context("Failed to load pantry")?;
    let stats = pantry_stats(&pantry, Utc::now(), config.expiry_window_days);

    for item in search_pantry(&pantry, search.unwrap_or(""), category) {
        let amount = match (&item.unit, item.in_stock) {
            (_, false) => "out of stock".to_string(),
            (Some(unit), true) => format!("{} {}", item.quantity, unit),
            (None, true) => item.quantity.to_string(),
        };
        let expiry = item
            .expiry_date
            .map(|d| format!(", expires {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        println!("{} [{}] {}{}", item.name, item.category, amount, expiry);
    }

    println!(
        "\n{} in stock, {} out of stock, {} expiring within {} days",
        stats.in_stock, stats.out_of_stock, stats.expiring_soon, config.expiry_window_days
    );
    Ok(())
}

/// Flip one item's stock flag and save it.
pub async fn toggle(store: &FilePantryStore, name: &str) -> Result<()> {
    let pantry = store.get_all().await.context("Failed to load pantry")?;
    let wanted = name.trim().to_lowercase();
    let item = pantry
        .iter()
        .find(|i| i.name.to_lowercase() == wanted)
        .with_context(|| format!("No pantry item named {:?}", name))?;

    let data = toggle_stock(item);
    if !store.update(&item.id, &data).await? {
        anyhow::bail!("{} was removed before it could be updated", item.name);
    }
    println!(
        "{} is now {}",
        item.name,
        if data.in_stock { "in stock" } else { "out of stock" }
    );
    Ok(())
}

/// Edits requested on the command line, by ingredient name.
#[derive(Debug, Default)]
pub struct BulkEdit {
    pub out_of_stock: Vec<String>,
    pub in_stock: Vec<String>,
    pub delete: Vec<String>,
    /// `NAME` or `NAME:CATEGORY`
    pub add: Vec<String>,
}

fn parse_addition(entry: &str) -> IngredientData {
    match entry.split_once(':') {
        Some((name, category)) => IngredientData::new(name).with_category(category),
        None => IngredientData::new(entry),
    }
}

/// Apply `edits` to the draft. Returns warnings about additions that look like
/// a live row, including one added earlier in the same batch; unknown names are
/// an error.
fn apply_edits(draft: &mut PantryDraft, edits: &BulkEdit) -> Result<Vec<String>> {
    let find = |draft: &PantryDraft, name: &str| {
        draft
            .find_by_name(name)
            .with_context(|| format!("No pantry item named {:?}", name))
    };

    for name in &edits.out_of_stock {
        let key = find(draft, name)?;
        draft.set_in_stock(&key, false);
    }
    for name in &edits.in_stock {
        let key = find(draft, name)?;
        draft.set_in_stock(&key, true);
    }
    for name in &edits.delete {
        let key = find(draft, name)?;
        draft.delete(&key);
    }

    let mut warnings = Vec::new();
    for entry in &edits.add {
        let data = parse_addition(entry);
        let names: Vec<&str> = draft
            .working()
            .values()
            .filter(|row| is_likely_duplicate(&row.name, &data.name))
            .map(|row| row.name.as_str())
            .collect();
        if !names.is_empty() {
            warnings.push(format!(
                "{} looks like a duplicate of {}",
                data.name.trim(),
                names.join(", ")
            ));
        }
        draft
            .add(data)
            .with_context(|| format!("Cannot add {:?}", entry))?;
    }

    Ok(warnings)
}

fn describe(changes: &PantryChanges) {
    for id in &changes.to_delete {
        println!("  delete {}", id);
    }
    for data in &changes.to_create {
        println!("  add {} [{}]", data.name, data.category);
    }
    for update in &changes.to_update {
        let stock = if update.data.in_stock { "in stock" } else { "out of stock" };
        println!("  update {} ({})", update.data.name, stock);
    }
}

pub async fn bulk_edit(store: FilePantryStore, edits: &BulkEdit, dry_run: bool) -> Result<()> {
    let store: Arc<dyn PantryStore> = Arc::new(store);
    let pantry = store.get_all().await.context("Failed to load pantry")?;
    let mut draft = PantryDraft::new(pantry);

    for warning in apply_edits(&mut draft, edits)? {
        println!("Warning: {}", warning);
    }

    if !draft.has_changes() {
        println!("Nothing to change");
        return Ok(());
    }

    let changes = draft.changes();
    println!("{} change(s):", changes.len());
    describe(&changes);
    if dry_run {
        return Ok(());
    }

    match draft.save(store).await {
        Ok(report) => {
            println!(
                "Saved: {} added, {} updated, {} deleted",
                report.created.len(),
                report.updated.len(),
                report.deleted.len()
            );
            Ok(())
        }
        Err(CommitError::Partial(report)) => {
            for failure in &report.failures {
                let op = match &failure.change {
                    Change::Create(_) => "add",
                    Change::Update(_) => "update",
                    Change::Delete { .. } => "delete",
                };
                eprintln!("  failed to {} {}: {}", op, failure.change.target(), failure.error);
            }
            anyhow::bail!(
                "{} of {} changes failed; rerun the same edit to retry",
                report.failures.len(),
                report.attempted()
            )
        }
        Err(e) => Err(e.into()),
    }
}
