use anyhow::{Context, Result};
use bistro_core::{partition_with_limit, BistroConfig, MenuFilter, PantryStore, RecipeStore};

use crate::file_store::{FilePantryStore, FileRecipeStore};

pub async fn show_menu(
    config: &BistroConfig,
    pantry_store: &FilePantryStore,
    recipe_store: &FileRecipeStore,
    filter: &MenuFilter,
) -> Result<()> {
    let pantry = pantry_store.get_all().await.context("Failed to load pantry")?;
    let recipes = recipe_store
        .get_all()
        .await
        .context("Failed to load recipes")?;

    let menu = partition_with_limit(&recipes, &pantry, config.partial_max_missing);
    let stats = menu.stats(&pantry);
    let menu = menu.filtered(filter);

    println!(
        "{} ready to cook, {} almost ready, {} ingredients in stock",
        stats.ready_to_cook, stats.almost_ready, stats.in_stock_ingredients
    );

    println!("\nReady to cook:");
    if menu.available.is_empty() {
        println!("  (nothing yet)");
    }
    for recipe in &menu.available {
        println!(
            "  {} ({} min, serves {})",
            recipe.name, recipe.cooking_time, recipe.servings
        );
    }

    if !filter.available_only {
        println!("\nAlmost ready:");
        if menu.partial.is_empty() {
            println!("  (nothing)");
        }
        for partial in &menu.partial {
            println!(
                "  {} (missing {}: {})",
                partial.recipe.name,
                partial.missing.len(),
                partial.missing.join(", ")
            );
        }
    }

    Ok(())
}
