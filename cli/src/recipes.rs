use anyhow::{Context, Result};
use bistro_core::{
    all_tags, checklist, classify, parse_tags, sanitize_recipe, search_recipes, PantryStore,
    Recipe, RecipeIngredient, RecipeStore,
};
use chrono::Utc;
use serde::Deserialize;
use std::path::Path;

use crate::file_store::{FilePantryStore, FileRecipeStore};

pub async fn show_recipe(
    pantry_store: &FilePantryStore,
    recipe_store: &FileRecipeStore,
    name: &str,
) -> Result<()> {
    let recipes = recipe_store
        .get_all()
        .await
        .context("Failed to load recipes")?;
    let wanted = name.trim().to_lowercase();
    let recipe = recipes
        .iter()
        .find(|r| r.name.to_lowercase() == wanted)
        .with_context(|| format!("No recipe named {:?}", name))?;

    let pantry = pantry_store.get_all().await.context("Failed to load pantry")?;
    let availability = classify(recipe, &pantry);

    println!("{}", recipe.name);
    println!(
        "{} min, serves {}{}",
        recipe.cooking_time,
        recipe.servings,
        if recipe.tags.is_empty() {
            String::new()
        } else {
            format!(", tags: {}", recipe.tags.join(", "))
        }
    );
    if availability.cookable {
        println!("Ready to cook");
    } else {
        println!("Missing {} required", availability.missing.len());
    }

    println!("\nIngredients:");
    for line in checklist(recipe, &pantry) {
        let mark = if line.available { "x" } else { " " };
        let optional = if line.optional { " (optional)" } else { "" };
        println!("  [{}] {}{}", mark, line.name, optional);
    }

    if !recipe.instructions.is_empty() {
        println!("\nInstructions:");
        for (idx, step) in recipe.instructions.iter().enumerate() {
            println!("  {}. {}", idx + 1, step);
        }
    }

    Ok(())
}

pub async fn list_recipes(recipe_store: &FileRecipeStore, search: Option<&str>) -> Result<()> {
    let recipes = recipe_store
        .get_all()
        .await
        .context("Failed to load recipes")?;

    let found = search_recipes(&recipes, search.unwrap_or(""));
    for recipe in &found {
        println!(
            "{} ({} min, serves {})",
            recipe.name, recipe.cooking_time, recipe.servings
        );
    }
    println!("\n{} of {} recipes", found.len(), recipes.len());

    let tags = all_tags(&recipes);
    if !tags.is_empty() {
        println!("Tags: {}", tags.join(", "));
    }

    Ok(())
}

/// A recipe as written by hand: no id, and the timestamp is set on import.
#[derive(Debug, Deserialize)]
struct RecipeFile {
    name: String,
    #[serde(default, alias = "ingredients")]
    recipe_ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    instructions: Vec<String>,
    #[serde(default)]
    image: Option<String>,
    cooking_time: u32,
    servings: u32,
    #[serde(default)]
    tags: Vec<String>,
}

fn recipe_from_file(content: &str, tags: Option<&str>) -> Result<Recipe> {
    let fields: RecipeFile = serde_json::from_str(content).context("Invalid recipe JSON")?;

    let recipe = sanitize_recipe(Recipe {
        id: String::new(),
        name: fields.name,
        recipe_ingredients: fields.recipe_ingredients,
        instructions: fields.instructions,
        image: fields.image,
        cooking_time: fields.cooking_time,
        servings: fields.servings,
        tags: match tags {
            Some(tags) => parse_tags(tags),
            None => fields.tags,
        },
        created_at: Utc::now(),
    });

    if recipe.name.is_empty() {
        anyhow::bail!("Recipe name is empty");
    }
    Ok(recipe)
}

pub async fn add_recipe(
    recipe_store: &FileRecipeStore,
    path: &Path,
    tags: Option<&str>,
) -> Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let recipe = recipe_from_file(&content, tags)?;

    let recipe = recipe_store
        .add(recipe)
        .await
        .context("Failed to save recipe")?;
    println!("Added recipe: {} ({})", recipe.name, recipe.id);

    Ok(())
}
