use anyhow::{Context, Result};
use bistro_core::{suggest_by_mood, suggest_random, Mood, PantryStore, RecipeStore};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::file_store::{FilePantryStore, FileRecipeStore};

fn parse_mood(name: &str) -> Result<Mood> {
    Mood::from_str(&name.trim().to_lowercase()).with_context(|| {
        let valid: Vec<&str> = Mood::ALL.iter().map(|m| m.as_str()).collect();
        format!("Unknown mood {:?} (expected one of: {})", name, valid.join(", "))
    })
}

pub async fn feeling_lucky(
    pantry_store: &FilePantryStore,
    recipe_store: &FileRecipeStore,
    mood: Option<&str>,
    prefer_available: bool,
    seed: Option<u64>,
) -> Result<()> {
    let mood = mood.map(parse_mood).transpose()?;

    let pantry = pantry_store.get_all().await.context("Failed to load pantry")?;
    let recipes = recipe_store
        .get_all()
        .await
        .context("Failed to load recipes")?;

    let seed = seed.unwrap_or_else(rand::random);
    tracing::debug!(seed, "picking a recipe");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let suggestion = match mood {
        Some(mood) => suggest_by_mood(&recipes, &pantry, mood, prefer_available, &mut rng),
        None => suggest_random(&recipes, &pantry, prefer_available, &mut rng),
    };

    let Some(suggestion) = suggestion else {
        println!("No recipes yet. Try `bistro seed` or `bistro add-recipe`.");
        return Ok(());
    };

    if let Some(mood) = mood {
        println!("{} pick:", mood.label());
    }
    let recipe = suggestion.recipe;
    println!(
        "{} ({} min, serves {})",
        recipe.name, recipe.cooking_time, recipe.servings
    );
    if suggestion.availability.cookable {
        println!("You have everything you need.");
    } else {
        println!(
            "You still need: {}",
            suggestion.availability.missing.join(", ")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mood() {
        assert_eq!(parse_mood("Date-Night").unwrap(), Mood::DateNight);
        assert_eq!(parse_mood(" quick ").unwrap(), Mood::Quick);

        let err = parse_mood("sleepy").unwrap_err().to_string();
        assert!(err.contains("comfort"), "{}", err);
    }
}
