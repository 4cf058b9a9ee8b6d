use anyhow::{Context, Result};
use bistro_core::{
    prepare_ingredient, IngredientData, PantryStore, Recipe, RecipeIngredient, RecipeStore,
};
use chrono::{Duration, Utc};

use crate::file_store::{FilePantryStore, FileRecipeStore};

struct SeedRecipe {
    name: &'static str,
    instructions: &'static [&'static str],
    ingredients: &'static [(&'static str, bool)], // (name, optional)
    cooking_time: u32,
    servings: u32,
    tags: &'static [&'static str],
}

const SAMPLE_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        name: "Classic Spaghetti Carbonara",
        instructions: &[
            "Cook spaghetti in salted water until al dente.",
            "Fry the pancetta until crispy.",
            "Whisk eggs with grated Pecorino and black pepper.",
            "Toss hot pasta with pancetta off the heat, then stir in the egg mixture.",
        ],
        ingredients: &[
            ("Spaghetti", false),
            ("Pancetta", false),
            ("Eggs", false),
            ("Pecorino Romano", false),
            ("Black pepper", false),
            ("Parsley", true),
        ],
        cooking_time: 25,
        servings: 4,
        tags: &["italian", "pasta", "quick"],
    },
    SeedRecipe {
        name: "Chicken Tikka Masala",
        instructions: &[
            "Marinate chicken in yogurt and garam masala for two hours.",
            "Grill the chicken until charred.",
            "Cook onion, garlic and ginger, then add tomato puree and cream.",
            "Simmer the chicken in the sauce for ten minutes.",
        ],
        ingredients: &[
            ("Chicken thighs", false),
            ("Yogurt", false),
            ("Garam masala", false),
            ("Onion", false),
            ("Garlic", false),
            ("Tomato puree", false),
            ("Cream", false),
            ("Cilantro", true),
        ],
        cooking_time: 60,
        servings: 4,
        tags: &["indian", "spicy", "international"],
    },
    SeedRecipe {
        name: "Tomato Basil Soup",
        instructions: &[
            "Soften onion and garlic in olive oil.",
            "Add tomatoes and stock and simmer for twenty minutes.",
            "Blend with basil and season.",
        ],
        ingredients: &[
            ("Tomatoes", false),
            ("Onion", false),
            ("Garlic", false),
            ("Vegetable stock", false),
            ("Basil", false),
            ("Olive oil", false),
            ("Cream", true),
        ],
        cooking_time: 35,
        servings: 4,
        tags: &["soup", "comfort", "vegetarian"],
    },
    SeedRecipe {
        name: "Greek Salad",
        instructions: &[
            "Chop cucumber, tomatoes and red onion.",
            "Top with feta and olives and dress with olive oil.",
        ],
        ingredients: &[
            ("Cucumber", false),
            ("Tomatoes", false),
            ("Red onion", false),
            ("Feta", false),
            ("Olives", true),
            ("Olive oil", false),
        ],
        cooking_time: 15,
        servings: 2,
        tags: &["salad", "healthy", "fresh"],
    },
    SeedRecipe {
        name: "Seared Scallops with Risotto",
        instructions: &[
            "Toast arborio rice, then add warm stock a ladle at a time.",
            "Finish the risotto with butter and parmesan.",
            "Sear the scallops two minutes per side and serve on the risotto.",
        ],
        ingredients: &[
            ("Scallops", false),
            ("Arborio rice", false),
            ("Chicken stock", false),
            ("Butter", false),
            ("Parmesan", false),
            ("White wine", true),
        ],
        cooking_time: 50,
        servings: 2,
        tags: &["seafood", "italian"],
    },
    SeedRecipe {
        name: "Overnight Oats",
        instructions: &[
            "Stir oats, milk and yogurt together.",
            "Refrigerate overnight and top with berries.",
        ],
        ingredients: &[
            ("Rolled oats", false),
            ("Milk", false),
            ("Yogurt", false),
            ("Berries", true),
            ("Honey", true),
        ],
        cooking_time: 5,
        servings: 1,
        tags: &["breakfast", "healthy", "light"],
    },
    SeedRecipe {
        name: "Beef Chili",
        instructions: &[
            "Brown the beef with onion and garlic.",
            "Add beans, tomatoes and chili powder.",
            "Simmer for an hour.",
        ],
        ingredients: &[
            ("Ground beef", false),
            ("Onion", false),
            ("Garlic", false),
            ("Kidney beans", false),
            ("Tomatoes", false),
            ("Chili powder", false),
            ("Sour cream", true),
        ],
        cooking_time: 75,
        servings: 6,
        tags: &["comfort", "hearty", "spicy"],
    },
];

// (name, quantity, unit, category, in stock, days until expiry)
const SAMPLE_PANTRY: &[(&str, f64, Option<&str>, &str, bool, Option<i64>)] = &[
    ("Spaghetti", 500.0, Some("g"), "Grains", true, None),
    ("Eggs", 6.0, None, "Dairy", true, Some(10)),
    ("Black pepper", 1.0, Some("jar"), "Spices", true, None),
    ("Onion", 3.0, None, "Vegetables", true, None),
    ("Garlic", 1.0, Some("bulb"), "Vegetables", true, None),
    ("Tomatoes", 4.0, None, "Vegetables", true, Some(4)),
    ("Olive oil", 1.0, Some("bottle"), "Condiments", true, None),
    ("Basil", 0.0, None, "Vegetables", false, None),
    ("Yogurt", 500.0, Some("g"), "Dairy", true, Some(5)),
    ("Milk", 1.0, Some("l"), "Dairy", true, Some(3)),
    ("Rolled oats", 1.0, Some("kg"), "Grains", true, None),
    ("Cucumber", 1.0, None, "Vegetables", true, Some(6)),
    ("Feta", 200.0, Some("g"), "Dairy", true, Some(14)),
    ("Butter", 250.0, Some("g"), "Dairy", true, Some(20)),
    ("Parmesan", 0.0, None, "Dairy", false, None),
    ("Chili powder", 1.0, Some("jar"), "Spices", true, None),
];

fn sample_recipe(seed: &SeedRecipe, age_days: i64) -> Recipe {
    Recipe {
        id: String::new(),
        name: seed.name.to_string(),
        recipe_ingredients: seed
            .ingredients
            .iter()
            .map(|(name, optional)| RecipeIngredient {
                name: name.to_string(),
                optional: *optional,
            })
            .collect(),
        instructions: seed.instructions.iter().map(|s| s.to_string()).collect(),
        image: None,
        cooking_time: seed.cooking_time,
        servings: seed.servings,
        tags: seed.tags.iter().map(|t| t.to_string()).collect(),
        created_at: Utc::now() - Duration::days(age_days),
    }
}

fn sample_ingredient(
    &(name, quantity, unit, category, in_stock, expires_in): &(
        &str,
        f64,
        Option<&str>,
        &str,
        bool,
        Option<i64>,
    ),
) -> Result<IngredientData> {
    let mut data = IngredientData::new(name)
        .with_quantity(quantity)
        .with_category(category);
    data.unit = unit.map(String::from);
    if let Some(days) = expires_in {
        data = data.with_expiry(Utc::now() + Duration::days(days));
    }
    data.in_stock = in_stock;
    prepare_ingredient(data).with_context(|| format!("Invalid sample ingredient {}", name))
}

/// Write the sample pantry and recipes. Refuses to touch existing data
/// unless `force` is set, in which case both files are replaced.
pub async fn seed(
    pantry: &FilePantryStore,
    recipes: &FileRecipeStore,
    force: bool,
) -> Result<()> {
    if (pantry.exists() || recipes.exists()) && !force {
        anyhow::bail!("Data already exists; pass --force to replace it");
    }
    pantry.clear().await.context("Failed to reset pantry")?;
    recipes.clear().await.context("Failed to reset recipes")?;

    for (idx, seed) in SAMPLE_RECIPES.iter().enumerate() {
        let recipe = recipes
            .add(sample_recipe(seed, idx as i64))
            .await
            .with_context(|| format!("Failed to add recipe {}", seed.name))?;
        println!("Created recipe: {} ({})", recipe.name, recipe.id);
    }

    for row in SAMPLE_PANTRY {
        let data = sample_ingredient(row)?;
        pantry
            .add(data)
            .await
            .with_context(|| format!("Failed to add ingredient {}", row.0))?;
    }

    println!(
        "Seeded {} recipes and {} pantry items",
        SAMPLE_RECIPES.len(),
        SAMPLE_PANTRY.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::{partition, suggest_by_mood, Mood};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_data() -> (Vec<Recipe>, Vec<bistro_core::Ingredient>) {
        let recipes = SAMPLE_RECIPES
            .iter()
            .enumerate()
            .map(|(idx, seed)| Recipe {
                id: format!("r{}", idx),
                ..sample_recipe(seed, idx as i64)
            })
            .collect();
        let pantry = SAMPLE_PANTRY
            .iter()
            .enumerate()
            .map(|(idx, row)| sample_ingredient(row).unwrap().into_ingredient(format!("p{}", idx)))
            .collect();
        (recipes, pantry)
    }

    #[test]
    fn test_sample_data_gives_an_interesting_menu() {
        let (recipes, pantry) = sample_data();
        let menu = partition(&recipes, &pantry);

        let ready: Vec<&str> = menu.available.iter().map(|r| r.name.as_str()).collect();
        assert!(ready.contains(&"Overnight Oats"), "{:?}", ready);
        assert!(!menu.partial.is_empty());
        assert!(menu.partial.iter().any(|m| m.recipe.name == "Tomato Basil Soup"));
    }

    #[test]
    fn test_every_mood_has_a_sample_recipe() {
        let (recipes, pantry) = sample_data();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for mood in Mood::ALL {
            assert!(
                recipes.iter().any(|r| mood.matches(r)),
                "no sample recipe for {}",
                mood.as_str()
            );
            let suggestion = suggest_by_mood(&recipes, &pantry, *mood, true, &mut rng).unwrap();
            assert!(mood.matches(suggestion.recipe));
        }
    }

    #[test]
    fn test_out_of_stock_samples_are_normalized() {
        let (_, pantry) = sample_data();
        for item in pantry.iter().filter(|i| !i.in_stock) {
            assert_eq!(item.quantity, 0.0);
            assert_eq!(item.expiry_date, None);
        }
    }
}
