//! Recipe list helpers: search, the tag catalog and form cleanup.

use std::collections::HashSet;

use crate::types::Recipe;

/// Recipes whose name or any ingredient name contains `term`,
/// case-insensitively. An empty term matches everything.
pub fn search_recipes<'a>(recipes: &'a [Recipe], term: &str) -> Vec<&'a Recipe> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return recipes.iter().collect();
    }

    recipes
        .iter()
        .filter(|recipe| {
            recipe.name.to_lowercase().contains(&term)
                || recipe
                    .recipe_ingredients
                    .iter()
                    .any(|i| i.name.to_lowercase().contains(&term))
        })
        .collect()
}

/// Distinct tags across `recipes`, in the order they are first seen.
pub fn all_tags(recipes: &[Recipe]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for tag in recipes.iter().flat_map(|r| r.tags.iter()) {
        if seen.insert(tag.as_str()) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Split a comma-separated tag field, dropping empty entries.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Clean up a recipe coming from an edit form: trims every text field and
/// drops blank ingredient lines, instruction lines and tags.
pub fn sanitize_recipe(mut recipe: Recipe) -> Recipe {
    recipe.name = recipe.name.trim().to_string();

    recipe.recipe_ingredients = recipe
        .recipe_ingredients
        .into_iter()
        .filter_map(|mut ingredient| {
            ingredient.name = ingredient.name.trim().to_string();
            (!ingredient.name.is_empty()).then_some(ingredient)
        })
        .collect();

    recipe.instructions = recipe
        .instructions
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    recipe.tags = recipe
        .tags
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect();

    recipe.image = recipe
        .image
        .map(|image| image.trim().to_string())
        .filter(|image| !image.is_empty());

    recipe
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecipeIngredient;
    use chrono::{TimeZone, Utc};

    fn recipe(name: &str, ingredients: &[&str], tags: &[&str]) -> Recipe {
        Recipe {
            id: name.to_lowercase(),
            name: name.to_string(),
            recipe_ingredients: ingredients
                .iter()
                .map(|n| RecipeIngredient::required(*n))
                .collect(),
            instructions: vec![],
            image: None,
            cooking_time: 30,
            servings: 2,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_search_by_name_or_ingredient() {
        let recipes = vec![
            recipe("Tomato Soup", &["Tomato", "Onion"], &[]),
            recipe("Pasta Bake", &["Pasta", "Tomato sauce"], &[]),
            recipe("Omelette", &["Eggs"], &[]),
        ];

        let names = |found: Vec<&Recipe>| -> Vec<String> {
            found.into_iter().map(|r| r.name.clone()).collect()
        };
        assert_eq!(
            names(search_recipes(&recipes, "tomato")),
            vec!["Tomato Soup", "Pasta Bake"]
        );
        assert_eq!(names(search_recipes(&recipes, "EGG")), vec!["Omelette"]);
        assert_eq!(search_recipes(&recipes, "  ").len(), 3);
        assert!(search_recipes(&recipes, "saffron").is_empty());
    }

    #[test]
    fn test_all_tags_first_seen_order() {
        let recipes = vec![
            recipe("A", &[], &["quick", "vegetarian"]),
            recipe("B", &[], &["comfort", "quick"]),
            recipe("C", &[], &["vegetarian"]),
        ];
        assert_eq!(all_tags(&recipes), vec!["quick", "vegetarian", "comfort"]);
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(" quick, ,healthy ,date night,"),
            vec!["quick", "healthy", "date night"]
        );
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_sanitize_recipe() {
        let mut dirty = recipe(" Salad ", &["Lettuce ", "  ", "Olive oil"], &["fresh", " "]);
        dirty.instructions = vec![
            "Wash the lettuce".to_string(),
            "".to_string(),
            "  Toss with oil  ".to_string(),
        ];
        dirty.image = Some("   ".to_string());

        let clean = sanitize_recipe(dirty);
        assert_eq!(clean.name, "Salad");
        assert_eq!(
            clean.recipe_ingredients,
            vec![
                RecipeIngredient::required("Lettuce"),
                RecipeIngredient::required("Olive oil"),
            ]
        );
        assert_eq!(clean.instructions, vec!["Wash the lettuce", "Toss with oil"]);
        assert_eq!(clean.tags, vec!["fresh"]);
        assert_eq!(clean.image, None);
    }
}
