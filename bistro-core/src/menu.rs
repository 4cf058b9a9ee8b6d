//! "What's for dinner": splits the recipe catalog into recipes that can be
//! cooked now and recipes that are only a few ingredients short.

use serde::{Deserialize, Serialize};

use crate::availability::classify;
use crate::types::{Ingredient, Recipe};

/// Recipes missing more than this many required ingredients are left off the
/// partial list.
pub const PARTIAL_MAX_MISSING: usize = 3;

/// A recipe that is close to cookable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialMatch<'a> {
    pub recipe: &'a Recipe,
    pub missing: Vec<String>,
}

/// Result of partitioning the catalog. A recipe is in at most one list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Menu<'a> {
    pub available: Vec<&'a Recipe>,
    /// Sorted by number of missing ingredients, fewest first.
    pub partial: Vec<PartialMatch<'a>>,
}

/// Visibility filters applied after classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuFilter {
    /// A recipe must carry every listed tag (exact match).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Minutes
    #[serde(default)]
    pub max_cooking_time: Option<u32>,
    /// Hide the partial list entirely.
    #[serde(default)]
    pub available_only: bool,
}

impl MenuFilter {
    pub fn accepts(&self, recipe: &Recipe) -> bool {
        let tags_ok = self.tags.iter().all(|tag| recipe.tags.contains(tag));
        let time_ok = self
            .max_cooking_time
            .map_or(true, |max| recipe.cooking_time <= max);
        tags_ok && time_ok
    }
}

/// Headline counts shown above the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MenuStats {
    pub ready_to_cook: usize,
    pub almost_ready: usize,
    pub in_stock_ingredients: usize,
}

/// Partition with the standard partial-match ceiling.
pub fn partition<'a>(recipes: &'a [Recipe], pantry: &[Ingredient]) -> Menu<'a> {
    partition_with_limit(recipes, pantry, PARTIAL_MAX_MISSING)
}

/// Partition `recipes` into cookable and partially cookable lists.
///
/// Missing ingredients are computed with the same required-only rule as
/// [`classify`]. Partial matches keep catalog order among recipes with the
/// same number of missing ingredients.
pub fn partition_with_limit<'a>(
    recipes: &'a [Recipe],
    pantry: &[Ingredient],
    max_missing: usize,
) -> Menu<'a> {
    let mut menu = Menu::default();

    for recipe in recipes {
        let availability = classify(recipe, pantry);
        if availability.cookable {
            menu.available.push(recipe);
        } else if availability.missing.len() <= max_missing {
            menu.partial.push(PartialMatch {
                recipe,
                missing: availability.missing,
            });
        }
    }

    menu.partial.sort_by_key(|m| m.missing.len());

    tracing::debug!(
        recipes = recipes.len(),
        available = menu.available.len(),
        partial = menu.partial.len(),
        "partitioned menu"
    );

    menu
}

impl<'a> Menu<'a> {
    /// A filtered view; classification is unchanged.
    pub fn filtered(&self, filter: &MenuFilter) -> Menu<'a> {
        let available = self
            .available
            .iter()
            .copied()
            .filter(|recipe| filter.accepts(recipe))
            .collect();

        let partial = if filter.available_only {
            Vec::new()
        } else {
            self.partial
                .iter()
                .filter(|m| filter.accepts(m.recipe))
                .cloned()
                .collect()
        };

        Menu { available, partial }
    }

    pub fn stats(&self, pantry: &[Ingredient]) -> MenuStats {
        MenuStats {
            ready_to_cook: self.available.len(),
            almost_ready: self.partial.len(),
            in_stock_ingredients: pantry.iter().filter(|i| i.in_stock).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IngredientData, RecipeIngredient};
    use chrono::Utc;

    fn recipe(id: &str, required: &[&str], cooking_time: u32, tags: &[&str]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: format!("Recipe {}", id),
            recipe_ingredients: required
                .iter()
                .map(|n| RecipeIngredient::required(*n))
                .collect(),
            instructions: vec![],
            image: None,
            cooking_time,
            servings: 2,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    fn pantry(names: &[&str]) -> Vec<Ingredient> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| IngredientData::new(*n).into_ingredient(i.to_string()))
            .collect()
    }

    fn ids<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Vec<&'a str> {
        recipes.into_iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_partition_basic() {
        let recipes = vec![
            recipe("ready", &["pasta", "garlic"], 20, &[]),
            recipe("three", &["a1", "b2", "c3", "pasta"], 20, &[]),
            recipe("four", &["a1", "b2", "c3", "d4"], 20, &[]),
            recipe("one", &["pasta", "cream"], 20, &[]),
        ];
        let pantry = pantry(&["Pasta", "Garlic"]);

        let menu = partition(&recipes, &pantry);
        assert_eq!(ids(menu.available.iter().copied()), vec!["ready"]);
        assert_eq!(
            ids(menu.partial.iter().map(|m| m.recipe)),
            vec!["one", "three"]
        );
        assert_eq!(menu.partial[0].missing, vec!["cream".to_string()]);
    }

    #[test]
    fn test_partial_ties_keep_catalog_order() {
        let recipes = vec![
            recipe("b", &["x1", "y2"], 10, &[]),
            recipe("a", &["x1"], 10, &[]),
            recipe("c", &["z3"], 10, &[]),
        ];

        let menu = partition(&recipes, &[]);
        assert_eq!(ids(menu.partial.iter().map(|m| m.recipe)), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_custom_limit() {
        let recipes = vec![recipe("two", &["x1", "y2"], 10, &[])];
        assert!(partition_with_limit(&recipes, &[], 1).partial.is_empty());
        assert_eq!(partition_with_limit(&recipes, &[], 2).partial.len(), 1);
    }

    #[test]
    fn test_filter_is_non_destructive() {
        let recipes = vec![
            recipe("quick", &["pasta"], 15, &["italian"]),
            recipe("slow", &["pasta"], 90, &["italian", "weekend"]),
            recipe("near", &["pasta", "cream"], 15, &["italian"]),
        ];
        let pantry = pantry(&["pasta"]);
        let menu = partition(&recipes, &pantry);

        let quick = menu.filtered(&MenuFilter {
            max_cooking_time: Some(30),
            ..Default::default()
        });
        assert_eq!(ids(quick.available.iter().copied()), vec!["quick"]);
        assert_eq!(quick.partial.len(), 1);

        let weekend = menu.filtered(&MenuFilter {
            tags: vec!["weekend".to_string()],
            ..Default::default()
        });
        assert_eq!(ids(weekend.available.iter().copied()), vec!["slow"]);
        assert!(weekend.partial.is_empty());

        let only = menu.filtered(&MenuFilter {
            available_only: true,
            ..Default::default()
        });
        assert_eq!(only.available.len(), 2);
        assert!(only.partial.is_empty());

        // Original partition untouched
        assert_eq!(menu.available.len(), 2);
        assert_eq!(menu.partial.len(), 1);
    }

    #[test]
    fn test_stats() {
        let recipes = vec![
            recipe("ready", &["rice"], 10, &[]),
            recipe("near", &["rice", "beans"], 10, &[]),
        ];
        let mut pantry = pantry(&["rice", "lentils"]);
        pantry[1].in_stock = false;

        let menu = partition(&recipes, &pantry);
        assert_eq!(
            menu.stats(&pantry),
            MenuStats {
                ready_to_cook: 1,
                almost_ready: 1,
                in_stock_ingredients: 1,
            }
        );
    }
}
