//! "I'm feeling lucky" recipe suggestions.
//!
//! Selection is uniform over the candidate list. The only bias is the
//! prefer-available gate: when set and at least one recipe is cookable, only
//! cookable recipes are candidates.

use rand::Rng;
use serde::Serialize;

use crate::availability::{classify, Availability};
use crate::types::{Ingredient, Recipe};

/// A picked recipe together with what it still needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion<'a> {
    pub recipe: &'a Recipe,
    pub availability: Availability,
}

/// Canned recipe filters for themed suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Quick,
    Comfort,
    Healthy,
    Adventurous,
    Family,
    DateNight,
}

impl Mood {
    pub const ALL: &'static [Mood] = &[
        Mood::Quick,
        Mood::Comfort,
        Mood::Healthy,
        Mood::Adventurous,
        Mood::Family,
        Mood::DateNight,
    ];

    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Mood::Quick => recipe.cooking_time <= 30,
            Mood::Comfort => recipe.has_any_tag(&["comfort", "hearty", "warm"]),
            Mood::Healthy => recipe.has_any_tag(&["healthy", "light", "fresh"]),
            Mood::Adventurous => recipe.has_any_tag(&["spicy", "exotic", "international"]),
            Mood::Family => recipe.servings >= 4,
            Mood::DateNight => recipe.servings <= 2 && recipe.cooking_time >= 45,
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Quick => "Quick & Easy",
            Mood::Comfort => "Comfort Food",
            Mood::Healthy => "Healthy",
            Mood::Adventurous => "Adventurous",
            Mood::Family => "Family Dinner",
            Mood::DateNight => "Date Night",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Quick => "quick",
            Mood::Comfort => "comfort",
            Mood::Healthy => "healthy",
            Mood::Adventurous => "adventurous",
            Mood::Family => "family",
            Mood::DateNight => "date-night",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "quick" => Some(Mood::Quick),
            "comfort" => Some(Mood::Comfort),
            "healthy" => Some(Mood::Healthy),
            "adventurous" => Some(Mood::Adventurous),
            "family" => Some(Mood::Family),
            "date-night" | "date_night" => Some(Mood::DateNight),
            _ => None,
        }
    }
}

fn pick<'a, R: Rng + ?Sized>(candidates: &[&'a Recipe], rng: &mut R) -> Option<&'a Recipe> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}

fn suggestion<'a>(recipe: &'a Recipe, pantry: &[Ingredient]) -> Suggestion<'a> {
    Suggestion {
        recipe,
        availability: classify(recipe, pantry),
    }
}

/// Pick a random recipe. Returns `None` only for an empty catalog.
pub fn suggest_random<'a, R: Rng + ?Sized>(
    recipes: &'a [Recipe],
    pantry: &[Ingredient],
    prefer_available: bool,
    rng: &mut R,
) -> Option<Suggestion<'a>> {
    let all: Vec<&Recipe> = recipes.iter().collect();

    let candidates = if prefer_available {
        let cookable: Vec<&Recipe> = recipes
            .iter()
            .filter(|recipe| classify(recipe, pantry).cookable)
            .collect();
        if cookable.is_empty() {
            tracing::debug!("no cookable recipes, picking from the whole catalog");
            all
        } else {
            cookable
        }
    } else {
        all
    };

    pick(&candidates, rng).map(|recipe| suggestion(recipe, pantry))
}

/// Pick a random recipe accepted by `predicate`, falling back to
/// [`suggest_random`] when nothing matches.
pub fn suggest_matching<'a, R, F>(
    recipes: &'a [Recipe],
    pantry: &[Ingredient],
    predicate: F,
    prefer_available: bool,
    rng: &mut R,
) -> Option<Suggestion<'a>>
where
    R: Rng + ?Sized,
    F: Fn(&Recipe) -> bool,
{
    let filtered: Vec<&Recipe> = recipes.iter().filter(|recipe| predicate(recipe)).collect();

    match pick(&filtered, rng) {
        Some(recipe) => Some(suggestion(recipe, pantry)),
        None => suggest_random(recipes, pantry, prefer_available, rng),
    }
}

pub fn suggest_by_mood<'a, R: Rng + ?Sized>(
    recipes: &'a [Recipe],
    pantry: &[Ingredient],
    mood: Mood,
    prefer_available: bool,
    rng: &mut R,
) -> Option<Suggestion<'a>> {
    tracing::debug!(mood = mood.as_str(), "mood suggestion");
    suggest_matching(recipes, pantry, |r| mood.matches(r), prefer_available, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IngredientData, RecipeIngredient};
    use chrono::Utc;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn recipe(
        id: &str,
        ingredients: &[&str],
        cooking_time: u32,
        servings: u32,
        tags: &[&str],
    ) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: id.to_string(),
            recipe_ingredients: ingredients
                .iter()
                .map(|n| RecipeIngredient::required(*n))
                .collect(),
            instructions: vec![],
            image: None,
            cooking_time,
            servings,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_catalog() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(suggest_random(&[], &[], true, &mut rng).is_none());
        assert!(suggest_by_mood(&[], &[], Mood::Quick, false, &mut rng).is_none());
    }

    #[test]
    fn test_prefer_available_falls_back_to_all() {
        let recipes = vec![
            recipe("a", &["saffron"], 30, 2, &[]),
            recipe("b", &["truffle"], 30, 2, &[]),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let s = suggest_random(&recipes, &[], true, &mut rng).unwrap();
            assert!(!s.availability.cookable);
            seen.insert(s.recipe.id.clone());
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_without_preference_any_recipe_can_come_up() {
        let recipes = vec![
            recipe("a", &["rice"], 30, 2, &[]),
            recipe("b", &["truffle"], 30, 2, &[]),
        ];
        let pantry = vec![IngredientData::new("rice").into_ingredient("1")];
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let seen: HashSet<String> = (0..200)
            .map(|_| {
                suggest_random(&recipes, &pantry, false, &mut rng)
                    .unwrap()
                    .recipe
                    .id
                    .clone()
            })
            .collect();
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_mood_predicates() {
        let quick = recipe("quick", &[], 30, 2, &[]);
        let stew = recipe("stew", &[], 120, 6, &["Hearty"]);
        let salad = recipe("salad", &[], 10, 1, &["FRESH"]);
        let curry = recipe("curry", &[], 50, 2, &["spicy"]);

        assert!(Mood::Quick.matches(&quick));
        assert!(!Mood::Quick.matches(&stew));
        assert!(Mood::Comfort.matches(&stew));
        assert!(Mood::Healthy.matches(&salad));
        assert!(Mood::Adventurous.matches(&curry));
        assert!(Mood::Family.matches(&stew));
        assert!(!Mood::Family.matches(&curry));
        assert!(Mood::DateNight.matches(&curry));
        assert!(!Mood::DateNight.matches(&stew));
        assert!(!Mood::DateNight.matches(&salad));
    }

    #[test]
    fn test_mood_picks_only_matching() {
        let recipes = vec![
            recipe("stew", &[], 120, 6, &["comfort"]),
            recipe("salad", &[], 10, 1, &["healthy"]),
            recipe("soup", &[], 40, 4, &["warm"]),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..100 {
            let s = suggest_by_mood(&recipes, &[], Mood::Comfort, false, &mut rng).unwrap();
            assert!(s.recipe.id == "stew" || s.recipe.id == "soup");
        }
    }

    #[test]
    fn test_mood_without_matches_falls_back() {
        let recipes = vec![
            recipe("stew", &["beef"], 120, 6, &["comfort"]),
            recipe("rice", &["rice"], 120, 6, &[]),
        ];
        let pantry = vec![IngredientData::new("rice").into_ingredient("1")];
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..50 {
            let s = suggest_by_mood(&recipes, &pantry, Mood::DateNight, true, &mut rng).unwrap();
            assert_eq!(s.recipe.id, "rice");
            assert!(s.availability.cookable);
        }
    }

    #[test]
    fn test_mood_round_trips_through_str() {
        for mood in Mood::ALL {
            assert_eq!(Mood::from_str(mood.as_str()), Some(*mood));
        }
        assert_eq!(Mood::from_str("grumpy"), None);
    }
}
