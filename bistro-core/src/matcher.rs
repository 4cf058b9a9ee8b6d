//! Ingredient name matching.
//!
//! Recipes reference pantry items by free-text name, so availability is decided
//! by a loose substring test rather than by identity. Short names produce false
//! positives ("egg" satisfies "eggplant"); callers are expected to live with that.

use crate::types::Ingredient;

/// Minimum length of the shorter name for the near-duplicate substring rule.
const DUPLICATE_MIN_LEN: usize = 3;

/// Maximum length difference for the near-duplicate substring rule.
const DUPLICATE_MAX_LEN_DIFF: usize = 2;

/// Does a pantry entry named `pantry_name` satisfy a recipe line named
/// `recipe_name`?
///
/// Case-insensitive; true when either name contains the other. Whitespace is
/// compared like any other character and an empty name never matches.
pub fn matches(pantry_name: &str, recipe_name: &str) -> bool {
    let pantry = pantry_name.to_lowercase();
    let recipe = recipe_name.to_lowercase();

    if pantry.is_empty() || recipe.is_empty() {
        return false;
    }

    pantry.contains(&recipe) || recipe.contains(&pantry)
}

/// Stricter check used to warn when a new pantry entry probably repeats an
/// existing one.
///
/// Flags an exact case-insensitive match, or names whose lengths differ by at
/// most two where the shorter (at least three characters) is contained in the
/// longer: "tomato" vs "tomatoes", but not "egg" vs "eggplant".
pub fn is_likely_duplicate(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }

    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = shorter.chars().count();
    let long_len = longer.chars().count();

    short_len >= DUPLICATE_MIN_LEN
        && long_len - short_len <= DUPLICATE_MAX_LEN_DIFF
        && longer.contains(&shorter)
}

/// Pantry entries that look like duplicates of `name`.
pub fn find_likely_duplicates<'a>(name: &str, pantry: &'a [Ingredient]) -> Vec<&'a Ingredient> {
    pantry
        .iter()
        .filter(|ingredient| is_likely_duplicate(&ingredient.name, name))
        .collect()
}
