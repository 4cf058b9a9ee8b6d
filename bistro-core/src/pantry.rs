//! Pantry list helpers: normalization of new entries, stock toggling, search
//! and the headline counts.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::ValidationError;
use crate::types::{Ingredient, IngredientData, DEFAULT_CATEGORY};

/// Categories offered when adding an ingredient.
pub const CATEGORIES: &[&str] = &[
    "Vegetables",
    "Fruits",
    "Meat",
    "Dairy",
    "Grains",
    "Spices",
    "Condiments",
    "Other",
];

/// Default "expiring soon" window.
pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 7;

/// Largest window accepted from configuration.
pub const MAX_EXPIRY_WINDOW_DAYS: i64 = 36_500;

/// Normalize an ingredient before it is stored or put in a draft.
///
/// Trims the name, fills an empty category with the default and applies the
/// out-of-stock rule.
pub fn prepare_ingredient(mut data: IngredientData) -> Result<IngredientData, ValidationError> {
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if data.quantity < 0.0 {
        return Err(ValidationError::NegativeQuantity(data.quantity));
    }

    data.category = data.category.trim().to_string();
    if data.category.is_empty() {
        data.category = DEFAULT_CATEGORY.to_string();
    }

    data.enforce_stock_rule();
    Ok(data)
}

/// The entry's fields with the stock flag flipped.
pub fn toggle_stock(ingredient: &Ingredient) -> IngredientData {
    let mut data = ingredient.data();
    data.set_in_stock(!ingredient.in_stock);
    data
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PantryStats {
    pub in_stock: usize,
    pub out_of_stock: usize,
    /// Entries whose expiry date falls on or before `now + window`,
    /// including ones already past it.
    pub expiring_soon: usize,
}

/// Last instant counted as expiring soon. Saturates instead of overflowing.
fn expiry_cutoff(now: DateTime<Utc>, window_days: i64) -> DateTime<Utc> {
    Duration::try_days(window_days)
        .and_then(|window| now.checked_add_signed(window))
        .unwrap_or(if window_days < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

pub fn pantry_stats(pantry: &[Ingredient], now: DateTime<Utc>, window_days: i64) -> PantryStats {
    let cutoff = expiry_cutoff(now, window_days);

    let in_stock = pantry.iter().filter(|i| i.in_stock).count();
    let expiring_soon = pantry
        .iter()
        .filter(|i| i.expiry_date.is_some_and(|d| d <= cutoff))
        .count();

    PantryStats {
        in_stock,
        out_of_stock: pantry.len() - in_stock,
        expiring_soon,
    }
}

/// Entries whose name contains `term` (case-insensitive), optionally limited
/// to one category. An empty term matches everything.
pub fn search_pantry<'a>(
    pantry: &'a [Ingredient],
    term: &str,
    category: Option<&str>,
) -> Vec<&'a Ingredient> {
    let term = term.trim().to_lowercase();
    pantry
        .iter()
        .filter(|i| i.name.to_lowercase().contains(&term))
        .filter(|i| category.map_or(true, |c| i.category == c))
        .collect()
}
