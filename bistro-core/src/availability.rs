//! Recipe availability against the current pantry.

use serde::Serialize;

use crate::matcher::matches;
use crate::types::{Ingredient, Recipe};

/// What a recipe still needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    /// Required ingredient names with no in-stock match, in recipe order.
    pub missing: Vec<String>,
    pub cookable: bool,
}

/// Is `name` satisfied by any in-stock pantry entry?
pub fn is_in_stock(name: &str, pantry: &[Ingredient]) -> bool {
    pantry
        .iter()
        .filter(|ingredient| ingredient.in_stock)
        .any(|ingredient| matches(&ingredient.name, name))
}

/// Classify a recipe. Optional ingredients never count as missing.
pub fn classify(recipe: &Recipe, pantry: &[Ingredient]) -> Availability {
    let missing: Vec<String> = recipe
        .required_ingredients()
        .filter(|line| !is_in_stock(&line.name, pantry))
        .map(|line| line.name.clone())
        .collect();

    Availability {
        cookable: missing.is_empty(),
        missing,
    }
}

/// One row of a recipe's ingredient checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistLine {
    pub name: String,
    pub optional: bool,
    pub available: bool,
}

impl ChecklistLine {
    /// Required-and-missing first, then required-and-available, then optional
    /// lines (missing before available).
    fn display_rank(&self) -> u8 {
        match (self.optional, self.available) {
            (false, false) => 0,
            (false, true) => 1,
            (true, false) => 2,
            (true, true) => 3,
        }
    }
}

/// The recipe's ingredient lines annotated with availability, in display
/// order. Lines of equal rank keep recipe order.
pub fn checklist(recipe: &Recipe, pantry: &[Ingredient]) -> Vec<ChecklistLine> {
    let mut lines: Vec<ChecklistLine> = recipe
        .recipe_ingredients
        .iter()
        .map(|line| ChecklistLine {
            name: line.name.clone(),
            optional: line.optional,
            available: is_in_stock(&line.name, pantry),
        })
        .collect();

    lines.sort_by_key(ChecklistLine::display_rank);
    lines
}
