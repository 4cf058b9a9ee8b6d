//! Golden file tests for menu partitioning.
//!
//! Each JSON file in `fixtures/menu/` describes a pantry, a recipe catalog,
//! an optional filter and the menu expected from them.
//!
//! Test format:
//! ```json
//! {
//!   "pantry": [{ "name": "Tomato", "in_stock": true }],
//!   "recipes": [
//!     { "name": "Salad", "ingredients": ["Tomato", { "name": "Feta", "optional": true }] }
//!   ],
//!   "filter": { "tags": [], "max_cooking_time": null, "available_only": false },
//!   "expected": { "available": ["Salad"], "partial": [] }
//! }
//! ```

use bistro_core::{partition, IngredientData, MenuFilter, Recipe, RecipeIngredient};
use chrono::{Duration, TimeZone, Utc};
use glob::glob;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// A test case loaded from a JSON fixture file
#[derive(Debug, Deserialize)]
struct TestCase {
    pantry: Vec<PantryRow>,
    recipes: Vec<RecipeRow>,
    #[serde(default)]
    filter: Option<MenuFilter>,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
struct PantryRow {
    name: String,
    #[serde(default = "default_true")]
    in_stock: bool,
}

#[derive(Debug, Deserialize)]
struct RecipeRow {
    name: String,
    ingredients: Vec<RecipeIngredient>,
    #[serde(default = "default_cooking_time")]
    cooking_time: u32,
    #[serde(default)]
    tags: Vec<String>,
}

/// Expected menu, by recipe name
#[derive(Debug, Deserialize, PartialEq, Clone)]
struct Expected {
    available: Vec<String>,
    partial: Vec<ExpectedPartial>,
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
struct ExpectedPartial {
    name: String,
    missing: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_cooking_time() -> u32 {
    30
}

/// Partition the fixture's catalog against its pantry.
fn run_menu(case: &TestCase) -> Expected {
    let pantry: Vec<_> = case
        .pantry
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut data = IngredientData::new(row.name.clone());
            data.set_in_stock(row.in_stock);
            data.into_ingredient(format!("p{}", idx))
        })
        .collect();

    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let recipes: Vec<Recipe> = case
        .recipes
        .iter()
        .enumerate()
        .map(|(idx, row)| Recipe {
            id: format!("r{}", idx),
            name: row.name.clone(),
            recipe_ingredients: row.ingredients.clone(),
            instructions: vec![],
            image: None,
            cooking_time: row.cooking_time,
            servings: 2,
            tags: row.tags.clone(),
            created_at: base + Duration::days(idx as i64),
        })
        .collect();

    let menu = partition(&recipes, &pantry);
    let menu = match &case.filter {
        Some(filter) => menu.filtered(filter),
        None => menu,
    };

    Expected {
        available: menu.available.iter().map(|r| r.name.clone()).collect(),
        partial: menu
            .partial
            .iter()
            .map(|m| ExpectedPartial {
                name: m.recipe.name.clone(),
                missing: m.missing.clone(),
            })
            .collect(),
    }
}

/// Load all test cases from the fixtures directory
fn load_test_cases() -> Vec<(String, TestCase)> {
    let pattern = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/menu/*.json");
    let pattern_str = pattern.to_string_lossy();

    let mut cases = Vec::new();
    for entry in glob(&pattern_str).expect("Failed to read glob pattern") {
        let path = entry.expect("Failed to read directory entry");
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
        let case: TestCase = serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
        cases.push((name, case));
    }

    // Sort by name for deterministic ordering
    cases.sort_by(|a, b| a.0.cmp(&b.0));

    assert!(!cases.is_empty(), "No menu fixtures found in {}", pattern_str);
    cases
}

#[test]
fn test_menu_golden_files() {
    let cases = load_test_cases();

    let mut failures = Vec::new();
    for (name, case) in &cases {
        let actual = run_menu(case);
        if actual != case.expected {
            failures.push((name.clone(), case.expected.clone(), actual));
        }
    }

    if !failures.is_empty() {
        let mut msg = format!(
            "\n{} failures across {} menu tests:\n",
            failures.len(),
            cases.len()
        );

        for (name, expected, actual) in &failures {
            msg.push_str(&format!("\n=== {} ===\n", name));
            msg.push_str(&format!("Expected: {:#?}\n", expected));
            msg.push_str(&format!("Actual:   {:#?}\n", actual));
        }

        panic!("{}", msg);
    }

    println!("All {} menu tests passed!", cases.len());
}
