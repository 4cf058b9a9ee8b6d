pub mod availability;
pub mod commit;
pub mod config;
pub mod error;
pub mod matcher;
pub mod menu;
pub mod pantry;
pub mod recipes;
pub mod reconcile;
pub mod store;
pub mod suggest;
pub mod types;

pub use availability::{checklist, classify, Availability, ChecklistLine};
pub use commit::{commit, Change, CommitReport, FailedOperation};
pub use config::{BistroConfig, ConfigError};
pub use error::{CommitError, StoreError, ValidationError};
pub use matcher::{find_likely_duplicates, is_likely_duplicate, matches};
pub use menu::{partition, partition_with_limit, Menu, MenuFilter, MenuStats, PartialMatch};
pub use pantry::{pantry_stats, prepare_ingredient, search_pantry, toggle_stock, PantryStats};
pub use recipes::{all_tags, parse_tags, sanitize_recipe, search_recipes};
pub use reconcile::{has_changes, reconcile, PantryChanges, PantryDraft, RowKey, WorkingCopy};
pub use store::{MemoryPantryStore, MemoryRecipeStore, PantryStore, RecipeStore};
pub use suggest::{suggest_by_mood, suggest_matching, suggest_random, Mood, Suggestion};
pub use types::{Ingredient, IngredientData, IngredientUpdate, Recipe, RecipeIngredient};
