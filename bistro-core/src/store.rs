//! Storage seams.
//!
//! The matching and reconciling logic never talks to a database. Callers hand
//! it snapshots loaded through these traits, and the commit step writes back
//! through them. Snapshots may be stale; nothing here invalidates caches.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{Ingredient, IngredientData, IngredientUpdate, Recipe};

/// Pantry persistence.
#[async_trait]
pub trait PantryStore: Send + Sync + fmt::Debug {
    /// All entries, ordered by name.
    async fn get_all(&self) -> Result<Vec<Ingredient>, StoreError>;

    /// Insert a new entry; the store assigns its id.
    async fn add(&self, data: IngredientData) -> Result<Ingredient, StoreError>;

    /// Replace an entry's fields. `Ok(false)` when the id is unknown.
    async fn update(&self, id: &str, data: &IngredientData) -> Result<bool, StoreError>;

    /// `Ok(false)` when the id is unknown.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Apply several updates. Stops at the first failure.
    async fn batch_update(&self, updates: &[IngredientUpdate]) -> Result<(), StoreError> {
        for update in updates {
            if !self.update(&update.id, &update.data).await? {
                return Err(StoreError::NotFound(update.id.clone()));
            }
        }
        Ok(())
    }
}

/// Recipe persistence.
#[async_trait]
pub trait RecipeStore: Send + Sync + fmt::Debug {
    /// All recipes, newest first.
    async fn get_all(&self) -> Result<Vec<Recipe>, StoreError>;

    /// Insert a recipe. An empty id is replaced with a generated one.
    async fn add(&self, recipe: Recipe) -> Result<Recipe, StoreError>;

    async fn update(&self, id: &str, recipe: &Recipe) -> Result<bool, StoreError>;

    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("store lock poisoned".to_string())
}

/// Orders a pantry the way stores return it.
pub fn sort_pantry(items: &mut [Ingredient]) {
    items.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Orders recipes the way stores return them.
pub fn sort_recipes(recipes: &mut [Recipe]) {
    recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
}

/// In-memory pantry store for tests and tooling.
///
/// Failures can be injected per key: an entry id fails updates and deletes,
/// an ingredient name fails adds.
#[derive(Debug, Default)]
pub struct MemoryPantryStore {
    items: RwLock<HashMap<String, Ingredient>>,
    failing: RwLock<HashSet<String>>,
}

impl MemoryPantryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `items` under their existing ids.
    pub fn with_items(items: impl IntoIterator<Item = Ingredient>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        Self {
            items: RwLock::new(items),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Make every operation on `key` fail with a backend error.
    pub fn fail_on(&self, key: &str) -> Result<(), StoreError> {
        self.failing
            .write()
            .map_err(poisoned)?
            .insert(key.to_string());
        Ok(())
    }

    pub fn clear_failures(&self) -> Result<(), StoreError> {
        self.failing.write().map_err(poisoned)?.clear();
        Ok(())
    }

    fn check(&self, key: &str) -> Result<(), StoreError> {
        if self.failing.read().map_err(poisoned)?.contains(key) {
            return Err(StoreError::Backend(format!("injected failure for {}", key)));
        }
        Ok(())
    }
}

#[async_trait]
impl PantryStore for MemoryPantryStore {
    async fn get_all(&self) -> Result<Vec<Ingredient>, StoreError> {
        let mut items: Vec<Ingredient> =
            self.items.read().map_err(poisoned)?.values().cloned().collect();
        sort_pantry(&mut items);
        Ok(items)
    }

    async fn add(&self, data: IngredientData) -> Result<Ingredient, StoreError> {
        self.check(&data.name)?;
        let ingredient = data.into_ingredient(Uuid::new_v4().to_string());
        self.items
            .write()
            .map_err(poisoned)?
            .insert(ingredient.id.clone(), ingredient.clone());
        Ok(ingredient)
    }

    async fn update(&self, id: &str, data: &IngredientData) -> Result<bool, StoreError> {
        self.check(id)?;
        let mut items = self.items.write().map_err(poisoned)?;
        match items.get_mut(id) {
            Some(existing) => {
                *existing = data.clone().into_ingredient(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.check(id)?;
        Ok(self.items.write().map_err(poisoned)?.remove(id).is_some())
    }
}

/// In-memory recipe store for tests and tooling.
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    recipes: RwLock<HashMap<String, Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        let recipes = recipes.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            recipes: RwLock::new(recipes),
        }
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn get_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let mut recipes: Vec<Recipe> = self
            .recipes
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        sort_recipes(&mut recipes);
        Ok(recipes)
    }

    async fn add(&self, mut recipe: Recipe) -> Result<Recipe, StoreError> {
        if recipe.id.is_empty() {
            recipe.id = Uuid::new_v4().to_string();
        }
        self.recipes
            .write()
            .map_err(poisoned)?
            .insert(recipe.id.clone(), recipe.clone());
        Ok(recipe)
    }

    async fn update(&self, id: &str, recipe: &Recipe) -> Result<bool, StoreError> {
        let mut recipes = self.recipes.write().map_err(poisoned)?;
        match recipes.get_mut(id) {
            Some(existing) => {
                *existing = Recipe {
                    id: id.to_string(),
                    ..recipe.clone()
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.recipes.write().map_err(poisoned)?.remove(id).is_some())
    }
}
