//! Stores backed by JSON files in the data directory.
//!
//! Each file holds the full list. Every write rewrites the file under a lock,
//! so concurrent commit tasks see each other's changes.

use async_trait::async_trait;
use bistro_core::store::{sort_pantry, sort_recipes};
use bistro_core::{Ingredient, IngredientData, PantryStore, Recipe, RecipeStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

/// A JSON array on disk. A missing file reads as empty.
#[derive(Debug)]
struct JsonFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _items: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonFile<T> {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
            _items: PhantomData,
        }
    }

    async fn read(&self) -> Result<Vec<T>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, items: &[T]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(items)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    async fn load(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Read, let `f` change the list, write it back if `f` says so.
    async fn modify<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<T>) -> (bool, R),
    {
        let _guard = self.lock.lock().await;
        let mut items = self.read().await?;
        let (dirty, result) = f(&mut items);
        if dirty {
            self.write(&items).await?;
        }
        Ok(result)
    }

    async fn replace(&self, items: &[T]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write(items).await
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Pantry kept in `pantry.json`.
#[derive(Debug)]
pub struct FilePantryStore {
    file: JsonFile<Ingredient>,
}

impl FilePantryStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: JsonFile::new(path.as_ref().to_path_buf()),
        }
    }

    pub fn exists(&self) -> bool {
        self.file.exists()
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.file.replace(&[]).await
    }
}

#[async_trait]
impl PantryStore for FilePantryStore {
    async fn get_all(&self) -> Result<Vec<Ingredient>, StoreError> {
        let mut items = self.file.load().await?;
        sort_pantry(&mut items);
        Ok(items)
    }

    async fn add(&self, data: IngredientData) -> Result<Ingredient, StoreError> {
        let ingredient = data.into_ingredient(Uuid::new_v4().to_string());
        let stored = ingredient.clone();
        self.file
            .modify(move |items| {
                items.push(stored);
                (true, ())
            })
            .await?;
        Ok(ingredient)
    }

    async fn update(&self, id: &str, data: &IngredientData) -> Result<bool, StoreError> {
        self.file
            .modify(|items| match items.iter_mut().find(|i| i.id == id) {
                Some(existing) => {
                    *existing = data.clone().into_ingredient(id);
                    (true, true)
                }
                None => (false, false),
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.file
            .modify(|items| {
                let before = items.len();
                items.retain(|i| i.id != id);
                let removed = items.len() != before;
                (removed, removed)
            })
            .await
    }
}

/// Recipes kept in `recipes.json`.
#[derive(Debug)]
pub struct FileRecipeStore {
    file: JsonFile<Recipe>,
}

impl FileRecipeStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            file: JsonFile::new(path.as_ref().to_path_buf()),
        }
    }

    pub fn exists(&self) -> bool {
        self.file.exists()
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.file.replace(&[]).await
    }
}

#[async_trait]
impl RecipeStore for FileRecipeStore {
    async fn get_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let mut recipes = self.file.load().await?;
        sort_recipes(&mut recipes);
        Ok(recipes)
    }

    async fn add(&self, mut recipe: Recipe) -> Result<Recipe, StoreError> {
        if recipe.id.is_empty() {
            recipe.id = Uuid::new_v4().to_string();
        }
        let stored = recipe.clone();
        self.file
            .modify(move |recipes| {
                recipes.retain(|r| r.id != stored.id);
                recipes.push(stored);
                (true, ())
            })
            .await?;
        Ok(recipe)
    }

    async fn update(&self, id: &str, recipe: &Recipe) -> Result<bool, StoreError> {
        self.file
            .modify(|recipes| match recipes.iter_mut().find(|r| r.id == id) {
                Some(existing) => {
                    *existing = Recipe {
                        id: id.to_string(),
                        ..recipe.clone()
                    };
                    (true, true)
                }
                None => (false, false),
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.file
            .modify(|recipes| {
                let before = recipes.len();
                recipes.retain(|r| r.id != id);
                let removed = recipes.len() != before;
                (removed, removed)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::RecipeIngredient;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_pantry_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePantryStore::new(dir.path().join("pantry.json"));
        assert!(store.get_all().await.unwrap().is_empty());
        assert!(!store.exists());

        let rice = store.add(IngredientData::new("Rice")).await.unwrap();
        store.add(IngredientData::new("beans")).await.unwrap();
        assert!(store.exists());

        let reopened = FilePantryStore::new(dir.path().join("pantry.json"));
        let names: Vec<String> = reopened
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["beans", "Rice"]);

        let mut gone = IngredientData::new("Rice");
        gone.set_in_stock(false);
        assert!(reopened.update(&rice.id, &gone).await.unwrap());
        assert!(!reopened.update("nope", &gone).await.unwrap());
        assert!(reopened.delete(&rice.id).await.unwrap());
        assert!(!reopened.delete(&rice.id).await.unwrap());
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recipes_read_legacy_ingredient_lists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.json");
        std::fs::write(
            &path,
            r#"[{"id": "r1", "name": "Toast", "ingredients": ["Bread", "Butter"],
                "cooking_time": 5, "servings": 1, "created_at": "2025-01-01T00:00:00Z"}]"#,
        )
        .unwrap();

        let store = FileRecipeStore::new(&path);
        let added = store
            .add(Recipe {
                id: String::new(),
                name: "Jam toast".to_string(),
                recipe_ingredients: vec![
                    RecipeIngredient::required("Bread"),
                    RecipeIngredient::optional("Jam"),
                ],
                instructions: vec![],
                image: None,
                cooking_time: 5,
                servings: 1,
                tags: vec![],
                created_at: Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap(),
            })
            .await
            .unwrap();

        let recipes = store.get_all().await.unwrap();
        assert_eq!(recipes[0].id, added.id);
        assert_eq!(recipes[1].recipe_ingredients[0], RecipeIngredient::required("Bread"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pantry.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FilePantryStore::new(&path);
        assert!(matches!(
            store.get_all().await,
            Err(StoreError::Serialization(_))
        ));
    }
}
