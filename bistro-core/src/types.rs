use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned to ingredients created without one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// A pantry entry as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    /// Free-text unit label ("g", "cans"). Never converted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub in_stock: bool,
}

impl Ingredient {
    /// Copy of the editable fields, without the id.
    pub fn data(&self) -> IngredientData {
        IngredientData {
            name: self.name.clone(),
            quantity: self.quantity,
            unit: self.unit.clone(),
            category: self.category.clone(),
            expiry_date: self.expiry_date,
            in_stock: self.in_stock,
        }
    }
}

/// The editable fields of a pantry entry: what gets inserted for new rows
/// and sent as the payload of an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientData {
    pub name: String,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub in_stock: bool,
}

impl IngredientData {
    /// An in-stock entry with quantity 1 in the default category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: 1.0,
            unit: None,
            category: DEFAULT_CATEGORY.to_string(),
            expiry_date: None,
            in_stock: true,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_expiry(mut self, expiry_date: DateTime<Utc>) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    /// Set the stock flag. Going out of stock clears quantity and expiry
    /// in the same edit.
    pub fn set_in_stock(&mut self, in_stock: bool) {
        self.in_stock = in_stock;
        self.enforce_stock_rule();
    }

    /// Out-of-stock entries always carry quantity 0 and no expiry date.
    pub fn enforce_stock_rule(&mut self) {
        if !self.in_stock {
            self.quantity = 0.0;
            self.expiry_date = None;
        }
    }

    /// Field-by-field comparison; expiry dates compare at millisecond precision.
    pub fn same_values(&self, other: &IngredientData) -> bool {
        self.name == other.name
            && self.quantity == other.quantity
            && self.unit == other.unit
            && self.category == other.category
            && self.in_stock == other.in_stock
            && self.expiry_date.map(|d| d.timestamp_millis())
                == other.expiry_date.map(|d| d.timestamp_millis())
    }

    pub fn into_ingredient(self, id: impl Into<String>) -> Ingredient {
        Ingredient {
            id: id.into(),
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            category: self.category,
            expiry_date: self.expiry_date,
            in_stock: self.in_stock,
        }
    }
}

/// New field values for an existing pantry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientUpdate {
    pub id: String,
    pub data: IngredientData,
}

/// One line of a recipe's ingredient list.
///
/// Deserializes from either `{"name": ..., "optional": ...}` or a bare
/// string, which older flat ingredient lists used and which is read as
/// a required ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecipeIngredientRepr")]
pub struct RecipeIngredient {
    pub name: String,
    pub optional: bool,
}

impl RecipeIngredient {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecipeIngredientRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        optional: bool,
    },
}

impl From<RecipeIngredientRepr> for RecipeIngredient {
    fn from(repr: RecipeIngredientRepr) -> Self {
        match repr {
            RecipeIngredientRepr::Name(name) => RecipeIngredient::required(name),
            RecipeIngredientRepr::Full { name, optional } => RecipeIngredient { name, optional },
        }
    }
}

/// A recipe. Reference data only; cooking from it changes nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "ingredients")]
    pub recipe_ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Image reference (storage key or URL), resolved outside this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Minutes
    pub cooking_time: u32,
    pub servings: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Ingredients that block cookability when unavailable.
    pub fn required_ingredients(&self) -> impl Iterator<Item = &RecipeIngredient> {
        self.recipe_ingredients.iter().filter(|i| !i.optional)
    }

    /// Case-insensitive check against a set of lowercase tags.
    pub fn has_any_tag(&self, lowercase_tags: &[&str]) -> bool {
        self.tags
            .iter()
            .any(|tag| lowercase_tags.contains(&tag.to_lowercase().as_str()))
    }
}
