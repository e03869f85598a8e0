//! Entity snapshots returned by the LopCafe API.
//!
//! The server owns every entity. These are read-through copies fetched on
//! demand and refetched after mutations; nothing here is cached.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::{BrewMethodId, IngredientId, OrderId, RecipeId, UserId};
use super::price::Price;
use super::status::OrderStatus;

/// A brew method (e.g. "Pour over", "Espresso").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrewMethod {
    pub id: BrewMethodId,
    pub name: String,
    /// Free-form preparation notes.
    #[serde(default)]
    pub details: Option<String>,
}

/// An ingredient that recipes can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
}

/// An ingredient line inside a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// The referenced ingredient.
    pub id: IngredientId,
    pub name: String,
    /// Amount as entered by the admin (e.g. "200ml", "2 shots").
    #[serde(default)]
    pub quantity: Option<String>,
}

/// A drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    /// Whether the drink can be ordered to take away.
    #[serde(default)]
    pub takeaway: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub brew_method: Option<BrewMethod>,
    /// Ingredient lines in display order.
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

/// A customer order for a single recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub recipe_id: RecipeId,
    /// Denormalized recipe name; `None` if the recipe was deleted.
    #[serde(default)]
    pub recipe_name: Option<String>,
    pub quantity: u32,
    /// Price per unit captured when the order was placed.
    pub unit_price: Price,
    pub status: OrderStatus,
    /// Server timestamp (UTC, no offset on the wire).
    pub ordered_at: NaiveDateTime,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl Order {
    /// Line total (`unit_price * quantity`).
    #[must_use]
    pub fn total(&self) -> Price {
        self.unit_price.total(self.quantity)
    }

    /// Name to show for the ordered recipe.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.recipe_name
            .clone()
            .unwrap_or_else(|| format!("Recipe #{}", self.recipe_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_from_api_json() {
        let json = r#"{
            "id": 1,
            "name": "Flat White",
            "description": "Velvety milk over a double shot",
            "price": 3.5,
            "takeaway": true,
            "image_url": "/uploads/1700000000.0_flat.png",
            "brew_method": {"id": 2, "name": "Espresso", "details": null},
            "ingredients": [
                {"id": 4, "name": "Milk", "quantity": "120ml"},
                {"id": 5, "name": "Coffee", "quantity": "18g"}
            ]
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, RecipeId::new(1));
        assert_eq!(recipe.price, Price::from_cents(350));
        assert!(recipe.takeaway);
        assert_eq!(recipe.brew_method.unwrap().name, "Espresso");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[1].quantity.as_deref(), Some("18g"));
    }

    #[test]
    fn test_recipe_without_brew_method() {
        let json = r#"{"id": 3, "name": "Tea", "price": 2, "brew_method": null, "ingredients": []}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert!(recipe.brew_method.is_none());
        assert!(!recipe.takeaway);
        assert!(recipe.description.is_none());
    }

    #[test]
    fn test_order_from_api_json() {
        let json = r#"{
            "id": 10,
            "recipe_id": 1,
            "recipe_name": "Flat White",
            "quantity": 2,
            "unit_price": 3.5,
            "status": "Pending",
            "ordered_at": "2024-05-01T09:30:12.345678",
            "user_id": 7
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total(), Price::from_cents(700));
        assert_eq!(order.user_id, Some(UserId::new(7)));
        assert_eq!(order.display_name(), "Flat White");
    }

    #[test]
    fn test_order_display_name_fallback() {
        let json = r#"{
            "id": 11, "recipe_id": 8, "recipe_name": null, "quantity": 1,
            "unit_price": 2.0, "status": "Cancelled", "ordered_at": "2024-05-01T09:30:12"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.display_name(), "Recipe #8");
    }
}
