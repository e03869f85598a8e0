//! Recipes, brew methods and ingredients.

#![allow(clippy::unwrap_used)]

use lopcafe_client::ApiError;
use lopcafe_client::api::{IngredientLine, NewBrewMethod, RecipeDraft};
use lopcafe_core::{BrewMethodId, IngredientId, Price, RecipeId, Role};
use lopcafe_integration_tests::{FakeApi, sample_recipe};
use serde_json::json;

fn draft() -> RecipeDraft {
    RecipeDraft {
        name: "Cortado".to_string(),
        description: Some("Equal parts".to_string()),
        price: Price::from_cents(380),
        takeaway: false,
        brew_method_id: Some(BrewMethodId::new(1)),
        ingredients: vec![IngredientLine {
            ingredient_id: IngredientId::new(1),
            quantity: Some("2 shots".to_string()),
        }],
        image_url: None,
    }
}

// =============================================================================
// Recipes
// =============================================================================

#[tokio::test]
async fn test_recipes_are_public() {
    let api = FakeApi::start().await;
    api.respond_json(
        "GET",
        "/recipes/",
        200,
        json!([sample_recipe(1, "Latte"), sample_recipe(2, "Flat White")]),
    );
    let client = api.client();

    let recipes = client.fetch_recipes().await.unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].id, RecipeId::new(1));
    assert_eq!(recipes[0].price, Price::from_cents(450));
    assert_eq!(recipes[0].brew_method.as_ref().unwrap().name, "Espresso");
    assert_eq!(recipes[0].ingredients[1].quantity.as_deref(), Some("200ml"));

    let request = api.last_request();
    assert_eq!(request.header("authorization"), None);
    assert_eq!(request.header("content-type"), None);
}

#[tokio::test]
async fn test_create_recipe_payload() {
    let api = FakeApi::start().await;
    api.respond_json("POST", "/recipes/", 201, json!({"error": false, "message": "Recipe created."}));
    let client = api.client_as("T", Role::Admin);

    let ack = client.create_recipe(&draft()).await.unwrap().unwrap();
    assert_eq!(ack.message.as_deref(), Some("Recipe created."));
    assert_eq!(
        api.last_request().json().unwrap(),
        json!({
            "name": "Cortado",
            "description": "Equal parts",
            "price": 3.8,
            "takeaway": false,
            "brew_method_id": 1,
            "ingredients": [{"ingredient_id": 1, "quantity": "2 shots"}],
            "image_url": null
        })
    );
}

#[tokio::test]
async fn test_recipe_calls_leave_role_checks_to_the_server() {
    let api = FakeApi::start().await;
    api.respond_json(
        "POST",
        "/recipes/",
        403,
        json!({"error": true, "message": "Admins only.", "code": 403}),
    );
    let client = api.client_as("T", Role::User);

    let err = client.create_recipe(&draft()).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(api.requests().len(), 1);
}

#[tokio::test]
async fn test_incomplete_recipe_is_rejected_locally() {
    let api = FakeApi::start().await;
    let client = api.client_as("T", Role::Admin);

    let no_brew = RecipeDraft {
        brew_method_id: None,
        ..draft()
    };
    let err = client.create_recipe(&no_brew).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(ref m) if m == "Name, price, and brew method are required"));

    let err = client.update_recipe("abc", &draft()).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(ref m) if m == "Valid recipe ID required"));

    assert!(matches!(
        client.delete_recipe("-1").await,
        Err(ApiError::Validation(_))
    ));
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_update_and_delete_recipe_paths() {
    let api = FakeApi::start().await;
    api.respond_json("PUT", "/recipes/4", 200, json!({"message": "Recipe updated."}));
    api.respond_json("DELETE", "/recipes/4", 200, json!({"message": "Recipe deleted."}));
    let client = api.client_as("T", Role::Admin);

    client.update_recipe("4", &draft()).await.unwrap();
    assert_eq!(api.last_request().method, "PUT");

    client.delete_recipe(RecipeId::new(4)).await.unwrap();
    let request = api.last_request();
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.path, "/recipes/4");
}

// =============================================================================
// Brew methods and ingredients
// =============================================================================

#[tokio::test]
async fn test_brew_methods() {
    let api = FakeApi::start().await;
    api.respond_json(
        "GET",
        "/brew_methods/",
        200,
        json!([{"id": 1, "name": "Espresso", "details": "9 bar"}, {"id": 2, "name": "Pour over"}]),
    );
    api.respond_json("POST", "/brew_methods/", 201, json!({"message": "Brew method created."}));
    let client = api.client_as("T", Role::Admin);

    let methods = client.fetch_brew_methods().await.unwrap();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[1].details, None);

    client
        .create_brew_method(&NewBrewMethod {
            name: "AeroPress".to_string(),
            details: Some("Inverted".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(
        api.last_request().json().unwrap(),
        json!({"name": "AeroPress", "details": "Inverted"})
    );

    let err = client
        .create_brew_method(&NewBrewMethod::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(ref m) if m == "Name is required"));
    assert_eq!(api.requests().len(), 2);
}

#[tokio::test]
async fn test_ingredients() {
    let api = FakeApi::start().await;
    api.respond_json("GET", "/ingredients/", 200, json!([{"id": 3, "name": "Oat milk"}]));
    api.respond_json("POST", "/ingredients/", 201, json!({"message": "Ingredient created."}));
    let client = api.client_as("T", Role::Admin);

    let ingredients = client.fetch_ingredients().await.unwrap();
    assert_eq!(ingredients[0].id, IngredientId::new(3));

    client.create_ingredient("Cinnamon").await.unwrap();
    assert_eq!(api.last_request().json().unwrap(), json!({"name": "Cinnamon"}));

    assert!(matches!(
        client.create_ingredient("  ").await,
        Err(ApiError::Validation(_))
    ));
    assert_eq!(api.requests().len(), 2);
}
