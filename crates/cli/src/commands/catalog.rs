//! Menu browsing, brew methods and ingredients.

use lopcafe_client::Route;
use lopcafe_client::api::NewBrewMethod;

use super::Context;
use crate::output;

/// Show the menu. Open to everyone.
pub async fn list_recipes(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("recipes list", Route::Recipes)?;
    let recipes = ctx.api.fetch_recipes().await?;
    output::recipes(&recipes);
    Ok(())
}

pub async fn list_brew_methods(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("brew-methods list", Route::BrewMethods)?;
    output::brew_methods(&ctx.api.fetch_brew_methods().await?);
    Ok(())
}

pub async fn create_brew_method(
    ctx: &Context,
    name: String,
    details: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("brew-methods create", Route::BrewMethods)?;
    let ack = ctx
        .api
        .create_brew_method(&NewBrewMethod { name, details })
        .await?;
    output::ack(ack.as_ref(), "Brew method created.");
    Ok(())
}

pub async fn list_ingredients(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("ingredients list", Route::Ingredients)?;
    output::ingredients(&ctx.api.fetch_ingredients().await?);
    Ok(())
}

pub async fn create_ingredient(
    ctx: &Context,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("ingredients create", Route::Ingredients)?;
    let ack = ctx.api.create_ingredient(name).await?;
    output::ack(ack.as_ref(), "Ingredient created.");
    Ok(())
}
