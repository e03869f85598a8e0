//! Recipe administration (admin only).

use lopcafe_client::Route;
use lopcafe_client::api::{IngredientLine, RecipeDraft};
use lopcafe_core::{BrewMethodId, IngredientId, Price};

use super::Context;
use crate::error::CliError;
use crate::output;

/// Recipe fields as given on the command line.
#[derive(Debug, Clone)]
pub struct RecipeArgs {
    pub name: String,
    pub price: String,
    pub brew_method: Option<i32>,
    pub description: Option<String>,
    pub takeaway: bool,
    /// `ID` or `ID:QUANTITY`, e.g. `3:18g`.
    pub ingredients: Vec<String>,
    pub image_url: Option<String>,
}

impl RecipeArgs {
    /// Build the API draft.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` for an unparseable price or
    /// ingredient line.
    pub fn into_draft(self) -> Result<RecipeDraft, CliError> {
        let price: Price = self
            .price
            .parse()
            .map_err(|_| CliError::InvalidArgument {
                name: "price",
                value: self.price.clone(),
            })?;
        let ingredients = self
            .ingredients
            .iter()
            .map(|raw| parse_ingredient_line(raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RecipeDraft {
            name: self.name,
            description: self.description,
            price,
            takeaway: self.takeaway,
            brew_method_id: self.brew_method.map(BrewMethodId::new),
            ingredients,
            image_url: self.image_url,
        })
    }
}

fn parse_ingredient_line(raw: &str) -> Result<IngredientLine, CliError> {
    let invalid = || CliError::InvalidArgument {
        name: "ingredient",
        value: raw.to_string(),
    };
    let (id, quantity) = match raw.split_once(':') {
        Some((id, quantity)) => (id, Some(quantity.trim().to_string())),
        None => (raw, None),
    };
    let ingredient_id: IngredientId = id.parse().map_err(|_| invalid())?;
    Ok(IngredientLine {
        ingredient_id,
        quantity: quantity.filter(|q| !q.is_empty()),
    })
}

pub async fn create(ctx: &Context, args: RecipeArgs) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("recipes create", Route::CreateRecipe)?;
    let draft = args.into_draft()?;
    let ack = ctx.api.create_recipe(&draft).await?;
    output::ack(ack.as_ref(), "Recipe created.");
    Ok(())
}

pub async fn update(
    ctx: &Context,
    recipe_id: &str,
    args: RecipeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("recipes update", Route::CreateRecipe)?;
    let draft = args.into_draft()?;
    let ack = ctx.api.update_recipe(recipe_id, &draft).await?;
    output::ack(ack.as_ref(), "Recipe updated.");
    Ok(())
}

pub async fn delete(ctx: &Context, recipe_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("recipes delete", Route::CreateRecipe)?;
    let ack = ctx.api.delete_recipe(recipe_id).await?;
    output::ack(ack.as_ref(), "Recipe deleted.");
    Ok(())
}
