//! Recipe listing, brew methods and ingredients.

use lopcafe_core::{BrewMethod, Ingredient, Recipe};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, instrument};

use super::{Ack, ApiClient, NewBrewMethod, require_text};
use crate::error::ApiError;

impl ApiClient {
    /// List every recipe. No login needed.
    ///
    /// # Errors
    ///
    /// Returns the transport/HTTP error.
    #[instrument(skip(self))]
    pub async fn fetch_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        let recipes: Vec<Recipe> = self.get_list("/recipes/", &[]).await?;
        debug!(count = recipes.len(), "Fetched recipes");
        Ok(recipes)
    }

    /// List brew methods.
    ///
    /// # Errors
    ///
    /// Returns the transport/HTTP error.
    #[instrument(skip(self))]
    pub async fn fetch_brew_methods(&self) -> Result<Vec<BrewMethod>, ApiError> {
        self.get_list("/brew_methods/", &[]).await
    }

    /// Add a brew method.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the name is blank, or the
    /// transport/HTTP error.
    #[instrument(skip(self))]
    pub async fn create_brew_method(
        &self,
        method: &NewBrewMethod,
    ) -> Result<Option<Ack>, ApiError> {
        require_text(&method.name, "Name is required")?;
        self.send(
            self.request(Method::POST, self.url("/brew_methods/"))
                .json(method),
        )
        .await
    }

    /// List ingredients.
    ///
    /// # Errors
    ///
    /// Returns the transport/HTTP error.
    #[instrument(skip(self))]
    pub async fn fetch_ingredients(&self) -> Result<Vec<Ingredient>, ApiError> {
        self.get_list("/ingredients/", &[]).await
    }

    /// Add an ingredient.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the name is blank, or the
    /// transport/HTTP error.
    #[instrument(skip(self))]
    pub async fn create_ingredient(&self, name: &str) -> Result<Option<Ack>, ApiError> {
        require_text(name, "Name is required")?;
        self.send(
            self.request(Method::POST, self.url("/ingredients/"))
                .json(&json!({ "name": name })),
        )
        .await
    }
}
