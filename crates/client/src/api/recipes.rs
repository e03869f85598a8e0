//! Recipe administration.
//!
//! These calls do not check the session role; admin screens gate them and
//! the server enforces it.

use lopcafe_core::{IdInput, RecipeId};
use reqwest::Method;
use tracing::instrument;

use super::{Ack, ApiClient, RecipeDraft};
use crate::error::ApiError;

impl ApiClient {
    /// Create a recipe.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the draft is incomplete, or the
    /// transport/HTTP error.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Option<Ack>, ApiError> {
        draft.validate()?;
        self.send(self.request(Method::POST, self.url("/recipes/")).json(draft))
            .await
    }

    /// Replace a recipe.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid id or incomplete draft,
    /// or the transport/HTTP error.
    #[instrument(skip(self, recipe_id, draft), fields(name = %draft.name))]
    pub async fn update_recipe(
        &self,
        recipe_id: impl IdInput<RecipeId>,
        draft: &RecipeDraft,
    ) -> Result<Option<Ack>, ApiError> {
        let recipe_id = recipe_id.into_id()?;
        draft.validate()?;
        self.send(
            self.request(Method::PUT, self.url(&format!("/recipes/{recipe_id}")))
                .json(draft),
        )
        .await
    }

    /// Delete a recipe.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid id, or the
    /// transport/HTTP error.
    #[instrument(skip(self, recipe_id))]
    pub async fn delete_recipe(
        &self,
        recipe_id: impl IdInput<RecipeId>,
    ) -> Result<Option<Ack>, ApiError> {
        let recipe_id = recipe_id.into_id()?;
        self.send(self.request(Method::DELETE, self.url(&format!("/recipes/{recipe_id}"))))
            .await
    }
}
