//! Orders: listing, lookup, placing, updating and cancelling.
//!
//! Every call here needs a token and fails with `AuthRequired` before any
//! request when the session has none.

use lopcafe_core::{IdInput, Order, OrderId, RecipeId};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, instrument};

use super::{Ack, ApiClient, OrderQuery, OrderUpdate, QuantityInput};
use crate::error::ApiError;

/// Default page size for the recent and pending order views.
pub const DEFAULT_ORDER_LIMIT: u32 = 5;

impl ApiClient {
    /// The caller's orders (every order for admins).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` without a token, or the
    /// transport/HTTP error.
    #[instrument(skip(self))]
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.fetch_orders_filtered(OrderQuery::default()).await
    }

    /// Orders matching `query`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` without a token,
    /// `ApiError::Validation` for a zero limit, or the transport/HTTP error.
    #[instrument(skip(self))]
    pub async fn fetch_orders_filtered(&self, query: OrderQuery) -> Result<Vec<Order>, ApiError> {
        self.require_token()?;
        if query.limit == Some(0) {
            return Err(ApiError::Validation(
                "Limit must be a positive integer".to_string(),
            ));
        }

        let orders: Vec<Order> = self.get_list("/orders/", &query.to_pairs()).await?;
        debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }

    /// The most recent `limit` orders.
    ///
    /// # Errors
    ///
    /// See [`fetch_orders_filtered`](Self::fetch_orders_filtered).
    pub async fn fetch_recent_orders(&self, limit: u32) -> Result<Vec<Order>, ApiError> {
        self.fetch_orders_filtered(OrderQuery::recent(limit)).await
    }

    /// Up to `limit` orders still pending.
    ///
    /// # Errors
    ///
    /// See [`fetch_orders_filtered`](Self::fetch_orders_filtered).
    pub async fn fetch_pending_orders(&self, limit: u32) -> Result<Vec<Order>, ApiError> {
        self.fetch_orders_filtered(OrderQuery::pending(limit)).await
    }

    /// One order by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` without a token,
    /// `ApiError::Validation` for an invalid id, `ApiError::Parse` for an
    /// empty response, or the transport/HTTP error.
    #[instrument(skip(self, order_id))]
    pub async fn fetch_order_by_id(
        &self,
        order_id: impl IdInput<OrderId>,
    ) -> Result<Order, ApiError> {
        self.require_token()?;
        let order_id = order_id.into_id()?;

        self.send(self.request(Method::GET, self.url(&format!("/orders/{order_id}"))))
            .await?
            .ok_or_else(|| ApiError::Parse(format!("order {order_id} response was empty")))
    }

    /// Order `quantity` of a recipe.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` without a token,
    /// `ApiError::Validation` for an invalid recipe id or quantity, or the
    /// transport/HTTP error.
    #[instrument(skip(self, recipe_id, quantity))]
    pub async fn place_order(
        &self,
        recipe_id: impl IdInput<RecipeId>,
        quantity: impl QuantityInput,
    ) -> Result<Option<Ack>, ApiError> {
        self.require_token()?;
        let recipe_id = recipe_id.into_id()?;
        let quantity = quantity.into_quantity()?;

        let body = json!({ "recipe_id": recipe_id, "quantity": quantity });
        let ack: Option<Ack> = self
            .send(self.request(Method::POST, self.url("/orders/")).json(&body))
            .await?;

        if let Some(order_id) = ack.as_ref().and_then(|a| a.order_id) {
            info!(%order_id, %recipe_id, quantity, "Order placed");
        }
        Ok(ack)
    }

    /// Change an order's quantity and/or status.
    ///
    /// Only admins may change the status; the check uses the session role.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` without a token,
    /// `ApiError::Validation` for an invalid id, an empty update, a zero
    /// quantity or a status change by a non-admin, or the transport/HTTP error.
    #[instrument(skip(self, order_id))]
    pub async fn update_order(
        &self,
        order_id: impl IdInput<OrderId>,
        update: OrderUpdate,
    ) -> Result<Option<Ack>, ApiError> {
        self.require_token()?;
        let order_id = order_id.into_id()?;

        if update.is_empty() {
            return Err(ApiError::Validation(
                "Quantity or status required for update".to_string(),
            ));
        }
        if let Some(quantity) = update.quantity {
            quantity.into_quantity()?;
        }
        if update.status.is_some() && !self.session().role().is_admin() {
            return Err(ApiError::Validation(
                "Only admins can update order status".to_string(),
            ));
        }

        self.send(
            self.request(Method::PATCH, self.url(&format!("/orders/{order_id}")))
                .json(&update),
        )
        .await
    }

    /// Delete (cancel) an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthRequired` without a token,
    /// `ApiError::Validation` for an invalid id, or the transport/HTTP error.
    #[instrument(skip(self, order_id))]
    pub async fn delete_order(
        &self,
        order_id: impl IdInput<OrderId>,
    ) -> Result<Option<Ack>, ApiError> {
        self.require_token()?;
        let order_id = order_id.into_id()?;

        let ack = self
            .send(self.request(Method::DELETE, self.url(&format!("/orders/{order_id}"))))
            .await?;
        info!(%order_id, "Order deleted");
        Ok(ack)
    }
}
