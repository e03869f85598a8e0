//! Order commands (logged-in users).

use lopcafe_client::Route;
use lopcafe_client::api::{OrderQuery, OrderUpdate, QuantityInput};
use lopcafe_core::OrderStatus;

use super::Context;
use crate::error::CliError;
use crate::output;

pub async fn list(
    ctx: &Context,
    limit: Option<u32>,
    pending: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("orders list", Route::Orders)?;
    let query = OrderQuery {
        limit,
        status: pending.then_some(OrderStatus::Pending),
    };
    output::orders(&ctx.api.fetch_orders_filtered(query).await?);
    Ok(())
}

pub async fn show(ctx: &Context, order_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("orders show", Route::Orders)?;
    output::order(&ctx.api.fetch_order_by_id(order_id).await?);
    Ok(())
}

pub async fn place(
    ctx: &Context,
    recipe_id: &str,
    quantity: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("orders place", Route::Orders)?;
    let ack = ctx.api.place_order(recipe_id, quantity).await?;
    output::ack(ack.as_ref(), "Order placed.");
    Ok(())
}

pub async fn update(
    ctx: &Context,
    order_id: &str,
    quantity: Option<&str>,
    status: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("orders update", Route::Orders)?;

    let mut update = OrderUpdate::default();
    if let Some(quantity) = quantity {
        update = update.with_quantity(quantity.into_quantity()?);
    }
    if let Some(status) = status {
        let status: OrderStatus = status.parse().map_err(|_| CliError::InvalidArgument {
            name: "status",
            value: status.to_string(),
        })?;
        update = update.with_status(status);
    }

    let ack = ctx.api.update_order(order_id, update).await?;
    output::ack(ack.as_ref(), "Order updated.");
    Ok(())
}

pub async fn delete(ctx: &Context, order_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("orders delete", Route::Orders)?;
    let ack = ctx.api.delete_order(order_id).await?;
    output::ack(ack.as_ref(), "Order deleted.");
    Ok(())
}
