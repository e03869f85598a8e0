//! Terminal rendering for command results.
//!
//! All user-facing output goes through here; logs go to stderr via tracing.

#![allow(clippy::print_stdout)]

use lopcafe_client::api::{Ack, UploadResponse};
use lopcafe_client::{Decision, Route, Session};
use lopcafe_core::{BrewMethod, Ingredient, Order, Recipe};

pub fn recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("No recipes yet.");
        return;
    }
    for recipe in recipes {
        let brew = recipe
            .brew_method
            .as_ref()
            .map_or("-", |b| b.name.as_str());
        let takeaway = if recipe.takeaway { "takeaway" } else { "in-house" };
        println!(
            "#{:<4} {:<24} {:>8}  {:<16} {}",
            recipe.id, recipe.name, recipe.price, brew, takeaway
        );
        if !recipe.ingredients.is_empty() {
            let lines: Vec<String> = recipe
                .ingredients
                .iter()
                .map(|i| match &i.quantity {
                    Some(q) => format!("{} ({q})", i.name),
                    None => i.name.clone(),
                })
                .collect();
            println!("       {}", lines.join(", "));
        }
    }
}

pub fn brew_methods(methods: &[BrewMethod]) {
    if methods.is_empty() {
        println!("No brew methods yet.");
        return;
    }
    for method in methods {
        match &method.details {
            Some(details) => println!("#{:<4} {} - {details}", method.id, method.name),
            None => println!("#{:<4} {}", method.id, method.name),
        }
    }
}

pub fn ingredients(ingredients: &[Ingredient]) {
    if ingredients.is_empty() {
        println!("No ingredients yet.");
        return;
    }
    for ingredient in ingredients {
        println!("#{:<4} {}", ingredient.id, ingredient.name);
    }
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders.");
        return;
    }
    for o in orders {
        order_line(o);
    }
}

pub fn order(order: &Order) {
    order_line(order);
    println!("       ordered {}", order.ordered_at.format("%Y-%m-%d %H:%M"));
}

fn order_line(order: &Order) {
    println!(
        "#{:<4} {:<24} x{:<3} {:>8}  {}",
        order.id,
        order.display_name(),
        order.quantity,
        order.total(),
        order.status
    );
}

/// Print the server's confirmation, if it sent one.
pub fn ack(ack: Option<&Ack>, fallback: &str) {
    let message = ack
        .and_then(|a| a.message.as_deref())
        .unwrap_or(fallback);
    match ack.and_then(|a| a.order_id) {
        Some(order_id) => println!("{message} (order #{order_id})"),
        None => println!("{message}"),
    }
    if let Some(otp) = ack.and_then(|a| a.otp.as_deref()) {
        println!("Verification code: {otp}");
    }
    if let Some(image_url) = ack.and_then(|a| a.image_url.as_deref()) {
        println!("Image: {image_url}");
    }
}

pub fn uploaded(response: &UploadResponse) {
    println!("{}", response.image_url);
}

pub fn session(session: &Session) {
    match session.effective_role() {
        Some(role) => println!("Logged in as {role}"),
        None => println!("Not logged in"),
    }
}

pub fn decision(route: Route, decision: Decision) {
    match decision.redirect() {
        None => println!("{} allowed", route.path()),
        Some(target) => println!("{} redirects to {}", route.path(), target.path()),
    }
}
