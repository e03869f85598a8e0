//! Login, signup, verification and logout.

use lopcafe_client::{Route, SessionStore};
use lopcafe_client::api::Registration;
use lopcafe_core::Role;
use secrecy::SecretString;

use super::Context;
use crate::output;

/// Log in and remember the session.
pub async fn login(
    ctx: &Context,
    email: &str,
    password: SecretString,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("login", Route::Login)?;
    let outcome = ctx.api.login(email, &password).await?;
    tracing::info!(role = %outcome.role, "Login successful");
    output::session(&ctx.store.session());
    Ok(())
}

/// Create an account; the server mails a verification code.
pub async fn register(
    ctx: &Context,
    username: String,
    email: String,
    password: SecretString,
    admin: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("register", Route::Signup)?;
    let mut registration = Registration::new(username, email, password);
    if admin {
        registration = registration.with_role(Role::Admin);
    }
    let ack = ctx.api.register(&registration).await?;
    output::ack(ack.as_ref(), "Registered. Check your e-mail for the code.");
    Ok(())
}

/// Confirm the e-mailed code.
pub async fn verify(
    ctx: &Context,
    email: &str,
    otp: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.gate("verify", Route::Verify)?;
    let ack = ctx.api.verify(email, otp).await?;
    output::ack(ack.as_ref(), "Email verified.");
    Ok(())
}

/// Forget the session.
pub fn logout(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.api.logout()?;
    output::session(&ctx.store.session());
    Ok(())
}
