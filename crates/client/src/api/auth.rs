//! Login, registration, e-mail verification and logout.

use lopcafe_core::Role;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use super::{Ack, ApiClient, LoginOutcome, Registration};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
    role: Option<String>,
    message: Option<String>,
}

impl ApiClient {
    /// Log in and store the returned token and role in the session.
    ///
    /// The role defaults to `User` when the response omits it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if either field is blank,
    /// `ApiError::Parse` if the response carries no token, or the
    /// transport/HTTP error.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginOutcome, ApiError> {
        if email.trim().is_empty() || password.expose_secret().is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        let response: LoginResponse = self
            .send(self.request(Method::POST, self.url("/login")).json(&body))
            .await?
            .ok_or_else(|| ApiError::Parse("empty login response".to_string()))?;

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Parse("login response has no token".to_string()))?;
        let role = Role::from_stored(response.role.as_deref());

        self.session().set_session(SecretString::from(token), role)?;
        info!(role = %role, "Logged in");

        Ok(LoginOutcome {
            role,
            message: response.message,
        })
    }

    /// Create an account. The server e-mails a one-time code for [`verify`](Self::verify).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if username, e-mail or password is
    /// blank, or the transport/HTTP error.
    #[instrument(skip(self, registration), fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<Option<Ack>, ApiError> {
        if registration.username.trim().is_empty()
            || registration.email.trim().is_empty()
            || registration.password.expose_secret().is_empty()
        {
            return Err(ApiError::Validation(
                "Username, email, and password are required".to_string(),
            ));
        }

        let body = json!({
            "username": registration.username,
            "email": registration.email,
            "password": registration.password.expose_secret(),
            "role": registration.role.unwrap_or_default().as_str(),
        });
        self.send(self.request(Method::POST, self.url("/register")).json(&body))
            .await
    }

    /// Confirm an e-mail address with the code sent at registration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if either field is blank, or the
    /// transport/HTTP error.
    #[instrument(skip(self, otp))]
    pub async fn verify(&self, email: &str, otp: &str) -> Result<Option<Ack>, ApiError> {
        if email.trim().is_empty() || otp.trim().is_empty() {
            return Err(ApiError::Validation(
                "Email and OTP are required".to_string(),
            ));
        }

        let body = json!({ "email": email, "otp": otp.trim() });
        self.send(self.request(Method::POST, self.url("/verify")).json(&body))
            .await
    }

    /// Forget the token and role. No request is made.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Session` if the session storage cannot be cleared.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session().clear()?;
        info!("Logged out");
        Ok(())
    }
}
