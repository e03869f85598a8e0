//! Request and response types for the LopCafe API.

use std::path::Path;

use lopcafe_core::{BrewMethodId, IngredientId, OrderId, OrderStatus, Price, RecipeId, Role};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// =============================================================================
// Acknowledgements
// =============================================================================

/// Body of a successful mutation.
///
/// The API answers writes with a message plus whichever identifiers the
/// operation touched; fields the operation does not produce are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub recipe_id: Option<RecipeId>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// Location of a stored image.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Verification code echoed by registration.
    #[serde(default)]
    pub otp: Option<String>,
}

// =============================================================================
// Authentication
// =============================================================================

/// Result of a successful login. The token itself goes to the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub role: Role,
    pub message: Option<String>,
}

/// Sign-up form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    /// Requested role; `None` registers a regular user.
    pub role: Option<Role>,
}

impl Registration {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password,
            role: None,
        }
    }

    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// New brew method form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewBrewMethod {
    pub name: String,
    pub details: Option<String>,
}

// =============================================================================
// Recipes
// =============================================================================

/// One ingredient line of a recipe draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientLine {
    pub ingredient_id: IngredientId,
    /// Free-form amount such as `"18g"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

/// Recipe create/update form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub takeaway: bool,
    pub brew_method_id: Option<BrewMethodId>,
    pub ingredients: Vec<IngredientLine>,
    pub image_url: Option<String>,
}

impl RecipeDraft {
    /// Check the fields the recipe form requires.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the name is blank, the price is not
    /// positive, or no brew method is chosen.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty()
            || !self.price.is_positive()
            || self.brew_method_id.is_none()
        {
            return Err(ApiError::Validation(
                "Name, price, and brew method are required".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Partial order update. At least one field must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

impl OrderUpdate {
    #[must_use]
    pub const fn quantity(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            status: None,
        }
    }

    #[must_use]
    pub const fn status(status: OrderStatus) -> Self {
        Self {
            quantity: None,
            status: Some(status),
        }
    }

    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.status.is_none()
    }
}

/// Filter for order listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub limit: Option<u32>,
    pub status: Option<OrderStatus>,
}

impl OrderQuery {
    #[must_use]
    pub const fn recent(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            status: None,
        }
    }

    #[must_use]
    pub const fn pending(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            status: Some(OrderStatus::Pending),
        }
    }

    pub(crate) fn to_pairs(self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// A quantity as typed by a user or passed by code.
///
/// Only whole numbers of at least one are accepted.
pub trait QuantityInput {
    /// Convert into a validated quantity.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for non-numeric or non-positive input.
    fn into_quantity(self) -> Result<u32, ApiError>;
}

fn invalid_quantity() -> ApiError {
    ApiError::Validation("Quantity must be a positive integer".to_string())
}

impl QuantityInput for u32 {
    fn into_quantity(self) -> Result<u32, ApiError> {
        if self >= 1 { Ok(self) } else { Err(invalid_quantity()) }
    }
}

impl QuantityInput for i32 {
    fn into_quantity(self) -> Result<u32, ApiError> {
        i64::from(self).into_quantity()
    }
}

impl QuantityInput for i64 {
    fn into_quantity(self) -> Result<u32, ApiError> {
        u32::try_from(self)
            .map_err(|_| invalid_quantity())?
            .into_quantity()
    }
}

impl QuantityInput for &str {
    fn into_quantity(self) -> Result<u32, ApiError> {
        self.trim()
            .parse::<u32>()
            .map_err(|_| invalid_quantity())?
            .into_quantity()
    }
}

impl QuantityInput for String {
    fn into_quantity(self) -> Result<u32, ApiError> {
        self.as_str().into_quantity()
    }
}

// =============================================================================
// Upload
// =============================================================================

/// Image types the upload endpoint accepts.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/gif"];

/// An image to upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadFile {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, guessing its type from the extension.
    ///
    /// Unknown extensions become `application/octet-stream`, which
    /// [`ApiClient::upload_image`](super::ApiClient::upload_image) rejects.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self {
            content_type: content_type_for(path).to_string(),
            file_name,
            bytes,
        })
    }

    /// Whether the content type is one the server stores.
    #[must_use]
    pub fn is_allowed_image(&self) -> bool {
        ALLOWED_IMAGE_TYPES.contains(&self.content_type.to_ascii_lowercase().as_str())
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Body of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    /// Server-relative URL of the stored image, e.g. `/uploads/1700000000_latte.png`.
    pub image_url: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_ack_carries_otp_and_image_url() {
        let ack: Ack = serde_json::from_value(json!({
            "error": false,
            "message": "Registered",
            "otp": "482913",
            "image_url": "/uploads/a.png"
        }))
        .unwrap();
        assert_eq!(ack.otp.as_deref(), Some("482913"));
        assert_eq!(ack.image_url.as_deref(), Some("/uploads/a.png"));

        let bare: Ack = serde_json::from_value(json!({"message": "ok"})).unwrap();
        assert!(bare.otp.is_none());
        assert!(bare.image_url.is_none());
    }

    #[test]
    fn test_quantity_input() {
        assert_eq!(3_u32.into_quantity().unwrap(), 3);
        assert_eq!(" 2 ".into_quantity().unwrap(), 2);
        assert!(0_u32.into_quantity().is_err());
        assert!((-1_i32).into_quantity().is_err());
        assert!("abc".into_quantity().is_err());
        assert!("1.5".into_quantity().is_err());
        assert!(i64::MAX.into_quantity().is_err());
    }

    #[test]
    fn test_order_update_serializes_only_set_fields() {
        let body = serde_json::to_value(OrderUpdate::quantity(2)).unwrap();
        assert_eq!(body, json!({"quantity": 2}));

        let body =
            serde_json::to_value(OrderUpdate::status(OrderStatus::Shipped).with_quantity(1))
                .unwrap();
        assert_eq!(body, json!({"quantity": 1, "status": "Shipped"}));

        assert!(OrderUpdate::default().is_empty());
    }

    #[test]
    fn test_order_query_pairs() {
        assert_eq!(OrderQuery::recent(5).to_pairs(), vec![("limit", "5".to_string())]);
        assert_eq!(
            OrderQuery::pending(3).to_pairs(),
            vec![("limit", "3".to_string()), ("status", "Pending".to_string())]
        );
        assert!(OrderQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn test_recipe_draft_wire_shape() {
        let draft = RecipeDraft {
            name: "Flat White".to_string(),
            description: None,
            price: Price::from_cents(450),
            takeaway: true,
            brew_method_id: Some(BrewMethodId::new(2)),
            ingredients: vec![IngredientLine {
                ingredient_id: IngredientId::new(1),
                quantity: Some("18g".to_string()),
            }],
            image_url: None,
        };
        draft.validate().unwrap();

        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["price"], json!(4.5));
        assert_eq!(body["brew_method_id"], json!(2));
        assert_eq!(body["ingredients"], json!([{"ingredient_id": 1, "quantity": "18g"}]));
    }

    #[test]
    fn test_recipe_draft_requires_name_price_brew_method() {
        let draft = RecipeDraft {
            name: "Mocha".to_string(),
            description: None,
            price: Price::from_cents(500),
            takeaway: false,
            brew_method_id: None,
            ingredients: vec![],
            image_url: None,
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.to_string(), "Name, price, and brew method are required");

        let free = RecipeDraft {
            brew_method_id: Some(BrewMethodId::new(1)),
            price: Price::from_cents(0),
            ..draft
        };
        assert!(free.validate().is_err());
    }

    #[test]
    fn test_ack_parses_order_responses() {
        let ack: Ack = serde_json::from_value(json!({
            "error": false,
            "message": "Order updated",
            "order_id": 7,
            "quantity": 2,
            "status": "Confirmed"
        }))
        .unwrap();
        assert_eq!(ack.order_id, Some(OrderId::new(7)));
        assert_eq!(ack.status, Some(OrderStatus::Confirmed));
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("a.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.gif")), "image/gif");
        assert_eq!(content_type_for(Path::new("a.txt")), "application/octet-stream");
    }

    #[test]
    fn test_allowed_image() {
        assert!(UploadFile::new("a.png", "image/png", vec![1]).is_allowed_image());
        assert!(UploadFile::new("a.jpg", "IMAGE/JPEG", vec![1]).is_allowed_image());
        assert!(!UploadFile::new("a.txt", "text/plain", vec![1]).is_allowed_image());
    }

    #[tokio::test]
    async fn test_upload_file_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("latte.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "latte.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.bytes.len(), 4);
    }
}
